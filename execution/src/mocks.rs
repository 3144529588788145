//! Deterministic building blocks for tests.

use crate::{clock::Clock, Contest, ContestConfig};
use chrono::{DateTime, TimeZone, Utc};
use giveaway_types::UserId;
use rand::{rngs::StdRng, SeedableRng};

/// Contest with a seeded RNG and a frozen clock.
pub type MockContest = Contest<StdRng, FixedClock>;

/// Clock stuck at a single instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Creates a contest with default config, `StdRng::seed_from_u64(seed)` and [`FixedClock`].
pub fn seeded_contest(seed: u64) -> MockContest {
    Contest::with_parts(
        ContestConfig::default(),
        StdRng::seed_from_u64(seed),
        FixedClock::default(),
    )
}

/// Registers `user_id` under `referrer_id` and validates it.
pub fn join_and_validate(contest: &mut MockContest, user_id: UserId, referrer_id: Option<UserId>) {
    contest.register(user_id, "", &format!("user{user_id}"), referrer_id);
    contest.validate(user_id, true);
}
