//! The contest container.
//!
//! [`Contest`] owns every piece of contest state together with the random and
//! time sources it draws on. All operations run to completion on `&mut self`;
//! there is no interior mutability and no locking.
//!
//! Callers are expected to persist [`Contest::snapshot`] after mutations (see
//! [`crate::persistence`]) and may subscribe to [`ContestEvent`]s or poll
//! [`Contest::revision`] to learn when that is needed.

use crate::{
    clock::{Clock, SystemClock},
    draw,
    export::{self, UserExport},
    events::{ContestEvent, SubscriptionId, Subscribers},
    referral::ReferralIssuer,
    registry::{Archive, UserRegistry},
    settings::SettingsStore,
    validator::{self, ValidationOutcome},
};
use giveaway_types::{
    contest::{DEFAULT_ADMIN_ID, DEFAULT_BOT_ENTRY_POINT, SNAPSHOT_VERSION},
    ContestSettings, LastResults, Snapshot, SnapshotError, User, UserId,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Construction parameters for a [`Contest`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestConfig {
    /// Identity allowed to run administrative actions.
    pub admin_id: UserId,
    /// Base of referral deep links.
    pub bot_entry_point: String,
    /// Seed for the random source. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for ContestConfig {
    fn default() -> Self {
        Self {
            admin_id: DEFAULT_ADMIN_ID,
            bot_entry_point: DEFAULT_BOT_ENTRY_POINT.to_string(),
            seed: None,
        }
    }
}

/// Aggregate counters over the current contest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestStats {
    pub registered: usize,
    pub validated: usize,
    pub eligible: usize,
    pub total_score: u64,
    pub all_time: usize,
}

pub struct Contest<R = ChaCha20Rng, C = SystemClock> {
    admin_id: UserId,
    registry: UserRegistry,
    archive: Archive,
    referrals: ReferralIssuer,
    settings: SettingsStore,
    rng: R,
    clock: C,
    subscribers: Subscribers,
    revision: u64,
}

impl Contest {
    /// Create an empty contest using the system clock and a ChaCha20 random source.
    pub fn new(config: ContestConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        Self::with_parts(config, rng, SystemClock)
    }
}

impl<R: Rng, C: Clock> Contest<R, C> {
    /// Create an empty contest with explicit random and time sources.
    ///
    /// `config.seed` is ignored; the provided `rng` is used as is.
    pub fn with_parts(config: ContestConfig, rng: R, clock: C) -> Self {
        Self {
            admin_id: config.admin_id,
            registry: UserRegistry::new(),
            archive: Archive::default(),
            referrals: ReferralIssuer::new(config.bot_entry_point),
            settings: SettingsStore::default(),
            rng,
            clock,
            subscribers: Subscribers::default(),
            revision: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Participant operations
    // ------------------------------------------------------------------------

    /// Register a participant, or return the existing record unchanged.
    pub fn register(
        &mut self,
        user_id: UserId,
        username: &str,
        full_name: &str,
        referrer_id: Option<UserId>,
    ) -> User {
        let join_date = self.clock.now().date_naive();
        let (user, created) = self
            .registry
            .register(user_id, username, full_name, referrer_id, join_date);
        let user = user.clone();
        if created {
            self.archive.record(&user);
            info!(user_id, ?referrer_id, "registered");
            self.commit(ContestEvent::Registered {
                user_id,
                referrer_id,
            });
        }
        user
    }

    pub fn find(&self, user_id: UserId) -> Option<&User> {
        self.registry.find(user_id)
    }

    /// Validate `user_id` once the external subscription check has run.
    ///
    /// Returns `false` when `is_subscribed` is false or the user is unknown.
    /// Repeated calls succeed without crediting the referrer again.
    pub fn validate(&mut self, user_id: UserId, is_subscribed: bool) -> bool {
        self.validate_detailed(user_id, is_subscribed).is_success()
    }

    /// [`Contest::validate`] with the full outcome.
    pub fn validate_detailed(&mut self, user_id: UserId, is_subscribed: bool) -> ValidationOutcome {
        let outcome = validator::validate(&mut self.registry, user_id, is_subscribed);
        if let ValidationOutcome::Validated { credited } = outcome {
            self.commit(ContestEvent::Validated { user_id, credited });
        }
        outcome
    }

    /// Referral deep link for `user_id`. Stable until the next reset.
    ///
    /// Links are not tied to registration; any id gets one.
    pub fn link_for(&mut self, user_id: UserId) -> String {
        self.referrals.link_for(user_id, &mut self.rng)
    }

    pub fn referrals(&self) -> &ReferralIssuer {
        &self.referrals
    }

    // ------------------------------------------------------------------------
    // Administrative operations (authorization is up to the caller)
    // ------------------------------------------------------------------------

    pub fn is_admin(&self, user_id: UserId) -> bool {
        user_id == self.admin_id
    }

    pub fn admin_id(&self) -> UserId {
        self.admin_id
    }

    /// Draw up to `count` distinct winners weighted by score.
    ///
    /// Only advances the random source; contest state is not modified.
    pub fn draw_winners(&mut self, count: usize) -> Vec<User> {
        let winners = draw::draw_winners(self.registry.iter(), count, &mut self.rng);
        info!(
            requested = count,
            winners = ?winners.iter().map(|w| w.user_id).collect::<Vec<_>>(),
            "draw complete"
        );
        winners
    }

    pub fn update_howto(&mut self, text: impl Into<String>) {
        self.settings.update_howto(text);
        info!("howto updated");
        self.commit(ContestEvent::HowtoUpdated);
    }

    /// Publish draw results, replacing any earlier publication.
    pub fn save_results(&mut self, text: impl Into<String>) -> LastResults {
        let now = self.clock.now();
        let results = self.settings.save_results(text, now).clone();
        info!(date = %results.date, "results saved");
        self.commit(ContestEvent::ResultsSaved);
        results
    }

    /// Clear participants, published results and issued referral codes.
    ///
    /// Settings and the all-time archive survive.
    pub fn reset_contest(&mut self) {
        let cleared_users = self.registry.len();
        self.registry.clear();
        self.settings.clear_results();
        self.referrals.clear();
        info!(cleared_users, "contest reset");
        self.commit(ContestEvent::Reset { cleared_users });
    }

    // ------------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------------

    /// Current participants in registration order.
    pub fn users(&self) -> &[User] {
        self.registry.as_slice()
    }

    /// Every participant ever registered, kept across resets.
    pub fn archive(&self) -> &[User] {
        self.archive.as_slice()
    }

    pub fn settings(&self) -> &ContestSettings {
        self.settings.settings()
    }

    pub fn last_results(&self) -> Option<&LastResults> {
        self.settings.last_results()
    }

    pub fn stats(&self) -> ContestStats {
        let mut stats = ContestStats {
            registered: self.registry.len(),
            all_time: self.archive.len(),
            ..ContestStats::default()
        };
        for user in self.registry.iter() {
            if user.is_validated {
                stats.validated += 1;
            }
            if user.is_eligible() {
                stats.eligible += 1;
            }
            stats.total_score += u64::from(user.score);
        }
        stats
    }

    /// Participant report for administrators, stamped with the current time.
    pub fn export(&self) -> UserExport {
        export::export_users(self.registry.as_slice(), self.clock.now())
    }

    /// Number of mutations applied so far. Unchanged by no-op calls.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ------------------------------------------------------------------------
    // Change notification
    // ------------------------------------------------------------------------

    pub fn subscribe(&mut self, listener: impl FnMut(&ContestEvent) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn commit(&mut self, event: ContestEvent) {
        self.revision += 1;
        self.subscribers.notify(&event);
    }

    // ------------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------------

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            users: self.registry.as_slice().to_vec(),
            archive: self.archive.as_slice().to_vec(),
            settings: self.settings.settings().clone(),
            last_results: self.settings.last_results().cloned(),
        }
    }

    /// Replace all persisted state with `snapshot`.
    ///
    /// Referral codes are cleared. On error nothing changes.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        if let Err(err) = snapshot.verify() {
            warn!(?err, "rejected snapshot");
            return Err(err);
        }
        let Snapshot {
            users,
            archive,
            settings,
            last_results,
            ..
        } = snapshot;
        let registry = UserRegistry::from_users(users)?;
        let mut archive = Archive::from_users(archive);
        // Older snapshots may predate the archive
        for user in registry.iter() {
            archive.record(user);
        }

        let users = registry.len();
        self.registry = registry;
        self.archive = archive;
        self.settings = SettingsStore::new(settings, last_results);
        self.referrals.clear();
        info!(users, all_time = self.archive.len(), "restored snapshot");
        self.commit(ContestEvent::Restored { users });
        Ok(())
    }
}

impl<R, C> std::fmt::Debug for Contest<R, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contest")
            .field("admin_id", &self.admin_id)
            .field("users", &self.registry.len())
            .field("all_time", &self.archive.len())
            .field("referral_codes", &self.referrals.len())
            .field("subscribers", &self.subscribers.len())
            .field("revision", &self.revision)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{seeded_contest, FixedClock};
    use giveaway_types::contest::demo_users;
    use std::{cell::RefCell, rc::Rc};

    const A: UserId = 1001;
    const B: UserId = 1002;
    const C: UserId = 1003;

    #[test]
    fn test_register_then_find() {
        let mut contest = seeded_contest(0);
        let user = contest.register(A, "@a", "Alice", None);
        assert_eq!(user.join_date, FixedClock::default().now().date_naive());

        let found = contest.find(A).unwrap();
        assert_eq!(found.score, 0);
        assert!(!found.is_validated);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut contest = seeded_contest(0);
        let first = contest.register(A, "@a", "Alice", None);
        let revision = contest.revision();

        let second = contest.register(A, "@other", "Other", Some(B));
        assert_eq!(first, second);
        assert_eq!(contest.revision(), revision);
        assert_eq!(contest.users().len(), 1);
    }

    #[test]
    fn test_referral_scenario() {
        let mut contest = seeded_contest(0);
        contest.register(A, "@a", "Alice", None);
        contest.register(B, "@b", "Bob", Some(A));

        assert!(contest.validate(B, true));
        assert_eq!(contest.find(A).unwrap().score, 1);
        assert!(contest.find(B).unwrap().is_validated);

        assert!(contest.validate(B, true));
        assert_eq!(contest.find(A).unwrap().score, 1);
    }

    #[test]
    fn test_validate_requires_subscription() {
        let mut contest = seeded_contest(0);
        contest.register(A, "@a", "Alice", None);
        contest.register(B, "@b", "Bob", Some(A));
        let revision = contest.revision();

        assert!(!contest.validate(B, false));
        assert!(!contest.find(B).unwrap().is_validated);
        assert_eq!(contest.find(A).unwrap().score, 0);
        assert_eq!(contest.revision(), revision);

        let snapshot = contest.snapshot();
        assert!(!contest.validate(C, true));
        assert_eq!(contest.revision(), revision);
        assert_eq!(contest.snapshot(), snapshot);
        assert!(contest.find(C).is_none());
    }

    #[test]
    fn test_dangling_referrer_changes_no_score() {
        let mut contest = seeded_contest(0);
        contest.register(A, "@a", "Alice", Some(B));
        assert!(contest.validate(A, true));
        assert!(contest.users().iter().all(|u| u.score == 0));
    }

    #[test]
    fn test_draw_scenario() {
        let mut contest = seeded_contest(0);
        let mut snapshot = contest.snapshot();
        snapshot.users = demo_users().into_iter().take(2).collect();
        let mut zero = demo_users().pop().unwrap();
        zero.score = 0;
        snapshot.users.push(zero.clone());
        contest.restore(snapshot).unwrap();

        for _ in 0..20 {
            let winners = contest.draw_winners(2);
            assert_eq!(winners.len(), 2);
            assert_ne!(winners[0].user_id, winners[1].user_id);
            assert!(winners.iter().all(|w| w.user_id != zero.user_id));
        }
    }

    #[test]
    fn test_draw_does_not_mutate() {
        let mut contest = seeded_contest(0);
        let mut snapshot = contest.snapshot();
        snapshot.users = demo_users();
        contest.restore(snapshot).unwrap();

        let before = contest.snapshot();
        let revision = contest.revision();
        contest.draw_winners(3);
        assert_eq!(contest.snapshot(), before);
        assert_eq!(contest.revision(), revision);
    }

    #[test]
    fn test_link_is_stable() {
        let mut contest = seeded_contest(0);
        let link = contest.link_for(A);
        assert_eq!(contest.link_for(A), link);
        assert!(link.starts_with("https://t.me/YourBotName?start=ref_"));
        assert_ne!(contest.link_for(B), link);
    }

    #[test]
    fn test_reset_clears_contest_but_not_settings() {
        let mut contest = seeded_contest(0);
        contest.update_howto("Invite friends");
        contest.register(A, "@a", "Alice", None);
        contest.register(B, "@b", "Bob", Some(A));
        contest.validate(A, true);
        contest.validate(B, true);
        contest.save_results("Alice wins");
        let link = contest.link_for(A);

        contest.reset_contest();

        assert!(contest.users().is_empty());
        assert!(contest.last_results().is_none());
        assert!(contest.draw_winners(5).is_empty());
        assert_eq!(contest.settings().howto, "Invite friends");
        assert_eq!(contest.archive().len(), 2);
        assert!(contest.referrals().is_empty());
        assert_ne!(contest.link_for(A), link);
    }

    #[test]
    fn test_reregistration_after_reset_starts_fresh() {
        let mut contest = seeded_contest(0);
        contest.register(A, "@a", "Alice", None);
        contest.register(B, "@b", "Bob", Some(A));
        contest.validate(A, true);
        contest.validate(B, true);
        contest.reset_contest();

        let user = contest.register(A, "@a", "Alice", None);
        assert_eq!(user.score, 0);
        assert!(!user.is_validated);
        assert_eq!(contest.archive().len(), 2);
    }

    #[test]
    fn test_save_results_stamps_clock() {
        let mut contest = seeded_contest(0);
        let results = contest.save_results("first");
        assert_eq!(results.date, FixedClock::default().now());
        contest.save_results("second");
        assert_eq!(contest.last_results().unwrap().text, "second");
    }

    #[test]
    fn test_admin_identity() {
        let contest = seeded_contest(0);
        assert!(contest.is_admin(DEFAULT_ADMIN_ID));
        assert!(!contest.is_admin(A));
    }

    #[test]
    fn test_stats() {
        let mut contest = seeded_contest(0);
        contest.register(A, "@a", "Alice", None);
        contest.register(B, "@b", "Bob", Some(A));
        contest.register(C, "@c", "Carol", Some(A));
        contest.validate(A, true);
        contest.validate(B, true);
        contest.validate(C, true);

        let stats = contest.stats();
        assert_eq!(stats.registered, 3);
        assert_eq!(stats.validated, 3);
        assert_eq!(stats.eligible, 1);
        assert_eq!(stats.total_score, 2);
        assert_eq!(stats.all_time, 3);
    }

    #[test]
    fn test_events_follow_mutations() {
        let mut contest = seeded_contest(0);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        contest.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        contest.register(A, "@a", "Alice", None);
        contest.register(A, "@a", "Alice", None);
        contest.register(B, "@b", "Bob", Some(A));
        contest.validate(B, true);
        contest.validate(B, true);
        contest.validate(C, true);
        contest.draw_winners(1);
        contest.link_for(A);
        contest.update_howto("text");
        contest.save_results("done");
        contest.reset_contest();

        assert_eq!(
            *events.borrow(),
            vec![
                ContestEvent::Registered {
                    user_id: A,
                    referrer_id: None
                },
                ContestEvent::Registered {
                    user_id: B,
                    referrer_id: Some(A)
                },
                ContestEvent::Validated {
                    user_id: B,
                    credited: Some(A)
                },
                ContestEvent::HowtoUpdated,
                ContestEvent::ResultsSaved,
                ContestEvent::Reset { cleared_users: 2 },
            ]
        );
        assert_eq!(contest.revision(), 6);
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut contest = seeded_contest(0);
        contest.update_howto("rules");
        contest.register(A, "@a", "Alice", None);
        contest.register(B, "@b", "Bob", Some(A));
        contest.validate(B, true);
        contest.save_results("Alice");
        let snapshot = contest.snapshot();

        let mut restored = seeded_contest(1);
        restored.restore(snapshot.clone()).unwrap();
        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.find(A).unwrap().score, 1);

        // Validation state survives, so no second credit after restore
        assert!(restored.validate(B, true));
        assert_eq!(restored.find(A).unwrap().score, 1);
    }

    #[test]
    fn test_restore_rejects_bad_snapshot_without_mutation() {
        let mut contest = seeded_contest(0);
        contest.register(A, "@a", "Alice", None);
        let before = contest.snapshot();
        let revision = contest.revision();

        let mut duplicated = before.clone();
        duplicated.users.push(duplicated.users[0].clone());
        assert!(matches!(
            contest.restore(duplicated),
            Err(SnapshotError::DuplicateUser(A))
        ));

        let future = Snapshot {
            version: SNAPSHOT_VERSION + 1,
            ..Snapshot::default()
        };
        assert!(contest.restore(future).is_err());

        assert_eq!(contest.snapshot(), before);
        assert_eq!(contest.revision(), revision);
    }

    #[test]
    fn test_restore_backfills_archive() {
        let mut contest = seeded_contest(0);
        let snapshot = Snapshot {
            users: demo_users(),
            ..Snapshot::default()
        };
        contest.restore(snapshot).unwrap();
        assert_eq!(contest.archive().len(), 8);
    }

    #[test]
    fn test_restore_invalidates_links() {
        let mut contest = seeded_contest(0);
        let link = contest.link_for(A);
        contest.restore(Snapshot::default()).unwrap();
        assert!(contest.referrals().code_for(A).is_none());
        assert_ne!(contest.link_for(A), link);
    }

    #[test]
    fn test_seeded_config_is_deterministic() {
        let config = ContestConfig {
            seed: Some(42),
            ..ContestConfig::default()
        };
        let mut a = Contest::new(config.clone());
        let mut b = Contest::new(config);
        assert_eq!(a.link_for(A), b.link_for(A));
    }
}
