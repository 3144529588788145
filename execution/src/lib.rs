//! Giveaway contest engine.
//!
//! This crate holds the contest state machine: the participant registry,
//! subscription validation with referral credit, referral link issuing,
//! weighted winner selection and the settings/results store. Everything is
//! owned by a single [`Contest`] value that callers pass around explicitly.
//!
//! ## Determinism requirements
//! - Randomness (referral codes, draws) comes only from the injected RNG.
//! - Time (join dates, result stamps) comes only from the injected [`Clock`].
//! - Listings, pools and exports follow registration order, never hash order.
//!
//! ## Persistence
//! The engine holds no handles. Callers exchange [`giveaway_types::Snapshot`]s with a
//! [`SnapshotStore`] and restore them on startup.
//!
//! ## Example
//! ```rust
//! use giveaway_execution::{Contest, ContestConfig};
//!
//! let mut contest = Contest::new(ContestConfig { seed: Some(7), ..ContestConfig::default() });
//! contest.register(1, "@alice", "Alice", None);
//! contest.register(2, "@bob", "Bob", Some(1));
//! assert!(contest.validate(1, true));
//! assert!(contest.validate(2, true));
//!
//! let winners = contest.draw_winners(1);
//! assert_eq!(winners[0].user_id, 1);
//! ```

pub mod clock;
pub mod contest;
pub mod draw;
pub mod events;
pub mod export;
pub mod persistence;
pub mod referral;
pub mod registry;
pub mod settings;
pub mod validator;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;


pub use clock::{Clock, SystemClock};
pub use contest::{Contest, ContestConfig, ContestStats};
pub use draw::{draw_winners, WeightedPool};
pub use events::{ContestEvent, SubscriptionId};
pub use export::{export_users, ExportedUser, UserExport};
pub use persistence::{FileSnapshotStore, InMemorySnapshotStore, SnapshotStore, StoreError};
pub use referral::ReferralIssuer;
pub use registry::UserRegistry;
pub use validator::ValidationOutcome;
