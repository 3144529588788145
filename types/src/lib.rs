//! Plain data shared by the giveaway engine and its callers.
//!
//! Nothing in this crate holds live resources: every type is a value that can be cloned,
//! compared and serialized into a [`contest::Snapshot`].

pub mod contest;

pub use contest::{
    ContestSettings, LastResults, ReferralCode, Snapshot, SnapshotError, TelegramIdentity, User,
    UserId,
};
