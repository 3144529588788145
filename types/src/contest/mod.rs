//! Contest domain types.
//!
//! Defines participant/settings/results state, the referral code shape, the bridge identity
//! input and the versioned snapshot exchanged with persistence.

mod constants;
mod demo;
mod identity;
mod referral;
mod settings;
mod snapshot;
mod user;

pub use constants::*;
pub use demo::*;
pub use identity::*;
pub use referral::*;
pub use settings::*;
pub use snapshot::*;
pub use user::*;
