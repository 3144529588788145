//! Subscription validation with referral credit.
//!
//! Validation is a one-way transition. The referrer (if any, and if registered)
//! is credited exactly once, on the transition itself; repeating the call is a
//! successful no-op.

use crate::registry::UserRegistry;
use giveaway_types::UserId;
use tracing::{debug, info, warn};

/// What a validation attempt did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The external subscription check did not pass; nothing was touched.
    NotSubscribed,
    /// No such user in the registry.
    UnknownUser,
    /// The user was validated earlier; nothing changed.
    AlreadyValidated,
    /// The user was validated now. `credited` names the referrer whose score
    /// went up, when the referrer resolved.
    Validated { credited: Option<UserId> },
}

impl ValidationOutcome {
    /// Boolean result exposed to callers.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::AlreadyValidated | Self::Validated { .. })
    }

    /// Whether the registry was mutated.
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Validated { .. })
    }
}

/// Validate `user_id` given the externally asserted subscription state.
pub fn validate(
    registry: &mut UserRegistry,
    user_id: UserId,
    is_subscribed: bool,
) -> ValidationOutcome {
    if !is_subscribed {
        debug!(user_id, "validation refused: not subscribed");
        return ValidationOutcome::NotSubscribed;
    }

    let Some(user) = registry.find_mut(user_id) else {
        debug!(user_id, "validation refused: unknown user");
        return ValidationOutcome::UnknownUser;
    };
    if user.is_validated {
        debug!(user_id, "already validated");
        return ValidationOutcome::AlreadyValidated;
    }
    user.is_validated = true;
    let referrer_id = user.referrer_id;

    // Credit the referrer regardless of its own validation state
    let credited = referrer_id.and_then(|referrer_id| match registry.find_mut(referrer_id) {
        Some(referrer) => {
            referrer.score = referrer.score.saturating_add(1);
            Some(referrer_id)
        }
        None => {
            warn!(user_id, referrer_id, "referrer not registered; credit dropped");
            None
        }
    });
    info!(user_id, ?credited, "validated");
    ValidationOutcome::Validated { credited }
}
