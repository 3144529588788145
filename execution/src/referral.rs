//! Referral link issuer.
//!
//! Codes are generated lazily from the injected RNG and cached per user for as
//! long as the issuer lives. Codes are not checked for global uniqueness.

use giveaway_types::{
    contest::{REFERRAL_CODE_ALPHABET, REFERRAL_CODE_LENGTH},
    ReferralCode, UserId,
};
use rand::Rng;
use std::collections::HashMap;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct ReferralIssuer {
    entry_point: String,
    codes: HashMap<UserId, ReferralCode>,
}

impl ReferralIssuer {
    pub fn new(entry_point: impl Into<String>) -> Self {
        Self {
            entry_point: entry_point.into(),
            codes: HashMap::new(),
        }
    }

    /// Deep link for `user_id`, generating and caching its code on first use.
    pub fn link_for<R: Rng + ?Sized>(&mut self, user_id: UserId, rng: &mut R) -> String {
        let code = self.codes.entry(user_id).or_insert_with(|| {
            let code = generate_code(rng);
            debug!(user_id, %code, "issued referral code");
            code
        });
        code.link(&self.entry_point)
    }

    /// Cached code for `user_id`, if one was issued.
    pub fn code_for(&self, user_id: UserId) -> Option<&ReferralCode> {
        self.codes.get(&user_id)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Forget every issued code.
    pub fn clear(&mut self) {
        self.codes.clear();
    }
}

/// Draw a code uniformly from the 62-symbol alphabet.
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> ReferralCode {
    let mut indices = [0u8; REFERRAL_CODE_LENGTH];
    for index in indices.iter_mut() {
        *index = rng.gen_range(0..REFERRAL_CODE_ALPHABET.len()) as u8;
    }
    ReferralCode::from(indices)
}
