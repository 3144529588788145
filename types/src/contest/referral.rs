use serde::{Deserialize, Serialize};
use std::fmt;

use super::{REFERRAL_CODE_ALPHABET, REFERRAL_CODE_LENGTH, REFERRAL_START_PREFIX};

/// Opaque referral code embedded in a deep link.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferralCode(String);

impl ReferralCode {
    /// Wrap a code, checking only its shape (length and alphabet).
    pub fn parse(code: &str) -> Option<Self> {
        if code.len() != REFERRAL_CODE_LENGTH {
            return None;
        }
        if !code.bytes().all(|b| REFERRAL_CODE_ALPHABET.contains(&b)) {
            return None;
        }
        Some(Self(code.to_string()))
    }

    /// Extract the code from a deep-link `start` parameter (`ref_<code>`).
    ///
    /// Resolving the code back to a referrer is owned by the bot backend.
    pub fn from_start_param(param: &str) -> Option<Self> {
        param
            .strip_prefix(REFERRAL_START_PREFIX)
            .and_then(Self::parse)
    }

    /// Deep link carrying this code.
    pub fn link(&self, entry_point: &str) -> String {
        format!("{entry_point}?start={REFERRAL_START_PREFIX}{}", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<[u8; REFERRAL_CODE_LENGTH]> for ReferralCode {
    /// Build a code from alphabet indices (each reduced modulo the alphabet size).
    fn from(indices: [u8; REFERRAL_CODE_LENGTH]) -> Self {
        let code = indices
            .iter()
            .map(|i| REFERRAL_CODE_ALPHABET[*i as usize % REFERRAL_CODE_ALPHABET.len()] as char)
            .collect();
        Self(code)
    }
}

impl fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
