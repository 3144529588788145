use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DEFAULT_HOWTO;

/// Administrator-owned settings shown to every participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestSettings {
    pub howto: String,
}

impl Default for ContestSettings {
    fn default() -> Self {
        Self {
            howto: DEFAULT_HOWTO.to_string(),
        }
    }
}

/// Most recently published draw outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastResults {
    pub text: String,
    pub date: DateTime<Utc>,
}
