use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// External numeric identity of a participant.
pub type UserId = u64;

/// Contest participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    pub full_name: String,
    /// Set only at creation. May point at an id that was never registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer_id: Option<UserId>,
    pub is_validated: bool,
    pub score: u32,
    pub join_date: NaiveDate,
}

impl User {
    pub fn new(
        user_id: UserId,
        username: String,
        full_name: String,
        referrer_id: Option<UserId>,
        join_date: NaiveDate,
    ) -> Self {
        Self {
            user_id,
            username,
            full_name,
            referrer_id,
            is_validated: false,
            score: 0,
            join_date,
        }
    }

    /// Whether the user takes part in a draw.
    pub fn is_eligible(&self) -> bool {
        self.is_validated && self.score > 0
    }

    /// Name to show in listings: the handle when present, the full name otherwise.
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            &self.full_name
        } else {
            &self.username
        }
    }
}
