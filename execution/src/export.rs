//! Participant export for administrators.

use chrono::{DateTime, Utc};
use giveaway_types::{User, UserId};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportedUser {
    pub user_id: UserId,
    pub username: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer_id: Option<UserId>,
    pub is_validated: bool,
    pub score: u32,
    pub join_date: String,
}

impl From<&User> for ExportedUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            referrer_id: user.referrer_id,
            is_validated: user.is_validated,
            score: user.score,
            join_date: user.join_date.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserExport {
    pub generated_at: DateTime<Utc>,
    pub total_users: usize,
    pub total_validated: usize,
    pub total_score: u64,
    pub users: Vec<ExportedUser>,
}

/// Build an export ordered by score (highest first), ties in registration order.
pub fn export_users(users: &[User], generated_at: DateTime<Utc>) -> UserExport {
    let mut ordered: Vec<&User> = users.iter().collect();
    // Stable sort keeps registration order among equal scores
    ordered.sort_by(|a, b| b.score.cmp(&a.score));

    UserExport {
        generated_at,
        total_users: users.len(),
        total_validated: users.iter().filter(|u| u.is_validated).count(),
        total_score: users.iter().map(|u| u64::from(u.score)).sum(),
        users: ordered.into_iter().map(ExportedUser::from).collect(),
    }
}
