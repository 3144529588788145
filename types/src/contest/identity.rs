use serde::{Deserialize, Serialize};

use super::UserId;

/// Participant identity as handed over by the messaging bridge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramIdentity {
    pub id: UserId,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl TelegramIdentity {
    /// Handle stored on the user record (`@name`, or empty when the account has none).
    pub fn handle(&self) -> String {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => format!("@{name}"),
            _ => String::new(),
        }
    }

    /// Display name stored on the user record.
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}
