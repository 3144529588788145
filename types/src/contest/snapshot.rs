use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error as ThisError;

use super::{ContestSettings, LastResults, User, UserId, SNAPSHOT_VERSION};

#[derive(Debug, ThisError)]
pub enum SnapshotError {
    #[error("unsupported snapshot version (got={got}, supported={supported})")]
    UnsupportedVersion { got: u16, supported: u16 },
    #[error("duplicate user in snapshot (user_id={0})")]
    DuplicateUser(UserId),
    #[error("snapshot codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Point-in-time copy of the contest state handed to the persistence collaborator.
///
/// Referral codes are intentionally absent: they live only as long as the
/// in-process state that issued them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u16,
    pub users: Vec<User>,
    #[serde(default)]
    pub archive: Vec<User>,
    #[serde(default)]
    pub settings: ContestSettings,
    #[serde(default)]
    pub last_results: Option<LastResults>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            users: Vec::new(),
            archive: Vec::new(),
            settings: ContestSettings::default(),
            last_results: None,
        }
    }
}

impl Snapshot {
    /// Check the version and that `users` holds each id at most once.
    ///
    /// The archive is not checked for duplicates; restoring collapses them.
    pub fn verify(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                got: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        let mut seen = HashSet::with_capacity(self.users.len());
        for user in &self.users {
            if !seen.insert(user.user_id) {
                return Err(SnapshotError::DuplicateUser(user.user_id));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Decode and verify a snapshot.
    pub fn from_json(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_slice(bytes)?;
        snapshot.verify()?;
        Ok(snapshot)
    }
}
