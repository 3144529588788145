//! User registry: the authoritative mapping of participant identity to record.
//!
//! Records are kept in registration order (listings, exports and draw pools all
//! follow it) with a side index for lookups by id.

use chrono::NaiveDate;
use giveaway_types::{SnapshotError, User, UserId};
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct UserRegistry {
    users: Vec<User>,
    index: HashMap<UserId, usize>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from restored records, rejecting repeated ids.
    pub fn from_users(users: Vec<User>) -> Result<Self, SnapshotError> {
        let mut index = HashMap::with_capacity(users.len());
        for (position, user) in users.iter().enumerate() {
            if index.insert(user.user_id, position).is_some() {
                return Err(SnapshotError::DuplicateUser(user.user_id));
            }
        }
        Ok(Self { users, index })
    }

    /// Register a user, or return the existing record untouched.
    ///
    /// The second element is `true` when a new record was inserted.
    pub fn register(
        &mut self,
        user_id: UserId,
        username: &str,
        full_name: &str,
        referrer_id: Option<UserId>,
        join_date: NaiveDate,
    ) -> (&User, bool) {
        if let Some(&position) = self.index.get(&user_id) {
            return (&self.users[position], false);
        }
        let position = self.users.len();
        self.users.push(User::new(
            user_id,
            username.to_string(),
            full_name.to_string(),
            referrer_id,
            join_date,
        ));
        self.index.insert(user_id, position);
        (&self.users[position], true)
    }

    pub fn find(&self, user_id: UserId) -> Option<&User> {
        self.index.get(&user_id).map(|&position| &self.users[position])
    }

    pub(crate) fn find_mut(&mut self, user_id: UserId) -> Option<&mut User> {
        self.index
            .get(&user_id)
            .map(|&position| &mut self.users[position])
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.index.contains_key(&user_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    pub fn as_slice(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn clear(&mut self) {
        self.users.clear();
        self.index.clear();
    }
}

/// All-time participant list, kept across contest resets.
#[derive(Clone, Debug, Default)]
pub struct Archive {
    users: Vec<User>,
    index: HashMap<UserId, usize>,
}

impl Archive {
    /// Build an archive from restored records; later repeats of an id are dropped.
    pub fn from_users(users: Vec<User>) -> Self {
        let mut archive = Self::default();
        for user in users {
            archive.record(&user);
        }
        archive
    }

    /// Append a record the first time its id is seen.
    pub fn record(&mut self, user: &User) -> bool {
        if self.index.contains_key(&user.user_id) {
            return false;
        }
        self.index.insert(user.user_id, self.users.len());
        self.users.push(user.clone());
        true
    }

    pub fn find(&self, user_id: UserId) -> Option<&User> {
        self.index.get(&user_id).map(|&position| &self.users[position])
    }

    pub fn as_slice(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
