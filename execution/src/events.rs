//! Change notification.
//!
//! Presentation layers subscribe to the contest instead of re-reading it after
//! every call. Listeners run synchronously, after the mutation completes, in
//! subscription order.

use giveaway_types::UserId;
use std::fmt;

/// A completed state mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContestEvent {
    Registered {
        user_id: UserId,
        referrer_id: Option<UserId>,
    },
    Validated {
        user_id: UserId,
        credited: Option<UserId>,
    },
    HowtoUpdated,
    ResultsSaved,
    Reset {
        cleared_users: usize,
    },
    Restored {
        users: usize,
    },
}

/// Handle returned by [`Subscribers::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ContestEvent)>;

#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
    pub fn subscribe(&mut self, listener: impl FnMut(&ContestEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn notify(&mut self, event: &ContestEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
