//! Weighted winner selection without replacement.
//!
//! Each eligible user (validated, score > 0) is repeated `score` times in a
//! pool. Winners are drawn uniformly from the pool; a draw that lands on an
//! already selected user is discarded and redrawn. The pool never shrinks, so
//! per-step probabilities stay proportional to score among the users that can
//! still be picked.
//!
//! Termination relies on clamping the requested count to the number of
//! distinct eligible users.

use giveaway_types::User;
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

/// Repetition pool over a set of eligible users.
#[derive(Debug)]
pub struct WeightedPool<'a> {
    entrants: Vec<&'a User>,
    /// Indices into `entrants`, each repeated by score.
    slots: Vec<usize>,
}

impl<'a> WeightedPool<'a> {
    pub fn new(users: impl IntoIterator<Item = &'a User>) -> Self {
        // Repeated ids keep their first record
        let mut seen = HashSet::new();
        let entrants: Vec<&User> = users
            .into_iter()
            .filter(|u| u.is_eligible() && seen.insert(u.user_id))
            .collect();
        let total: usize = entrants.iter().map(|u| u.score as usize).sum();
        let mut slots = Vec::with_capacity(total);
        for (entrant, user) in entrants.iter().enumerate() {
            slots.extend(std::iter::repeat(entrant).take(user.score as usize));
        }
        Self { entrants, slots }
    }

    /// Number of distinct users that can win.
    pub fn entrants(&self) -> usize {
        self.entrants.len()
    }

    /// Total number of slots (sum of scores).
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Draw up to `count` distinct winners in draw order.
    pub fn draw<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<User> {
        if self.slots.is_empty() {
            return Vec::new();
        }
        let target = count.min(self.entrants.len());
        let mut selected = HashSet::with_capacity(target);
        let mut winners = Vec::with_capacity(target);
        let mut rejected = 0usize;
        while winners.len() < target {
            let entrant = self.slots[rng.gen_range(0..self.slots.len())];
            let user = self.entrants[entrant];
            if selected.insert(user.user_id) {
                winners.push(user.clone());
            } else {
                rejected += 1;
            }
        }
        debug!(
            requested = count,
            drawn = winners.len(),
            pool = self.slots.len(),
            rejected,
            "drew winners"
        );
        winners
    }
}

/// Draw up to `count` distinct winners from `users`, weighted by score.
pub fn draw_winners<'a, R: Rng + ?Sized>(
    users: impl IntoIterator<Item = &'a User>,
    count: usize,
    rng: &mut R,
) -> Vec<User> {
    WeightedPool::new(users).draw(count, rng)
}
