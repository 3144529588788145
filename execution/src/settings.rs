//! Settings and published results.

use chrono::{DateTime, Utc};
use giveaway_types::{ContestSettings, LastResults};

#[derive(Clone, Debug, Default)]
pub struct SettingsStore {
    settings: ContestSettings,
    last_results: Option<LastResults>,
}

impl SettingsStore {
    pub fn new(settings: ContestSettings, last_results: Option<LastResults>) -> Self {
        Self {
            settings,
            last_results,
        }
    }

    pub fn settings(&self) -> &ContestSettings {
        &self.settings
    }

    pub fn last_results(&self) -> Option<&LastResults> {
        self.last_results.as_ref()
    }

    /// Replace the "how it works" text. No validation of content.
    pub fn update_howto(&mut self, text: impl Into<String>) {
        self.settings.howto = text.into();
    }

    /// Replace the published results; only the latest publish is kept.
    pub fn save_results(&mut self, text: impl Into<String>, date: DateTime<Utc>) -> &LastResults {
        self.last_results.insert(LastResults {
            text: text.into(),
            date,
        })
    }

    pub fn clear_results(&mut self) {
        self.last_results = None;
    }
}
