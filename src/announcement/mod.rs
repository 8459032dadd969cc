// Announcement slot: one pending spoken notification at a time

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

#[cfg(test)]
mod tests;

/// One-shot notification destined for spoken playback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    /// Main sentence read out to the user
    pub message: String,

    /// Free-text category tag (weather, time, energy, temperature, ...)
    #[serde(rename = "type")]
    pub category: String,

    /// Optional elaboration appended after the message ("" when absent)
    #[serde(default)]
    pub detail: String,

    /// When the announcement was published
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Announcement {
    /// Spoken form: message followed by detail, without a dangling space.
    pub fn spoken(&self) -> String {
        if self.detail.is_empty() {
            self.message.clone()
        } else {
            format!("{} {}", self.message, self.detail)
        }
    }
}

/// Holds at most one pending announcement.
///
/// A publish overwrites whatever is pending; a consume empties the slot.
/// There is no queue, so a burst of publishes keeps only the last one.
#[derive(Debug, Default)]
pub struct AnnouncementSlot {
    slot: Mutex<Option<Announcement>>,
}

impl AnnouncementSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new announcement, replacing any unread one.
    pub fn publish(
        &self,
        message: impl Into<String>,
        category: impl Into<String>,
        detail: Option<String>,
    ) -> Announcement {
        let announcement = Announcement {
            message: message.into(),
            category: category.into(),
            detail: detail.unwrap_or_default(),
            created_at: Utc::now(),
        };

        let replaced = self.lock().replace(announcement.clone());

        info!(
            category = %announcement.category,
            replaced_unread = replaced.is_some(),
            "Announcement published"
        );

        announcement
    }

    /// Current contents, slot left untouched.
    pub fn peek(&self) -> Option<Announcement> {
        self.lock().clone()
    }

    /// Current contents; the slot is empty afterwards.
    pub fn consume(&self) -> Option<Announcement> {
        let taken = self.lock().take();
        if let Some(ref announcement) = taken {
            info!(category = %announcement.category, "Announcement consumed");
        }
        taken
    }

    fn lock(&self) -> MutexGuard<'_, Option<Announcement>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
