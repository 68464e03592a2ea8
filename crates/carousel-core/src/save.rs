//! Deferred project saving.
//!
//! A save request is held for [`SAVE_DELAY`] before the project is written, and the outcome is
//! shown as a short status message that disappears after [`STATUS_DURATION`]. Callers pass the
//! current [`Instant`] in so the timing is driven by whatever clock the frontend uses.

use crate::model::now_millis;
use crate::session::ProjectLibrary;
use crate::storage::KeyValueStore;
use crate::store::Editor;
use std::time::{Duration, Instant};

/// Delay between a save request and the write.
pub const SAVE_DELAY: Duration = Duration::from_millis(400);

/// How long the save status message stays visible.
pub const STATUS_DURATION: Duration = Duration::from_secs(2);

/// Outcome of the last save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    Failed,
}

impl SaveStatus {
    pub fn message(&self) -> &'static str {
        match self {
            SaveStatus::Saved => "Saved!",
            SaveStatus::Failed => "Error saving!",
        }
    }
}

/// Drives the save button: pending request, write, status message.
#[derive(Debug, Default)]
pub struct SaveController {
    /// When the pending request was made.
    pending: Option<Instant>,
    /// Last outcome and when it was reached.
    status: Option<(SaveStatus, Instant)>,
}

impl SaveController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a save. Ignored while signed out or while a save is already pending.
    ///
    /// Returns whether the request was accepted.
    pub fn request(&mut self, now: Instant, signed_in: bool) -> bool {
        if !signed_in {
            log::debug!("Save requested while signed out; ignoring");
            return false;
        }
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(now);
        true
    }

    /// Whether a save is pending.
    pub fn is_saving(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the pending save is ready to be written.
    pub fn is_due(&self, now: Instant) -> bool {
        self.pending
            .is_some_and(|since| now.saturating_duration_since(since) >= SAVE_DELAY)
    }

    /// Write the project if the pending save is due.
    ///
    /// Returns the outcome when a write happened. A failed write keeps the editor untouched.
    pub async fn poll<S: KeyValueStore>(
        &mut self,
        now: Instant,
        editor: &mut Editor,
        library: &mut ProjectLibrary<S>,
    ) -> Option<SaveStatus> {
        if !self.is_due(now) {
            return None;
        }
        self.pending = None;

        let project = editor.to_project(now_millis());
        let id = project.id.clone();
        let status = match library.upsert(project).await {
            Ok(()) => {
                log::info!("Saved project {}", id);
                SaveStatus::Saved
            }
            Err(e) => {
                log::error!("Failed to save project {}: {}", id, e);
                SaveStatus::Failed
            }
        };
        self.status = Some((status, now));
        Some(status)
    }

    /// The status to show at `now`, if it has not expired.
    pub fn status(&self, now: Instant) -> Option<SaveStatus> {
        self.status
            .filter(|(_, at)| now.saturating_duration_since(*at) < STATUS_DURATION)
            .map(|(status, _)| status)
    }

    pub fn message(&self, now: Instant) -> Option<&'static str> {
        self.status(now).map(|s| s.message())
    }
}
