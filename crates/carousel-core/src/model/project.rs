//! Projects: named, persisted slide collections.

use super::slide::Slide;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// A named collection of slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Milliseconds since the Unix epoch.
    pub last_modified: i64,
    pub slides: Vec<Slide>,
}

impl Project {
    /// Mint a time-ordered project id.
    pub fn mint_id() -> String {
        Uuid::now_v7().to_string()
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
