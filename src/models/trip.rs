//! Trip model. Trips are created and ended elsewhere; this service only reads them.

use serde::{Deserialize, Serialize};

/// Stored trip record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    /// User who owns the trip
    pub owner_id: String,
    pub title: String,
    /// When the trip started (ISO 8601)
    pub started_at: String,
    /// Set once the trip is completed
    #[serde(default)]
    pub ended_at: Option<String>,
}

impl Trip {
    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }
}
