// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Moment model: a user-authored journal entry on a trip.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Stored moment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Moment {
    /// Backend-assigned identifier
    pub id: String,
    /// Owning trip
    pub trip_id: String,
    /// User who wrote the moment
    pub author_id: String,
    /// Free text (may be empty)
    #[serde(default)]
    pub text: Option<String>,
    /// Reference to an already-uploaded photo
    #[serde(default)]
    pub photo_ref: Option<String>,
    /// Creation time as returned by the backend (ISO 8601)
    pub created_at: String,
}

impl Moment {
    /// True when the moment carries non-whitespace text.
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn has_photo(&self) -> bool {
        self.photo_ref.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Fields supplied by the caller when creating a moment.
#[derive(Debug, Clone, Default)]
pub struct NewMoment {
    pub text: Option<String>,
    pub photo_ref: Option<String>,
}
