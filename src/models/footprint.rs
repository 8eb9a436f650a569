// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Footprint model: a single geolocation sample on a trip.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Kind of footprint. Only GPS breadcrumbs feed the timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum FootprintKind {
    #[default]
    Breadcrumb,
}

impl FootprintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FootprintKind::Breadcrumb => "breadcrumb",
        }
    }
}

/// Stored footprint record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Footprint {
    pub id: String,
    pub trip_id: String,
    /// Stored in the `type` column
    #[serde(rename = "type", default)]
    pub kind: FootprintKind,
    /// Latitude (decimal degrees)
    pub lat: f64,
    /// Longitude (decimal degrees)
    pub lng: f64,
    /// Reported GPS accuracy radius in meters
    #[serde(default)]
    pub accuracy_meters: Option<f64>,
    /// Human-readable place label, if one was resolved
    #[serde(default)]
    pub place_text: Option<String>,
    /// Moment this footprint was recorded alongside (not an ownership link)
    #[serde(default)]
    pub moment_id: Option<String>,
    /// Creation time as returned by the backend (ISO 8601)
    pub created_at: String,
}

/// A device location fix used to create a footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFix {
    pub lat: f64,
    pub lng: f64,
    pub accuracy_meters: Option<f64>,
    pub place_text: Option<String>,
}

/// Fields written when inserting a footprint.
#[derive(Debug, Clone, Serialize)]
pub struct NewFootprint {
    pub trip_id: String,
    #[serde(rename = "type")]
    pub kind: FootprintKind,
    pub lat: f64,
    pub lng: f64,
    pub accuracy_meters: Option<f64>,
    pub place_text: Option<String>,
    pub moment_id: Option<String>,
}

impl NewFootprint {
    /// Breadcrumb at `fix`, optionally linked to a moment.
    pub fn breadcrumb(trip_id: &str, fix: LocationFix, moment_id: Option<String>) -> Self {
        Self {
            trip_id: trip_id.to_string(),
            kind: FootprintKind::Breadcrumb,
            lat: fix.lat,
            lng: fix.lng,
            accuracy_meters: fix.accuracy_meters,
            place_text: fix.place_text,
            moment_id,
        }
    }
}
