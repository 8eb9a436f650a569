// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived timeline view types. Built fresh per request, never stored.

use crate::models::{Footprint, Moment};
use crate::time_utils::parse_timestamp;
use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One row of a trip timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TimelineEntry {
    /// A moment and the footprint recorded for the same event.
    Combined { moment: Moment, footprint: Footprint },
    MomentOnly { moment: Moment },
    FootprintOnly { footprint: Footprint },
}

impl TimelineEntry {
    /// Raw effective timestamp: the moment's for moment-bearing entries.
    pub fn timestamp(&self) -> &str {
        match self {
            TimelineEntry::Combined { moment, .. } | TimelineEntry::MomentOnly { moment } => {
                &moment.created_at
            }
            TimelineEntry::FootprintOnly { footprint } => &footprint.created_at,
        }
    }

    /// Parsed effective timestamp. `None` sorts before every instant.
    pub fn sort_key(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.timestamp())
    }

    pub fn moment(&self) -> Option<&Moment> {
        match self {
            TimelineEntry::Combined { moment, .. } | TimelineEntry::MomentOnly { moment } => {
                Some(moment)
            }
            TimelineEntry::FootprintOnly { .. } => None,
        }
    }

    pub fn footprint(&self) -> Option<&Footprint> {
        match self {
            TimelineEntry::Combined { footprint, .. } | TimelineEntry::FootprintOnly { footprint } => {
                Some(footprint)
            }
            TimelineEntry::MomentOnly { .. } => None,
        }
    }
}

/// Calendar-day bucket of a timeline.
///
/// `Unknown` holds entries whose timestamp could not be parsed and orders
/// before every real date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayKey {
    Unknown,
    Date(NaiveDate),
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayKey::Unknown => f.write_str("unknown"),
            DayKey::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Day groups in display order, each holding its entries in display order.
pub type Timeline = IndexMap<DayKey, Vec<TimelineEntry>>;
