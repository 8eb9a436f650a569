// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod journal;
pub mod timeline;

pub use journal::{JournalService, SavedMoment, TripTimeline};
pub use timeline::{reconcile, PROXIMITY_WINDOW_MS};
