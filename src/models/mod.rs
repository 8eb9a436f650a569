// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod footprint;
pub mod moment;
pub mod timeline;
pub mod trip;

pub use footprint::{Footprint, FootprintKind, LocationFix, NewFootprint};
pub use moment::{Moment, NewMoment};
pub use timeline::{DayKey, Timeline, TimelineEntry};
pub use trip::Trip;
