// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Footprint Journal: travel journaling backend
//!
//! This crate serves a trip's journal: moments and GPS footprints stored in
//! a hosted backend, reconciled into one day-grouped timeline.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::JournalService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub journal: JournalService,
}
