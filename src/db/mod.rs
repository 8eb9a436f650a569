// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! Persistence lives in a hosted backend; [`JournalStore`] is the seam the
//! services talk to. [`SupabaseDb`] speaks its REST API and [`MemoryDb`]
//! keeps everything in process for local development and tests.

pub mod memory;
pub mod supabase;

pub use memory::MemoryDb;
pub use supabase::SupabaseDb;

use crate::error::AppError;
use crate::models::{Footprint, FootprintKind, Moment, NewFootprint, NewMoment, Trip};
use async_trait::async_trait;

/// Collection (table) names as constants.
pub mod collections {
    pub const TRIPS: &str = "trips";
    pub const MOMENTS: &str = "moments";
    pub const FOOTPRINTS: &str = "footprints";
}

/// Trip-scoped reads and writes against the backend.
///
/// Lists come back newest first.
#[async_trait]
pub trait JournalStore: Send + Sync {
    async fn get_trip(&self, trip_id: &str) -> Result<Option<Trip>, AppError>;

    // ─── Moments ─────────────────────────────────────────────────

    async fn list_moments(&self, trip_id: &str) -> Result<Vec<Moment>, AppError>;

    async fn get_moment(&self, moment_id: &str) -> Result<Option<Moment>, AppError>;

    async fn insert_moment(
        &self,
        trip_id: &str,
        author_id: &str,
        moment: &NewMoment,
    ) -> Result<Moment, AppError>;

    /// Replace a moment's text. Fails with `NotFound` if the moment is gone.
    async fn update_moment_text(
        &self,
        moment_id: &str,
        text: Option<&str>,
    ) -> Result<Moment, AppError>;

    async fn delete_moment(&self, moment_id: &str) -> Result<(), AppError>;

    // ─── Footprints ──────────────────────────────────────────────

    async fn list_footprints(
        &self,
        trip_id: &str,
        kind: FootprintKind,
    ) -> Result<Vec<Footprint>, AppError>;

    async fn get_footprint(&self, footprint_id: &str) -> Result<Option<Footprint>, AppError>;

    async fn insert_footprint(&self, footprint: &NewFootprint) -> Result<Footprint, AppError>;

    async fn delete_footprint(&self, footprint_id: &str) -> Result<(), AppError>;

    /// Delete every footprint linked to `moment_id`, returning how many went.
    async fn delete_footprints_for_moment(&self, moment_id: &str) -> Result<usize, AppError>;
}
