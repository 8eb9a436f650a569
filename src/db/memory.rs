// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store for local development and tests.
//!
//! Mirrors the backend's behavior where the services depend on it: ids and
//! `created_at` are assigned on insert and lists come back newest first.

use crate::db::JournalStore;
use crate::error::AppError;
use crate::models::{Footprint, FootprintKind, Moment, NewFootprint, NewMoment, Trip};
use crate::time_utils::{format_utc_rfc3339, parse_timestamp};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Shared in-memory tables. Clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryDb {
    trips: Arc<DashMap<String, Trip>>,
    moments: Arc<DashMap<String, Moment>>,
    footprints: Arc<DashMap<String, Footprint>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a trip as-is. Trips are created elsewhere.
    pub fn insert_trip(&self, trip: Trip) {
        self.trips.insert(trip.id.clone(), trip);
    }

    /// Store a moment as-is, keeping its id and timestamp.
    pub fn seed_moment(&self, moment: Moment) {
        self.moments.insert(moment.id.clone(), moment);
    }

    /// Store a footprint as-is, keeping its id and timestamp.
    pub fn seed_footprint(&self, footprint: Footprint) {
        self.footprints.insert(footprint.id.clone(), footprint);
    }

    pub fn moment_count(&self) -> usize {
        self.moments.len()
    }

    pub fn footprint_count(&self) -> usize {
        self.footprints.len()
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn now() -> String {
    format_utc_rfc3339(chrono::Utc::now())
}

/// Newest first, ties by id so listings are stable.
fn sort_newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (&str, &str)) {
    rows.sort_by(|a, b| {
        let (a_at, a_id) = key(a);
        let (b_at, b_id) = key(b);
        parse_timestamp(b_at)
            .cmp(&parse_timestamp(a_at))
            .then_with(|| a_id.cmp(b_id))
    });
}

#[async_trait]
impl JournalStore for MemoryDb {
    async fn get_trip(&self, trip_id: &str) -> Result<Option<Trip>, AppError> {
        Ok(self.trips.get(trip_id).map(|t| t.value().clone()))
    }

    async fn list_moments(&self, trip_id: &str) -> Result<Vec<Moment>, AppError> {
        let mut moments: Vec<Moment> = self
            .moments
            .iter()
            .filter(|m| m.trip_id == trip_id)
            .map(|m| m.value().clone())
            .collect();
        sort_newest_first(&mut moments, |m| (m.created_at.as_str(), m.id.as_str()));
        Ok(moments)
    }

    async fn get_moment(&self, moment_id: &str) -> Result<Option<Moment>, AppError> {
        Ok(self.moments.get(moment_id).map(|m| m.value().clone()))
    }

    async fn insert_moment(
        &self,
        trip_id: &str,
        author_id: &str,
        moment: &NewMoment,
    ) -> Result<Moment, AppError> {
        let stored = Moment {
            id: new_id(),
            trip_id: trip_id.to_string(),
            author_id: author_id.to_string(),
            text: moment.text.clone(),
            photo_ref: moment.photo_ref.clone(),
            created_at: now(),
        };
        self.moments.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn update_moment_text(
        &self,
        moment_id: &str,
        text: Option<&str>,
    ) -> Result<Moment, AppError> {
        let mut moment = self
            .moments
            .get_mut(moment_id)
            .ok_or_else(|| AppError::NotFound(format!("Moment {} not found", moment_id)))?;
        moment.text = text.map(String::from);
        Ok(moment.clone())
    }

    async fn delete_moment(&self, moment_id: &str) -> Result<(), AppError> {
        self.moments.remove(moment_id);
        Ok(())
    }

    async fn list_footprints(
        &self,
        trip_id: &str,
        kind: FootprintKind,
    ) -> Result<Vec<Footprint>, AppError> {
        let mut footprints: Vec<Footprint> = self
            .footprints
            .iter()
            .filter(|f| f.trip_id == trip_id && f.kind == kind)
            .map(|f| f.value().clone())
            .collect();
        sort_newest_first(&mut footprints, |f| (f.created_at.as_str(), f.id.as_str()));
        Ok(footprints)
    }

    async fn get_footprint(&self, footprint_id: &str) -> Result<Option<Footprint>, AppError> {
        Ok(self.footprints.get(footprint_id).map(|f| f.value().clone()))
    }

    async fn insert_footprint(&self, footprint: &NewFootprint) -> Result<Footprint, AppError> {
        let stored = Footprint {
            id: new_id(),
            trip_id: footprint.trip_id.clone(),
            kind: footprint.kind,
            lat: footprint.lat,
            lng: footprint.lng,
            accuracy_meters: footprint.accuracy_meters,
            place_text: footprint.place_text.clone(),
            moment_id: footprint.moment_id.clone(),
            created_at: now(),
        };
        self.footprints.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn delete_footprint(&self, footprint_id: &str) -> Result<(), AppError> {
        self.footprints.remove(footprint_id);
        Ok(())
    }

    async fn delete_footprints_for_moment(&self, moment_id: &str) -> Result<usize, AppError> {
        // Count inside retain; len() can move under concurrent inserts.
        let mut removed = 0;
        self.footprints.retain(|_, f| {
            let linked = f.moment_id.as_deref() == Some(moment_id);
            if linked {
                removed += 1;
            }
            !linked
        });
        Ok(removed)
    }
}
