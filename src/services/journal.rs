// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Journal service: trip-scoped moment and footprint workflows.
//!
//! Handles:
//! - Fetching a trip's moments and footprints and reconciling them
//! - Saving a moment with a best-effort footprint alongside it
//! - Deleting a moment together with the footprints it produced
//! - Leaving and removing standalone footprints

use crate::db::JournalStore;
use crate::error::{AppError, Result};
use crate::models::{
    Footprint, FootprintKind, LocationFix, Moment, NewFootprint, NewMoment, Timeline, Trip,
};
use crate::services::timeline::reconcile;
use chrono::TimeZone;
use std::sync::Arc;

/// Journal workflows over a [`JournalStore`].
#[derive(Clone)]
pub struct JournalService {
    store: Arc<dyn JournalStore>,
}

/// A trip together with its reconciled timeline.
#[derive(Debug)]
pub struct TripTimeline {
    pub trip: Trip,
    pub timeline: Timeline,
}

/// Result of saving a moment.
#[derive(Debug)]
pub struct SavedMoment {
    pub moment: Moment,
    /// Footprint recorded alongside, if a fix was given and the write worked
    pub footprint: Option<Footprint>,
}

impl JournalService {
    pub fn new(store: Arc<dyn JournalStore>) -> Self {
        Self { store }
    }

    /// Load a trip owned by `user_id`.
    ///
    /// Other users' trips look exactly like missing ones.
    async fn owned_trip(&self, user_id: &str, trip_id: &str) -> Result<Trip> {
        self.store
            .get_trip(trip_id)
            .await?
            .filter(|trip| trip.owner_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("Trip {} not found", trip_id)))
    }

    /// Load a moment written by `user_id`.
    async fn authored_moment(&self, user_id: &str, moment_id: &str) -> Result<Moment> {
        self.store
            .get_moment(moment_id)
            .await?
            .filter(|moment| moment.author_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("Moment {} not found", moment_id)))
    }

    // ─── Timeline ────────────────────────────────────────────────

    /// Build the timeline of a trip as seen from `tz`.
    ///
    /// Moments and breadcrumbs are fetched concurrently. If either fetch
    /// fails nothing is reconciled and the backend error is returned as-is.
    pub async fn timeline<Tz>(&self, user_id: &str, trip_id: &str, tz: &Tz) -> Result<TripTimeline>
    where
        Tz: TimeZone + Sync,
    {
        let trip = self.owned_trip(user_id, trip_id).await?;

        let (moments, footprints) = tokio::try_join!(
            self.store.list_moments(trip_id),
            self.store.list_footprints(trip_id, FootprintKind::Breadcrumb),
        )
        .inspect_err(|e| {
            tracing::warn!(trip_id, error = %e, "Timeline inputs failed to load");
        })?;

        let timeline = reconcile(&moments, &footprints, trip.is_ended(), tz);
        Ok(TripTimeline { trip, timeline })
    }

    // ─── Moments ─────────────────────────────────────────────────

    pub async fn list_moments(&self, user_id: &str, trip_id: &str) -> Result<Vec<Moment>> {
        self.owned_trip(user_id, trip_id).await?;
        self.store.list_moments(trip_id).await
    }

    /// Save a moment, then try to record where it happened.
    ///
    /// The footprint is best-effort: if it can't be written the moment is
    /// still saved and returned without one.
    pub async fn create_moment(
        &self,
        user_id: &str,
        trip_id: &str,
        new_moment: NewMoment,
        fix: Option<LocationFix>,
    ) -> Result<SavedMoment> {
        let has_text = new_moment
            .text
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        let has_photo = new_moment
            .photo_ref
            .as_deref()
            .is_some_and(|p| !p.is_empty());
        if !has_text && !has_photo {
            return Err(AppError::BadRequest(
                "A moment needs text or a photo".to_string(),
            ));
        }

        self.owned_trip(user_id, trip_id).await?;

        let moment = self
            .store
            .insert_moment(trip_id, user_id, &new_moment)
            .await?;
        tracing::info!(trip_id, moment_id = %moment.id, "Moment saved");

        let footprint = match fix {
            Some(fix) => {
                let new_footprint = NewFootprint::breadcrumb(trip_id, fix, Some(moment.id.clone()));
                match self.store.insert_footprint(&new_footprint).await {
                    Ok(footprint) => Some(footprint),
                    Err(e) => {
                        tracing::warn!(
                            trip_id,
                            moment_id = %moment.id,
                            error = %e,
                            "Footprint for moment not saved"
                        );
                        None
                    }
                }
            }
            None => None,
        };

        Ok(SavedMoment { moment, footprint })
    }

    /// Replace the text of a moment. Only its author may edit it.
    pub async fn update_moment_text(
        &self,
        user_id: &str,
        moment_id: &str,
        text: Option<String>,
    ) -> Result<Moment> {
        let moment = self.authored_moment(user_id, moment_id).await?;

        let has_text = text.as_deref().is_some_and(|t| !t.trim().is_empty());
        if !has_text && !moment.has_photo() {
            return Err(AppError::BadRequest(
                "A moment without a photo needs text".to_string(),
            ));
        }

        self.store
            .update_moment_text(moment_id, text.as_deref())
            .await
    }

    /// Delete a moment and every footprint recorded alongside it.
    pub async fn delete_moment(&self, user_id: &str, moment_id: &str) -> Result<()> {
        self.authored_moment(user_id, moment_id).await?;

        let removed = self.store.delete_footprints_for_moment(moment_id).await?;
        self.store.delete_moment(moment_id).await?;

        tracing::info!(moment_id, footprints_removed = removed, "Moment deleted");
        Ok(())
    }

    // ─── Footprints ──────────────────────────────────────────────

    pub async fn list_footprints(&self, user_id: &str, trip_id: &str) -> Result<Vec<Footprint>> {
        self.owned_trip(user_id, trip_id).await?;
        self.store
            .list_footprints(trip_id, FootprintKind::Breadcrumb)
            .await
    }

    /// Record a standalone footprint on a trip.
    pub async fn leave_footprint(
        &self,
        user_id: &str,
        trip_id: &str,
        fix: LocationFix,
    ) -> Result<Footprint> {
        self.owned_trip(user_id, trip_id).await?;

        let footprint = self
            .store
            .insert_footprint(&NewFootprint::breadcrumb(trip_id, fix, None))
            .await?;
        tracing::info!(trip_id, footprint_id = %footprint.id, "Footprint saved");
        Ok(footprint)
    }

    pub async fn delete_footprint(&self, user_id: &str, footprint_id: &str) -> Result<()> {
        let footprint = self
            .store
            .get_footprint(footprint_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Footprint {} not found", footprint_id)))?;

        // Footprints belong to whoever owns the trip.
        self.owned_trip(user_id, &footprint.trip_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => {
                    AppError::NotFound(format!("Footprint {} not found", footprint_id))
                }
                other => other,
            })?;

        self.store.delete_footprint(footprint_id).await?;
        tracing::info!(footprint_id, "Footprint deleted");
        Ok(())
    }
}
