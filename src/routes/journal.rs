// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Journal API routes: timeline, moments and footprints.

use crate::config::parse_utc_offset;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Footprint, LocationFix, Moment, NewMoment, Timeline, TimelineEntry};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch},
    Extension, Json, Router,
};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MAX_TEXT_CHARS: u64 = 5000;
const MAX_PHOTO_REF_CHARS: u64 = 2048;
const MAX_PLACE_TEXT_CHARS: u64 = 500;

/// Journal routes (require authentication).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/trips/{trip_id}/timeline", get(get_timeline))
        .route(
            "/api/trips/{trip_id}/moments",
            get(list_moments).post(create_moment),
        )
        .route(
            "/api/moments/{moment_id}",
            patch(update_moment).delete(delete_moment),
        )
        .route(
            "/api/trips/{trip_id}/footprints",
            get(list_footprints).post(leave_footprint),
        )
        .route("/api/footprints/{footprint_id}", delete(delete_footprint))
}

// ─── Timeline ────────────────────────────────────────────────

#[derive(Deserialize)]
struct TimelineQuery {
    /// Viewer's offset from UTC in minutes east (e.g. -420 for PDT).
    /// Day boundaries follow this wall clock.
    utc_offset_minutes: Option<String>,
}

/// One calendar day of a timeline.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TimelineDay {
    /// `YYYY-MM-DD`, or `unknown` for entries without a usable timestamp
    pub day: String,
    pub entries: Vec<TimelineEntry>,
}

/// Timeline response, already in display order.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TimelineResponse {
    pub trip_id: String,
    pub title: String,
    pub is_ended: bool,
    pub days: Vec<TimelineDay>,
}

fn viewer_offset(raw: Option<&str>, default_minutes: i32) -> Result<FixedOffset> {
    let minutes = match raw {
        Some(raw) => parse_utc_offset(raw).ok_or_else(|| {
            AppError::BadRequest(
                "Invalid 'utc_offset_minutes' parameter: must be an integer within ±840"
                    .to_string(),
            )
        })?,
        None => default_minutes,
    };

    FixedOffset::east_opt(minutes * 60)
        .ok_or_else(|| AppError::BadRequest(format!("Unsupported UTC offset: {}", minutes)))
}

fn into_days(timeline: Timeline) -> Vec<TimelineDay> {
    timeline
        .into_iter()
        .map(|(day, entries)| TimelineDay {
            day: day.to_string(),
            entries,
        })
        .collect()
}

/// Get the reconciled timeline of a trip.
async fn get_timeline(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(trip_id): Path<String>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<TimelineResponse>> {
    let tz = viewer_offset(
        query.utc_offset_minutes.as_deref(),
        state.config.default_utc_offset_minutes,
    )?;

    let result = state.journal.timeline(&user.user_id, &trip_id, &tz).await?;

    Ok(Json(TimelineResponse {
        is_ended: result.trip.is_ended(),
        trip_id: result.trip.id,
        title: result.trip.title,
        days: into_days(result.timeline),
    }))
}

// ─── Moments ─────────────────────────────────────────────────

/// Device location sent with a footprint or moment.
#[derive(Debug, Deserialize, Validate)]
pub struct LocationInput {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub accuracy_meters: Option<f64>,
    #[validate(length(max = MAX_PLACE_TEXT_CHARS))]
    pub place_text: Option<String>,
}

impl From<LocationInput> for LocationFix {
    fn from(input: LocationInput) -> Self {
        LocationFix {
            lat: input.lat,
            lng: input.lng,
            accuracy_meters: input.accuracy_meters,
            place_text: input.place_text.filter(|p| !p.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMomentRequest {
    #[validate(length(max = MAX_TEXT_CHARS))]
    pub text: Option<String>,
    #[validate(length(max = MAX_PHOTO_REF_CHARS))]
    pub photo_ref: Option<String>,
    /// Where the moment happened, if the device could tell
    #[validate(nested)]
    pub location: Option<LocationInput>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CreateMomentResponse {
    pub moment: Moment,
    /// Absent when no location was sent or it could not be saved
    pub footprint: Option<Footprint>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMomentRequest {
    #[validate(length(max = MAX_TEXT_CHARS))]
    pub text: Option<String>,
}

async fn list_moments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(trip_id): Path<String>,
) -> Result<Json<Vec<Moment>>> {
    let moments = state.journal.list_moments(&user.user_id, &trip_id).await?;
    Ok(Json(moments))
}

/// Save a moment, with a footprint when a location is attached.
async fn create_moment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(trip_id): Path<String>,
    Json(body): Json<CreateMomentRequest>,
) -> Result<(StatusCode, Json<CreateMomentResponse>)> {
    body.validate()?;

    let new_moment = NewMoment {
        text: body.text,
        photo_ref: body.photo_ref.filter(|p| !p.is_empty()),
    };
    let saved = state
        .journal
        .create_moment(
            &user.user_id,
            &trip_id,
            new_moment,
            body.location.map(LocationFix::from),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateMomentResponse {
            moment: saved.moment,
            footprint: saved.footprint,
        }),
    ))
}

async fn update_moment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(moment_id): Path<String>,
    Json(body): Json<UpdateMomentRequest>,
) -> Result<Json<Moment>> {
    body.validate()?;

    let moment = state
        .journal
        .update_moment_text(&user.user_id, &moment_id, body.text)
        .await?;
    Ok(Json(moment))
}

/// Delete a moment and the footprints recorded with it.
async fn delete_moment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(moment_id): Path<String>,
) -> Result<StatusCode> {
    state
        .journal
        .delete_moment(&user.user_id, &moment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Footprints ──────────────────────────────────────────────

async fn list_footprints(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(trip_id): Path<String>,
) -> Result<Json<Vec<Footprint>>> {
    let footprints = state
        .journal
        .list_footprints(&user.user_id, &trip_id)
        .await?;
    Ok(Json(footprints))
}

/// "Leave a footprint": record the current location on a trip.
async fn leave_footprint(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(trip_id): Path<String>,
    Json(body): Json<LocationInput>,
) -> Result<(StatusCode, Json<Footprint>)> {
    body.validate()?;

    let footprint = state
        .journal
        .leave_footprint(&user.user_id, &trip_id, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(footprint)))
}

async fn delete_footprint(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(footprint_id): Path<String>,
) -> Result<StatusCode> {
    state
        .journal
        .delete_footprint(&user.user_id, &footprint_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
