// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use footprint_journal::config::Config;
use footprint_journal::db::{JournalStore, MemoryDb};
use footprint_journal::error::AppError;
use footprint_journal::models::{
    Footprint, FootprintKind, Moment, NewFootprint, NewMoment, Trip,
};
use footprint_journal::routes::create_router;
use footprint_journal::services::JournalService;
use footprint_journal::AppState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[allow(dead_code)]
pub const OWNER: &str = "user-owner";
#[allow(dead_code)]
pub const STRANGER: &str = "user-stranger";
#[allow(dead_code)]
pub const TRIP: &str = "trip-1";

/// Create a test app over the given store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app_with(store: Arc<dyn JournalStore>) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        journal: JournalService::new(store),
    });
    (create_router(state.clone()), state)
}

/// Create a test app backed by a fresh in-memory store holding one active trip.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, MemoryDb) {
    let db = MemoryDb::new();
    db.insert_trip(trip(TRIP, OWNER, None));
    let (app, state) = create_test_app_with(Arc::new(db.clone()));
    (app, state, db)
}

/// Mint an access token the way the backend does.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, secret: &[u8]) -> String {
    create_jwt_with(user_id, "authenticated", 3600, secret)
}

/// Mint a token with an explicit audience and lifetime (seconds, may be negative).
#[allow(dead_code)]
pub fn create_jwt_with(user_id: &str, aud: &str, ttl_secs: i64, secret: &[u8]) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    let exp = chrono::Utc::now().timestamp() + ttl_secs;
    let claims = serde_json::json!({
        "sub": user_id,
        "aud": aud,
        "exp": exp,
        "role": "authenticated",
    });

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .expect("Failed to create JWT")
}

#[allow(dead_code)]
pub fn trip(id: &str, owner: &str, ended_at: Option<&str>) -> Trip {
    Trip {
        id: id.to_string(),
        owner_id: owner.to_string(),
        title: format!("Trip {}", id),
        started_at: "2024-05-31T08:00:00Z".to_string(),
        ended_at: ended_at.map(String::from),
    }
}

#[allow(dead_code)]
pub fn moment(id: &str, at: &str) -> Moment {
    Moment {
        id: id.to_string(),
        trip_id: TRIP.to_string(),
        author_id: OWNER.to_string(),
        text: Some(format!("Moment {}", id)),
        photo_ref: None,
        created_at: at.to_string(),
    }
}

#[allow(dead_code)]
pub fn footprint(id: &str, at: &str) -> Footprint {
    Footprint {
        id: id.to_string(),
        trip_id: TRIP.to_string(),
        kind: FootprintKind::Breadcrumb,
        lat: 35.0116,
        lng: 135.7681,
        accuracy_meters: Some(15.0),
        place_text: None,
        moment_id: None,
        created_at: at.to_string(),
    }
}

/// Store wrapper that fails selected operations on demand.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct FlakyStore {
    pub inner: MemoryDb,
    pub fail_list_moments: Arc<AtomicBool>,
    pub fail_list_footprints: Arc<AtomicBool>,
    pub fail_insert_footprint: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl FlakyStore {
    pub fn new(inner: MemoryDb) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<(), AppError> {
        if flag.load(Ordering::SeqCst) {
            Err(AppError::Backend(format!("{} unavailable", what)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl JournalStore for FlakyStore {
    async fn get_trip(&self, trip_id: &str) -> Result<Option<Trip>, AppError> {
        self.inner.get_trip(trip_id).await
    }

    async fn list_moments(&self, trip_id: &str) -> Result<Vec<Moment>, AppError> {
        Self::check(&self.fail_list_moments, "moments")?;
        self.inner.list_moments(trip_id).await
    }

    async fn get_moment(&self, moment_id: &str) -> Result<Option<Moment>, AppError> {
        self.inner.get_moment(moment_id).await
    }

    async fn insert_moment(
        &self,
        trip_id: &str,
        author_id: &str,
        moment: &NewMoment,
    ) -> Result<Moment, AppError> {
        self.inner.insert_moment(trip_id, author_id, moment).await
    }

    async fn update_moment_text(
        &self,
        moment_id: &str,
        text: Option<&str>,
    ) -> Result<Moment, AppError> {
        self.inner.update_moment_text(moment_id, text).await
    }

    async fn delete_moment(&self, moment_id: &str) -> Result<(), AppError> {
        self.inner.delete_moment(moment_id).await
    }

    async fn list_footprints(
        &self,
        trip_id: &str,
        kind: FootprintKind,
    ) -> Result<Vec<Footprint>, AppError> {
        Self::check(&self.fail_list_footprints, "footprints")?;
        self.inner.list_footprints(trip_id, kind).await
    }

    async fn get_footprint(&self, footprint_id: &str) -> Result<Option<Footprint>, AppError> {
        self.inner.get_footprint(footprint_id).await
    }

    async fn insert_footprint(&self, footprint: &NewFootprint) -> Result<Footprint, AppError> {
        Self::check(&self.fail_insert_footprint, "footprint insert")?;
        self.inner.insert_footprint(footprint).await
    }

    async fn delete_footprint(&self, footprint_id: &str) -> Result<(), AppError> {
        self.inner.delete_footprint(footprint_id).await
    }

    async fn delete_footprints_for_moment(&self, moment_id: &str) -> Result<usize, AppError> {
        self.inner.delete_footprints_for_moment(moment_id).await
    }
}
