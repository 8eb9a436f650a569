// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supabase (PostgREST) client for trips, moments and footprints.
//!
//! Rows are addressed as `/rest/v1/{table}?column=eq.value`. Writes ask for
//! `return=representation` so the stored row (with its backend-assigned id
//! and `created_at`) comes back in the response.

use crate::db::{collections, JournalStore};
use crate::error::AppError;
use crate::models::{Footprint, FootprintKind, Moment, NewFootprint, NewMoment, Trip};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

const RETURN_REPRESENTATION: &str = "return=representation";
const NEWEST_FIRST: &str = "created_at.desc";

/// Supabase REST client.
#[derive(Clone)]
pub struct SupabaseDb {
    http: reqwest::Client,
    rest_url: String,
    service_key: String,
}

/// Row written when inserting a moment.
#[derive(Serialize)]
struct MomentInsert<'a> {
    trip_id: &'a str,
    author_id: &'a str,
    text: Option<&'a str>,
    photo_ref: Option<&'a str>,
}

#[derive(Serialize)]
struct MomentTextUpdate<'a> {
    text: Option<&'a str>,
}

/// PostgREST error body.
#[derive(Deserialize)]
struct PostgrestError {
    message: String,
}

impl SupabaseDb {
    /// Create a client for the project at `base_url`.
    pub fn new(base_url: &str, service_key: String) -> Self {
        let rest_url = format!("{}/rest/v1", base_url.trim_end_matches('/'));
        tracing::info!(url = %rest_url, "Supabase REST client initialized");
        Self {
            http: reqwest::Client::new(),
            rest_url,
            service_key,
        }
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.rest_url, table))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// Select rows matching `filters`.
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, AppError> {
        let response = self
            .request(Method::GET, table)
            .query(&[("select", "*")])
            .query(filters)
            .send()
            .await
            .map_err(|e| AppError::Backend(e.to_string()))?;

        check_response_json(response).await
    }

    async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
    ) -> Result<Option<T>, AppError> {
        let rows = self
            .select(table, &[("id", eq(id)), ("limit", "1".to_string())])
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Insert one row and return it as stored.
    async fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let response = self
            .request(Method::POST, table)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Backend(e.to_string()))?;

        let rows: Vec<T> = check_response_json(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::Backend(format!("Insert into {} returned no row", table)))
    }

    /// Delete rows matching `filters`, returning how many were removed.
    async fn delete_where(&self, table: &str, filters: &[(&str, String)]) -> Result<usize, AppError> {
        let response = self
            .request(Method::DELETE, table)
            .header("Prefer", RETURN_REPRESENTATION)
            .query(filters)
            .send()
            .await
            .map_err(|e| AppError::Backend(e.to_string()))?;

        let rows: Vec<serde_json::Value> = check_response_json(response).await?;
        Ok(rows.len())
    }
}

#[async_trait]
impl JournalStore for SupabaseDb {
    async fn get_trip(&self, trip_id: &str) -> Result<Option<Trip>, AppError> {
        self.select_one(collections::TRIPS, trip_id).await
    }

    async fn list_moments(&self, trip_id: &str) -> Result<Vec<Moment>, AppError> {
        self.select(
            collections::MOMENTS,
            &[("trip_id", eq(trip_id)), ("order", NEWEST_FIRST.to_string())],
        )
        .await
    }

    async fn get_moment(&self, moment_id: &str) -> Result<Option<Moment>, AppError> {
        self.select_one(collections::MOMENTS, moment_id).await
    }

    async fn insert_moment(
        &self,
        trip_id: &str,
        author_id: &str,
        moment: &NewMoment,
    ) -> Result<Moment, AppError> {
        let row = MomentInsert {
            trip_id,
            author_id,
            text: moment.text.as_deref(),
            photo_ref: moment.photo_ref.as_deref(),
        };
        self.insert(collections::MOMENTS, &row).await
    }

    async fn update_moment_text(
        &self,
        moment_id: &str,
        text: Option<&str>,
    ) -> Result<Moment, AppError> {
        let response = self
            .request(Method::PATCH, collections::MOMENTS)
            .header("Prefer", RETURN_REPRESENTATION)
            .query(&[("id", eq(moment_id))])
            .json(&MomentTextUpdate { text })
            .send()
            .await
            .map_err(|e| AppError::Backend(e.to_string()))?;

        let rows: Vec<Moment> = check_response_json(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Moment {} not found", moment_id)))
    }

    async fn delete_moment(&self, moment_id: &str) -> Result<(), AppError> {
        self.delete_where(collections::MOMENTS, &[("id", eq(moment_id))])
            .await?;
        Ok(())
    }

    async fn list_footprints(
        &self,
        trip_id: &str,
        kind: FootprintKind,
    ) -> Result<Vec<Footprint>, AppError> {
        self.select(
            collections::FOOTPRINTS,
            &[
                ("trip_id", eq(trip_id)),
                ("type", eq(kind.as_str())),
                ("order", NEWEST_FIRST.to_string()),
            ],
        )
        .await
    }

    async fn get_footprint(&self, footprint_id: &str) -> Result<Option<Footprint>, AppError> {
        self.select_one(collections::FOOTPRINTS, footprint_id).await
    }

    async fn insert_footprint(&self, footprint: &NewFootprint) -> Result<Footprint, AppError> {
        self.insert(collections::FOOTPRINTS, footprint).await
    }

    async fn delete_footprint(&self, footprint_id: &str) -> Result<(), AppError> {
        self.delete_where(collections::FOOTPRINTS, &[("id", eq(footprint_id))])
            .await?;
        Ok(())
    }

    async fn delete_footprints_for_moment(&self, moment_id: &str) -> Result<usize, AppError> {
        self.delete_where(collections::FOOTPRINTS, &[("moment_id", eq(moment_id))])
            .await
    }
}

/// PostgREST equality filter value.
fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Backend(error_message(status, &body)));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| AppError::Backend(format!("Failed to parse response: {}", e)))
}

/// Prefer PostgREST's own message over the raw body.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<PostgrestError>(body) {
        Ok(err) => err.message,
        Err(_) => format!("HTTP {}: {}", status, body),
    }
}
