// ABOUTME: User account route handlers: profile reads and updates, personal bests and VDOT assignment
// ABOUTME: Mutations are limited to the account owner or an admin
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! User routes
//!
//! `PUT /api/user/vdot/{id}` accepts exactly one VDOT source: a manual value,
//! a race performance, or the user's fastest personal best. The resulting
//! score is rounded, its pace table derived, and both are cached on the user.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use stride_core::constants::error_messages;
use stride_intelligence::{parse_race_time, FitnessScore, RacePerformance};
use tracing::info;

use crate::errors::{parse_id, AppError, AppResult, JsonBody};
use crate::logging::AppLogger;
use crate::middleware::{authenticate_request, AuthenticatedUser};
use crate::models::{
    normalize_email, validate_name, validate_password, CalculatedFrom, PersonalBests, RecentRace,
    UpcomingRace, User, VdotProfile, VdotSource,
};
use crate::resources::ServerResources;

/// Profile update; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUserRequest {
    /// New display name
    pub name: Option<String>,
    /// New email
    pub email: Option<String>,
    /// New password
    pub password: Option<String>,
    /// New avatar URL
    pub avatar: Option<String>,
    /// Replacement upcoming races
    pub upcoming_races: Option<Vec<UpcomingRace>>,
    /// Replacement recent races
    pub recent_races: Option<Vec<RecentRace>>,
}

/// Race submitted for VDOT calculation
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RacePerformanceInput {
    /// Distance in kilometers
    pub distance: Option<f64>,
    /// Finishing time in seconds
    pub time_in_seconds: Option<i64>,
    /// Finishing time as `HH:MM:SS`, used when `timeInSeconds` is absent
    pub time: Option<String>,
    /// Race day
    pub date: Option<NaiveDate>,
}

impl RacePerformanceInput {
    /// Validate into estimator input
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for missing or non-positive values and
    /// `InvalidFormat` for a malformed `time`.
    pub fn to_performance(&self) -> AppResult<RacePerformance> {
        let seconds = match (self.time_in_seconds, self.time.as_deref()) {
            (Some(seconds), _) => Some(seconds),
            (None, Some(time)) => Some(i64::from(parse_race_time(time)?)),
            (None, None) => None,
        };
        RacePerformance::from_parts(self.distance, seconds)
    }
}

/// VDOT assignment request: exactly one source must be given
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetVdotRequest {
    /// Score entered directly
    pub manual_vdot: Option<f64>,
    /// Race to compute the score from
    pub race_performance: Option<RacePerformanceInput>,
    /// Use the fastest stored personal best
    pub from_personal_best: Option<bool>,
}

/// Where a VDOT assignment comes from
#[derive(Debug)]
pub enum VdotRequestSource<'a> {
    /// Manual score
    Manual(f64),
    /// Submitted race
    Race(&'a RacePerformanceInput),
    /// Fastest personal best
    PersonalBest,
}

impl SetVdotRequest {
    /// Resolve the single requested source
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when zero or several sources are given.
    pub fn source(&self) -> AppResult<VdotRequestSource<'_>> {
        let from_pb = self.from_personal_best == Some(true);
        let given = usize::from(self.manual_vdot.is_some())
            + usize::from(self.race_performance.is_some())
            + usize::from(from_pb);
        if given != 1 {
            return Err(AppError::invalid_input(
                "Provide exactly one of manualVdot, racePerformance or fromPersonalBest",
            ));
        }

        Ok(match (self.manual_vdot, self.race_performance.as_ref()) {
            (Some(value), _) => VdotRequestSource::Manual(value),
            (None, Some(race)) => VdotRequestSource::Race(race),
            (None, None) => VdotRequestSource::PersonalBest,
        })
    }
}

/// Compute the VDOT profile a request asks for
///
/// # Errors
///
/// Returns `InvalidInput` for estimator rejections or when no personal best is recorded.
pub fn resolve_vdot(user: &User, request: &SetVdotRequest) -> AppResult<VdotProfile> {
    match request.source()? {
        VdotRequestSource::Manual(value) => {
            let score = FitnessScore::new(value)?;
            VdotProfile::from_score(score, VdotSource::Manual, None)
        }
        VdotRequestSource::Race(input) => {
            let performance = input.to_performance()?;
            let score = performance.fitness_score()?;
            let calculated_from = CalculatedFrom::new(&performance, input.date);
            VdotProfile::from_score(score, VdotSource::RacePerformance, Some(calculated_from))
        }
        VdotRequestSource::PersonalBest => {
            let (distance, best) = user.personal_bests.fastest_race().ok_or_else(|| {
                AppError::invalid_input("No personal bests recorded to calculate VDOT from")
            })?;
            let performance = best.performance(distance)?;
            let score = performance.fitness_score()?;
            let calculated_from = CalculatedFrom {
                race: Some(distance),
                ..CalculatedFrom::new(&performance, best.date)
            };
            VdotProfile::from_score(score, VdotSource::PersonalBest, Some(calculated_from))
        }
    }
}

/// User routes implementation
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/user", get(Self::handle_list))
            .route(
                "/api/user/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route("/api/user/pb/:id", put(Self::handle_personal_bests))
            .route("/api/user/vdot/:id", put(Self::handle_set_vdot))
            .with_state(resources)
    }

    fn authenticate(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> AppResult<AuthenticatedUser> {
        authenticate_request(headers, &resources.auth_manager)
    }

    /// Authenticate, check ownership and load the target user
    async fn load_owned_user(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
        raw_id: &str,
    ) -> AppResult<(AuthenticatedUser, User)> {
        let caller = Self::authenticate(headers, resources)?;
        let user_id = parse_id(raw_id, "user")?;
        caller
            .require_account_access(user_id, error_messages::OWN_ACCOUNT_ONLY)
            .inspect_err(|_| {
                AppLogger::log_security_event(
                    "cross_account_update",
                    &format!("target {user_id}"),
                    Some(&caller.user_id.to_string()),
                );
            })?;
        let user = resources.database.get_user_required(user_id).await?;
        Ok((caller, user))
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        Self::authenticate(&headers, &resources)?;
        let users = resources.database.list_users().await?;
        Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "count": users.len(), "data": users })),
        )
            .into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        Self::authenticate(&headers, &resources)?;
        let user_id = parse_id(&id, "user")?;
        let user = resources.database.get_user_required(user_id).await?;
        Ok((StatusCode::OK, Json(json!({ "success": true, "user": user }))).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        JsonBody(request): JsonBody<UpdateUserRequest>,
    ) -> Result<Response, AppError> {
        let (_, mut user) = Self::load_owned_user(&headers, &resources, &id).await?;

        if let Some(name) = request.name {
            user.name = validate_name(&name)?;
        }
        if let Some(email) = request.email {
            user.email = normalize_email(&email)?;
        }
        if let Some(password) = request.password {
            validate_password(&password)?;
            user.password_hash = resources.auth_manager.hash_password(&password).await?;
        }
        if let Some(avatar) = request.avatar {
            user.avatar = avatar.trim().to_owned();
        }
        if let Some(races) = request.upcoming_races {
            for race in &races {
                race.validate()?;
            }
            user.upcoming_races = races;
        }
        if let Some(races) = request.recent_races {
            user.recent_races = races;
        }
        user.updated_at = Utc::now();
        resources.database.update_user(&user).await?;

        info!(user.id = %user.id, "User profile updated");
        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "User updated successfully",
                "user": user,
            })),
        )
            .into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let (caller, user) = Self::load_owned_user(&headers, &resources, &id).await?;
        if !resources.database.delete_user(user.id).await? {
            return Err(AppError::not_found("User"));
        }

        info!(user.id = %user.id, deleted_by = %caller.user_id, "User deleted");
        Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "message": "User has been deleted" })),
        )
            .into_response())
    }

    async fn handle_personal_bests(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        JsonBody(personal_bests): JsonBody<PersonalBests>,
    ) -> Result<Response, AppError> {
        let (_, mut user) = Self::load_owned_user(&headers, &resources, &id).await?;

        user.personal_bests = personal_bests.normalized()?;
        user.updated_at = Utc::now();
        resources.database.update_user(&user).await?;

        info!(user.id = %user.id, "Personal bests updated");
        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Personal bests updated successfully",
                "user": user,
            })),
        )
            .into_response())
    }

    async fn handle_set_vdot(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        JsonBody(request): JsonBody<SetVdotRequest>,
    ) -> Result<Response, AppError> {
        let (_, mut user) = Self::load_owned_user(&headers, &resources, &id).await?;

        let profile = resolve_vdot(&user, &request)?;
        AppLogger::log_vdot_update(&user.id.to_string(), profile.source.as_str(), profile.value);

        user.vdot = Some(profile);
        user.updated_at = Utc::now();
        resources.database.update_user(&user).await?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "VDOT updated successfully",
                "user": user,
            })),
        )
            .into_response())
    }
}
