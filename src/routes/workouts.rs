// ABOUTME: Workout route handlers: create, list, read, update and delete per athlete
// ABOUTME: Pace targets require the athlete to have a VDOT; coaches and admins may manage any athlete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use stride_core::constants::error_messages;
use tracing::info;
use uuid::Uuid;

use crate::errors::{parse_id, AppError, AppResult, ErrorCode, JsonBody};
use crate::middleware::{authenticate_request, AuthenticatedUser};
use crate::models::{User, Workout, WorkoutSpec, WorkoutUpdate};
use crate::resources::ServerResources;

/// Workout creation request
#[derive(Debug, Deserialize)]
pub struct CreateWorkoutRequest {
    /// Athlete the workout belongs to
    pub user: Uuid,
    /// Workout content
    #[serde(flatten)]
    pub spec: WorkoutSpec,
}

fn workout_not_found() -> AppError {
    AppError::new(
        ErrorCode::ResourceNotFound,
        error_messages::WORKOUT_NOT_FOUND_OR_UNAUTHORIZED,
    )
}

fn require_vdot_for_paces(user: &User, has_pace_targets: bool) -> AppResult<()> {
    if has_pace_targets && !user.has_vdot() {
        return Err(AppError::invalid_input(
            error_messages::VDOT_REQUIRED_FOR_PACES,
        ));
    }
    Ok(())
}

/// Workout routes implementation
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create all workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/training/workout", post(Self::handle_create))
            .route("/api/training/workouts/:user", get(Self::handle_list))
            .route(
                "/api/training/workout/:id/:user",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Authenticate and check the caller may manage `user_id`'s training
    fn authorize(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
        user_id: Uuid,
    ) -> AppResult<AuthenticatedUser> {
        let caller = authenticate_request(headers, &resources.auth_manager)?;
        caller.require_training_access(user_id)?;
        Ok(caller)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        JsonBody(request): JsonBody<CreateWorkoutRequest>,
    ) -> Result<Response, AppError> {
        let caller = Self::authorize(&headers, &resources, request.user)?;
        let user = resources.database.get_user_required(request.user).await?;

        let spec = request.spec.validated()?;
        require_vdot_for_paces(&user, spec.has_pace_targets())?;

        let workout = Workout::new(user.id, spec);
        resources.database.create_workout(&workout).await?;

        info!(
            workout.id = %workout.id,
            user.id = %user.id,
            created_by = %caller.user_id,
            total_distance = workout.total_distance,
            "Workout created"
        );
        Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Workout created successfully",
                "data": workout,
            })),
        )
            .into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user): Path<String>,
    ) -> Result<Response, AppError> {
        let user_id = parse_id(&user, "user")?;
        Self::authorize(&headers, &resources, user_id)?;
        resources.database.get_user_required(user_id).await?;

        let workouts = resources.database.list_workouts_for_user(user_id).await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "count": workouts.len(),
                "data": workouts,
            })),
        )
            .into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path((id, user)): Path<(String, String)>,
    ) -> Result<Response, AppError> {
        let workout_id = parse_id(&id, "workout")?;
        let user_id = parse_id(&user, "user")?;
        Self::authorize(&headers, &resources, user_id)?;

        let workout = resources
            .database
            .get_workout_for_user(workout_id, user_id)
            .await?
            .ok_or_else(workout_not_found)?;
        Ok((StatusCode::OK, Json(json!({ "success": true, "data": workout }))).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path((id, user)): Path<(String, String)>,
        JsonBody(update): JsonBody<WorkoutUpdate>,
    ) -> Result<Response, AppError> {
        let workout_id = parse_id(&id, "workout")?;
        let user_id = parse_id(&user, "user")?;
        Self::authorize(&headers, &resources, user_id)?;

        let user = resources.database.get_user_required(user_id).await?;
        let mut workout = resources
            .database
            .get_workout_for_user(workout_id, user_id)
            .await?
            .ok_or_else(workout_not_found)?;

        require_vdot_for_paces(&user, update.has_pace_targets())?;
        workout.apply(update)?;
        if !resources.database.update_workout(&workout).await? {
            return Err(workout_not_found());
        }

        info!(workout.id = %workout.id, user.id = %user_id, "Workout updated");
        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Workout updated successfully",
                "data": workout,
            })),
        )
            .into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path((id, user)): Path<(String, String)>,
    ) -> Result<Response, AppError> {
        let workout_id = parse_id(&id, "workout")?;
        let user_id = parse_id(&user, "user")?;
        Self::authorize(&headers, &resources, user_id)?;

        if !resources.database.delete_workout(workout_id, user_id).await? {
            return Err(workout_not_found());
        }

        info!(workout.id = %workout_id, user.id = %user_id, "Workout deleted");
        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Workout deleted successfully",
                "data": {},
            })),
        )
            .into_response())
    }
}
