// ABOUTME: Training plan route handlers: weekly plans, workout references and completion tracking
// ABOUTME: Plans are returned with their referenced workouts embedded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Training plan routes
//!
//! A plan's `totalDistance` is the sum of its workouts' distances at the time
//! the workout list is set. `completedDistance` is the sum of the actual
//! distances recorded on completed entries.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use stride_core::constants::error_messages;
use tracing::info;
use uuid::Uuid;

use crate::errors::{parse_id, AppError, AppResult, ErrorCode, JsonBody};
use crate::middleware::{authenticate_request, AuthenticatedUser};
use crate::models::{validate_week, PlanEntry, PlanEntryInput, PopulatedPlan, TrainingPlan};
use crate::resources::ServerResources;

/// Plan creation request
#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    /// Start date of the week
    pub date: NaiveDate,
    /// Week number, at least 1
    pub week: u32,
    /// Scheduled workouts
    #[serde(default)]
    pub workouts: Vec<PlanEntryInput>,
    /// Athlete the plan belongs to
    pub user: Uuid,
}

/// Plan update; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdatePlanRequest {
    /// New start date
    pub date: Option<NaiveDate>,
    /// New week number
    pub week: Option<u32>,
    /// Replacement entries; resets completion state
    pub workouts: Option<Vec<PlanEntryInput>>,
}

/// Completion request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompleteWorkoutRequest {
    /// Plan id
    pub plan_id: Option<String>,
    /// Workout id within the plan
    pub workout_id: Option<String>,
    /// Kilometers actually run
    pub actual_distance: Option<f64>,
    /// Athlete notes
    pub notes: Option<String>,
}

fn plan_not_found_or_unauthorized() -> AppError {
    AppError::new(
        ErrorCode::ResourceNotFound,
        error_messages::PLAN_NOT_FOUND_OR_UNAUTHORIZED,
    )
}

/// Training plan routes implementation
pub struct PlanRoutes;

impl PlanRoutes {
    /// Create all plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/training/plan", post(Self::handle_create))
            .route("/api/training/plans/:user", get(Self::handle_list))
            .route(
                "/api/training/plan/complete/:user",
                put(Self::handle_complete),
            )
            .route(
                "/api/training/plan/:id/:user",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    fn authorize(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
        user_id: Uuid,
    ) -> AppResult<AuthenticatedUser> {
        let caller = authenticate_request(headers, &resources.auth_manager)?;
        caller.require_training_access(user_id)?;
        Ok(caller)
    }

    /// Check every referenced workout is visible to the caller and sum their distances
    ///
    /// Athletes may only schedule workouts belonging to the plan owner;
    /// coaches and admins may reference any athlete's workout.
    async fn total_distance(
        resources: &Arc<ServerResources>,
        caller: &AuthenticatedUser,
        owner: Uuid,
        entries: &[PlanEntryInput],
    ) -> AppResult<f64> {
        let mut total = 0.0;
        for entry in entries {
            entry.validate()?;
            let workout = resources
                .database
                .get_workout(entry.workout)
                .await?
                .filter(|workout| workout.user == owner || caller.role.can_manage_training())
                .ok_or_else(|| {
                    AppError::new(
                        ErrorCode::ResourceNotFound,
                        format!("Workout {} not found", entry.workout),
                    )
                })?;
            total += workout.total_distance;
        }
        Ok(total)
    }

    async fn populate(
        resources: &Arc<ServerResources>,
        plan: TrainingPlan,
    ) -> AppResult<PopulatedPlan> {
        let workouts = resources
            .database
            .get_workouts_by_ids(&plan.workout_ids())
            .await?;
        Ok(PopulatedPlan::new(plan, &workouts))
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        JsonBody(request): JsonBody<CreatePlanRequest>,
    ) -> Result<Response, AppError> {
        let caller = Self::authorize(&headers, &resources, request.user)?;
        resources.database.get_user_required(request.user).await?;

        let total_distance =
            Self::total_distance(&resources, &caller, request.user, &request.workouts).await?;
        let plan = TrainingPlan::new(
            request.user,
            request.date,
            request.week,
            request.workouts,
            total_distance,
        )?;
        resources.database.create_plan(&plan).await?;

        info!(
            plan.id = %plan.id,
            user.id = %plan.user,
            created_by = %caller.user_id,
            total_distance,
            "Training plan created"
        );
        let populated = Self::populate(&resources, plan).await?;
        Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Training plan created successfully",
                "data": populated,
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

        let plans = resources.database.list_plans_for_user(user_id).await?;
        let mut populated = Vec::with_capacity(plans.len());
        for plan in plans {
            populated.push(Self::populate(&resources, plan).await?);
        }
        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "count": populated.len(),
                "data": populated,
            })),
        )
            .into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path((id, user)): Path<(String, String)>,
    ) -> Result<Response, AppError> {
        let plan_id = parse_id(&id, "training plan")?;
        let user_id = parse_id(&user, "user")?;
        Self::authorize(&headers, &resources, user_id)?;

        let plan = resources
            .database
            .get_plan_for_user(plan_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Training plan"))?;
        let populated = Self::populate(&resources, plan).await?;
        Ok((StatusCode::OK, Json(json!({ "success": true, "data": populated }))).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path((id, user)): Path<(String, String)>,
        JsonBody(request): JsonBody<UpdatePlanRequest>,
    ) -> Result<Response, AppError> {
        let plan_id = parse_id(&id, "training plan")?;
        let user_id = parse_id(&user, "user")?;
        let caller = Self::authorize(&headers, &resources, user_id)?;

        let mut plan = resources
            .database
            .get_plan_for_user(plan_id, user_id)
            .await?
            .ok_or_else(plan_not_found_or_unauthorized)?;

        if let Some(date) = request.date {
            plan.date = date;
        }
        if let Some(week) = request.week {
            validate_week(week)?;
            plan.week = week;
        }
        if let Some(entries) = request.workouts {
            plan.total_distance =
                Self::total_distance(&resources, &caller, user_id, &entries).await?;
            plan.workouts = entries.into_iter().map(PlanEntry::from).collect();
            plan.recompute_completed_distance();
        }
        plan.updated_at = Utc::now();

        if !resources.database.update_plan(&plan).await? {
            return Err(plan_not_found_or_unauthorized());
        }

        info!(plan.id = %plan.id, user.id = %user_id, "Training plan updated");
        let populated = Self::populate(&resources, plan).await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Training plan updated successfully",
                "data": populated,
            })),
        )
            .into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path((id, user)): Path<(String, String)>,
    ) -> Result<Response, AppError> {
        let plan_id = parse_id(&id, "training plan")?;
        let user_id = parse_id(&user, "user")?;
        Self::authorize(&headers, &resources, user_id)?;

        if !resources.database.delete_plan(plan_id, user_id).await? {
            return Err(plan_not_found_or_unauthorized());
        }

        info!(plan.id = %plan_id, user.id = %user_id, "Training plan deleted");
        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Training plan deleted successfully",
                "data": {},
            })),
        )
            .into_response())
    }

    async fn handle_complete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user): Path<String>,
        JsonBody(request): JsonBody<CompleteWorkoutRequest>,
    ) -> Result<Response, AppError> {
        let user_id = parse_id(&user, "user")?;
        Self::authorize(&headers, &resources, user_id)?;

        let (Some(plan_id), Some(workout_id)) =
            (request.plan_id.as_deref(), request.workout_id.as_deref())
        else {
            return Err(AppError::invalid_input(
                "Plan ID and workout ID are required",
            ));
        };
        let plan_id = parse_id(plan_id, "training plan")?;
        let workout_id = parse_id(workout_id, "workout")?;

        let mut plan = resources
            .database
            .get_plan_for_user(plan_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Training plan"))?;

        plan.complete_entry(workout_id, request.actual_distance, request.notes)?;
        if !resources.database.update_plan(&plan).await? {
            return Err(plan_not_found_or_unauthorized());
        }

        info!(
            plan.id = %plan.id,
            workout.id = %workout_id,
            completed_distance = plan.completed_distance,
            "Workout marked as complete"
        );
        let populated = Self::populate(&resources, plan).await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Workout marked as complete",
                "data": populated,
            })),
        )
            .into_response())
    }
}
