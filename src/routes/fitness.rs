// ABOUTME: Public fitness calculator endpoints: VDOT from a race, pace tables and race predictions
// ABOUTME: Stateless wrappers over the estimator that need no authentication
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use stride_intelligence::{race_predictions, training_paces, FitnessScore, PaceUnit};

use super::users::RacePerformanceInput;
use crate::errors::{AppError, AppResult, JsonBody};
use crate::resources::ServerResources;

/// Query string for score-based calculators
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScoreQuery {
    /// VDOT score
    pub vdot: Option<String>,
    /// `km` (default) or `mile`
    pub unit: Option<String>,
}

impl ScoreQuery {
    fn score(&self) -> AppResult<FitnessScore> {
        let raw = self
            .vdot
            .as_deref()
            .ok_or_else(|| AppError::missing_field("vdot"))?;
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| AppError::invalid_input(format!("vdot must be a number, got '{raw}'")))?;
        FitnessScore::new(value)
    }

    fn unit(&self) -> AppResult<PaceUnit> {
        self.unit
            .as_deref()
            .map_or(Ok(PaceUnit::default()), str::parse)
    }
}

/// Fitness calculator routes implementation
pub struct FitnessRoutes;

impl FitnessRoutes {
    /// Create all calculator routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/fitness/vdot", post(Self::handle_vdot))
            .route("/api/fitness/paces", get(Self::handle_paces))
            .route("/api/fitness/predictions", get(Self::handle_predictions))
            .with_state(resources)
    }

    async fn handle_vdot(
        JsonBody(input): JsonBody<RacePerformanceInput>,
    ) -> Result<Response, AppError> {
        let performance = input.to_performance()?;
        let score = FitnessScore::new(performance.fitness_score()?.rounded())?;
        let paces = training_paces(score, PaceUnit::Kilometer)?;

        tracing::debug!(
            distance_km = performance.distance_km(),
            time_seconds = performance.time_seconds(),
            vdot = score.value(),
            "Calculated VDOT"
        );

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "vdot": score,
                "performance": performance,
                "trainingPaces": paces,
                "predictions": race_predictions(score),
            })),
        )
            .into_response())
    }

    async fn handle_paces(Query(query): Query<ScoreQuery>) -> Result<Response, AppError> {
        let score = query.score()?;
        let unit = query.unit()?;
        let paces = training_paces(score, unit)?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "vdot": score,
                "unit": unit.as_str(),
                "trainingPaces": paces,
            })),
        )
            .into_response())
    }

    async fn handle_predictions(Query(query): Query<ScoreQuery>) -> Result<Response, AppError> {
        let score = query.score()?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "vdot": score,
                "predictions": race_predictions(score),
            })),
        )
            .into_response())
    }
}
