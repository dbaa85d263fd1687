// ABOUTME: Training plan models: a dated week of workouts with per-day comments and completion state
// ABOUTME: Tracks prescribed and completed distance and renders plans with their workouts embedded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use stride_core::constants::limits;
use uuid::Uuid;

use super::workout::Workout;
use crate::errors::{AppError, AppResult, ErrorCode};

/// Day of the training week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

/// Plan entry as submitted by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntryInput {
    /// Scheduled day
    pub day: Weekday,
    /// Referenced workout id
    pub workout: Uuid,
    /// Coach or athlete comments
    #[serde(default)]
    pub comment: Vec<String>,
}

impl PlanEntryInput {
    /// Enforce the per-comment length limit
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` when a comment is too long.
    pub fn validate(&self) -> AppResult<()> {
        if self
            .comment
            .iter()
            .any(|c| c.chars().count() > limits::PLAN_COMMENT_MAX_LENGTH)
        {
            return Err(AppError::invalid_input(format!(
                "Comment cannot exceed {} characters",
                limits::PLAN_COMMENT_MAX_LENGTH
            )));
        }
        Ok(())
    }
}

/// Stored plan entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    /// Scheduled day
    pub day: Weekday,
    /// Referenced workout id
    pub workout: Uuid,
    /// Comments
    #[serde(default)]
    pub comment: Vec<String>,
    /// Whether the athlete has done it
    #[serde(default)]
    pub completed: bool,
    /// When it was marked complete
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Kilometers actually run
    #[serde(default)]
    pub actual_distance: Option<f64>,
    /// Athlete notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<PlanEntryInput> for PlanEntry {
    fn from(input: PlanEntryInput) -> Self {
        Self {
            day: input.day,
            workout: input.workout,
            comment: input.comment,
            completed: false,
            completed_at: None,
            actual_distance: None,
            notes: None,
        }
    }
}

/// One week of training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlan {
    /// Unique identifier
    pub id: Uuid,
    /// Owner
    pub user: Uuid,
    /// Start date of the week
    pub date: NaiveDate,
    /// Week number within a training block
    pub week: u32,
    /// Scheduled workouts
    pub workouts: Vec<PlanEntry>,
    /// Kilometers prescribed by the referenced workouts
    pub total_distance: f64,
    /// Kilometers actually run in completed entries
    pub completed_distance: f64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification
    pub updated_at: DateTime<Utc>,
}

impl TrainingPlan {
    /// Build a new plan
    ///
    /// # Errors
    ///
    /// Returns a validation error for week 0 or an over-long comment.
    pub fn new(
        user: Uuid,
        date: NaiveDate,
        week: u32,
        entries: Vec<PlanEntryInput>,
        total_distance: f64,
    ) -> AppResult<Self> {
        validate_week(week)?;
        for entry in &entries {
            entry.validate()?;
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            user,
            date,
            week,
            workouts: entries.into_iter().map(PlanEntry::from).collect(),
            total_distance,
            completed_distance: 0.0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Ids of every referenced workout, in plan order
    #[must_use]
    pub fn workout_ids(&self) -> Vec<Uuid> {
        self.workouts.iter().map(|entry| entry.workout).collect()
    }

    /// Mark the first entry for `workout_id` as done
    ///
    /// # Errors
    ///
    /// Returns `AppError::ResourceNotFound` when the workout is not in the plan.
    pub fn complete_entry(
        &mut self,
        workout_id: Uuid,
        actual_distance: Option<f64>,
        notes: Option<String>,
    ) -> AppResult<()> {
        if let Some(distance) = actual_distance {
            if !distance.is_finite() || distance < 0.0 {
                return Err(AppError::new(
                    ErrorCode::ValueOutOfRange,
                    "Actual distance cannot be negative",
                ));
            }
        }
        if notes
            .as_deref()
            .is_some_and(|n| n.chars().count() > limits::PLAN_COMMENT_MAX_LENGTH)
        {
            return Err(AppError::invalid_input(format!(
                "Notes cannot exceed {} characters",
                limits::PLAN_COMMENT_MAX_LENGTH
            )));
        }
        let entry = self
            .workouts
            .iter_mut()
            .find(|entry| entry.workout == workout_id)
            .ok_or_else(|| {
                AppError::new(ErrorCode::ResourceNotFound, "Workout not found in plan")
            })?;

        entry.completed = true;
        entry.completed_at = Some(Utc::now());
        if actual_distance.is_some() {
            entry.actual_distance = actual_distance;
        }
        if notes.is_some() {
            entry.notes = notes;
        }
        self.recompute_completed_distance();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Sum actual distance over completed entries
    pub fn recompute_completed_distance(&mut self) {
        self.completed_distance = self
            .workouts
            .iter()
            .filter(|entry| entry.completed)
            .filter_map(|entry| entry.actual_distance)
            .sum();
    }
}

/// Reject week numbers below one
///
/// # Errors
///
/// Returns `AppError::ValueOutOfRange` for week 0.
pub fn validate_week(week: u32) -> AppResult<()> {
    if week == 0 {
        return Err(AppError::new(
            ErrorCode::ValueOutOfRange,
            "Week must be at least 1",
        ));
    }
    Ok(())
}

/// Plan entry with its workout embedded
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedPlanEntry {
    /// Scheduled day
    pub day: Weekday,
    /// Workout, or null when it has since been deleted
    pub workout: Option<Workout>,
    /// Comments
    pub comment: Vec<String>,
    /// Completion flag
    pub completed: bool,
    /// Completion time
    pub completed_at: Option<DateTime<Utc>>,
    /// Kilometers actually run
    pub actual_distance: Option<f64>,
    /// Athlete notes
    pub notes: Option<String>,
}

/// Plan with its workouts embedded
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedPlan {
    /// Unique identifier
    pub id: Uuid,
    /// Owner
    pub user: Uuid,
    /// Start date of the week
    pub date: NaiveDate,
    /// Week number
    pub week: u32,
    /// Scheduled workouts
    pub workouts: Vec<PopulatedPlanEntry>,
    /// Prescribed kilometers
    pub total_distance: f64,
    /// Completed kilometers
    pub completed_distance: f64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification
    pub updated_at: DateTime<Utc>,
}

impl PopulatedPlan {
    /// Embed workouts from `lookup` into `plan`
    #[must_use]
    pub fn new(plan: TrainingPlan, lookup: &HashMap<Uuid, Workout>) -> Self {
        let workouts = plan
            .workouts
            .into_iter()
            .map(|entry| PopulatedPlanEntry {
                day: entry.day,
                workout: lookup.get(&entry.workout).cloned(),
                comment: entry.comment,
                completed: entry.completed,
                completed_at: entry.completed_at,
                actual_distance: entry.actual_distance,
                notes: entry.notes,
            })
            .collect();
        Self {
            id: plan.id,
            user: plan.user,
            date: plan.date,
            week: plan.week,
            workouts,
            total_distance: plan.total_distance,
            completed_distance: plan.completed_distance,
            created_at: plan.created_at,
            updated_at: plan.updated_at,
        }
    }
}
