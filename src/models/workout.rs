// ABOUTME: Workout models: warm-up and cool-down segments, work intervals, pace targets and splits
// ABOUTME: Validates workout structure and derives the total prescribed distance in kilometers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stride_core::constants::{limits, units};
use stride_intelligence::Pace;
use uuid::Uuid;

use crate::errors::{AppError, AppResult, ErrorCode};

/// Unit of a prescribed distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceUnit {
    /// Meters
    #[serde(rename = "m")]
    Meters,
    /// Kilometers
    #[default]
    #[serde(rename = "km")]
    Kilometers,
    /// Miles
    #[serde(rename = "mi")]
    Miles,
}

impl DistanceUnit {
    /// Kilometers in one of this unit
    #[must_use]
    pub const fn km_factor(self) -> f64 {
        match self {
            Self::Meters => 1.0 / units::METERS_PER_KM,
            Self::Kilometers => 1.0,
            Self::Miles => units::KM_PER_MILE,
        }
    }
}

/// A distance with its unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    /// Magnitude
    pub value: f64,
    /// Unit of `value`
    #[serde(default)]
    pub unit: DistanceUnit,
}

impl Distance {
    /// The distance in kilometers
    #[must_use]
    pub fn to_km(self) -> f64 {
        self.value * self.unit.km_factor()
    }

    fn validate(self) -> AppResult<()> {
        if !self.value.is_finite() || self.value <= 0.0 {
            return Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                "Distance must be a positive number",
            ));
        }
        Ok(())
    }
}

/// Named effort a pace target refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaceType {
    /// Easy running
    Easy,
    /// Marathon effort
    Marathon,
    /// Tempo running
    Tempo,
    /// Lactate threshold
    Threshold,
    /// VO2max intervals
    Interval,
    /// Short fast repetitions
    Repetition,
}

/// Target pace for a segment or interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaceTarget {
    /// Effort name
    #[serde(rename = "type")]
    pub kind: PaceType,
    /// Pace as `mm:ss`
    pub pace: Pace,
}

/// Recorded or prescribed split
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Split {
    /// Split distance
    pub distance: Option<Distance>,
    /// Split duration
    pub time: Option<String>,
    /// Split pace as `mm:ss`
    pub pace: Option<Pace>,
}

/// Warm-up or cool-down block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Segment {
    /// Free text
    pub description: Option<String>,
    /// Optional pace target
    pub pace: Option<PaceTarget>,
    /// Splits
    pub splits: Vec<Split>,
}

/// How a work interval is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalKind {
    /// Run a fixed distance
    Distance,
    /// Run for a fixed duration
    Time,
}

const fn default_repetitions() -> u32 {
    1
}

/// One block of the main set, possibly repeated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkInterval {
    /// Distance or time based
    #[serde(rename = "type")]
    pub kind: IntervalKind,
    /// Required for distance intervals
    #[serde(default)]
    pub distance: Option<Distance>,
    /// Required for time intervals
    #[serde(default)]
    pub time: Option<String>,
    /// Optional pace target
    #[serde(default)]
    pub pace: Option<PaceTarget>,
    /// Number of repeats
    #[serde(default = "default_repetitions")]
    pub repetitions: u32,
    /// Splits
    #[serde(default)]
    pub splits: Vec<Split>,
}

impl WorkInterval {
    /// Check that the interval carries what its kind requires
    ///
    /// # Errors
    ///
    /// Returns a validation error for missing distance/time or zero repetitions.
    pub fn validate(&self) -> AppResult<()> {
        if self.repetitions == 0 {
            return Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                "Repetitions must be at least 1",
            ));
        }
        match self.kind {
            IntervalKind::Distance => self
                .distance
                .ok_or_else(|| AppError::missing_field("Distance for a distance interval"))?
                .validate()?,
            IntervalKind::Time => {
                let has_time = self
                    .time
                    .as_deref()
                    .is_some_and(|time| !time.trim().is_empty());
                if !has_time {
                    return Err(AppError::missing_field("Time for a time interval"));
                }
            }
        }
        for split in &self.splits {
            if let Some(distance) = split.distance {
                distance.validate()?;
            }
        }
        Ok(())
    }

    /// Kilometers covered across all repetitions; zero for time intervals
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        match (self.kind, self.distance) {
            (IntervalKind::Distance, Some(distance)) => {
                distance.to_km() * f64::from(self.repetitions)
            }
            _ => 0.0,
        }
    }
}

fn validate_workout_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    let length = trimmed.chars().count();
    if !(limits::WORKOUT_NAME_MIN_LENGTH..=limits::WORKOUT_NAME_MAX_LENGTH).contains(&length) {
        return Err(AppError::invalid_input(format!(
            "Workout name must be between {} and {} characters",
            limits::WORKOUT_NAME_MIN_LENGTH,
            limits::WORKOUT_NAME_MAX_LENGTH
        )));
    }
    Ok(trimmed.to_owned())
}

fn sum_distance(work: &[WorkInterval]) -> f64 {
    work.iter().map(WorkInterval::distance_km).sum()
}

/// Workout content as submitted by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSpec {
    /// Workout name
    pub workout_name: String,
    /// Optional warm-up
    #[serde(default)]
    pub warm_up: Option<Segment>,
    /// Main set
    #[serde(default)]
    pub work: Vec<WorkInterval>,
    /// Optional cool-down
    #[serde(default)]
    pub cool_down: Option<Segment>,
    /// Reusable template flag
    #[serde(default)]
    pub is_template: bool,
}

impl WorkoutSpec {
    /// Trim the name and validate every interval
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad name or interval.
    pub fn validated(mut self) -> AppResult<Self> {
        self.workout_name = validate_workout_name(&self.workout_name)?;
        for interval in &self.work {
            interval.validate()?;
        }
        Ok(self)
    }

    /// Whether any block sets a pace target
    #[must_use]
    pub fn has_pace_targets(&self) -> bool {
        self.warm_up.as_ref().is_some_and(|s| s.pace.is_some())
            || self.cool_down.as_ref().is_some_and(|s| s.pace.is_some())
            || self.work.iter().any(|w| w.pace.is_some())
    }
}

/// Partial workout update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkoutUpdate {
    /// New name
    pub workout_name: Option<String>,
    /// New warm-up
    pub warm_up: Option<Segment>,
    /// New main set
    pub work: Option<Vec<WorkInterval>>,
    /// New cool-down
    pub cool_down: Option<Segment>,
    /// New template flag
    pub is_template: Option<bool>,
}

impl WorkoutUpdate {
    /// Whether the update sets any pace target
    #[must_use]
    pub fn has_pace_targets(&self) -> bool {
        self.warm_up.as_ref().is_some_and(|s| s.pace.is_some())
            || self.cool_down.as_ref().is_some_and(|s| s.pace.is_some())
            || self
                .work
                .as_ref()
                .is_some_and(|work| work.iter().any(|w| w.pace.is_some()))
    }
}

/// Stored workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    /// Unique identifier
    pub id: Uuid,
    /// Workout name
    pub workout_name: String,
    /// Optional warm-up
    pub warm_up: Option<Segment>,
    /// Main set
    pub work: Vec<WorkInterval>,
    /// Optional cool-down
    pub cool_down: Option<Segment>,
    /// Owner
    pub user: Uuid,
    /// Reusable template flag
    pub is_template: bool,
    /// Kilometers prescribed by the main set
    pub total_distance: f64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification
    pub updated_at: DateTime<Utc>,
}

impl Workout {
    /// Build a new workout from validated content
    #[must_use]
    pub fn new(user: Uuid, spec: WorkoutSpec) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            total_distance: sum_distance(&spec.work),
            workout_name: spec.workout_name,
            warm_up: spec.warm_up,
            work: spec.work,
            cool_down: spec.cool_down,
            user,
            is_template: spec.is_template,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update and recompute the total distance
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad name or interval.
    pub fn apply(&mut self, update: WorkoutUpdate) -> AppResult<()> {
        if let Some(name) = update.workout_name {
            self.workout_name = validate_workout_name(&name)?;
        }
        if let Some(work) = update.work {
            for interval in &work {
                interval.validate()?;
            }
            self.work = work;
        }
        if let Some(warm_up) = update.warm_up {
            self.warm_up = Some(warm_up);
        }
        if let Some(cool_down) = update.cool_down {
            self.cool_down = Some(cool_down);
        }
        if let Some(is_template) = update.is_template {
            self.is_template = is_template;
        }
        self.total_distance = sum_distance(&self.work);
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn intervals_spec() -> WorkoutSpec {
        serde_json::from_value(json!({
            "workoutName": "  Track 6x800 ",
            "warmUp": { "description": "2 km easy", "pace": { "type": "easy", "pace": "05:30" } },
            "work": [
                { "type": "distance", "distance": { "value": 800, "unit": "m" }, "repetitions": 6,
                  "pace": { "type": "interval", "pace": "03:50" } },
                { "type": "time", "time": "10:00" },
                { "type": "distance", "distance": { "value": 1, "unit": "mi" } }
            ],
            "coolDown": { "description": "jog" }
        }))
        .unwrap()
    }

    #[test]
    fn test_total_distance_sums_distance_intervals() {
        let spec = intervals_spec().validated().unwrap();
        assert_eq!(spec.workout_name, "Track 6x800");
        let workout = Workout::new(Uuid::new_v4(), spec);
        let expected = 0.8f64.mul_add(6.0, units::KM_PER_MILE);
        assert!((workout.total_distance - expected).abs() < 1e-9);
        assert_eq!(workout.work[1].repetitions, 1);
    }

    #[test]
    fn test_pace_target_detection() {
        let spec = intervals_spec();
        assert!(spec.has_pace_targets());

        let plain: WorkoutSpec = serde_json::from_value(json!({
            "workoutName": "Easy run",
            "work": [{ "type": "distance", "distance": { "value": 8, "unit": "km" } }]
        }))
        .unwrap();
        assert!(!plain.has_pace_targets());
    }

    #[test]
    fn test_interval_validation() {
        let missing_distance: WorkInterval =
            serde_json::from_value(json!({ "type": "distance" })).unwrap();
        assert!(missing_distance.validate().is_err());

        let missing_time: WorkInterval = serde_json::from_value(json!({ "type": "time" })).unwrap();
        assert!(missing_time.validate().is_err());

        let zero_reps: WorkInterval = serde_json::from_value(
            json!({ "type": "distance", "distance": { "value": 400, "unit": "m" }, "repetitions": 0 }),
        )
        .unwrap();
        assert!(zero_reps.validate().is_err());
    }

    #[test]
    fn test_workout_name_limits() {
        assert!(validate_workout_name("A").is_err());
        assert!(validate_workout_name(&"x".repeat(26)).is_err());
        assert_eq!(validate_workout_name(" Long run ").unwrap(), "Long run");
    }

    #[test]
    fn test_bad_pace_format_rejected() {
        let result: Result<PaceTarget, _> =
            serde_json::from_value(json!({ "type": "tempo", "pace": "4:30" }));
        assert!(result.is_err());
        let result: Result<PaceTarget, _> =
            serde_json::from_value(json!({ "type": "sprint", "pace": "04:30" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_update_recomputes_distance() {
        let mut workout = Workout::new(Uuid::new_v4(), intervals_spec().validated().unwrap());
        let update: WorkoutUpdate = serde_json::from_value(json!({
            "work": [{ "type": "distance", "distance": { "value": 12, "unit": "km" } }]
        }))
        .unwrap();
        workout.apply(update).unwrap();
        assert!((workout.total_distance - 12.0).abs() < 1e-9);
        assert_eq!(workout.workout_name, "Track 6x800");
    }
}
