// ABOUTME: Race time prediction by inverting the VDOT model at a target distance
// ABOUTME: Also parses and formats HH:MM:SS race times
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Race time prediction.
//!
//! The score is strictly decreasing in finishing time for a fixed distance,
//! so the time that reproduces a given score is found by bisection between
//! the fastest and slowest times the accepted velocity range allows.

use crate::algorithms::vdot::{raw_score, FitnessScore, MAX_VELOCITY, MIN_VELOCITY};
use crate::paces::Pace;
use serde::Serialize;
use stride_core::constants::race_distances::{
    FIVE_K_KM, HALF_MARATHON_KM, MARATHON_KM, TEN_K_KM,
};
use stride_core::constants::units::{METERS_PER_KM, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};
use stride_core::errors::{AppError, AppResult, ErrorCode};

/// Bisection stops once the bracket is narrower than this many seconds
const TIME_TOLERANCE_SECONDS: f64 = 0.01;

/// Hard cap on bisection steps
const MAX_ITERATIONS: usize = 100;

/// Standard distances reported by [`race_predictions`]
const STANDARD_RACES: [(&str, f64); 4] = [
    ("5K", FIVE_K_KM),
    ("10K", TEN_K_KM),
    ("Half Marathon", HALF_MARATHON_KM),
    ("Marathon", MARATHON_KM),
];

/// Predicted result at one standard distance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RacePrediction {
    /// Race label, e.g. "10K"
    pub race: &'static str,
    /// Distance in kilometers
    pub distance_km: f64,
    /// Predicted finishing time in whole seconds
    pub time_in_seconds: u32,
    /// Predicted finishing time as `HH:MM:SS`
    pub time: String,
    /// Average pace per kilometer
    pub pace_per_km: Pace,
}

/// Predict the finishing time (seconds) over `distance_km` for `score`
///
/// # Errors
///
/// Returns `AppError::InvalidInput` if the distance is not positive or the
/// score cannot be produced over that distance within the accepted
/// velocity range.
pub fn predict_race_time(score: FitnessScore, distance_km: f64) -> AppResult<f64> {
    if !distance_km.is_finite() || distance_km <= 0.0 {
        return Err(AppError::invalid_input("Distance must be positive"));
    }

    let meters = distance_km * METERS_PER_KM;
    let target = score.value();

    // Fastest time gives the highest score
    let mut fast = meters / MAX_VELOCITY * SECONDS_PER_MINUTE;
    let mut slow = meters / MIN_VELOCITY * SECONDS_PER_MINUTE;

    if target > raw_score(meters, fast) || target < raw_score(meters, slow) {
        return Err(AppError::invalid_input(format!(
            "Score {score} is not reachable over {distance_km} km"
        )));
    }

    for _ in 0..MAX_ITERATIONS {
        if slow - fast < TIME_TOLERANCE_SECONDS {
            break;
        }
        let mid = f64::midpoint(fast, slow);
        if raw_score(meters, mid) > target {
            fast = mid;
        } else {
            slow = mid;
        }
    }

    Ok(f64::midpoint(fast, slow))
}

/// Predictions at 5K, 10K, half marathon and marathon
///
/// Distances the score cannot reach within the velocity range are omitted.
#[must_use]
pub fn race_predictions(score: FitnessScore) -> Vec<RacePrediction> {
    STANDARD_RACES
        .iter()
        .filter_map(|&(race, distance_km)| {
            let seconds = predict_race_time(score, distance_km).ok()?;
            let pace_per_km = Pace::from_seconds(seconds / distance_km).ok()?;
            let time_in_seconds = seconds.round() as u32;
            Some(RacePrediction {
                race,
                distance_km,
                time_in_seconds,
                time: format_race_time(time_in_seconds),
                pace_per_km,
            })
        })
        .collect()
}

/// Format whole seconds as `HH:MM:SS`
#[must_use]
pub fn format_race_time(seconds: u32) -> String {
    let hours = seconds / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Parse an `HH:MM:SS` race time (hours 00-23) into seconds
///
/// # Errors
///
/// Returns `AppError::InvalidFormat` unless the value has three two-digit
/// fields with hours below 24 and minutes and seconds below 60.
pub fn parse_race_time(value: &str) -> AppResult<u32> {
    let invalid = || {
        AppError::new(
            ErrorCode::InvalidFormat,
            "Please provide time in HH:MM:SS format",
        )
    };

    let fields: Vec<&str> = value.split(':').collect();
    let [hours, minutes, seconds] = fields.as_slice() else {
        return Err(invalid());
    };

    let mut parsed = [0_u32; 3];
    for (slot, field) in parsed.iter_mut().zip([hours, minutes, seconds]) {
        if field.len() != 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        *slot = field.parse().map_err(|_| invalid())?;
    }

    let [hours, minutes, seconds] = parsed;
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(invalid());
    }

    Ok(hours * SECONDS_PER_HOUR + minutes * 60 + seconds)
}
