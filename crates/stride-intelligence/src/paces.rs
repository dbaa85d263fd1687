// ABOUTME: Training pace derivation from a VDOT score
// ABOUTME: Maps each training intensity to a fraction of VDOT and formats mm:ss paces
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::algorithms::vdot::{velocity_for_oxygen_cost, FitnessScore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use stride_core::constants::units::{
    KM_PER_MILE, METERS_PER_KM, SECONDS_PER_HOUR, SECONDS_PER_MINUTE,
};
use stride_core::errors::{AppError, AppResult, ErrorCode};

/// Training intensity categories, slowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingIntensity {
    /// Conversational aerobic running
    Easy,
    /// Goal marathon effort
    Marathon,
    /// Comfortably hard, about one hour race effort
    Threshold,
    /// VO2max intervals
    Interval,
    /// Short fast repetitions for economy
    Repetition,
}

impl TrainingIntensity {
    /// All intensities, slowest to fastest
    pub const ALL: [Self; 5] = [
        Self::Easy,
        Self::Marathon,
        Self::Threshold,
        Self::Interval,
        Self::Repetition,
    ];

    /// Fraction of VDOT targeted by this intensity
    #[must_use]
    pub const fn fraction_of_vdot(self) -> f64 {
        match self {
            Self::Easy => 0.67,
            Self::Marathon => 0.81,
            Self::Threshold => 0.88,
            Self::Interval => 0.975,
            Self::Repetition => 1.05,
        }
    }

    /// Lowercase name used in JSON
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Marathon => "marathon",
            Self::Threshold => "threshold",
            Self::Interval => "interval",
            Self::Repetition => "repetition",
        }
    }
}

impl fmt::Display for TrainingIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distance unit a pace is expressed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaceUnit {
    /// Time per kilometer
    #[default]
    #[serde(rename = "km")]
    Kilometer,
    /// Time per statute mile
    #[serde(rename = "mile")]
    Mile,
}

impl PaceUnit {
    /// Length of one unit in kilometers
    #[must_use]
    pub const fn distance_km(self) -> f64 {
        match self {
            Self::Kilometer => 1.0,
            Self::Mile => KM_PER_MILE,
        }
    }

    /// Short name used in JSON and query strings
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kilometer => "km",
            Self::Mile => "mile",
        }
    }
}

impl FromStr for PaceUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "km" | "kilometer" | "kilometre" => Ok(Self::Kilometer),
            "mi" | "mile" => Ok(Self::Mile),
            other => Err(AppError::invalid_input(format!(
                "Unknown pace unit '{other}', expected km or mile"
            ))),
        }
    }
}

/// Time per unit distance, whole seconds, always below one hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pace {
    seconds: u32,
}

impl Pace {
    /// Round a fractional number of seconds to a pace
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if the value is not finite, not
    /// positive, or does not fit `mm:ss`.
    pub fn from_seconds(seconds: f64) -> AppResult<Self> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(AppError::invalid_input("Pace must be a positive duration"));
        }
        let rounded = seconds.round();
        if rounded >= f64::from(SECONDS_PER_HOUR) {
            return Err(AppError::invalid_input(format!(
                "Pace of {rounded} seconds does not fit mm:ss"
            )));
        }
        let seconds = rounded as u32;
        Ok(Self { seconds })
    }

    /// Parse an `mm:ss` string
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidFormat` unless the input is two two-digit
    /// fields with seconds below 60.
    pub fn parse(value: &str) -> AppResult<Self> {
        let invalid = || {
            AppError::new(
                ErrorCode::InvalidFormat,
                format!("Pace '{value}' must be in mm:ss format"),
            )
        };

        let (minutes, seconds) = value.split_once(':').ok_or_else(invalid)?;
        if minutes.len() != 2 || seconds.len() != 2 {
            return Err(invalid());
        }
        let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
        let seconds: u32 = seconds.parse().map_err(|_| invalid())?;
        if minutes > 59 || seconds > 59 {
            return Err(invalid());
        }
        Ok(Self {
            seconds: minutes * 60 + seconds,
        })
    }

    /// Total seconds per unit distance
    #[must_use]
    pub const fn total_seconds(self) -> u32 {
        self.seconds
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.seconds / 60, self.seconds % 60)
    }
}

impl FromStr for Pace {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Pace {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Pace> for String {
    fn from(pace: Pace) -> Self {
        pace.to_string()
    }
}

/// Five training paces derived from one score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaceTable {
    /// Easy / recovery pace
    pub easy: Pace,
    /// Marathon pace
    pub marathon: Pace,
    /// Threshold (tempo) pace
    pub threshold: Pace,
    /// Interval pace
    pub interval: Pace,
    /// Repetition pace
    pub repetition: Pace,
}

impl PaceTable {
    /// Pace for one intensity
    #[must_use]
    pub const fn get(&self, intensity: TrainingIntensity) -> Pace {
        match intensity {
            TrainingIntensity::Easy => self.easy,
            TrainingIntensity::Marathon => self.marathon,
            TrainingIntensity::Threshold => self.threshold,
            TrainingIntensity::Interval => self.interval,
            TrainingIntensity::Repetition => self.repetition,
        }
    }

    /// Iterate `(intensity, pace)` pairs, slowest first
    pub fn iter(&self) -> impl Iterator<Item = (TrainingIntensity, Pace)> + '_ {
        TrainingIntensity::ALL
            .into_iter()
            .map(move |intensity| (intensity, self.get(intensity)))
    }
}

fn pace_for(score: FitnessScore, intensity: TrainingIntensity, unit: PaceUnit) -> AppResult<Pace> {
    let velocity = velocity_for_oxygen_cost(score.value() * intensity.fraction_of_vdot());
    Pace::from_seconds(unit.distance_km() * METERS_PER_KM / velocity * SECONDS_PER_MINUTE)
}

/// Training paces for `score` expressed per `unit`
///
/// # Errors
///
/// Returns `AppError::InvalidInput` if a pace cannot be represented as `mm:ss`.
pub fn training_paces(score: FitnessScore, unit: PaceUnit) -> AppResult<PaceTable> {
    Ok(PaceTable {
        easy: pace_for(score, TrainingIntensity::Easy, unit)?,
        marathon: pace_for(score, TrainingIntensity::Marathon, unit)?,
        threshold: pace_for(score, TrainingIntensity::Threshold, unit)?,
        interval: pace_for(score, TrainingIntensity::Interval, unit)?,
        repetition: pace_for(score, TrainingIntensity::Repetition, unit)?,
    })
}

/// Per-kilometer training paces for a raw score
///
/// Positive scores outside `MIN_FITNESS_SCORE..=MAX_FITNESS_SCORE` are refused.
/// The range covers every score a race in the accepted velocity band can
/// produce, and across it the whole-second table stays strictly ordered from
/// repetition to easy with every pace fitting `MM:SS`.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` when `score` is not positive or lies
/// outside the supported score range.
pub fn get_training_paces(score: f64) -> AppResult<PaceTable> {
    training_paces(FitnessScore::new(score)?, PaceUnit::Kilometer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vdot_fifty_paces_per_km() {
        let paces = get_training_paces(50.0).unwrap();
        // Within a few seconds of the published VDOT 50 table
        let expected = [
            (paces.easy, 318),
            (paces.marathon, 273),
            (paces.threshold, 255),
            (paces.interval, 235),
            (paces.repetition, 221),
        ];
        for (pace, seconds) in expected {
            assert!(
                pace.total_seconds().abs_diff(seconds) <= 6,
                "{pace} vs {seconds}s"
            );
        }
    }

    #[test]
    fn test_mile_paces_are_slower_than_km() {
        let score = FitnessScore::new(45.0).unwrap();
        let km = training_paces(score, PaceUnit::Kilometer).unwrap();
        let mile = training_paces(score, PaceUnit::Mile).unwrap();
        for intensity in TrainingIntensity::ALL {
            assert!(mile.get(intensity) > km.get(intensity));
        }
    }

    #[test]
    fn test_rejects_non_positive_score() {
        for score in [0.0, -1.0, f64::NAN] {
            let err = get_training_paces(score).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidInput);
        }
    }

    #[test]
    fn test_pace_parse_and_display() {
        let pace = Pace::parse("04:05").unwrap();
        assert_eq!(pace.total_seconds(), 245);
        assert_eq!(pace.to_string(), "04:05");
        assert!(Pace::parse("4:05").is_err());
        assert!(Pace::parse("04:60").is_err());
        assert!(Pace::parse("0405").is_err());
    }

    #[test]
    fn test_pace_rejects_hour_or_more() {
        assert!(Pace::from_seconds(3599.4).is_ok());
        assert!(Pace::from_seconds(3600.0).is_err());
    }

    #[test]
    fn test_unit_from_str() {
        assert_eq!("KM".parse::<PaceUnit>().unwrap(), PaceUnit::Kilometer);
        assert_eq!("mi".parse::<PaceUnit>().unwrap(), PaceUnit::Mile);
        assert!("furlong".parse::<PaceUnit>().is_err());
    }

    #[test]
    fn test_table_iter_order() {
        let paces = get_training_paces(40.0).unwrap();
        let names: Vec<_> = paces.iter().map(|(i, _)| i.as_str()).collect();
        assert_eq!(names, ["easy", "marathon", "threshold", "interval", "repetition"]);
    }
}
