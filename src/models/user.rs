// ABOUTME: User models: account data, roles, personal bests, races and the VDOT profile
// ABOUTME: Includes name, email and password validation used at signup and on update
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use stride_core::constants::{defaults, limits, race_distances};
use stride_intelligence::{
    format_race_time, parse_race_time, training_paces, FitnessScore, PaceTable, PaceUnit,
    RacePerformance,
};
use uuid::Uuid;

use crate::errors::{AppError, AppResult, ErrorCode};

static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").ok()
});

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular athlete
    #[default]
    User,
    /// Full administrative access
    Admin,
    /// May manage other athletes' training
    Coach,
}

impl UserRole {
    /// Lowercase name as stored
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Coach => "coach",
        }
    }

    /// Parse a stored or requested role
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for unknown roles.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "coach" => Ok(Self::Coach),
            other => Err(AppError::invalid_input(format!("Unknown role '{other}'"))),
        }
    }

    /// Admins may act on any account
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Coaches and admins may manage other athletes' workouts and plans
    #[must_use]
    pub const fn can_manage_training(self) -> bool {
        matches!(self, Self::Admin | Self::Coach)
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Trim and length-check a display name
///
/// # Errors
///
/// Returns `AppError::InvalidInput` when the trimmed name is too short or too long.
pub fn validate_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    let length = trimmed.chars().count();
    if length < limits::NAME_MIN_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Name must be at least {} characters",
            limits::NAME_MIN_LENGTH
        )));
    }
    if length > limits::NAME_MAX_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Name cannot exceed {} characters",
            limits::NAME_MAX_LENGTH
        )));
    }
    Ok(trimmed.to_owned())
}

/// Trim, lower-case and validate an email address
///
/// # Errors
///
/// Returns `AppError::InvalidFormat` when the address does not look like an email.
pub fn normalize_email(email: &str) -> AppResult<String> {
    let normalized = email.trim().to_lowercase();
    let valid = EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(&normalized));
    if !valid {
        return Err(AppError::new(
            ErrorCode::InvalidFormat,
            "Please enter a valid email",
        ));
    }
    Ok(normalized)
}

/// Check the minimum password length
///
/// # Errors
///
/// Returns `AppError::InvalidInput` when the password is too short.
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < limits::PASSWORD_MIN_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Password must be at least {} characters",
            limits::PASSWORD_MIN_LENGTH
        )));
    }
    Ok(())
}

/// Standard race distances tracked as personal bests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RaceDistance {
    /// 5 km
    FiveK,
    /// 10 km
    TenK,
    /// 21.0975 km
    HalfMarathon,
    /// 42.195 km
    Marathon,
}

impl RaceDistance {
    /// All tracked distances, shortest first
    pub const ALL: [Self; 4] = [Self::FiveK, Self::TenK, Self::HalfMarathon, Self::Marathon];

    /// Distance in kilometers
    #[must_use]
    pub const fn distance_km(self) -> f64 {
        match self {
            Self::FiveK => race_distances::FIVE_K_KM,
            Self::TenK => race_distances::TEN_K_KM,
            Self::HalfMarathon => race_distances::HALF_MARATHON_KM,
            Self::Marathon => race_distances::MARATHON_KM,
        }
    }

    /// JSON key of this distance inside `personalBests`
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::FiveK => "fiveK",
            Self::TenK => "tenK",
            Self::HalfMarathon => "halfMarathon",
            Self::Marathon => "marathon",
        }
    }
}

/// Best result at one distance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalBest {
    /// Race date
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Finishing time as `HH:MM:SS`
    #[serde(default)]
    pub time: Option<String>,
    /// Finishing time in seconds, derived from `time` on save
    #[serde(default)]
    pub time_in_seconds: Option<u32>,
    /// Where the race was run
    #[serde(default)]
    pub location: Option<String>,
}

impl PersonalBest {
    /// Derive `time_in_seconds` from `time`
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidFormat` when `time` is not `HH:MM:SS`.
    pub fn normalized(mut self) -> AppResult<Self> {
        if let Some(time) = self.time.as_deref() {
            self.time_in_seconds = Some(parse_race_time(time)?);
        }
        Ok(self)
    }

    /// This result as estimator input
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` when no time is recorded.
    pub fn performance(&self, distance: RaceDistance) -> AppResult<RacePerformance> {
        RacePerformance::from_parts(
            Some(distance.distance_km()),
            self.time_in_seconds.map(i64::from),
        )
    }

    fn pace_seconds_per_km(&self, distance: RaceDistance) -> Option<f64> {
        self.time_in_seconds
            .filter(|seconds| *seconds > 0)
            .map(|seconds| f64::from(seconds) / distance.distance_km())
    }
}

/// Personal bests at the four standard distances
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalBests {
    /// 5K
    pub five_k: Option<PersonalBest>,
    /// 10K
    pub ten_k: Option<PersonalBest>,
    /// Half marathon
    pub half_marathon: Option<PersonalBest>,
    /// Marathon
    pub marathon: Option<PersonalBest>,
}

impl PersonalBests {
    /// Result at one distance
    #[must_use]
    pub const fn get(&self, distance: RaceDistance) -> Option<&PersonalBest> {
        match distance {
            RaceDistance::FiveK => self.five_k.as_ref(),
            RaceDistance::TenK => self.ten_k.as_ref(),
            RaceDistance::HalfMarathon => self.half_marathon.as_ref(),
            RaceDistance::Marathon => self.marathon.as_ref(),
        }
    }

    /// Derive `time_in_seconds` for every entry
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidFormat` if any `time` is not `HH:MM:SS`.
    pub fn normalized(self) -> AppResult<Self> {
        Ok(Self {
            five_k: self.five_k.map(PersonalBest::normalized).transpose()?,
            ten_k: self.ten_k.map(PersonalBest::normalized).transpose()?,
            half_marathon: self.half_marathon.map(PersonalBest::normalized).transpose()?,
            marathon: self.marathon.map(PersonalBest::normalized).transpose()?,
        })
    }

    /// The personal best with the lowest pace per kilometer
    #[must_use]
    pub fn fastest_race(&self) -> Option<(RaceDistance, &PersonalBest)> {
        RaceDistance::ALL
            .into_iter()
            .filter_map(|distance| {
                let best = self.get(distance)?;
                best.pace_seconds_per_km(distance)
                    .map(|pace| (distance, best, pace))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(distance, best, _)| (distance, best))
    }
}

/// A race the athlete is training for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingRace {
    /// Race name
    pub name: String,
    /// Race day
    pub date: NaiveDate,
    /// Goal time as `HH:MM:SS`
    pub projected_time: String,
}

impl UpcomingRace {
    /// Validate required fields
    ///
    /// # Errors
    ///
    /// Returns an error when the name is blank or the projected time is not `HH:MM:SS`.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::missing_field("Race name"));
        }
        parse_race_time(&self.projected_time)?;
        Ok(())
    }
}

/// A recently completed race
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecentRace {
    /// Race name
    pub name: Option<String>,
    /// Finishing time
    pub time: Option<String>,
    /// Race day
    pub date: Option<NaiveDate>,
}

/// How a VDOT value was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VdotSource {
    /// Entered directly
    Manual,
    /// Computed from a submitted race
    RacePerformance,
    /// Computed from the fastest stored personal best
    PersonalBest,
}

impl VdotSource {
    /// Name used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::RacePerformance => "racePerformance",
            Self::PersonalBest => "personalBest",
        }
    }
}

/// Race a VDOT value was computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedFrom {
    /// Distance in kilometers
    pub distance: f64,
    /// Finishing time as `HH:MM:SS`
    pub time: String,
    /// Finishing time in seconds
    pub time_in_seconds: u32,
    /// Race day
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Personal-best key when computed from one, e.g. `tenK`
    #[serde(default)]
    pub race: Option<RaceDistance>,
}

impl CalculatedFrom {
    /// Describe a race performance
    #[must_use]
    pub fn new(performance: &RacePerformance, date: Option<NaiveDate>) -> Self {
        Self {
            distance: performance.distance_km(),
            time: format_race_time(performance.time_seconds()),
            time_in_seconds: performance.time_seconds(),
            date,
            race: None,
        }
    }
}

/// Cached VDOT score with its training paces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VdotProfile {
    /// VDOT rounded to one decimal
    pub value: f64,
    /// Per-kilometer paces derived from `value`
    pub training_paces: PaceTable,
    /// How the value was obtained
    pub source: VdotSource,
    /// Race the value was computed from, if any
    #[serde(default)]
    pub calculated_from: Option<CalculatedFrom>,
    /// When the value was set
    pub updated_at: DateTime<Utc>,
}

impl VdotProfile {
    /// Round the score to one decimal and derive its pace table
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` if the rounded score is outside the pace engine's range.
    pub fn from_score(
        score: FitnessScore,
        source: VdotSource,
        calculated_from: Option<CalculatedFrom>,
    ) -> AppResult<Self> {
        let score = FitnessScore::new(score.rounded())?;
        Ok(Self {
            value: score.value(),
            training_paces: training_paces(score, PaceUnit::Kilometer)?,
            source,
            calculated_from,
            updated_at: Utc::now(),
        })
    }
}

/// Stride account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Lower-cased unique email
    pub email: String,
    /// bcrypt hash, never serialized
    #[serde(skip)]
    pub password_hash: String,
    /// Account role
    pub role: UserRole,
    /// Avatar URL
    pub avatar: String,
    /// Cached VDOT and paces
    pub vdot: Option<VdotProfile>,
    /// Personal bests at standard distances
    pub personal_bests: PersonalBests,
    /// Races being trained for
    pub upcoming_races: Vec<UpcomingRace>,
    /// Recently completed races
    pub recent_races: Vec<RecentRace>,
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// Last modification
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new account with the default avatar and no VDOT
    #[must_use]
    pub fn new(name: String, email: String, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role,
            avatar: defaults::AVATAR_URL.to_owned(),
            vdot: None,
            personal_bests: PersonalBests::default(),
            upcoming_races: Vec::new(),
            recent_races: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a VDOT value has been set
    #[must_use]
    pub fn has_vdot(&self) -> bool {
        self.vdot.as_ref().is_some_and(|vdot| vdot.value > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_normalization() {
        assert_eq!(
            normalize_email("  Runner.One@Example.COM ").unwrap(),
            "runner.one@example.com"
        );
        for bad in ["runner", "runner@", "@example.com", "runner@example", "a b@c.com"] {
            assert!(normalize_email(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_name_validation() {
        assert_eq!(validate_name("  Ada ").unwrap(), "Ada");
        assert!(validate_name("A").is_err());
        assert!(validate_name(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_personal_best_time_in_seconds() {
        let best = PersonalBest {
            time: Some("00:19:30".into()),
            ..PersonalBest::default()
        }
        .normalized()
        .unwrap();
        assert_eq!(best.time_in_seconds, Some(1170));

        let bad = PersonalBest {
            time: Some("19:30".into()),
            ..PersonalBest::default()
        };
        assert!(bad.normalized().is_err());
    }

    #[test]
    fn test_fastest_race_uses_pace_per_km() {
        let bests = PersonalBests {
            five_k: Some(PersonalBest {
                time: Some("00:22:00".into()),
                ..PersonalBest::default()
            }),
            ten_k: Some(PersonalBest {
                time: Some("00:42:00".into()),
                ..PersonalBest::default()
            }),
            ..PersonalBests::default()
        }
        .normalized()
        .unwrap();

        let (distance, best) = bests.fastest_race().unwrap();
        assert_eq!(distance, RaceDistance::TenK);
        assert_eq!(best.time_in_seconds, Some(2520));
        assert!(PersonalBests::default().fastest_race().is_none());
    }

    #[test]
    fn test_personal_bests_json_keys() {
        let json = serde_json::json!({
            "fiveK": { "time": "00:20:00" },
            "halfMarathon": { "time": "01:35:00", "location": "Berlin" }
        });
        let bests: PersonalBests = serde_json::from_value(json).unwrap();
        let bests = bests.normalized().unwrap();
        assert_eq!(bests.five_k.unwrap().time_in_seconds, Some(1200));
        assert_eq!(bests.half_marathon.unwrap().location.as_deref(), Some("Berlin"));
        assert!(bests.marathon.is_none());
    }

    #[test]
    fn test_vdot_profile_rounds_value() {
        let score = FitnessScore::new(49.8062).unwrap();
        let profile = VdotProfile::from_score(score, VdotSource::Manual, None).unwrap();
        assert!((profile.value - 49.8).abs() < f64::EPSILON);
        assert!(profile.training_paces.easy > profile.training_paces.threshold);
    }

    #[test]
    fn test_user_serialization_hides_password() {
        let user = User::new(
            "Ada".into(),
            "ada@example.com".into(),
            "$2b$04$hash".into(),
            UserRole::User,
        );
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "user");
        assert!(json["personalBests"].is_object());
    }
}
