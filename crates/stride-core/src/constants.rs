// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Race distances, unit conversions and validation limits shared across Stride crates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants grouped by domain.

/// Standard race distances in kilometers
pub mod race_distances {
    /// 5K
    pub const FIVE_K_KM: f64 = 5.0;
    /// 10K
    pub const TEN_K_KM: f64 = 10.0;
    /// Half marathon
    pub const HALF_MARATHON_KM: f64 = 21.0975;
    /// Marathon
    pub const MARATHON_KM: f64 = 42.195;
}

/// Unit conversion factors
pub mod units {
    /// Meters in one kilometer
    pub const METERS_PER_KM: f64 = 1_000.0;
    /// Kilometers in one statute mile
    pub const KM_PER_MILE: f64 = 1.609_344;
    /// Seconds per minute
    pub const SECONDS_PER_MINUTE: f64 = 60.0;
    /// Seconds per hour
    pub const SECONDS_PER_HOUR: u32 = 3_600;
}

/// Validation limits for user and training records
pub mod limits {
    /// Minimum display name length
    pub const NAME_MIN_LENGTH: usize = 2;
    /// Maximum display name length
    pub const NAME_MAX_LENGTH: usize = 50;
    /// Minimum password length
    pub const PASSWORD_MIN_LENGTH: usize = 6;
    /// Minimum workout name length
    pub const WORKOUT_NAME_MIN_LENGTH: usize = 2;
    /// Maximum workout name length
    pub const WORKOUT_NAME_MAX_LENGTH: usize = 25;
    /// Maximum length of a single plan comment
    pub const PLAN_COMMENT_MAX_LENGTH: usize = 250;
}

/// Default values for user records
pub mod defaults {
    /// Avatar assigned to new users
    pub const AVATAR_URL: &str =
        "https://res.cloudinary.com/dq7vq8fbj/image/upload/v1631017866/avatars/default_avatar_q6jv4b.png";
}

/// Standard error messages surfaced to clients
pub mod error_messages {
    /// Target user record missing
    pub const USER_NOT_FOUND: &str = "User not found";
    /// Mutation of someone else's account
    pub const OWN_ACCOUNT_ONLY: &str = "You can only update your own account!";
    /// Bad email/password pair
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
    /// Duplicate registration
    pub const USER_ALREADY_EXISTS: &str = "A user with this email already exists";
    /// Pace target without a stored VDOT
    pub const VDOT_REQUIRED_FOR_PACES: &str = "User must have a Vdot value to set paces";
    /// Workout missing or owned by someone else
    pub const WORKOUT_NOT_FOUND_OR_UNAUTHORIZED: &str = "Workout not found or unauthorized";
    /// Plan missing or owned by someone else
    pub const PLAN_NOT_FOUND_OR_UNAUTHORIZED: &str = "Training plan not found or unauthorized";
}
