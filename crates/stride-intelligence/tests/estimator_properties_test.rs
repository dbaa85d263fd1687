// ABOUTME: Property tests for the fitness estimator across its accepted input range
// ABOUTME: Covers monotonicity, determinism, pace ordering, pace formatting and input boundaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use stride_core::errors::ErrorCode;
use stride_intelligence::algorithms::{
    MAX_FITNESS_SCORE, MAX_VELOCITY, MIN_FITNESS_SCORE, MIN_VELOCITY,
};
use stride_intelligence::{
    compute_fitness_score, get_training_paces, training_paces, FitnessScore, PaceTable, PaceUnit,
    RacePerformance,
};

const DISTANCES_KM: [f64; 6] = [0.8, 1.5, 5.0, 10.0, 21.0975, 42.195];

/// Finishing times from 4:30/km to 11:00/km for the given distance
fn times_for(distance_km: f64) -> impl Iterator<Item = i64> {
    let fastest = (distance_km * 270.0).ceil() as i64;
    let slowest = (distance_km * 660.0).floor() as i64;
    let step = ((slowest - fastest) / 40).max(1);
    (fastest..=slowest).step_by(step as usize)
}

fn is_mm_ss(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 5
        && bytes[2] == b':'
        && (b'0'..=b'5').contains(&bytes[0])
        && bytes[1].is_ascii_digit()
        && (b'0'..=b'5').contains(&bytes[3])
        && bytes[4].is_ascii_digit()
}

fn assert_ordered(table: &PaceTable, context: &str) {
    let seconds: Vec<u32> = table.iter().map(|(_, pace)| pace.total_seconds()).collect();
    for pair in seconds.windows(2) {
        assert!(
            pair[0] > pair[1],
            "paces not strictly ordered for {context}: {seconds:?}"
        );
    }
}

#[test]
fn test_scores_positive_and_finite() {
    for distance in DISTANCES_KM {
        for time in times_for(distance) {
            let score = compute_fitness_score(distance, time).unwrap();
            assert!(score.value().is_finite() && score.value() > 0.0);
        }
    }
}

#[test]
fn test_race_scores_at_velocity_extremes_have_pace_tables() {
    for distance in [0.1, 1.0, 42.195, 100.0] {
        let meters = distance * 1000.0;
        let slowest = (meters / MIN_VELOCITY * 60.0).floor() as i64;
        let fastest = (meters / MAX_VELOCITY * 60.0).ceil() as i64;
        for time in [slowest, fastest] {
            let score = compute_fitness_score(distance, time).unwrap();
            assert!(
                (MIN_FITNESS_SCORE..=MAX_FITNESS_SCORE).contains(&score.value()),
                "{distance} km in {time}s scored {}",
                score.value()
            );
            assert_ordered(&get_training_paces(score.value()).unwrap(), "extreme race");
        }
    }
}

#[test]
fn test_faster_time_never_lowers_score() {
    for distance in DISTANCES_KM {
        let scores: Vec<f64> = times_for(distance)
            .map(|time| compute_fitness_score(distance, time).unwrap().value())
            .collect();
        for pair in scores.windows(2) {
            assert!(pair[0] >= pair[1], "distance {distance}: {pair:?}");
        }
    }
}

#[test]
fn test_longer_distance_in_same_time_never_lowers_score() {
    let time = 3_600;
    let mut previous = 0.0;
    for distance in [7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0] {
        let score = compute_fitness_score(distance, time).unwrap().value();
        assert!(score >= previous);
        previous = score;
    }
}

#[test]
fn test_estimator_is_deterministic() {
    for distance in DISTANCES_KM {
        for time in times_for(distance).take(5) {
            let first = compute_fitness_score(distance, time).unwrap();
            let second = compute_fitness_score(distance, time).unwrap();
            assert_eq!(first.value().to_bits(), second.value().to_bits());
            assert_eq!(
                get_training_paces(first.value()).unwrap(),
                get_training_paces(second.value()).unwrap()
            );
        }
    }
}

#[test]
fn test_pace_ordering_across_score_domain() {
    let mut score = MIN_FITNESS_SCORE;
    while score <= MAX_FITNESS_SCORE {
        let fitness = FitnessScore::new(score).unwrap();
        for unit in [PaceUnit::Kilometer, PaceUnit::Mile] {
            let table = training_paces(fitness, unit).unwrap();
            assert_ordered(&table, &format!("{score} per {}", unit.as_str()));
        }
        score += 0.5;
    }
}

#[test]
fn test_pace_strings_match_mm_ss() {
    let mut score = MIN_FITNESS_SCORE;
    while score <= MAX_FITNESS_SCORE {
        let fitness = FitnessScore::new(score).unwrap();
        for unit in [PaceUnit::Kilometer, PaceUnit::Mile] {
            for (intensity, pace) in training_paces(fitness, unit).unwrap().iter() {
                let text = pace.to_string();
                assert!(is_mm_ss(&text), "{intensity} at {score}: {text}");
            }
        }
        score += 1.0;
    }
}

#[test]
fn test_pace_table_serializes_as_strings() {
    let table = get_training_paces(50.0).unwrap();
    let json = serde_json::to_value(table).unwrap();
    for key in ["easy", "marathon", "threshold", "interval", "repetition"] {
        assert!(is_mm_ss(json[key].as_str().unwrap()), "{key}");
    }
    let back: PaceTable = serde_json::from_value(json).unwrap();
    assert_eq!(back, table);
}

#[test]
fn test_boundaries_are_invalid_input() {
    let cases = [(0.0, 1200), (5.0, 0), (-1.0, 1200), (5.0, -1), (-5.0, -1200)];
    for (distance, time) in cases {
        let err = compute_fitness_score(distance, time).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput, "({distance}, {time})");
    }
    for score in [0.0, -10.0, 0.5, 200.0, f64::NAN] {
        let err = get_training_paces(score).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput, "{score}");
    }
    let err = RacePerformance::from_parts(None, None).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[test]
fn test_five_k_in_twenty_minutes_example() {
    let score = compute_fitness_score(5.0, 1200).unwrap();
    assert!((45.0..=50.0).contains(&score.value()), "got {score}");

    let paces = get_training_paces(score.value()).unwrap();
    assert!(paces.easy.total_seconds() > paces.threshold.total_seconds());
}

#[test]
fn test_race_performance_serialization() {
    let performance = RacePerformance::new(10.0, 2700).unwrap();
    let json = serde_json::to_value(performance).unwrap();
    assert_eq!(json["distance"], 10.0);
    assert_eq!(json["timeInSeconds"], 2700);
}
