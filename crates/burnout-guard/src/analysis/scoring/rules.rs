use super::config::ScoringConfig;
use super::{ScoreComponent, ScoreFactor};
use crate::analysis::domain::AnalysisInput;
use crate::analysis::emotion::EmotionReading;

/// Neutral starting point before any contribution is applied.
pub(crate) const BASELINE_SCORE: f64 = 50.0;
/// Points added per unit of weighted emotion probability.
pub(crate) const EMOTION_SCALE: f64 = 30.0;
/// Self-reported stress level treated as neutral.
pub(crate) const NEUTRAL_STRESS_LEVEL: i32 = 5;
pub(crate) const POINTS_PER_STRESS_LEVEL: f64 = 5.0;

/// Applies the four additive rules in order and returns the unclamped score.
pub(crate) fn score_entry(
    input: &AnalysisInput,
    reading: &EmotionReading,
    config: &ScoringConfig,
) -> (Vec<ScoreComponent>, f64) {
    let components = vec![
        emotion_component(reading, config),
        activity_component(&input.activities, config),
        sleep_component(input.sleep_hours),
        stress_component(input.stress_level),
    ];

    let raw_score = components
        .iter()
        .fold(BASELINE_SCORE, |score, component| score + component.points);

    (components, raw_score)
}

fn emotion_component(reading: &EmotionReading, config: &ScoringConfig) -> ScoreComponent {
    let points: f64 = reading
        .probabilities
        .iter()
        .map(|entry| config.emotion_weights.weight(&entry.label) * entry.score * EMOTION_SCALE)
        .sum();

    let notes = match reading.signal.dominant() {
        Some((label, percentage)) => {
            format!("dominant emotion {label} at {percentage:.1}%")
        }
        None => "no journal text to classify".to_string(),
    };

    ScoreComponent {
        factor: ScoreFactor::Emotion,
        points,
        notes,
    }
}

fn activity_component(activities: &[String], config: &ScoringConfig) -> ScoreComponent {
    let mut unrecognized = 0usize;
    let points: f64 = activities
        .iter()
        .map(|activity| {
            if !config.activity_impacts.contains(activity) {
                unrecognized += 1;
            }
            f64::from(config.activity_impacts.impact(activity))
        })
        .sum();

    let notes = if unrecognized == 0 {
        format!("{} activity(ies) logged", activities.len())
    } else {
        format!(
            "{} activity(ies) logged, {unrecognized} unrecognized",
            activities.len()
        )
    };

    ScoreComponent {
        factor: ScoreFactor::Activity,
        points,
        notes,
    }
}

/// First matching band wins; 7-9 hours inclusive is the healthy band.
pub(crate) fn sleep_points(hours: f64) -> f64 {
    if hours < 5.0 {
        25.0
    } else if hours < 6.0 {
        15.0
    } else if hours < 7.0 {
        5.0
    } else if hours > 9.0 {
        5.0
    } else {
        -10.0
    }
}

fn sleep_component(hours: f64) -> ScoreComponent {
    let points = sleep_points(hours);
    let notes = if points < 0.0 {
        format!("{hours} hours of sleep within the healthy band")
    } else if hours > 9.0 {
        format!("{hours} hours of sleep above the healthy band")
    } else {
        format!("{hours} hours of sleep below the healthy band")
    };

    ScoreComponent {
        factor: ScoreFactor::Sleep,
        points,
        notes,
    }
}

pub(crate) fn stress_points(level: i32) -> f64 {
    (f64::from(level) - f64::from(NEUTRAL_STRESS_LEVEL)) * POINTS_PER_STRESS_LEVEL
}

fn stress_component(level: i32) -> ScoreComponent {
    ScoreComponent {
        factor: ScoreFactor::Stress,
        points: stress_points(level),
        notes: format!("self-reported stress {level} against neutral {NEUTRAL_STRESS_LEVEL}"),
    }
}
