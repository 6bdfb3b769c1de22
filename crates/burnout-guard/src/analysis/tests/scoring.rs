use super::common::*;
use crate::analysis::domain::{AnalysisInput, RiskLevel};
use crate::analysis::scoring::{
    classify_risk, tips, ActivityWeightTable, AnalysisOutcome, BurnoutEngine, EmotionWeightTable,
    ScoreFactor, ScoringConfig, WeightsError,
};

fn points(outcome: &AnalysisOutcome, factor: ScoreFactor) -> f64 {
    outcome.component(factor).expect("component present").points
}

#[test]
fn restful_day_without_text_clamps_to_zero() {
    let engine = engine(StubClassifier::neutral());

    let outcome = engine
        .analyze(&lifestyle_input(&["Meditation", "Rest Day"], 8.0, 5))
        .expect("analysis succeeds");

    assert_close(points(&outcome, ScoreFactor::Emotion), 0.0);
    assert_close(points(&outcome, ScoreFactor::Activity), -40.0);
    assert_close(points(&outcome, ScoreFactor::Sleep), -10.0);
    assert_close(points(&outcome, ScoreFactor::Stress), 0.0);
    assert_close(outcome.raw_score, 0.0);
    assert_eq!(outcome.result.burnout_score, 0.0);
    assert_eq!(outcome.result.risk_level, RiskLevel::Low);
    assert!(outcome.result.emotions.is_empty());
    assert_eq!(engine.classifier().calls(), 0);
}

#[test]
fn overloaded_day_clamps_to_hundred() {
    let engine = engine(StubClassifier::neutral());

    let outcome = engine
        .analyze(&lifestyle_input(&["Overtime Work", "Deadline Pressure"], 4.0, 9))
        .expect("analysis succeeds");

    assert_close(points(&outcome, ScoreFactor::Activity), 47.0);
    assert_close(points(&outcome, ScoreFactor::Sleep), 25.0);
    assert_close(points(&outcome, ScoreFactor::Stress), 20.0);
    assert_close(outcome.raw_score, 142.0);
    assert_eq!(outcome.result.burnout_score, 100.0);
    assert_eq!(outcome.result.risk_level, RiskLevel::High);
    assert_eq!(
        &outcome.result.recommendations[..4],
        &[
            tips::RECOVERY_DAY,
            tips::WORK_BOUNDARIES,
            tips::PRIORITIZE_SLEEP,
            tips::DELEGATE,
        ]
    );
    assert_eq!(
        outcome.result.insights,
        "Your burnout score is 100/100 (High risk)."
    );
}

#[test]
fn identical_entries_score_identically() {
    let engine = engine(StubClassifier::new(&[
        ("sadness", 0.55),
        ("fear", 0.25),
        ("neutral", 0.2),
    ]));
    let input = journal_input("Another late night at the office.", &["Overtime Work"]);

    let first = engine.analyze(&input).expect("first analysis");
    let second = engine.analyze(&input).expect("second analysis");

    assert_eq!(first, second);
}

#[test]
fn emotion_contribution_sums_every_reported_label() {
    let engine = engine(StubClassifier::new(&[("sadness", 0.6), ("anger", 0.4)]));

    let outcome = engine
        .analyze(&journal_input("Everything went wrong today.", &[]))
        .expect("analysis succeeds");

    // 0.9 * 0.6 * 30 + 0.7 * 0.4 * 30
    assert!((points(&outcome, ScoreFactor::Emotion) - 24.6).abs() < 1e-9);
    assert_eq!(outcome.result.burnout_score, 64.6);
    assert_eq!(outcome.result.risk_level, RiskLevel::High);
    assert_eq!(outcome.result.emotions.get("sadness"), Some(60.0));
    assert_eq!(outcome.result.emotions.get("anger"), Some(40.0));
}

#[test]
fn joy_pulls_the_score_down() {
    let engine = engine(StubClassifier::new(&[("joy", 1.0)]));

    let outcome = engine
        .analyze(&journal_input("Had a wonderful day outside.", &[]))
        .expect("analysis succeeds");

    assert_close(points(&outcome, ScoreFactor::Emotion), -18.0);
    assert_eq!(outcome.result.burnout_score, 22.0);
    assert_eq!(outcome.result.risk_level, RiskLevel::Low);
}

#[test]
fn unknown_emotion_labels_are_reported_but_weigh_nothing() {
    let engine = engine(StubClassifier::new(&[("boredom", 1.0)]));

    let outcome = engine
        .analyze(&journal_input("Meh.", &[]))
        .expect("analysis succeeds");

    assert_close(points(&outcome, ScoreFactor::Emotion), 0.0);
    assert_eq!(outcome.result.emotions.get("boredom"), Some(100.0));
    assert_eq!(outcome.result.burnout_score, 40.0);
}

#[test]
fn unknown_activities_are_ignored_and_duplicates_counted() {
    let engine = engine(StubClassifier::neutral());

    let outcome = engine
        .analyze(&lifestyle_input(
            &["Skydiving", "Overtime Work", "Overtime Work"],
            8.0,
            5,
        ))
        .expect("analysis succeeds");

    assert_close(points(&outcome, ScoreFactor::Activity), 50.0);
    assert_eq!(outcome.result.burnout_score, 90.0);
}

#[test]
fn sleep_bands_use_first_matching_threshold() {
    let engine = engine(StubClassifier::neutral());
    let cases = [
        (-5.0, 25.0),
        (4.99, 25.0),
        (5.0, 15.0),
        (5.99, 15.0),
        (6.0, 5.0),
        (6.99, 5.0),
        (7.0, -10.0),
        (8.5, -10.0),
        (9.0, -10.0),
        (9.01, 5.0),
        (14.0, 5.0),
    ];

    for (hours, expected) in cases {
        let outcome = engine
            .analyze(&lifestyle_input(&[], hours, 5))
            .expect("analysis succeeds");
        assert_close(points(&outcome, ScoreFactor::Sleep), expected);
    }
}

#[test]
fn stress_is_centered_on_level_five() {
    let engine = engine(StubClassifier::neutral());

    for (level, expected) in [(1, -20.0), (5, 0.0), (6, 5.0), (10, 25.0)] {
        let outcome = engine
            .analyze(&lifestyle_input(&[], 8.0, level))
            .expect("analysis succeeds");
        assert_close(points(&outcome, ScoreFactor::Stress), expected);
    }
}

#[test]
fn adversarial_extremes_stay_within_bounds() {
    let engine = engine(StubClassifier::new(&[("sadness", 1.0)]));
    let cases = [
        lifestyle_input(&["Overtime Work"; 20], -5.0, 1000),
        lifestyle_input(&["Meditation"; 20], 8.0, -1000),
        lifestyle_input(&[], f64::MAX, i32::MAX),
        lifestyle_input(&[], f64::MIN, i32::MIN),
        journal_input("sad", &["Rest Day"; 30]),
    ];

    for input in cases {
        let outcome = engine.analyze(&input).expect("analysis succeeds");
        let score = outcome.result.burnout_score;
        assert!((0.0..=100.0).contains(&score), "score {score} out of range");
        assert_eq!(outcome.result.risk_level, classify_risk(score));
    }
}

#[test]
fn risk_boundaries_belong_to_the_upper_band() {
    assert_eq!(classify_risk(0.0), RiskLevel::Low);
    assert_eq!(classify_risk(29.9), RiskLevel::Low);
    assert_eq!(classify_risk(30.0), RiskLevel::Moderate);
    assert_eq!(classify_risk(59.9), RiskLevel::Moderate);
    assert_eq!(classify_risk(60.0), RiskLevel::High);
    assert_eq!(classify_risk(100.0), RiskLevel::High);
}

#[test]
fn score_is_reported_to_one_decimal_and_insight_as_integer() {
    let engine = engine(StubClassifier::new(&[("sadness", 0.333), ("neutral", 0.667)]));

    let outcome = engine
        .analyze(&journal_input("Not my best week.", &[]))
        .expect("analysis succeeds");

    // 50 + 0.9 * 0.333 * 30 - 10 = 48.991
    assert!((outcome.raw_score - 48.991).abs() < 1e-9);
    assert_eq!(outcome.result.burnout_score, 49.0);
    assert_eq!(outcome.result.emotions.get("sadness"), Some(33.3));
    assert_eq!(
        outcome.result.insights,
        "Your burnout score is 49/100 (Moderate risk)."
    );
}

#[test]
fn injected_weight_tables_replace_the_standard_ones() {
    let config = ScoringConfig {
        activity_impacts: ActivityWeightTable::new([("Gardening", -30)]),
        emotion_weights: EmotionWeightTable::standard(),
    };
    let engine = BurnoutEngine::new(config, StubClassifier::neutral());

    let outcome = engine
        .analyze(&lifestyle_input(&["Gardening", "Overtime Work"], 8.0, 5))
        .expect("analysis succeeds");

    assert_close(points(&outcome, ScoreFactor::Activity), -30.0);
    assert_eq!(outcome.result.burnout_score, 10.0);
}

#[test]
fn extreme_injected_impacts_sum_without_overflow() {
    let config = ScoringConfig {
        activity_impacts: ActivityWeightTable::new([
            ("Crunch", i32::MAX),
            ("Sabbatical", i32::MIN),
        ]),
        emotion_weights: EmotionWeightTable::standard(),
    };
    let engine = BurnoutEngine::new(config, StubClassifier::neutral());

    let crunch = engine
        .analyze(&lifestyle_input(&["Crunch", "Crunch"], 8.0, 5))
        .expect("analysis succeeds");
    assert_close(
        points(&crunch, ScoreFactor::Activity),
        2.0 * f64::from(i32::MAX),
    );
    assert_eq!(crunch.result.burnout_score, 100.0);
    assert_eq!(crunch.result.risk_level, RiskLevel::High);

    let sabbatical = engine
        .analyze(&lifestyle_input(&["Sabbatical", "Sabbatical"], 8.0, 5))
        .expect("analysis succeeds");
    assert!(points(&sabbatical, ScoreFactor::Activity) < 0.0);
    assert_eq!(sabbatical.result.burnout_score, 0.0);
}

#[test]
fn emotion_labels_match_exactly_for_weights_and_tips() {
    let engine = engine(StubClassifier::new(&[("Sadness", 0.9), ("neutral", 0.1)]));

    let outcome = engine
        .analyze(&journal_input("Quiet evening.", &["Exercise", "Meditation"]))
        .expect("analysis succeeds");

    // A capitalized label is reported as-is but neither weighted nor matched by the tips.
    assert_close(points(&outcome, ScoreFactor::Emotion), 0.0);
    assert_eq!(outcome.result.emotions.get("Sadness"), Some(90.0));
    assert_eq!(outcome.result.burnout_score, 5.0);
    assert!(outcome.result.recommendations.is_empty());
}

#[test]
fn standard_table_spells_socializing_correctly() {
    let impacts = ActivityWeightTable::standard();

    assert_eq!(impacts.impact("Socializing"), -10);
    assert!(!impacts.contains("Socalizing"));
    assert_eq!(impacts.impact("Socalizing"), 0);
}

#[test]
fn weights_json_falls_back_to_standard_tables() {
    let config = ScoringConfig::from_json_str(
        r#"{"activity_impacts": {"Gardening": -12}, "emotion_weights": {"joy": -1.0}}"#,
    )
    .expect("weights parse");

    assert_eq!(config.activity_impacts.impact("Gardening"), -12);
    assert_eq!(config.activity_impacts.impact("Overtime Work"), 0);
    assert_eq!(config.emotion_weights.weight("joy"), -1.0);
    assert_eq!(config.emotion_weights.weight("sadness"), 0.0);

    let partial = ScoringConfig::from_json_str(r#"{"activity_impacts": {}}"#).expect("parses");
    assert_eq!(partial.emotion_weights, EmotionWeightTable::standard());
}

#[test]
fn missing_weights_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    match ScoringConfig::from_json_path(&dir.path().join("absent.json")) {
        Err(WeightsError::Io { .. }) => {}
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn standard_tables_cover_the_documented_ranges() {
    let config = ScoringConfig::standard();
    let impacts: Vec<i32> = config
        .activity_impacts
        .iter()
        .map(|(_, impact)| impact)
        .collect();
    assert_eq!(impacts.iter().max(), Some(&25));
    assert_eq!(impacts.iter().min(), Some(&-20));
    assert_eq!(config.emotion_weights.weight("sadness"), 0.9);
    assert_eq!(config.emotion_weights.weight("joy"), -0.6);
    assert_eq!(config.emotion_weights.weight("neutral"), 0.0);
    assert_eq!(AnalysisInput::default().sleep_hours, 7.0);
    assert_eq!(AnalysisInput::default().stress_level, 5);
}
