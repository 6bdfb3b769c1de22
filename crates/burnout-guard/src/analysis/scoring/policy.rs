use crate::analysis::domain::{AnalysisInput, EmotionLabel, EmotionSignal, RiskLevel};

/// Upper bound on recommendations returned per analysis.
pub const MAX_RECOMMENDATIONS: usize = 5;

const MODERATE_RISK_FLOOR: f64 = 30.0;
const HIGH_RISK_FLOOR: f64 = 60.0;

/// Recommendation copy, in rule priority order.
pub mod tips {
    pub const RECOVERY_DAY: &str = "Consider taking a mental health day to recharge.";
    pub const WORK_BOUNDARIES: &str = "Try to set boundaries around work hours.";
    pub const PRIORITIZE_SLEEP: &str = "Prioritize sleep - aim for 7-8 hours tonight.";
    pub const DELEGATE: &str = "Look for tasks you can delegate or postpone.";
    pub const MEDITATE: &str = "Try 5-10 minutes of meditation today.";
    pub const SHORT_WALK: &str = "A short walk can help reduce stress.";
    pub const REACH_OUT: &str = "Consider reaching out to a friend or family member.";
    pub const BREATHE: &str = "Try deep breathing or journaling to process feelings.";
}

/// Buckets a clamped score: below 30 is Low, below 60 Moderate, otherwise High.
pub fn classify_risk(score: f64) -> RiskLevel {
    if score < MODERATE_RISK_FLOOR {
        RiskLevel::Low
    } else if score < HIGH_RISK_FLOOR {
        RiskLevel::Moderate
    } else {
        RiskLevel::High
    }
}

/// Facts the recommendation rules are evaluated against.
pub(crate) struct RecommendationContext<'a> {
    pub score: f64,
    pub input: &'a AnalysisInput,
    pub emotions: &'a EmotionSignal,
}

struct RecommendationRule {
    applies: fn(&RecommendationContext<'_>) -> bool,
    message: &'static str,
}

// Order matters: truncation keeps the first matches.
const RECOMMENDATION_RULES: &[RecommendationRule] = &[
    RecommendationRule {
        applies: |ctx| ctx.score >= 70.0,
        message: tips::RECOVERY_DAY,
    },
    RecommendationRule {
        applies: |ctx| ctx.score >= 50.0,
        message: tips::WORK_BOUNDARIES,
    },
    RecommendationRule {
        applies: |ctx| ctx.input.sleep_hours < 6.0,
        message: tips::PRIORITIZE_SLEEP,
    },
    RecommendationRule {
        applies: |ctx| ctx.input.has_activity("Overtime Work"),
        message: tips::DELEGATE,
    },
    RecommendationRule {
        applies: |ctx| !ctx.input.has_activity("Meditation") && ctx.score > 40.0,
        message: tips::MEDITATE,
    },
    RecommendationRule {
        applies: |ctx| {
            !ctx.input.has_activity("Exercise") && !ctx.input.has_activity("Nature Walk")
        },
        message: tips::SHORT_WALK,
    },
    RecommendationRule {
        applies: |ctx| ctx.emotions.percentage(EmotionLabel::Sadness) > 50.0,
        message: tips::REACH_OUT,
    },
    RecommendationRule {
        applies: |ctx| ctx.emotions.percentage(EmotionLabel::Anger) > 50.0,
        message: tips::BREATHE,
    },
];

pub(crate) fn recommendations(ctx: &RecommendationContext<'_>) -> Vec<String> {
    RECOMMENDATION_RULES
        .iter()
        .filter(|rule| (rule.applies)(ctx))
        .take(MAX_RECOMMENDATIONS)
        .map(|rule| rule.message.to_string())
        .collect()
}

pub(crate) fn insight(score: f64, risk: RiskLevel) -> String {
    format!("Your burnout score is {score:.0}/100 ({risk} risk).")
}
