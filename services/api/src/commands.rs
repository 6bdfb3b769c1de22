use crate::infra::{build_service, history_limit};
use burnout_guard::analysis::{AnalysisInput, AnalysisOutcome, HistoryView, HISTORY_LIMIT};
use burnout_guard::config::{AppConfig, StorageKind};
use burnout_guard::error::AppError;
use clap::Args;
use std::fmt::Write as _;

#[derive(Args, Debug, Default)]
pub(crate) struct AnalyzeArgs {
    /// Free-form journal text to classify
    #[arg(long)]
    pub(crate) text: Option<String>,
    /// Activity logged for the day (repeatable), e.g. --activity "Overtime Work"
    #[arg(long = "activity")]
    pub(crate) activities: Vec<String>,
    /// Hours slept last night
    #[arg(long, default_value_t = 7.0, allow_negative_numbers = true)]
    pub(crate) sleep_hours: f64,
    /// Self-reported stress level (1-10)
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    pub(crate) stress_level: i32,
    /// Show how each factor contributed to the score
    #[arg(long)]
    pub(crate) explain: bool,
    /// Store the entry in the configured database
    #[arg(long)]
    pub(crate) save: bool,
    /// Print the result document as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct HistoryArgs {
    /// Number of entries to show (at most 50)
    #[arg(long, default_value_t = HISTORY_LIMIT)]
    pub(crate) limit: usize,
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if !args.save {
        // Previews never touch the database.
        config.storage.kind = StorageKind::Memory;
    }

    let input = AnalysisInput {
        text: args.text,
        activities: args.activities,
        sleep_hours: args.sleep_hours,
        stress_level: args.stress_level,
    };
    let save = args.save;

    // Remote classification blocks on the runtime; run it on a blocking thread.
    let outcome = tokio::task::spawn_blocking(move || -> Result<AnalysisOutcome, AppError> {
        let service = build_service(&config)?;
        let outcome = if save {
            service.analyze(&input)?
        } else {
            service.preview(&input)?
        };
        Ok(outcome)
    })
    .await??;

    if args.json {
        let rendered = serde_json::to_string_pretty(&outcome.result)
            .map_err(|err| AppError::Io(err.into()))?;
        println!("{rendered}");
    } else {
        print!("{}", render_analysis(&outcome, args.explain));
    }
    Ok(())
}

pub(crate) async fn run_history(args: HistoryArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let limit = history_limit(args.limit);

    let view = tokio::task::spawn_blocking(move || -> Result<HistoryView, AppError> {
        let service = build_service(&config)?;
        Ok(service.history(Some(limit))?)
    })
    .await??;

    print!("{}", render_history(&view));
    Ok(())
}

pub(crate) fn render_analysis(outcome: &AnalysisOutcome, explain: bool) -> String {
    let result = &outcome.result;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Burnout score: {:.1}/100 ({} risk)",
        result.burnout_score, result.risk_level
    );
    let _ = writeln!(out, "{}", result.insights);
    if outcome.classifier_degraded {
        let _ = writeln!(out, "Note: emotion classifier unavailable; text was not scored.");
    }

    if !result.emotions.is_empty() {
        let _ = writeln!(out, "\nEmotions:");
        let mut emotions: Vec<(&str, f64)> = result.emotions.iter().collect();
        emotions.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        for (label, percentage) in emotions {
            let _ = writeln!(out, "  - {label}: {percentage:.1}%");
        }
    }

    if explain {
        let _ = writeln!(out, "\nScore breakdown (baseline 50):");
        for component in &outcome.components {
            let _ = writeln!(
                out,
                "  - {}: {:+.1} ({})",
                component.factor.label(),
                component.points,
                component.notes
            );
        }
        let _ = writeln!(out, "  = {:.1} before clamping", outcome.raw_score);
    }

    if result.recommendations.is_empty() {
        let _ = writeln!(out, "\nNo recommendations today. Keep it up.");
    } else {
        let _ = writeln!(out, "\nRecommendations:");
        for recommendation in &result.recommendations {
            let _ = writeln!(out, "  - {recommendation}");
        }
    }

    out
}

pub(crate) fn render_history(view: &HistoryView) -> String {
    let mut out = String::new();
    if view.entries.is_empty() {
        let _ = writeln!(out, "No journal entries recorded yet.");
        return out;
    }

    let _ = writeln!(out, "{} most recent entries", view.count);
    for entry in &view.entries {
        let _ = writeln!(
            out,
            "#{} {} | score {:.1} ({}) | sleep {}h | stress {}",
            entry.id,
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.burnout_score,
            entry.risk_level,
            entry.sleep_hours,
            entry.stress_level
        );
        if !entry.activities.is_empty() {
            let _ = writeln!(out, "    activities: {}", entry.activities.join(", "));
        }
        if let Some((label, percentage)) = entry.emotions.dominant() {
            let _ = writeln!(out, "    dominant emotion: {label} ({percentage:.1}%)");
        }
    }
    out
}
