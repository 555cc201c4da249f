use std::io::IsTerminal;

use owo_colors::OwoColorize;

use crate::scoring::{CriterionResult, ScoreRecord, ScoringResult};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a full scoring result as a multi-line breakdown report.
pub fn format_report(result: &ScoringResult, use_colors: bool) -> String {
    let mut lines = Vec::new();

    if use_colors {
        lines.push(format!(
            "{} {}",
            "Overall Score:".bold(),
            colorize_overall(result.overall_score)
        ));
    } else {
        lines.push(format!("Overall Score: {}/100", fmt_num(result.overall_score)));
    }
    lines.push(format!("Word Count: {}", result.word_count));
    if let Some(wpm) = result.metadata.wpm {
        lines.push(format!("Words Per Minute: {:.2}", wpm));
    }

    for criterion in &result.criteria_scores {
        lines.push(String::new());
        lines.push(format_criterion_line(criterion, use_colors));
        for metric in &criterion.metrics {
            lines.push(format_metric_line(metric, use_colors));
        }
    }

    lines.join("\n")
}

fn format_criterion_line(criterion: &CriterionResult, use_colors: bool) -> String {
    if use_colors {
        format!(
            "{}: {}/{} (raw {}/{})",
            criterion.criterion.bold(),
            fmt_num(criterion.weighted_score).cyan(),
            fmt_num(criterion.weight),
            fmt_num(criterion.score),
            fmt_num(criterion.max_score)
        )
    } else {
        format!(
            "{}: {}/{} (raw {}/{})",
            criterion.criterion,
            fmt_num(criterion.weighted_score),
            fmt_num(criterion.weight),
            fmt_num(criterion.score),
            fmt_num(criterion.max_score)
        )
    }
}

fn format_metric_line(metric: &ScoreRecord, use_colors: bool) -> String {
    if use_colors {
        format!(
            "  - {}: {}/{}  {}",
            metric.metric,
            fmt_num(metric.score).yellow(),
            fmt_num(metric.max_score),
            metric.feedback
        )
    } else {
        format!(
            "  - {}: {}/{}  {}",
            metric.metric,
            fmt_num(metric.score),
            fmt_num(metric.max_score),
            metric.feedback
        )
    }
}

fn colorize_overall(score: f64) -> String {
    let text = format!("{}/100", fmt_num(score));
    if score >= 80.0 {
        text.green().to_string()
    } else if score >= 60.0 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

/// Trim trailing zeros from whole-number scores (73.0 -> "73", 27.5 -> "27.5")
fn fmt_num(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
