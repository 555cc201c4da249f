//! Numeric-threshold metric scorers.
//!
//! All five share one algorithm shape: compute a continuous value, then
//! scan the metric's ordered band table and take the score of the first
//! band containing it. A value outside every band scores 0.

use std::collections::HashSet;

use super::result::{round2, round3, ScoreDetail, ScoreRecord};
use crate::rubric::Band;

/// First band containing `value` wins.
fn match_band(bands: &[Band], value: f64) -> Option<&Band> {
    bands.iter().find(|b| b.contains(value))
}

fn band_score(bands: &[Band], value: f64) -> f64 {
    match_band(bands, value).map(|b| b.score).unwrap_or(0.0)
}

pub fn score_words_per_minute(
    name: &str,
    max_score: f64,
    bands: &[Band],
    wpm: Option<f64>,
) -> ScoreRecord {
    let Some(wpm) = wpm else {
        return ScoreRecord {
            metric: name.to_string(),
            score: 0.0,
            max_score,
            detail: ScoreDetail::WordsPerMinute {
                wpm: None,
                level: "Unknown".to_string(),
            },
            feedback: "Duration not provided, cannot calculate WPM".to_string(),
        };
    };

    let matched = match_band(bands, wpm);
    let score = matched.map(|b| b.score).unwrap_or(0.0);
    let level = matched
        .and_then(|b| b.level.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    ScoreRecord {
        metric: name.to_string(),
        score,
        max_score,
        detail: ScoreDetail::WordsPerMinute {
            wpm: Some(round2(wpm)),
            level: level.clone(),
        },
        feedback: format!("Speech rate: {} WPM ({})", round2(wpm), level),
    }
}

/// Heuristic grammar scoring, not a linguistic parser: counts sentences
/// that do not start with an uppercase letter, plus standalone lowercase
/// "i". `value = max(0, 1 - min(errors_per_100 / 10, 1))`.
pub fn score_grammar(
    name: &str,
    max_score: f64,
    bands: &[Band],
    sentences: &[&str],
    word_count: usize,
) -> ScoreRecord {
    let mut errors = 0usize;

    for sentence in sentences {
        if let Some(first) = sentence.chars().next() {
            if !first.is_uppercase() {
                errors += 1;
            }
        }
        if sentence.to_lowercase().contains(" i ") && !sentence.contains(" I ") {
            errors += 1;
        }
    }

    let errors_per_100 = if word_count > 0 {
        errors as f64 / word_count as f64 * 100.0
    } else {
        0.0
    };
    let grammar_value = (1.0 - (errors_per_100 / 10.0).min(1.0)).max(0.0);

    ScoreRecord {
        metric: name.to_string(),
        score: band_score(bands, grammar_value),
        max_score,
        detail: ScoreDetail::Grammar {
            errors,
            errors_per_100: round2(errors_per_100),
            grammar_value: round3(grammar_value),
        },
        feedback: format!(
            "Grammar quality: {:.1}% ({} errors detected)",
            grammar_value * 100.0,
            errors
        ),
    }
}

/// Vocabulary richness as type-token ratio over case-folded words.
pub fn score_vocabulary(
    name: &str,
    max_score: f64,
    bands: &[Band],
    words_lower: &[String],
) -> ScoreRecord {
    let unique: HashSet<&str> = words_lower.iter().map(String::as_str).collect();
    let total = words_lower.len();
    let ttr = if total > 0 {
        unique.len() as f64 / total as f64
    } else {
        0.0
    };

    ScoreRecord {
        metric: name.to_string(),
        score: band_score(bands, ttr),
        max_score,
        detail: ScoreDetail::Vocabulary {
            ttr: round3(ttr),
            unique_words: unique.len(),
            total_words: total,
        },
        feedback: format!(
            "Vocabulary diversity: TTR = {} ({} unique words)",
            round3(ttr),
            unique.len()
        ),
    }
}

/// Filler phrases are matched space-delimited (mid-text, comma-adjacent,
/// and sentence-initial occurrences). Note the band table here reads
/// "lower is better", unlike the other rate metrics.
pub fn score_filler_rate(
    name: &str,
    max_score: f64,
    fillers: &[String],
    bands: &[Band],
    transcript_lower: &str,
    word_count: usize,
) -> ScoreRecord {
    let mut filler_count = 0usize;
    let mut found_fillers = Vec::new();

    for filler in fillers {
        let mut count = transcript_lower.matches(&format!(" {} ", filler)).count()
            + transcript_lower.matches(&format!(" {},", filler)).count();
        if transcript_lower.starts_with(&format!("{} ", filler)) {
            count += 1;
        }
        if count > 0 {
            filler_count += count;
            found_fillers.push(format!("{}({})", filler, count));
        }
    }

    let filler_rate = if word_count > 0 {
        filler_count as f64 / word_count as f64 * 100.0
    } else {
        0.0
    };

    ScoreRecord {
        metric: name.to_string(),
        score: band_score(bands, filler_rate),
        max_score,
        detail: ScoreDetail::FillerRate {
            filler_count,
            filler_rate: round2(filler_rate),
            found_fillers,
        },
        feedback: format!(
            "Filler word rate: {}% ({} fillers found)",
            round2(filler_rate),
            filler_count
        ),
    }
}

/// Bag-of-words sentiment: `value = positive / (positive + negative)`,
/// neutral 0.5 when no lexicon words are found. Any positive hit adds a
/// +0.2 bias, capped at 1.0 (documented scoring behavior, preserved
/// exactly).
pub fn score_sentiment(
    name: &str,
    max_score: f64,
    positive: &[String],
    negative: &[String],
    bands: &[Band],
    words_lower: &[String],
) -> ScoreRecord {
    let positive_set: HashSet<&str> = positive.iter().map(String::as_str).collect();
    let negative_set: HashSet<&str> = negative.iter().map(String::as_str).collect();

    let positive_count = words_lower
        .iter()
        .filter(|w| positive_set.contains(w.as_str()))
        .count();
    let negative_count = words_lower
        .iter()
        .filter(|w| negative_set.contains(w.as_str()))
        .count();

    let total = positive_count + negative_count;
    let mut sentiment_value = if total > 0 {
        positive_count as f64 / total as f64
    } else {
        0.5
    };
    if positive_count > 0 {
        sentiment_value = (sentiment_value + 0.2).min(1.0);
    }

    ScoreRecord {
        metric: name.to_string(),
        score: band_score(bands, sentiment_value),
        max_score,
        detail: ScoreDetail::Sentiment {
            sentiment_value: round3(sentiment_value),
            positive_words: positive_count,
            negative_words: negative_count,
        },
        feedback: format!(
            "Sentiment: {:.1}% positive ({} positive words)",
            sentiment_value * 100.0,
            positive_count
        ),
    }
}
