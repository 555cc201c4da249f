use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use super::result::{round2, CriterionResult, Metadata, ScoreDetail, ScoreRecord, ScoringResult};
use super::{keywords, rates};
use crate::embedding::SentenceEncoder;
use crate::rubric::{Metric, MetricKind, RubricSet};

/// Signals computed once per scoring call and shared by every scorer.
struct Signals<'a> {
    transcript: &'a str,
    transcript_lower: String,
    words_lower: Vec<String>,
    word_count: usize,
    wpm: Option<f64>,
    sentences: Vec<&'a str>,
}

impl<'a> Signals<'a> {
    fn compute(transcript: &'a str, duration_seconds: Option<f64>) -> Self {
        let words_lower: Vec<String> = transcript
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        let word_count = words_lower.len();
        let wpm = duration_seconds.and_then(|d| {
            if d > 0.0 {
                Some(word_count as f64 / d * 60.0)
            } else {
                None
            }
        });
        let sentences: Vec<&str> = transcript
            .split(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        Signals {
            transcript,
            transcript_lower: transcript.to_lowercase(),
            words_lower,
            word_count,
            wpm,
            sentences,
        }
    }
}

/// The rubric-driven scoring engine.
///
/// Holds a read-only rubric and an optional injected embedding backend for
/// the salutation semantic fallback. Scoring is a pure synchronous
/// computation; the engine can be shared across threads.
pub struct ScoringEngine {
    rubric: RubricSet,
    encoder: Option<Arc<dyn SentenceEncoder>>,
}

impl ScoringEngine {
    pub fn new(rubric: RubricSet) -> Self {
        ScoringEngine {
            rubric,
            encoder: None,
        }
    }

    pub fn with_encoder(rubric: RubricSet, encoder: Arc<dyn SentenceEncoder>) -> Self {
        ScoringEngine {
            rubric,
            encoder: Some(encoder),
        }
    }

    pub fn rubric(&self) -> &RubricSet {
        &self.rubric
    }

    /// Score a transcript against the rubric.
    ///
    /// `duration_seconds` enables the words-per-minute metric; without it
    /// that metric scores 0 with explanatory feedback. Degenerate inputs
    /// (empty text, no sentences) produce floor scores, never errors. The
    /// only error source is embedding inference in the salutation
    /// fallback; on failure the caller may retry, or rescore with an
    /// engine built by [`ScoringEngine::new`] to skip the fallback.
    pub fn score(
        &self,
        transcript: &str,
        duration_seconds: Option<f64>,
    ) -> Result<ScoringResult> {
        let signals = Signals::compute(transcript, duration_seconds);
        debug!(
            word_count = signals.word_count,
            sentences = signals.sentences.len(),
            wpm = ?signals.wpm,
            "scoring transcript"
        );

        let mut criteria_scores = Vec::with_capacity(self.rubric.criteria.len());
        let mut overall = 0.0;

        for criterion in &self.rubric.criteria {
            let mut metrics = Vec::with_capacity(criterion.metrics.len());
            let mut raw = 0.0;
            let mut raw_max = 0.0;

            for metric in &criterion.metrics {
                let record = self.score_metric(metric, &signals)?;
                raw += record.score;
                raw_max += metric.max_score;
                metrics.push(record);
            }

            let weighted = if raw_max > 0.0 {
                round2(raw / raw_max * criterion.weight)
            } else {
                0.0
            };
            overall += weighted;

            criteria_scores.push(CriterionResult {
                criterion: criterion.name.clone(),
                weight: criterion.weight,
                score: round2(raw),
                max_score: raw_max,
                weighted_score: weighted,
                metrics,
            });
        }

        Ok(ScoringResult {
            overall_score: round2(overall),
            word_count: signals.word_count,
            metadata: Metadata {
                wpm: signals.wpm,
                duration_seconds,
            },
            criteria_scores,
        })
    }

    fn score_metric(&self, metric: &Metric, signals: &Signals) -> Result<ScoreRecord> {
        let record = match &metric.kind {
            MetricKind::Salutation { tiers, exemplars } => keywords::score_salutation(
                &metric.name,
                metric.max_score,
                tiers,
                exemplars,
                signals.transcript,
                self.encoder.as_deref(),
            )?,
            MetricKind::KeywordPresence {
                must_have,
                good_to_have,
            } => keywords::score_keyword_presence(
                &metric.name,
                metric.max_score,
                must_have,
                good_to_have,
                &signals.transcript_lower,
            ),
            MetricKind::Flow {
                openers,
                name_markers,
                closers,
            } => keywords::score_flow(
                &metric.name,
                metric.max_score,
                openers,
                name_markers,
                closers,
                &signals.sentences,
            ),
            MetricKind::WordsPerMinute { bands } => rates::score_words_per_minute(
                &metric.name,
                metric.max_score,
                bands,
                signals.wpm,
            ),
            MetricKind::Grammar { bands } => rates::score_grammar(
                &metric.name,
                metric.max_score,
                bands,
                &signals.sentences,
                signals.word_count,
            ),
            MetricKind::Vocabulary { bands } => rates::score_vocabulary(
                &metric.name,
                metric.max_score,
                bands,
                &signals.words_lower,
            ),
            MetricKind::FillerRate { fillers, bands } => rates::score_filler_rate(
                &metric.name,
                metric.max_score,
                fillers,
                bands,
                &signals.transcript_lower,
                signals.word_count,
            ),
            MetricKind::Sentiment {
                positive,
                negative,
                bands,
            } => rates::score_sentiment(
                &metric.name,
                metric.max_score,
                positive,
                negative,
                bands,
                &signals.words_lower,
            ),
            MetricKind::Unknown => ScoreRecord {
                metric: metric.name.clone(),
                score: 0.0,
                max_score: metric.max_score,
                detail: ScoreDetail::None {},
                feedback: "Unknown metric".to_string(),
            },
        };
        Ok(record)
    }
}
