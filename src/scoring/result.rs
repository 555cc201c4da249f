use serde::Serialize;

/// Top-level scoring result, returned once per invocation.
///
/// Serializes to the JSON shape consumed by report and API collaborators:
/// `overall_score`, `word_count`, `metadata`, `criteria_scores[]`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoringResult {
    pub overall_score: f64,
    pub word_count: usize,
    pub metadata: Metadata,
    pub criteria_scores: Vec<CriterionResult>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Metadata {
    pub wpm: Option<f64>,
    pub duration_seconds: Option<f64>,
}

/// Per-criterion weighted result.
///
/// `weighted_score = (score / max_score) * weight`, guarded to 0 when the
/// metric max sum is 0.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CriterionResult {
    pub criterion: String,
    pub weight: f64,
    pub score: f64,
    pub max_score: f64,
    pub weighted_score: f64,
    pub metrics: Vec<ScoreRecord>,
}

/// Metric-level result: score, kind-specific diagnostics, and a feedback
/// string suitable for direct display.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoreRecord {
    pub metric: String,
    pub score: f64,
    pub max_score: f64,
    #[serde(flatten)]
    pub detail: ScoreDetail,
    pub feedback: String,
}

/// Kind-specific diagnostic fields, flattened into the record on
/// serialization.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ScoreDetail {
    Salutation {
        level: String,
        keywords_found: Vec<String>,
    },
    KeywordPresence {
        keywords_found: Vec<KeywordHit>,
    },
    WordsPerMinute {
        wpm: Option<f64>,
        level: String,
    },
    Grammar {
        errors: usize,
        errors_per_100: f64,
        grammar_value: f64,
    },
    Vocabulary {
        ttr: f64,
        unique_words: usize,
        total_words: usize,
    },
    FillerRate {
        filler_count: usize,
        filler_rate: f64,
        found_fillers: Vec<String>,
    },
    Sentiment {
        sentiment_value: f64,
        positive_words: usize,
        negative_words: usize,
    },
    None {},
}

/// One keyword-presence group entry outcome.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KeywordHit {
    pub label: String,
    pub found: bool,
    pub matched: Vec<String>,
    pub score: f64,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
