use serde::{Deserialize, Serialize};

/// The full weighted scoring rubric.
///
/// A rubric is an ordered list of criteria, each carrying a percentage
/// weight and a list of metrics. Loaded once at startup and shared
/// read-only across scoring calls.
///
/// Example YAML:
/// ```yaml
/// criteria:
///   - name: Speech Rate
///     weight: 100
///     metrics:
///       - name: Words Per Minute
///         max_score: 10
///         weight: 10
///         kind: words_per_minute
///         bands:
///           - { range: [111, 140], score: 10, level: Ideal }
///           - { range: [0, 110], score: 6, level: Slow }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RubricSet {
    pub criteria: Vec<Criterion>,
}

/// A top-level scored category (e.g. "Content & Structure").
///
/// `weight` is in percentage points; the overall score is only meaningful
/// when criterion weights sum to 100.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Criterion {
    pub name: String,
    pub weight: f64,
    pub metrics: Vec<Metric>,
}

/// A single measurable sub-score within a criterion.
///
/// The `kind` tag selects the scoring algorithm and its payload fields
/// are flattened alongside the common ones.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Metric {
    pub name: String,
    pub max_score: f64,
    #[serde(default)]
    pub weight: f64,
    #[serde(flatten)]
    pub kind: MetricKind,
}

/// Kind-specific metric configuration.
///
/// Adding a metric kind is a compile-time-checked exhaustive case: every
/// dispatch site matches on this enum. Unrecognized `kind` tags in config
/// deserialize to `Unknown`, which always scores 0.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricKind {
    /// Tiered greeting detection over the opening of the transcript, with
    /// an embedding-similarity fallback when no keyword tier matches.
    Salutation {
        #[serde(default)]
        tiers: Vec<SalutationTier>,
        #[serde(default = "crate::rubric::defaults::greeting_exemplars")]
        exemplars: Vec<String>,
    },
    /// Two keyword groups (must-have, good-to-have); each entry contributes
    /// its points when any synonym appears anywhere in the transcript.
    KeywordPresence {
        #[serde(default)]
        must_have: Vec<KeywordEntry>,
        #[serde(default)]
        good_to_have: Vec<KeywordEntry>,
    },
    /// Structural cues: opening salutation, early name, closing gratitude.
    Flow {
        #[serde(default = "crate::rubric::defaults::flow_openers")]
        openers: Vec<String>,
        #[serde(default = "crate::rubric::defaults::flow_name_markers")]
        name_markers: Vec<String>,
        #[serde(default = "crate::rubric::defaults::flow_closers")]
        closers: Vec<String>,
    },
    WordsPerMinute {
        bands: Vec<Band>,
    },
    Grammar {
        bands: Vec<Band>,
    },
    Vocabulary {
        bands: Vec<Band>,
    },
    FillerRate {
        fillers: Vec<String>,
        bands: Vec<Band>,
    },
    Sentiment {
        #[serde(default = "crate::rubric::defaults::positive_lexicon")]
        positive: Vec<String>,
        #[serde(default = "crate::rubric::defaults::negative_lexicon")]
        negative: Vec<String>,
        bands: Vec<Band>,
    },
    #[serde(other)]
    Unknown,
}

/// One row of a numeric threshold table.
///
/// Bounds are inclusive on both ends; tables are scanned in order and the
/// first containing band wins. A value outside every band scores 0.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Band {
    pub range: [f64; 2],
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl Band {
    pub fn contains(&self, value: f64) -> bool {
        self.range[0] <= value && value <= self.range[1]
    }
}

/// One salutation tier. Tiers are listed weakest-first in config; the
/// scorer checks them strongest-first so a weak match cannot shadow a
/// strong one.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SalutationTier {
    pub level: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub score: f64,
}

/// One keyword-presence entry: a label (e.g. "age") with its synonyms and
/// point value.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct KeywordEntry {
    pub label: String,
    pub keywords: Vec<String>,
    pub score: f64,
}
