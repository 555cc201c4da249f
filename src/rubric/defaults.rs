//! Compiled-in default rubric for scoring spoken self-introductions.
//!
//! Used when no rubric file is present, and as the source of the
//! per-kind keyword/lexicon defaults that partial rubric files fall
//! back to.

use super::schema::{Band, Criterion, KeywordEntry, Metric, MetricKind, RubricSet, SalutationTier};

/// Bundled sample self-introduction for zero-setup demos.
pub const SAMPLE_TRANSCRIPT: &str = "Good morning everyone, I am excited to introduce myself. \
My name is Riya and I am twelve years old, studying in class 7 at Green Valley School. \
I live with my parents and my little brother, who are very kind and supportive. \
I love painting and I enjoy playing badminton with my friends. \
My dream is to become a doctor and help people. Thank you for listening.";

fn strs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn greeting_exemplars() -> Vec<String> {
    strs(&[
        "Hello everyone, I am happy to introduce myself",
        "Good morning, I am excited to be here",
        "Hi, my name is",
    ])
}

pub(crate) fn flow_openers() -> Vec<String> {
    strs(&["hello", "hi", "good", "greetings"])
}

pub(crate) fn flow_name_markers() -> Vec<String> {
    strs(&["name", "myself", "i am", "i'm"])
}

pub(crate) fn flow_closers() -> Vec<String> {
    strs(&["thank", "thanks", "pleasure", "nice"])
}

pub(crate) fn positive_lexicon() -> Vec<String> {
    strs(&[
        "good",
        "great",
        "excellent",
        "wonderful",
        "amazing",
        "love",
        "enjoy",
        "excited",
        "happy",
        "blessed",
        "grateful",
        "fortunate",
        "delighted",
        "passionate",
        "enthusiastic",
        "interested",
        "fascinating",
        "beautiful",
    ])
}

pub(crate) fn negative_lexicon() -> Vec<String> {
    strs(&[
        "bad",
        "terrible",
        "awful",
        "hate",
        "dislike",
        "boring",
        "sad",
        "difficult",
        "hard",
        "struggle",
        "problem",
        "unfortunately",
    ])
}

fn band(lo: f64, hi: f64, score: f64) -> Band {
    Band {
        range: [lo, hi],
        score,
        level: None,
    }
}

fn leveled_band(lo: f64, hi: f64, score: f64, level: &str) -> Band {
    Band {
        range: [lo, hi],
        score,
        level: Some(level.to_string()),
    }
}

/// The standard five-point quality ladder shared by the grammar,
/// vocabulary, and sentiment tables.
fn quality_bands(scores: [f64; 5]) -> Vec<Band> {
    vec![
        band(0.9, 1.0, scores[0]),
        band(0.7, 0.89, scores[1]),
        band(0.5, 0.69, scores[2]),
        band(0.3, 0.49, scores[3]),
        band(0.0, 0.29, scores[4]),
    ]
}

impl RubricSet {
    /// The built-in self-introduction rubric: five criteria weighted to
    /// sum to 100.
    pub fn builtin() -> Self {
        RubricSet {
            criteria: vec![
                Criterion {
                    name: "Content & Structure".to_string(),
                    weight: 40.0,
                    metrics: vec![
                        Metric {
                            name: "Salutation Level".to_string(),
                            max_score: 5.0,
                            weight: 5.0,
                            kind: MetricKind::Salutation {
                                tiers: vec![
                                    SalutationTier {
                                        level: "No Salutation".to_string(),
                                        keywords: vec![],
                                        score: 0.0,
                                    },
                                    SalutationTier {
                                        level: "Normal".to_string(),
                                        keywords: strs(&["Hi", "Hello"]),
                                        score: 2.0,
                                    },
                                    SalutationTier {
                                        level: "Good".to_string(),
                                        keywords: strs(&[
                                            "Good Morning",
                                            "Good Afternoon",
                                            "Good Evening",
                                            "Good Day",
                                            "Hello everyone",
                                        ]),
                                        score: 4.0,
                                    },
                                    SalutationTier {
                                        level: "Excellent".to_string(),
                                        keywords: strs(&[
                                            "I am excited to introduce",
                                            "Feeling great",
                                            "excited",
                                            "pleasure",
                                            "delighted",
                                        ]),
                                        score: 5.0,
                                    },
                                ],
                                exemplars: greeting_exemplars(),
                            },
                        },
                        Metric {
                            name: "Keyword Presence".to_string(),
                            max_score: 30.0,
                            weight: 30.0,
                            kind: MetricKind::KeywordPresence {
                                must_have: vec![
                                    KeywordEntry {
                                        label: "name".to_string(),
                                        keywords: strs(&["name", "myself", "I am", "I'm"]),
                                        score: 4.0,
                                    },
                                    KeywordEntry {
                                        label: "age".to_string(),
                                        keywords: strs(&["year", "years old", "age"]),
                                        score: 4.0,
                                    },
                                    KeywordEntry {
                                        label: "school/class".to_string(),
                                        keywords: strs(&["school", "class", "grade", "studying"]),
                                        score: 4.0,
                                    },
                                    KeywordEntry {
                                        label: "family".to_string(),
                                        keywords: strs(&[
                                            "family", "mother", "father", "brother", "sister",
                                            "parents",
                                        ]),
                                        score: 4.0,
                                    },
                                    KeywordEntry {
                                        label: "hobbies".to_string(),
                                        keywords: strs(&[
                                            "hobby", "hobbies", "like", "enjoy", "love", "play",
                                            "playing", "interest",
                                        ]),
                                        score: 4.0,
                                    },
                                ],
                                good_to_have: vec![
                                    KeywordEntry {
                                        label: "about_family".to_string(),
                                        keywords: strs(&["kind", "loving", "caring", "supportive"]),
                                        score: 2.0,
                                    },
                                    KeywordEntry {
                                        label: "origin".to_string(),
                                        keywords: strs(&["from", "belong", "native"]),
                                        score: 2.0,
                                    },
                                    KeywordEntry {
                                        label: "ambition".to_string(),
                                        keywords: strs(&[
                                            "goal",
                                            "dream",
                                            "ambition",
                                            "want to be",
                                            "aspire",
                                        ]),
                                        score: 2.0,
                                    },
                                    KeywordEntry {
                                        label: "unique_fact".to_string(),
                                        keywords: strs(&[
                                            "fun fact",
                                            "interesting",
                                            "unique",
                                            "special",
                                        ]),
                                        score: 2.0,
                                    },
                                    KeywordEntry {
                                        label: "achievements".to_string(),
                                        keywords: strs(&[
                                            "achievement",
                                            "strength",
                                            "good at",
                                            "excel",
                                        ]),
                                        score: 2.0,
                                    },
                                ],
                            },
                        },
                        Metric {
                            name: "Flow".to_string(),
                            max_score: 5.0,
                            weight: 5.0,
                            kind: MetricKind::Flow {
                                openers: flow_openers(),
                                name_markers: flow_name_markers(),
                                closers: flow_closers(),
                            },
                        },
                    ],
                },
                Criterion {
                    name: "Speech Rate".to_string(),
                    weight: 10.0,
                    metrics: vec![Metric {
                        name: "Words Per Minute".to_string(),
                        max_score: 10.0,
                        weight: 10.0,
                        kind: MetricKind::WordsPerMinute {
                            bands: vec![
                                leveled_band(161.0, 9999.0, 2.0, "Too Fast"),
                                leveled_band(141.0, 160.0, 6.0, "Fast"),
                                leveled_band(111.0, 140.0, 10.0, "Ideal"),
                                leveled_band(81.0, 110.0, 6.0, "Slow"),
                                leveled_band(0.0, 80.0, 2.0, "Too Slow"),
                            ],
                        },
                    }],
                },
                Criterion {
                    name: "Language & Grammar".to_string(),
                    weight: 20.0,
                    metrics: vec![
                        Metric {
                            name: "Grammar Score".to_string(),
                            max_score: 10.0,
                            weight: 10.0,
                            kind: MetricKind::Grammar {
                                bands: quality_bands([10.0, 8.0, 6.0, 4.0, 2.0]),
                            },
                        },
                        Metric {
                            name: "Vocabulary Richness".to_string(),
                            max_score: 10.0,
                            weight: 10.0,
                            kind: MetricKind::Vocabulary {
                                bands: quality_bands([10.0, 8.0, 6.0, 4.0, 2.0]),
                            },
                        },
                    ],
                },
                Criterion {
                    name: "Clarity".to_string(),
                    weight: 15.0,
                    metrics: vec![Metric {
                        name: "Filler Word Rate".to_string(),
                        max_score: 15.0,
                        weight: 15.0,
                        kind: MetricKind::FillerRate {
                            fillers: strs(&[
                                "um", "uh", "like", "you know", "so", "actually", "basically",
                                "right", "i mean", "well", "kinda", "sort of", "okay", "hmm", "ah",
                            ]),
                            bands: vec![
                                band(0.0, 3.0, 15.0),
                                band(4.0, 6.0, 12.0),
                                band(7.0, 9.0, 9.0),
                                band(10.0, 12.0, 6.0),
                                band(13.0, 999.0, 3.0),
                            ],
                        },
                    }],
                },
                Criterion {
                    name: "Engagement".to_string(),
                    weight: 15.0,
                    metrics: vec![Metric {
                        name: "Sentiment/Positivity".to_string(),
                        max_score: 15.0,
                        weight: 15.0,
                        kind: MetricKind::Sentiment {
                            positive: positive_lexicon(),
                            negative: negative_lexicon(),
                            bands: quality_bands([15.0, 12.0, 9.0, 6.0, 3.0]),
                        },
                    }],
                },
            ],
        }
    }
}
