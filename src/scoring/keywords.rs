//! Keyword-based metric scorers: salutation tiers, keyword presence, and
//! flow structure.

use anyhow::{Context, Result};

use super::result::{KeywordHit, ScoreDetail, ScoreRecord};
use crate::embedding::{cosine_similarity, SentenceEncoder};
use crate::rubric::{KeywordEntry, SalutationTier};

/// The salutation keyword scan only looks at the opening of the speech.
const SALUTATION_WINDOW_CHARS: usize = 150;

/// Minimum cosine similarity for the semantic fallback to count as a
/// greeting.
const SEMANTIC_MATCH_THRESHOLD: f32 = 0.5;

/// Score the salutation tier of the transcript opening.
///
/// Tiers are checked strongest-first so a weak keyword cannot shadow a
/// strong one. When no tier matches and an encoder is available, the first
/// sentence is compared against canonical greeting exemplars by embedding
/// similarity ("Semantic Match"). Inference failures propagate so the
/// caller can retry or rescore without the fallback.
pub fn score_salutation(
    name: &str,
    max_score: f64,
    tiers: &[SalutationTier],
    exemplars: &[String],
    transcript: &str,
    encoder: Option<&dyn SentenceEncoder>,
) -> Result<ScoreRecord> {
    let window: String = transcript
        .chars()
        .take(SALUTATION_WINDOW_CHARS)
        .collect::<String>()
        .to_lowercase();

    let mut matched_level = "No Salutation".to_string();
    let mut score = 0.0;
    let mut keywords_found = Vec::new();

    for tier in tiers.iter().rev() {
        for keyword in &tier.keywords {
            if !keyword.is_empty() && window.contains(&keyword.to_lowercase()) {
                matched_level = tier.level.clone();
                score = tier.score;
                keywords_found.push(keyword.clone());
                break;
            }
        }
        if score > 0.0 {
            break;
        }
    }

    if score == 0.0 {
        if let Some(encoder) = encoder {
            let first_sentence = opening_sentence(transcript);
            if !first_sentence.trim().is_empty() && !exemplars.is_empty() {
                let mut texts = Vec::with_capacity(exemplars.len() + 1);
                texts.push(first_sentence.as_str());
                texts.extend(exemplars.iter().map(String::as_str));

                let vectors = encoder
                    .embed_batch(&texts)
                    .context("embedding inference failed during salutation fallback")?;

                if let Some((first, rest)) = vectors.split_first() {
                    let max_similarity = rest
                        .iter()
                        .map(|v| cosine_similarity(first, v))
                        .fold(0.0_f32, f32::max);

                    if max_similarity > SEMANTIC_MATCH_THRESHOLD {
                        score = (f64::from(max_similarity) * 5.0).round().min(5.0);
                        matched_level = "Semantic Match".to_string();
                    }
                }
            }
        }
    }

    Ok(ScoreRecord {
        metric: name.to_string(),
        score,
        max_score,
        detail: ScoreDetail::Salutation {
            level: matched_level.clone(),
            keywords_found,
        },
        feedback: format!("Salutation: {} (Score: {}/{})", matched_level, score, max_score),
    })
}

/// Text before the first period, or the first 100 characters when the
/// transcript has none.
fn opening_sentence(transcript: &str) -> String {
    match transcript.split_once('.') {
        Some((first, _)) => first.to_string(),
        None => transcript.chars().take(100).collect(),
    }
}

/// Score keyword presence across the whole transcript.
///
/// Each group entry contributes its full point value when any of its
/// synonyms appears anywhere (case-insensitive substring match).
pub fn score_keyword_presence(
    name: &str,
    max_score: f64,
    must_have: &[KeywordEntry],
    good_to_have: &[KeywordEntry],
    transcript_lower: &str,
) -> ScoreRecord {
    let mut score = 0.0;
    let mut keywords_found = Vec::new();

    for entry in must_have.iter().chain(good_to_have.iter()) {
        let matched: Vec<String> = entry
            .keywords
            .iter()
            .filter(|kw| transcript_lower.contains(&kw.to_lowercase()))
            .cloned()
            .collect();
        let found = !matched.is_empty();
        if found {
            score += entry.score;
        }
        keywords_found.push(KeywordHit {
            label: entry.label.clone(),
            found,
            matched,
            score: if found { entry.score } else { 0.0 },
        });
    }

    let found_count = keywords_found.iter().filter(|h| h.found).count();
    let total = keywords_found.len();

    ScoreRecord {
        metric: name.to_string(),
        score,
        max_score,
        detail: ScoreDetail::KeywordPresence { keywords_found },
        feedback: format!("Found {}/{} required elements", found_count, total),
    }
}

/// Score structural flow: opening salutation in the first sentence (+1),
/// a name marker in the first two (+2), a closing phrase in the last (+2),
/// clamped to the metric's max score.
pub fn score_flow(
    name: &str,
    max_score: f64,
    openers: &[String],
    name_markers: &[String],
    closers: &[String],
    sentences: &[&str],
) -> ScoreRecord {
    if sentences.is_empty() {
        return ScoreRecord {
            metric: name.to_string(),
            score: 0.0,
            max_score,
            detail: ScoreDetail::None {},
            feedback: String::new(),
        };
    }

    let mut flow_score: f64 = 0.0;
    let mut cues = Vec::new();

    let first = sentences[0].to_lowercase();
    if openers.iter().any(|w| first.contains(&w.to_lowercase())) {
        flow_score += 1.0;
        cues.push("Good opening salutation");
    }

    let first_two = sentences[..sentences.len().min(2)].join(" ").to_lowercase();
    if name_markers.iter().any(|w| first_two.contains(&w.to_lowercase())) {
        flow_score += 2.0;
        cues.push("Name introduced early");
    }

    let last = sentences[sentences.len() - 1].to_lowercase();
    if closers.iter().any(|w| last.contains(&w.to_lowercase())) {
        flow_score += 2.0;
        cues.push("Has proper closing");
    }

    let feedback = if cues.is_empty() {
        "Structure could be improved".to_string()
    } else {
        cues.join("; ")
    };

    ScoreRecord {
        metric: name.to_string(),
        score: flow_score.min(max_score),
        max_score,
        detail: ScoreDetail::None {},
        feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::testutil::{FailingEncoder, FakeEncoder};
    use crate::rubric::defaults::{flow_closers, flow_name_markers, flow_openers};

    fn tiers() -> Vec<SalutationTier> {
        vec![
            SalutationTier {
                level: "No Salutation".to_string(),
                keywords: vec![],
                score: 0.0,
            },
            SalutationTier {
                level: "Normal".to_string(),
                keywords: vec!["Hi".to_string(), "Hello".to_string()],
                score: 2.0,
            },
            SalutationTier {
                level: "Good".to_string(),
                keywords: vec!["Hello everyone".to_string()],
                score: 4.0,
            },
            SalutationTier {
                level: "Excellent".to_string(),
                keywords: vec!["excited".to_string(), "delighted".to_string()],
                score: 5.0,
            },
        ]
    }

    fn entries() -> (Vec<KeywordEntry>, Vec<KeywordEntry>) {
        let must = vec![
            KeywordEntry {
                label: "name".to_string(),
                keywords: vec!["name".to_string(), "myself".to_string(), "I am".to_string()],
                score: 4.0,
            },
            KeywordEntry {
                label: "age".to_string(),
                keywords: vec!["years old".to_string(), "age".to_string()],
                score: 4.0,
            },
        ];
        let good = vec![KeywordEntry {
            label: "origin".to_string(),
            keywords: vec!["from".to_string()],
            score: 2.0,
        }];
        (must, good)
    }

    #[test]
    fn test_salutation_strong_tier_checked_first() {
        // Both "Hello" (Normal) and "excited" (Excellent) appear; the
        // stronger tier must win.
        let record = score_salutation(
            "Salutation Level",
            5.0,
            &tiers(),
            &[],
            "Hello everyone, I am excited to be here.",
            None,
        )
        .unwrap();
        assert_eq!(record.score, 5.0);
        match record.detail {
            ScoreDetail::Salutation {
                ref level,
                ref keywords_found,
            } => {
                assert_eq!(level, "Excellent");
                assert_eq!(keywords_found, &vec!["excited".to_string()]);
            }
            _ => panic!("unexpected detail"),
        }
    }

    #[test]
    fn test_salutation_scan_window_limited() {
        let padding = "a ".repeat(100);
        let transcript = format!("{}Hello everyone", padding);
        let record =
            score_salutation("Salutation Level", 5.0, &tiers(), &[], &transcript, None).unwrap();
        assert_eq!(record.score, 0.0);
        match record.detail {
            ScoreDetail::Salutation { ref level, .. } => assert_eq!(level, "No Salutation"),
            _ => panic!("unexpected detail"),
        }
    }

    #[test]
    fn test_salutation_no_match_without_encoder() {
        let record = score_salutation(
            "Salutation Level",
            5.0,
            &tiers(),
            &["Hi, my name is".to_string()],
            "My name is Anna.",
            None,
        )
        .unwrap();
        assert_eq!(record.score, 0.0);
        assert!(record.feedback.contains("No Salutation"));
    }

    #[test]
    fn test_salutation_semantic_fallback_match() {
        // First sentence embeds close to an exemplar: cos = 0.8 -> round(4.0).
        let encoder = FakeEncoder::new(&[
            ("Greetings to all of you", &[0.8, 0.6]),
            ("Hi, my name is", &[1.0, 0.0]),
        ]);
        let record = score_salutation(
            "Salutation Level",
            5.0,
            &tiers(),
            &["Hi, my name is".to_string()],
            "Greetings to all of you. I study in class 8.",
            Some(&encoder),
        )
        .unwrap();
        assert_eq!(record.score, 4.0);
        match record.detail {
            ScoreDetail::Salutation {
                ref level,
                ref keywords_found,
            } => {
                assert_eq!(level, "Semantic Match");
                assert!(keywords_found.is_empty());
            }
            _ => panic!("unexpected detail"),
        }
    }

    #[test]
    fn test_salutation_semantic_fallback_below_threshold() {
        // cos = 0.28, under the 0.5 threshold.
        let encoder = FakeEncoder::new(&[
            ("My favorite subject is math", &[0.28, 0.96]),
            ("Hi, my name is", &[1.0, 0.0]),
        ]);
        let record = score_salutation(
            "Salutation Level",
            5.0,
            &tiers(),
            &["Hi, my name is".to_string()],
            "My favorite subject is math. I like it a lot.",
            Some(&encoder),
        )
        .unwrap();
        assert_eq!(record.score, 0.0);
    }

    #[test]
    fn test_salutation_keyword_match_skips_inference() {
        // A rule-based hit must never touch the encoder.
        let record = score_salutation(
            "Salutation Level",
            5.0,
            &tiers(),
            &["Hi, my name is".to_string()],
            "Hello everyone, myself Anna.",
            Some(&FailingEncoder),
        )
        .unwrap();
        assert_eq!(record.score, 4.0);
    }

    #[test]
    fn test_salutation_inference_error_propagates() {
        let err = score_salutation(
            "Salutation Level",
            5.0,
            &tiers(),
            &["Hi, my name is".to_string()],
            "My name is Anna.",
            Some(&FailingEncoder),
        )
        .unwrap_err();
        assert!(err.to_string().contains("salutation fallback"));
    }

    #[test]
    fn test_salutation_empty_transcript_degenerate() {
        let record = score_salutation(
            "Salutation Level",
            5.0,
            &tiers(),
            &["Hi, my name is".to_string()],
            "",
            Some(&FailingEncoder),
        )
        .unwrap();
        // Empty opening: fallback skipped entirely rather than erroring.
        assert_eq!(record.score, 0.0);
    }

    #[test]
    fn test_keyword_presence_synonym_independent() {
        let (must, good) = entries();
        let a = score_keyword_presence(
            "Keyword Presence",
            10.0,
            &must,
            &good,
            "hello, myself anna",
        );
        let b = score_keyword_presence(
            "Keyword Presence",
            10.0,
            &must,
            &good,
            "hello, i am anna",
        );
        assert_eq!(a.score, 4.0);
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn test_keyword_presence_sums_groups() {
        let (must, good) = entries();
        let record = score_keyword_presence(
            "Keyword Presence",
            10.0,
            &must,
            &good,
            "i am anna, 13 years old, from abc school",
        );
        // name (4) + age (4) + origin (2).
        assert_eq!(record.score, 10.0);
        assert_eq!(record.feedback, "Found 3/3 required elements");
        match record.detail {
            ScoreDetail::KeywordPresence { ref keywords_found } => {
                assert!(keywords_found.iter().all(|h| h.found));
                assert_eq!(keywords_found[1].matched, vec!["years old".to_string()]);
            }
            _ => panic!("unexpected detail"),
        }
    }

    #[test]
    fn test_keyword_presence_unmatched_entries_reported() {
        let (must, good) = entries();
        let record = score_keyword_presence("Keyword Presence", 10.0, &must, &good, "hello there");
        assert_eq!(record.score, 0.0);
        assert_eq!(record.feedback, "Found 0/3 required elements");
    }

    #[test]
    fn test_flow_full_structure() {
        let sentences = vec![
            "Hello everyone, myself Anna",
            "I am 13 years old",
            "Thank you for listening",
        ];
        let record = score_flow(
            "Flow",
            5.0,
            &flow_openers(),
            &flow_name_markers(),
            &flow_closers(),
            &sentences,
        );
        assert_eq!(record.score, 5.0);
        assert_eq!(
            record.feedback,
            "Good opening salutation; Name introduced early; Has proper closing"
        );
    }

    #[test]
    fn test_flow_no_sentences_scores_zero() {
        let record = score_flow(
            "Flow",
            5.0,
            &flow_openers(),
            &flow_name_markers(),
            &flow_closers(),
            &[],
        );
        assert_eq!(record.score, 0.0);
        assert_eq!(record.feedback, "");
    }

    #[test]
    fn test_flow_clamped_to_max_score() {
        let sentences = vec!["Hello, myself Anna, thank you"];
        // Single sentence hits all three cues (it is also the last one).
        let record = score_flow(
            "Flow",
            3.0,
            &flow_openers(),
            &flow_name_markers(),
            &flow_closers(),
            &sentences,
        );
        assert_eq!(record.score, 3.0);
    }

    #[test]
    fn test_flow_missing_cues_feedback() {
        let sentences = vec!["My favorite color is blue"];
        let record = score_flow(
            "Flow",
            5.0,
            &flow_openers(),
            &flow_name_markers(),
            &flow_closers(),
            &sentences,
        );
        assert_eq!(record.score, 0.0);
        assert_eq!(record.feedback, "Structure could be improved");
    }
}
