use super::schema::{Band, MetricKind, RubricSet};

/// Validate a rubric at startup.
/// Returns all validation errors at once (not just the first).
///
/// Criterion weights are expected to sum to 100 but a mismatch is only
/// warned about, so experimental partial rubrics still load.
pub fn validate_rubric(rubric: &RubricSet) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if rubric.criteria.is_empty() {
        errors.push("rubric.criteria: must not be empty".to_string());
    }

    let weight_sum: f64 = rubric.criteria.iter().map(|c| c.weight).sum();
    if (weight_sum - 100.0).abs() > 1e-6 {
        tracing::warn!(
            weight_sum,
            "criterion weights do not sum to 100; the overall score will not span 0-100"
        );
    }

    for (ci, criterion) in rubric.criteria.iter().enumerate() {
        if criterion.weight < 0.0 {
            errors.push(format!(
                "rubric.criteria[{}].weight: must be non-negative, got {}",
                ci, criterion.weight
            ));
        }

        for (mi, metric) in criterion.metrics.iter().enumerate() {
            let path = format!("rubric.criteria[{}].metrics[{}]", ci, mi);

            if metric.max_score <= 0.0 {
                errors.push(format!(
                    "{}.max_score: must be positive, got {}",
                    path, metric.max_score
                ));
            }

            match &metric.kind {
                MetricKind::Salutation { tiers, .. } => {
                    for (ti, tier) in tiers.iter().enumerate() {
                        if tier.score < 0.0 || tier.score > metric.max_score {
                            errors.push(format!(
                                "{}.tiers[{}].score: {} outside [0, {}]",
                                path, ti, tier.score, metric.max_score
                            ));
                        }
                    }
                }
                MetricKind::KeywordPresence {
                    must_have,
                    good_to_have,
                } => {
                    let total: f64 = must_have
                        .iter()
                        .chain(good_to_have.iter())
                        .map(|e| e.score)
                        .sum();
                    if total > metric.max_score {
                        errors.push(format!(
                            "{}: keyword points sum to {} which exceeds max_score {}",
                            path, total, metric.max_score
                        ));
                    }
                }
                MetricKind::Flow { .. } => {}
                MetricKind::WordsPerMinute { bands }
                | MetricKind::Grammar { bands }
                | MetricKind::Vocabulary { bands }
                | MetricKind::FillerRate { bands, .. }
                | MetricKind::Sentiment { bands, .. } => {
                    validate_bands(&path, bands, metric.max_score, &mut errors);
                }
                MetricKind::Unknown => {
                    tracing::warn!(
                        metric = %metric.name,
                        "unrecognized metric kind; it will always score 0"
                    );
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_bands(path: &str, bands: &[Band], max_score: f64, errors: &mut Vec<String>) {
    if bands.is_empty() {
        errors.push(format!("{}.bands: must not be empty", path));
        return;
    }

    for (bi, band) in bands.iter().enumerate() {
        if band.range[0] > band.range[1] {
            errors.push(format!(
                "{}.bands[{}].range: lower bound {} exceeds upper bound {}",
                path, bi, band.range[0], band.range[1]
            ));
        }
        if band.score < 0.0 || band.score > max_score {
            errors.push(format!(
                "{}.bands[{}].score: {} outside [0, {}]",
                path, bi, band.score, max_score
            ));
        }
    }

    // Ranges within one table must not overlap; first-match-wins only has
    // a deterministic meaning when the bands are disjoint.
    for i in 0..bands.len() {
        for j in (i + 1)..bands.len() {
            let (a, b) = (&bands[i], &bands[j]);
            if a.range[0].max(b.range[0]) <= a.range[1].min(b.range[1]) {
                errors.push(format!(
                    "{}.bands: ranges [{}, {}] and [{}, {}] overlap",
                    path, a.range[0], a.range[1], b.range[0], b.range[1]
                ));
            }
        }
    }
}
