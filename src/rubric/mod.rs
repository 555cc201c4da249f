pub(crate) mod defaults;
mod schema;
mod validation;

pub use defaults::SAMPLE_TRANSCRIPT;
pub use schema::{Band, Criterion, KeywordEntry, Metric, MetricKind, RubricSet, SalutationTier};
pub use validation::validate_rubric;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/introscore/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Could not determine home directory");
    home.join(".config").join("introscore")
}

/// Get the default rubric file path (~/.config/introscore/rubric.yaml)
pub fn get_rubric_path() -> PathBuf {
    get_config_dir().join("rubric.yaml")
}

/// Load a rubric from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to a rubric file. If None, the default path
///   (~/.config/introscore/rubric.yaml) is used when it exists, otherwise
///   the built-in rubric is returned.
///
/// # Errors
///
/// Returns an error if an explicitly given file does not exist, cannot be
/// read, or cannot be parsed.
pub fn load_rubric(path: Option<PathBuf>) -> Result<RubricSet> {
    let rubric_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Rubric file not found at {}", p.display());
            }
            p
        }
        None => {
            let default_path = get_rubric_path();
            if !default_path.exists() {
                return Ok(RubricSet::builtin());
            }
            default_path
        }
    };

    let content = fs::read_to_string(&rubric_path)
        .with_context(|| format!("Failed to read rubric file at {}", rubric_path.display()))?;

    parse_rubric(&content)
        .with_context(|| format!("Failed to parse rubric: invalid YAML in {}", rubric_path.display()))
}

/// Parse a rubric from YAML text.
pub fn parse_rubric(yaml: &str) -> Result<RubricSet> {
    let rubric: RubricSet = serde_saphyr::from_str(yaml)?;
    Ok(rubric)
}
