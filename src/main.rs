use clap::Parser;
use std::io::Read;
use std::path::PathBuf;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_CONFIG: i32 = 2;
const EXIT_INFERENCE: i32 = 3;

#[derive(Parser, Debug)]
#[command(name = "introscore")]
#[command(about = "Score a spoken self-introduction transcript against a weighted rubric", long_about = None)]
#[command(version)]
struct Cli {
    /// Transcript text file to score ("-" reads stdin)
    transcript: Option<PathBuf>,

    /// Speech duration, e.g. "52s" or "1m 30s" (enables the WPM metric)
    #[arg(short, long)]
    duration: Option<String>,

    /// Path to a rubric YAML file (defaults to ~/.config/introscore/rubric.yaml,
    /// then the built-in rubric)
    #[arg(short, long)]
    rubric: Option<PathBuf>,

    /// Score the bundled sample transcript
    #[arg(long)]
    sample: bool,

    /// Print the effective rubric as JSON and exit
    #[arg(long)]
    dump_rubric: bool,

    /// Emit the scoring result as JSON instead of a report
    #[arg(long)]
    json: bool,

    /// Directory containing model.onnx and tokenizer.json, enabling the
    /// semantic salutation fallback
    #[cfg(feature = "onnx")]
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("introscore=debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    // Load rubric
    let rubric = match introscore::load_rubric(cli.rubric.clone()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Rubric error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate rubric at startup
    if let Err(errors) = introscore::validate_rubric(&rubric) {
        eprintln!("Rubric errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if cli.dump_rubric {
        match serde_json::to_string_pretty(&rubric) {
            Ok(json) => {
                println!("{}", json);
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Failed to serialize rubric: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    // Resolve transcript text
    let transcript = if cli.sample {
        introscore::rubric::SAMPLE_TRANSCRIPT.to_string()
    } else {
        match &cli.transcript {
            Some(path) if path.as_os_str() == "-" => {
                let mut text = String::new();
                if let Err(e) = std::io::stdin().read_to_string(&mut text) {
                    eprintln!("Failed to read transcript from stdin: {}", e);
                    std::process::exit(EXIT_INPUT);
                }
                text
            }
            Some(path) => match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("Failed to read transcript at {}: {}", path.display(), e);
                    std::process::exit(EXIT_INPUT);
                }
            },
            None => {
                eprintln!("No transcript provided. Pass a file path or use --sample.");
                std::process::exit(EXIT_INPUT);
            }
        }
    };

    let transcript = transcript.trim().to_string();
    if transcript.is_empty() {
        eprintln!("Transcript cannot be empty");
        std::process::exit(EXIT_INPUT);
    }

    let duration_seconds = match cli.duration.as_deref() {
        Some(text) => match parse_duration_secs(text) {
            Ok(secs) => Some(secs),
            Err(e) => {
                eprintln!("Invalid duration '{}': {}", text, e);
                std::process::exit(EXIT_INPUT);
            }
        },
        None => None,
    };

    let engine = build_engine(&cli, rubric);

    let result = match engine.score(&transcript, duration_seconds) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Scoring failed: {:#}", e);
            std::process::exit(EXIT_INFERENCE);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize result: {}", e);
                std::process::exit(EXIT_INPUT);
            }
        }
    } else {
        let use_colors = introscore::output::should_use_colors();
        println!("{}", introscore::output::format_report(&result, use_colors));
    }

    if cli.verbose {
        eprintln!();
        eprintln!(
            "Scored {} words across {} criteria",
            result.word_count,
            result.criteria_scores.len()
        );
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Accept either a bare number of seconds ("52") or a humantime string
/// ("52s", "1m 30s").
fn parse_duration_secs(text: &str) -> Result<f64, String> {
    if let Ok(secs) = text.parse::<f64>() {
        if secs.is_finite() && secs >= 0.0 {
            return Ok(secs);
        }
        return Err("duration must be a non-negative number of seconds".to_string());
    }
    humantime::parse_duration(text)
        .map(|d| d.as_secs_f64())
        .map_err(|e| e.to_string())
}

#[cfg(feature = "onnx")]
fn build_engine(cli: &Cli, rubric: introscore::RubricSet) -> introscore::ScoringEngine {
    match &cli.model_dir {
        Some(dir) => match introscore::embedding::OnnxEncoder::load(dir) {
            Ok(encoder) => {
                introscore::ScoringEngine::with_encoder(rubric, std::sync::Arc::new(encoder))
            }
            Err(e) => {
                eprintln!("Failed to load embedding model: {:#}", e);
                std::process::exit(EXIT_INFERENCE);
            }
        },
        None => introscore::ScoringEngine::new(rubric),
    }
}

#[cfg(not(feature = "onnx"))]
fn build_engine(_cli: &Cli, rubric: introscore::RubricSet) -> introscore::ScoringEngine {
    introscore::ScoringEngine::new(rubric)
}
