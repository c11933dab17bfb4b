// Ceremony classifier CLI
// Reads transcripts from files, --text or stdin and prints JSON results.

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use validator::Validate;

use ceremony_core::text_extract::extract_text_from_path;
use ceremony_core::{AppError, CeremonyClassifier, ClassifierConfig};

/// Command-line arguments for ceremony-classify
#[derive(Parser, Debug)]
#[command(name = "ceremony-classify")]
#[command(about = "Classify agile meeting transcripts into ceremony types")]
#[command(version)]
struct Args {
    /// Transcript files (txt, md, vtt, srt, pdf, docx). Reads stdin when empty.
    files: Vec<PathBuf>,

    /// Classify this text instead of reading files
    #[arg(short, long, conflicts_with = "files")]
    text: Option<String>,

    /// Minimum score to name a Scrum ceremony (overrides CEREMONY_MIN_CONFIDENCE)
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Include the intermediate analysis layers in the output
    #[arg(long)]
    explain: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Emit logs as Bunyan JSON on stderr
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "ceremony_core=info".into());

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(
                "ceremony-classify".into(),
                io::stderr,
            ))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn load_config(args: &Args) -> Result<ClassifierConfig> {
    let mut config = ClassifierConfig::from_env().context("Invalid classifier configuration")?;
    if let Some(min_confidence) = args.min_confidence {
        config.min_confidence = min_confidence;
        config
            .validate()
            .context("Invalid --min-confidence value")?;
    }
    Ok(config)
}

/// Transcripts to classify, labelled by origin
fn read_inputs(args: &Args) -> Result<Vec<(String, String)>> {
    if let Some(text) = &args.text {
        return Ok(vec![("--text".to_string(), text.clone())]);
    }

    if args.files.is_empty() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read transcript from stdin")?;
        return Ok(vec![("stdin".to_string(), buffer)]);
    }

    args.files
        .iter()
        .map(|path| {
            let text = extract_text_from_path(path)
                .with_context(|| format!("Failed to read transcript {}", path.display()))?;
            Ok((path.to_string_lossy().to_string(), text))
        })
        .collect()
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, AppError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.json_logs);

    let config = load_config(&args)?;
    let classifier = CeremonyClassifier::with_config(config);

    let inputs = read_inputs(&args)?;
    if inputs.iter().all(|(_, text)| text.trim().is_empty()) {
        warn!("No transcript content provided");
    }

    let outputs: Vec<serde_json::Value> = inputs
        .iter()
        .map(|(source, text)| {
            info!("Classifying transcript from {}", source);
            if args.explain {
                serde_json::to_value(classifier.explain(text))
            } else {
                serde_json::to_value(classifier.classify(text))
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::from)
        .context("Failed to encode result")?;

    let rendered = match outputs.as_slice() {
        [single] => to_json(single, args.pretty)?,
        many => to_json(&many, args.pretty)?,
    };
    println!("{}", rendered);

    Ok(())
}
