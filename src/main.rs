//! Clinical AI Core - CLI entry point
//!
//! Loads the classifier and attribution artifacts once, runs a single
//! prediction request from command-line field values, and writes the
//! render payload as JSON for the downstream renderer.

use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clinical_ai_core::catalog::specs::spec_for;
use clinical_ai_core::config::Config;
use clinical_ai_core::error::PipelineResult;
use clinical_ai_core::explain::engine::OnnxAttribution;
use clinical_ai_core::model::classifier::{Classifier, OnnxClassifier};
use clinical_ai_core::pipeline::Pipeline;
use clinical_ai_core::report::RenderPayload;

#[derive(Parser, Debug)]
#[command(name = "clinical-ai-core", about = "In-hospital mortality prediction pipeline")]
struct Args {
    /// Classifier artifact path (overrides CLINICAL_MODEL_PATH)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Declared-feature list path (overrides CLINICAL_FEATURES_PATH)
    #[arg(long)]
    features: Option<PathBuf>,

    /// Attribution artifact path (overrides CLINICAL_ATTRIB_PATH)
    #[arg(long)]
    attribution: Option<PathBuf>,

    /// Field input as NAME=VALUE; unset fields use catalog defaults
    #[arg(short = 's', long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Output file for the render payload (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// Split NAME=VALUE pairs into field texts; unknown names are skipped
/// with a warning, matching the non-blocking input policy
fn collect_inputs(pairs: &[String]) -> HashMap<String, String> {
    let mut texts = HashMap::new();

    for pair in pairs {
        match pair.split_once('=') {
            Some((name, value)) => {
                if spec_for(name).is_none() {
                    log::warn!("Unknown feature '{}' ignored", name);
                    continue;
                }
                texts.insert(name.to_string(), value.to_string());
            }
            None => log::warn!("Malformed input '{}' ignored (expected NAME=VALUE)", pair),
        }
    }

    texts
}

fn run(args: &Args) -> PipelineResult<RenderPayload> {
    let config = Config::from_env();

    let model_path = args
        .model
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.model_path));
    let features_path = args
        .features
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.feature_list_path));
    let attribution_path = args
        .attribution
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.attribution_path));

    let classifier = OnnxClassifier::load(&model_path, &features_path)?;
    let feature_count = classifier.raw_feature_names().len();
    let engine = OnnxAttribution::load(&attribution_path, feature_count)?;

    let pipeline = Pipeline::new(Box::new(classifier), Box::new(engine))?;

    let texts = collect_inputs(&args.set);
    let output = pipeline.run(&texts)?;

    Ok(RenderPayload::from_output(&output))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting clinical decision support pipeline");

    let payload = match run(&args) {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("Request aborted: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let json = match payload.to_json() {
        Ok(json) => json,
        Err(e) => {
            log::error!("Payload serialization failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match &args.out {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &json) {
                log::error!("Cannot write payload to {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            log::info!("Render payload written to {}", path.display());
        }
        None => println!("{}", json),
    }

    ExitCode::SUCCESS
}
