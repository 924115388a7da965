use std::{fs, io::Read, path::PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use callprobe_engine::{ConfigError, ParseError, classify, evaluate, normalize::load_document, normalize_entry, parse_path, prepare_call};
use callprobe_types::{ActionSelection, ProbeConfig};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "callprobe", version, about = "Normalize action calls and query their responses")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize a pasted call description (reads stdin when no file is given)
    Normalize {
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
        /// Action picked outside the document, as `domain.name`
        #[arg(long)]
        action: Option<String>,
    },
    /// Extract a value from a JSON or YAML response document
    Extract {
        #[arg(long, short = 'p')]
        path: Option<String>,
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },
    /// Suggest how to interpret a sample value
    Classify {
        /// JSON literal; anything that is not valid JSON is treated as text
        value: String,
    },
    /// Validate a stored probe entry
    Check {
        #[arg(long, short = 'c')]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Normalize { file, action } => run_normalize(file, action),
        Command::Extract { path, file } => run_extract(path, file),
        Command::Classify { value } => run_classify(value),
        Command::Check { config } => run_check(config),
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_normalize(file: Option<PathBuf>, action: Option<String>) -> Result<()> {
    let raw = read_input(file.as_ref())?;
    let selection = action.map(ActionSelection::from_action);
    let entry = normalize_entry(&raw, selection.as_ref()).map_err(keyed_config_error)?;
    println!("{}", serde_json::to_string_pretty(&entry)?);
    Ok(())
}

fn run_extract(path: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let raw = read_input(file.as_ref())?;
    let document = load_document(&raw).map_err(keyed_parse_error)?.unwrap_or(Value::Null);
    if let Some(path) = path.as_deref() {
        let expression = parse_path(path).ok_or_else(|| anyhow!("malformed path '{path}'"))?;
        if expression.is_identity() {
            debug!("Path '{}' selects the whole document", path);
        } else {
            debug!("Evaluating path {}", expression);
        }
    }
    let Some(value) = evaluate(&document, path.as_deref()) else {
        bail!("path '{}' not found", path.unwrap_or_default());
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn run_classify(value: String) -> Result<()> {
    let sample = serde_json::from_str::<Value>(&value).unwrap_or(Value::String(value));
    debug!("Classifying sample {}", sample);
    println!("{}", serde_json::to_string_pretty(&classify(&sample))?);
    Ok(())
}

fn run_check(config_path: PathBuf) -> Result<()> {
    let content = fs::read_to_string(&config_path).with_context(|| format!("Failed to read probe entry: {}", config_path.display()))?;
    let config: ProbeConfig =
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse probe entry: {}", config_path.display()))?;
    let call = prepare_call(&config).map_err(keyed_config_error)?;

    let summary = json!({
        "name": config.name,
        "action": call.target.to_string(),
        "arguments": call.arguments,
        "scan_interval": config.scan_interval,
        "response_data_path": config.response_data_path,
        "attribute_name": config.attribute_name,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer).context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn keyed_config_error(error: ConfigError) -> anyhow::Error {
    anyhow!("{} [{}]", error, error.translation_key())
}

fn keyed_parse_error(error: ParseError) -> anyhow::Error {
    anyhow!("{} [{}]", error, error.translation_key())
}
