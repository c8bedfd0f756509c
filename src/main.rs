use anyhow::{Context, Result};
use clap::Parser;
use kmlstream_core::{AppConfig, LogFormat, LoggingConfig};
use kmlstream_parser::{validate_feature, FeatureCollectionWriter, KmlReader};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// kml2geojson - Stream a KML document into a GeoJSON FeatureCollection
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// KML file to read (defaults to stdin)
    input: Option<PathBuf>,

    /// File to write GeoJSON to (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to a YAML configuration file
    #[arg(short, long, env = "KML2GEOJSON_CONFIG")]
    config: Option<PathBuf>,

    /// Pretty-print each feature
    #[arg(long)]
    pretty: bool,

    /// Reject features that are not valid GeoJSON
    #[arg(long)]
    validate: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format: text or json
    #[arg(long)]
    log_format: Option<LogFormat>,
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config file: {:?}", path))?,
        None => AppConfig::default(),
    };

    // Command line flags win over the config file
    if args.pretty {
        config.output.pretty = true;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = args.log_format {
        config.logging.format = format;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    // stdout carries GeoJSON, so logs go to stderr
    match logging.format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    let config = load_config(&args)?;
    init_logging(&config.logging);

    let capacity = config.converter.buffer_capacity;
    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file: {:?}", path))?;
            Box::new(BufReader::with_capacity(capacity, file))
        }
        None => Box::new(io::stdin().lock()),
    };
    let output: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    info!(input = ?args.input, output = ?args.output, "starting conversion");

    let reader = KmlReader::with_options(input, config.converter.clone());
    let mut writer = FeatureCollectionWriter::new(output).pretty(config.output.pretty);

    for feature in reader {
        let feature = feature.context("Failed to parse KML input")?;
        if args.validate {
            validate_feature(&feature).with_context(|| {
                format!("Feature {} is not valid GeoJSON", writer.count() + 1)
            })?;
        }
        writer
            .write_feature(&feature)
            .context("Failed to write feature")?;
        debug!(feature = writer.count(), "feature written");
    }

    let count = writer.count();
    writer.finish().context("Failed to finish output")?;
    info!(features = count, "conversion complete");

    Ok(())
}
