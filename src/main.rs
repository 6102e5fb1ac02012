use cardstack::OutputFormat;
use cardstack::core::config::{self, ConfigOrigin};
use cardstack::replay;
use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Parser)]
#[command(name = "cardstack", about = "Replay navigation scripts against a card stack")]
struct Args {
    /// Config file (defaults to ~/.cardstack/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Script to replay (defaults to stdin)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,

    /// Snapshot output format
    #[arg(short, long, default_value_t, value_enum)]
    format: OutputFormat,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let (loaded, origin) = match &args.config {
        Some(path) => (config::load_config_from(path)?, ConfigOrigin::File(path.clone())),
        None => config::load_config()?,
    };
    let resolved = config::resolve(loaded, args.log_level.as_deref());

    // Initialize file logger - writes to cardstack.log unless configured otherwise
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    match &origin {
        ConfigOrigin::File(_) | ConfigOrigin::Generated(_) => log::info!("{origin}"),
        ConfigOrigin::GenerateFailed { .. } | ConfigOrigin::NoHome => log::warn!("{origin}"),
    }
    if let Some(level) = &resolved.rejected_log_level {
        log::warn!("Unknown log level {:?}, falling back to {}", level, config::DEFAULT_LOG_LEVEL);
    }
    log::debug!("Resolved config: {:?}", resolved);
    log::info!("Card stack starting with {} initial entries", resolved.initial_entries.len());

    let out: replay::SharedOutput = Rc::new(RefCell::new(io::stdout()));
    let summary = match &args.script {
        Some(path) => replay::run(&resolved, BufReader::new(File::open(path)?), out, args.format)?,
        None => replay::run(&resolved, io::stdin().lock(), out, args.format)?,
    };

    if summary.exited {
        log::info!("Back press went unhandled, exiting");
    }
    Ok(())
}
