use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use sadhana_common::config::GeneralConfig;
use sadhana_score::RankBy;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

mod commands;
mod config;

use config::CtlConfig;

#[derive(Parser)]
#[command(name = "sadhana-ctl")]
#[command(about = "Score sadhana logs, build monthly insights and leaderboards", long_about = None)]
struct Cli {
    #[arg(long, global = true, help = "Path to the ctl configuration file")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single day's activity log
    Score {
        #[arg(help = "Activity log JSON file, or - for stdin")]
        file: PathBuf,
        #[arg(short, long, help = "Daily chanting target in rounds")]
        target: Option<u32>,
        #[arg(long)]
        json: bool,
    },

    /// Monthly insights for one participant's logs
    Insights {
        #[arg(help = "JSON array of activity logs, or - for stdin")]
        file: PathBuf,
        #[arg(short, long, help = "Month as YYYY-MM")]
        month: String,
        #[arg(short, long, help = "Daily chanting target in rounds")]
        target: Option<u32>,
        #[arg(long)]
        json: bool,
    },

    /// Rank participants by score
    Leaderboard {
        #[arg(help = "JSON array of participants with their logs, or - for stdin")]
        file: PathBuf,
        #[arg(long, help = "First day to include (YYYY-MM-DD)")]
        from: Option<NaiveDate>,
        #[arg(long, help = "Last day to include (YYYY-MM-DD)")]
        to: Option<NaiveDate>,
        #[arg(long, default_value_t = RankBy::Total, help = "Rank by total or average")]
        by: RankBy,
        #[arg(long)]
        json: bool,
    },

    /// Print the active scoring rules
    Rules {
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    InitConfig {
        #[arg(long, help = "Overwrite an existing configuration file")]
        force: bool,
    },
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Install the subscriber before anything logs. `RUST_LOG` wins when set;
/// otherwise the level starts at the default and can be reloaded once the
/// configuration is known.
fn init_tracing() -> FilterHandle {
    let (filter, handle) = reload::Layer::new(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(GeneralConfig::default().log_level)),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    handle
}

/// Filter directive for the configured level, or `None` when `RUST_LOG`
/// already decides it.
fn configured_filter(rust_log: Option<&str>, log_level: &str) -> Option<String> {
    match rust_log {
        Some(value) if !value.trim().is_empty() => None,
        _ => Some(log_level.to_string()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = init_tracing();

    let config_path = cli.config.clone().unwrap_or_else(CtlConfig::default_config_path);
    if let Commands::InitConfig { force } = cli.command {
        return CtlConfig::init_at(&config_path, force);
    }

    let config = CtlConfig::load_from_path(&config_path)?;
    let rust_log = std::env::var("RUST_LOG").ok();
    if let Some(directive) = configured_filter(rust_log.as_deref(), &config.general.log_level) {
        filter
            .reload(EnvFilter::try_new(&directive).with_context(|| format!("Invalid log level: {}", directive))?)
            .context("Failed to apply configured log level")?;
    }
    debug!("Using configuration: {:?}", config);

    run(cli.command, &config)
}

fn run(command: Commands, config: &CtlConfig) -> Result<()> {
    config.validate()?;
    let engine = config.engine()?;
    let default_target = config.scoring.default_target_rounds;

    match command {
        Commands::Score { file, target, json } => {
            commands::score::run(&engine, &file, target.unwrap_or(default_target), json)?
        }
        Commands::Insights { file, month, target, json } => {
            commands::insights::run(&engine, &file, &month, target.unwrap_or(default_target), json)?
        }
        Commands::Leaderboard { file, from, to, by, json } => {
            commands::leaderboard::run(&engine, &file, from, to, by, default_target, json)?
        }
        Commands::Rules { json } => commands::rules::show(engine.rules(), json)?,
        Commands::InitConfig { .. } => unreachable!("init-config is handled before the configuration is loaded"),
    }

    Ok(())
}
