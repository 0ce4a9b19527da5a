use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sitekit::{
    init_logging, inspect_snapshot, Config, LengthUnit, SettingsStore, BUILD_DATE, VERSION,
};

#[derive(Parser, Debug)]
#[command(name = "sitekit", about = "Inspect SiteKit layout snapshots")]
struct Cli {
    /// Settings file (JSON or TOML); defaults to the platform config dir
    #[arg(long, env = "SITEKIT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a snapshot summary and any spacing conflicts
    Check {
        snapshot: PathBuf,
        /// Exit with status 1 when conflicts are found
        #[arg(long)]
        strict: bool,
        /// Report lengths in this unit instead of the snapshot's own
        #[arg(long)]
        unit: Option<LengthUnit>,
    },
    /// Show or initialise the settings file
    Config {
        /// Write the defaults to the settings file
        #[arg(long)]
        init: bool,
    },
    Version,
}

fn open_store(path: Option<PathBuf>) -> anyhow::Result<SettingsStore> {
    let store = match path {
        Some(path) => SettingsStore::open(path),
        None => SettingsStore::open_default(),
    };
    store.context("failed to open settings")
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_json)?;

    match cli.command {
        Command::Check {
            snapshot,
            strict,
            unit,
        } => {
            let mut store = open_store(cli.config)?;
            let mut report = inspect_snapshot(&snapshot)?;
            if let Some(unit) = unit {
                report = report.in_unit(unit);
            }
            println!("{report}");

            store.config_mut().add_recent_snapshot(snapshot);
            if let Err(err) = store.save() {
                tracing::warn!(%err, "could not record recent snapshot");
            }

            if strict && !report.is_clean() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Config { init } => {
            let mut store = open_store(cli.config)?;
            if init {
                store.reset();
                store.save().context("failed to write settings")?;
            }
            println!("{}", store.path().display());
            let config: &Config = store.config();
            println!(
                "history depth {}, zoom {}..{}, unit {}",
                config.engine.history_depth,
                config.engine.viewport.min_scale,
                config.engine.viewport.max_scale,
                config.engine.display.unit.symbol()
            );
        }
        Command::Version => {
            println!("sitekit {VERSION} (built {BUILD_DATE})");
        }
    }
    Ok(ExitCode::SUCCESS)
}
