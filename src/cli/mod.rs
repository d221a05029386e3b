use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use flowgate::binary::ByteOrder;
use flowgate::diagnostics::FileLog;
use flowgate::error::CodecError;

mod config;
mod derive_map;
mod info;
mod truncate;

pub use config::Config;

/// FlowGate - flow cytometry event and parameter-map file tool
#[derive(Parser)]
#[command(name = "flowgate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Byte order for saved event files
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrderArg {
    /// Least significant byte first
    Lsbf,
    /// Most significant byte first
    Msbf,
}

impl From<ByteOrderArg> for ByteOrder {
    fn from(arg: ByteOrderArg) -> Self {
        match arg {
            ByteOrderArg::Lsbf => ByteOrder::Lsbf,
            ByteOrderArg::Msbf => ByteOrder::Msbf,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Display information about an event file or parameter map
    Info {
        /// Input .fgb, .json or .map file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Load at most this many events
        #[arg(short = 'n', long)]
        max_events: Option<usize>,
    },

    /// Build a parameter map from an event file's parameter names
    DeriveMap {
        /// Input event file
        #[arg(value_name = "EVENTS")]
        events: PathBuf,

        /// Output parameter map
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Merge into an existing map at OUTPUT instead of replacing it
        #[arg(long)]
        merge: bool,

        /// Spaces per indentation level (0 for a single line)
        #[arg(long)]
        indent: Option<usize>,
    },

    /// Rewrite an event file keeping only its first events
    Truncate {
        /// Input event file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output event file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Number of events to keep
        #[arg(short = 'n', long)]
        max_events: usize,

        /// Byte order of the output (defaults to the host's)
        #[arg(long, value_enum)]
        byte_order: Option<ByteOrderArg>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Info { file, max_events } => {
            info::run(file, max_events.or(config.load.max_events))
        }
        Commands::DeriveMap {
            events,
            output,
            merge,
            indent,
        } => derive_map::run(events, output, merge, indent.or(config.save.indent)),
        Commands::Truncate {
            input,
            output,
            max_events,
            byte_order,
        } => truncate::run(
            input,
            output,
            max_events,
            byte_order.or(config.save.byte_order).map(ByteOrder::from),
        ),
    }
}

/// Print the codec's log, then attach context to a failed operation
fn check<T>(result: Result<T, CodecError>, log: &FileLog, action: &str, path: &Path) -> Result<T> {
    if !log.is_empty() {
        eprint!("{}", log.format_colored());
    }
    result.with_context(|| format!("Failed to {} {}", action, path.display()))
}
