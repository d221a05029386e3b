//! # FlowGate File Tool
//!
//! A command-line tool for inspecting and rewriting FlowGate files.
//!
//! ## Supported Formats
//!
//! - **Binary events** (`.fgb`): columnar float/double event tables
//! - **Parameter maps** (`.json`, `.map`): per-channel annotations
//!
//! ## Usage
//!
//! ```bash
//! # Show header, parameters and diagnostics
//! flowgate info cells.fgb
//!
//! # Create (or extend with --merge) a parameter map for an event file
//! flowgate derive-map cells.fgb cells.json
//!
//! # Keep the first 10 000 events, written big-endian
//! flowgate truncate cells.fgb head.fgb --max-events 10000 --byte-order msbf
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
