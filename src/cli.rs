//! Command-line interface definitions.
//!
//! Defines all CLI arguments using clap. postdex has exactly one operation,
//! so there are no subcommands: running the binary runs the build.

use clap::Parser;
use std::path::PathBuf;

/// postdex blog indexer CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project root directory (defaults to the current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: postdex.toml)
    #[arg(short = 'C', long, default_value = "postdex.toml")]
    pub config: PathBuf,
}
