//! postdex - index and rss feed builder for markdown blogs.

mod build;
mod cli;
mod compiler;
mod config;
mod extract;
mod generator;
mod logger;
mod scan;
mod utils;

use anyhow::{Result, bail};
use build::run_build;
use clap::Parser;
use cli::Cli;
use config::SiteConfig;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    run_build(&config)
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    if !config_path.exists() {
        bail!("Config file not found: `{}`", config_path.display());
    }

    let mut config = SiteConfig::from_path(&config_path)?;
    // CLI root wins over a root declared in the config file
    if cli.root.is_some() || config.build.root.is_none() {
        config.set_root(root);
    }
    config.validate()?;

    Ok(config)
}
