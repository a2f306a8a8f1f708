//! shelf - recipe index builder, preview server and terminal browser.

mod browse;
mod build;
mod cli;
mod config;
mod fetch;
mod logger;
mod manifest;
mod serve;
mod view;

use anyhow::Result;
use browse::browse_site;
use build::build_index;
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use serve::serve_site;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { .. } => build_index(&config).map(|_| ()),
        Commands::Serve { .. } => {
            build_index(&config)?;
            serve_site(&config)
        }
        Commands::Browse { hash, raw, .. } => browse_site(&config, hash.as_deref(), *raw),
    }
}
