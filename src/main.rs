//! asset-min - CSS/JS asset minifier.

use anyhow::Result;
use asset_min::cli::{self, Cli, Commands};
use asset_min::config::SiteConfig;
use asset_min::logger;
use clap::{ColorChoice, Parser};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Css { file } => cli::run_css(file),
        Commands::Js { file } => cli::run_js(file, &SiteConfig::load(&cli)?),
        Commands::Run { manifest, output } => {
            cli::run_manifest(manifest, output.as_deref(), &SiteConfig::load(&cli)?)
        }
    }
}
