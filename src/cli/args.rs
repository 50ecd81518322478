//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::section::MAX_COMPRESSION_LEVEL;

/// CSS/JS asset minifier
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: min.toml)
    #[arg(short = 'C', long, global = true, default_value = "min.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Site root directory (relative to current directory)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Gzip level for written files, 0 disables gzip
    #[arg(short = 'z', long, global = true, value_parser = clap::value_parser!(u32).range(0..=MAX_COMPRESSION_LEVEL as i64))]
    pub compression_level: Option<u32>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compress a stylesheet and print the result
    #[command(visible_alias = "c")]
    Css {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Minify a script and print the result
    #[command(visible_alias = "j")]
    Js {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Process a page asset manifest (JSON)
    #[command(visible_alias = "r")]
    Run {
        /// Manifest path, `-` reads stdin
        #[arg(value_hint = clap::ValueHint::FilePath)]
        manifest: PathBuf,

        /// Write the rewritten manifest to file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
}
