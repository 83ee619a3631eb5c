//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::modules::ModuleKind;

/// Bloom - agronomic recommendations from soil, crop and climate data
#[derive(Parser, Debug)]
#[command(name = "bloom", version, about = "Agronomic recommendation pipeline", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Reference data directory (overrides the config file)
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run every module and print the consolidated field plan
    Recommend {
        /// Field file (YAML)
        field: PathBuf,

        /// Print each module's recommendation before the plan
        #[arg(long)]
        full: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Run a single recommendation module
    Module {
        /// Module name (npk, seed-treatment, decompaction, cover-crop-mix, plant-timing, compaction-ranking)
        name: ModuleKind,

        /// Field file (YAML)
        field: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
