//! CLI argument parsing for the agronomy engines

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ag")]
#[command(author, version, about = "Deterministic soil, crop and compaction engines", long_about = None)]
pub struct Cli {
    /// Directory holding the reference tables
    #[arg(short, long, default_value = "data")]
    pub data: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Sand/silt/clay percentages
#[derive(Args, Debug, Clone, Copy)]
pub struct SoilArgs {
    /// Sand (%)
    #[arg(long)]
    pub sand: f64,

    /// Silt (%)
    #[arg(long)]
    pub silt: f64,

    /// Clay (%)
    #[arg(long)]
    pub clay: f64,
}

/// Plant-available N, P and K (kg/ha)
#[derive(Args, Debug, Clone, Copy)]
pub struct NpkArgs {
    #[arg(short = 'n', long = "nitrogen")]
    pub n: f64,

    #[arg(short = 'p', long = "phosphorus")]
    pub p: f64,

    #[arg(short = 'k', long = "potassium")]
    pub k: f64,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify the USDA soil texture
    Texture {
        #[command(flatten)]
        soil: SoilArgs,
    },

    /// Rank compaction from a measurement or field history
    Compaction {
        #[command(flatten)]
        soil: SoilArgs,

        /// Measured compaction value (bulk density, g/cm3)
        #[arg(short, long)]
        measurement: Option<f64>,

        /// Past ploughing depth (cm)
        #[arg(long)]
        plough_depth: Option<f64>,

        /// Soil was left bare between crops
        #[arg(long)]
        bare_soil: Option<bool>,

        /// Machine used for ploughing
        #[arg(long)]
        machine_type: Option<String>,
    },

    /// Check subsoiling feasibility and list decompaction methods
    Feasibility {
        #[command(flatten)]
        soil: SoilArgs,

        /// Soil moisture (%)
        #[arg(long)]
        moisture: f64,

        /// Bulk density (g/cm3)
        #[arg(long)]
        bulk_density: f64,

        /// Penetration resistance (MPa)
        #[arg(long)]
        penetration_resistance: f64,

        /// Crop to list decompaction methods for
        #[arg(long)]
        crop: Option<String>,
    },

    /// Fertilizer needed to reach the crop's nutrient band
    Npk {
        /// Crop name
        #[arg(required = true)]
        crop: String,

        #[command(flatten)]
        levels: NpkArgs,
    },

    /// Classify cover-crop goals from soil values
    Goals {
        #[command(flatten)]
        levels: NpkArgs,

        #[command(flatten)]
        soil: SoilArgs,
    },

    /// Recommend a cover-crop mix for a three-season rotation
    CoverCrops {
        /// Current cash crop
        #[arg(long)]
        current: String,

        /// Next cash crop
        #[arg(long)]
        next: String,

        /// Cash crop after the next one
        #[arg(long)]
        after_next: String,

        #[command(flatten)]
        levels: NpkArgs,

        #[command(flatten)]
        soil: SoilArgs,

        /// Number of mix entries to keep
        #[arg(short, long, default_value = "3")]
        top_k: usize,
    },
}
