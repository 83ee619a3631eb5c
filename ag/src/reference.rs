//! Reference data bundle
//!
//! All lookup tables are read once from a data directory and are immutable
//! afterwards; engines built from them can be shared freely across threads.

use std::fs;
use std::path::Path;

use eyre::{Context, Result};
use log::info;
use serde::de::DeserializeOwned;

use crate::compaction::{CompactionAssessor, ThresholdBand};
use crate::cover_crops::{GoalTag, IntersectionRanker, ScoringFilter, TimingRow};
use crate::feasibility::{DecompactionMethod, DecompactionMethods};
use crate::goals::RuleEngine;
use crate::nutrients::{NpkTarget, NutrientGapCalculator};
use crate::seeds::{SeedTreatment, SeedTreatments, SeedVarieties, SeedVariety};

pub const COMPACTION_THRESHOLDS_FILE: &str = "compaction_thresholds.yml";
pub const NPK_TARGETS_FILE: &str = "npk_targets.yml";
pub const SEED_TREATMENTS_FILE: &str = "seed_treatments.yml";
pub const SEED_VARIETIES_FILE: &str = "seed_varieties.yml";
pub const DECOMPACTION_METHODS_FILE: &str = "decompaction_methods.yml";
pub const COVER_CROP_TIMING_FILE: &str = "cover_crop_timing.yml";
pub const COVER_CROP_TAGS_FILE: &str = "cover_crop_tags.yml";
pub const COVER_CROP_GOALS_FILE: &str = "cover_crop_goals.json";

/// Every reference table the engines need
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub compaction: CompactionAssessor,
    pub nutrients: NutrientGapCalculator,
    pub seed_treatments: SeedTreatments,
    pub seed_varieties: SeedVarieties,
    pub decompaction_methods: DecompactionMethods,
    pub cover_crop_timing: ScoringFilter,
    pub cover_crop_tags: IntersectionRanker,
    pub cover_crop_goals: RuleEngine,
}

impl ReferenceData {
    /// Load all tables from `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        info!("Loading reference data from {}", dir.display());

        let thresholds: Vec<ThresholdBand> = load_yaml(dir, COMPACTION_THRESHOLDS_FILE)?;
        let npk: Vec<NpkTarget> = load_yaml(dir, NPK_TARGETS_FILE)?;
        let treatments: Vec<SeedTreatment> = load_yaml(dir, SEED_TREATMENTS_FILE)?;
        let varieties: Vec<SeedVariety> = load_yaml(dir, SEED_VARIETIES_FILE)?;
        let methods: Vec<DecompactionMethod> = load_yaml(dir, DECOMPACTION_METHODS_FILE)?;
        let timing: Vec<TimingRow> = load_yaml(dir, COVER_CROP_TIMING_FILE)?;
        let tags: Vec<GoalTag> = load_yaml(dir, COVER_CROP_TAGS_FILE)?;

        let goals_path = dir.join(COVER_CROP_GOALS_FILE);
        let goals_json = fs::read_to_string(&goals_path)
            .context(format!("Failed to read {}", goals_path.display()))?;
        let goals = RuleEngine::from_json(&goals_json)
            .context(format!("Failed to parse {}", goals_path.display()))?;

        Ok(Self {
            compaction: CompactionAssessor::new(thresholds),
            nutrients: NutrientGapCalculator::new(npk),
            seed_treatments: SeedTreatments::new(treatments),
            seed_varieties: SeedVarieties::new(varieties),
            decompaction_methods: DecompactionMethods::new(methods),
            cover_crop_timing: ScoringFilter::new(timing),
            cover_crop_tags: IntersectionRanker::new(tags),
            cover_crop_goals: goals,
        })
    }
}

fn load_yaml<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>> {
    let path = dir.join(file);
    let content = fs::read_to_string(&path).context(format!("Failed to read {}", path.display()))?;
    let rows: Vec<T> = serde_yaml::from_str(&content).context(format!("Failed to parse {}", path.display()))?;
    info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
