//! Agronomy - deterministic soil and crop engines
//!
//! The pure half of the recommendation pipeline: every function here is a
//! function of its inputs plus reference tables loaded once at startup.
//!
//! # Modules
//!
//! - [`texture`] - USDA texture classification
//! - [`table`] - keyed reference tables with a fallback row
//! - [`compaction`] - Green/Orange/Red compaction ranking
//! - [`feasibility`] - subsoiling feasibility and decompaction methods
//! - [`goals`] - cover-crop goal rule engine
//! - [`cover_crops`] - cover-crop scoring and goal-overlap ranking
//! - [`nutrients`] - NPK gap calculation
//! - [`seeds`] - seed treatment and variety lookups
//! - [`climate`] - climate snapshot collaborator
//! - [`reference`] - loading of the reference data bundle

pub mod cli;
pub mod climate;
pub mod compaction;
pub mod cover_crops;
pub mod error;
pub mod feasibility;
pub mod goals;
pub mod nutrients;
pub mod reference;
pub mod seeds;
pub mod table;
pub mod texture;

pub use climate::{ClimateSnapshot, ClimateSource, ClimateZone, StaticClimate, day_of_year_to_date};
pub use compaction::{
    AssessmentMethod, BandColor, CompactionAssessment, CompactionAssessor, CompactionClassification, CompactionLevel,
    CompactionQuery, FieldHistory, RecommendationBundle, ThresholdBand,
};
pub use cover_crops::{
    CoverCropMatch, DEFAULT_MIX_TOP_K, DEFAULT_TARGET_TOP_K, GoalTag, IntersectionRanker, Rotation, ScoredCoverCrop,
    ScoringFilter, Timing, TimingRow,
};
pub use error::AgronomyError;
pub use feasibility::{
    DecompactionMethod, DecompactionMethods, FeasibilityResult, FieldConditions, MoistureAdvice, MoistureBand,
    SoilFamily, check_feasibility, moisture_recommendation, optimal_moisture,
};
pub use goals::{GoalRules, Operator, Predicate, RuleEngine, SoilValues};
pub use nutrients::{NpkLevels, NpkTarget, Nutrient, NutrientBand, NutrientGapCalculator};
pub use reference::ReferenceData;
pub use seeds::{SeedTreatment, SeedTreatments, SeedVarieties, SeedVariety};
pub use table::{Keyed, KeyedTable};
pub use texture::{SoilComposition, SoilTexture, classify_soil_texture};
