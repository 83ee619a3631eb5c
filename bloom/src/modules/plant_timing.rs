//! Planting window recommendation

use std::sync::Arc;

use agronomy::{ClimateSnapshot, ClimateSource, ReferenceData, SeedVarieties, SeedVariety, day_of_year_to_date};
use async_trait::async_trait;
use chrono::Datelike;
use serde::Serialize;
use tracing::debug;

use super::{Generator, ModuleKind, RecommendationModule};
use crate::error::RecommendError;
use crate::inputs::{FieldInputs, Location};
use crate::llm::Recommendation;

#[derive(Debug, Serialize)]
pub struct PlantTimingContext<'a> {
    pub seed_variety: &'a str,
    pub crop_type: &'a str,
    pub variety: &'a SeedVariety,
    pub location: Location,
    pub climate: ClimateSnapshot,
    /// Where the climate came from
    pub climate_source: &'static str,
    pub frost_free_start_date: String,
    pub frost_free_end_date: String,
}

pub struct PlantTimingModule {
    varieties: SeedVarieties,
    climate: Arc<dyn ClimateSource>,
    generator: Generator,
}

impl PlantTimingModule {
    pub fn new(varieties: SeedVarieties, climate: Arc<dyn ClimateSource>, generator: Generator) -> Self {
        Self {
            varieties,
            climate,
            generator,
        }
    }

    pub fn from_reference(data: &ReferenceData, climate: Arc<dyn ClimateSource>, generator: Generator) -> Self {
        Self::new(data.seed_varieties.clone(), climate, generator)
    }

    pub fn prepare<'a>(&'a self, inputs: &'a FieldInputs) -> Result<PlantTimingContext<'a>, RecommendError> {
        let variety = self.varieties.lookup(inputs.seed_variety())?;
        let (climate, climate_source) = match &inputs.climate {
            Some(climate) => (climate.clone(), "field measurements"),
            None => (
                self.climate
                    .get_climate(inputs.location.latitude, inputs.location.longitude),
                "regional defaults",
            ),
        };

        let year = inputs.crops.season.unwrap_or_else(|| chrono::Local::now().year());
        let as_date = |day: u32| day_of_year_to_date(day, year).unwrap_or_else(|| format!("day {}", day));
        debug!(variety = %variety.variety, zone = %climate.climate_zone, %year, "prepare: climate resolved");

        Ok(PlantTimingContext {
            seed_variety: inputs.seed_variety(),
            crop_type: inputs.crop_type(),
            variety,
            location: inputs.location,
            frost_free_start_date: as_date(climate.frost_free_start),
            frost_free_end_date: as_date(climate.frost_free_end),
            climate,
            climate_source,
        })
    }
}

#[async_trait]
impl RecommendationModule for PlantTimingModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::PlantTiming
    }

    async fn recommend(&self, inputs: &FieldInputs) -> Result<Recommendation, RecommendError> {
        debug!("PlantTimingModule::recommend: called");
        let context = self.prepare(inputs)?;
        self.generator.run(self.kind(), &context).await
    }
}
