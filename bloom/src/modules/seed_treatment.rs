//! Seed treatment and inoculant recommendation

use agronomy::{ReferenceData, SeedTreatment, SeedTreatments, SoilTexture};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{Generator, ModuleKind, RecommendationModule};
use crate::error::RecommendError;
use crate::inputs::{FieldInputs, SoilSample};
use crate::llm::Recommendation;

#[derive(Debug, Serialize)]
pub struct SeedTreatmentContext<'a> {
    pub crop_type: &'a str,
    pub inoculants: Vec<&'a SeedTreatment>,
    pub soil: &'a SoilSample,
    pub texture: SoilTexture,
}

pub struct SeedTreatmentModule {
    treatments: SeedTreatments,
    generator: Generator,
}

impl SeedTreatmentModule {
    pub fn new(treatments: SeedTreatments, generator: Generator) -> Self {
        Self { treatments, generator }
    }

    pub fn from_reference(data: &ReferenceData, generator: Generator) -> Self {
        Self::new(data.seed_treatments.clone(), generator)
    }

    pub fn prepare<'a>(&'a self, inputs: &'a FieldInputs) -> Result<SeedTreatmentContext<'a>, RecommendError> {
        let inoculants = self.treatments.inoculants(inputs.crop_type())?;
        debug!(crop = %inputs.crop_type(), count = inoculants.len(), "prepare: inoculant options");

        Ok(SeedTreatmentContext {
            crop_type: inputs.crop_type(),
            inoculants,
            soil: &inputs.soil,
            texture: inputs.composition().texture(),
        })
    }
}

#[async_trait]
impl RecommendationModule for SeedTreatmentModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::SeedTreatment
    }

    async fn recommend(&self, inputs: &FieldInputs) -> Result<Recommendation, RecommendError> {
        debug!("SeedTreatmentModule::recommend: called");
        let context = self.prepare(inputs)?;
        self.generator.run(self.kind(), &context).await
    }
}
