//! Decompaction method recommendation

use agronomy::{
    DecompactionMethod, DecompactionMethods, FeasibilityResult, MoistureAdvice, ReferenceData, SoilTexture,
    check_feasibility, moisture_recommendation,
};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{Generator, ModuleKind, RecommendationModule};
use crate::error::RecommendError;
use crate::inputs::{FieldInputs, Management, SoilSample};
use crate::llm::Recommendation;

#[derive(Debug, Serialize)]
pub struct DecompactionContext<'a> {
    pub crop_type: &'a str,
    pub soil: &'a SoilSample,
    pub management: &'a Management,
    pub texture: SoilTexture,
    pub feasibility: FeasibilityResult,
    pub moisture: MoistureAdvice,
    pub methods: Vec<&'a DecompactionMethod>,
}

pub struct DecompactionModule {
    methods: DecompactionMethods,
    generator: Generator,
}

impl DecompactionModule {
    pub fn new(methods: DecompactionMethods, generator: Generator) -> Self {
        Self { methods, generator }
    }

    pub fn from_reference(data: &ReferenceData, generator: Generator) -> Self {
        Self::new(data.decompaction_methods.clone(), generator)
    }

    pub fn prepare<'a>(&'a self, inputs: &'a FieldInputs) -> Result<DecompactionContext<'a>, RecommendError> {
        let composition = inputs.composition();
        let feasibility = check_feasibility(&composition, &inputs.conditions());
        let methods = self.methods.filter(inputs.crop_type(), feasibility.soil_type)?;
        debug!(
            soil_type = %feasibility.soil_type,
            subsoiling = feasibility.subsoiling_recommended,
            methods = methods.len(),
            "prepare: feasibility checked"
        );

        Ok(DecompactionContext {
            crop_type: inputs.crop_type(),
            soil: &inputs.soil,
            management: &inputs.management,
            texture: composition.texture(),
            feasibility,
            moisture: moisture_recommendation(&composition),
            methods,
        })
    }
}

#[async_trait]
impl RecommendationModule for DecompactionModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Decompaction
    }

    async fn recommend(&self, inputs: &FieldInputs) -> Result<Recommendation, RecommendError> {
        debug!("DecompactionModule::recommend: called");
        let context = self.prepare(inputs)?;
        self.generator.run(self.kind(), &context).await
    }
}
