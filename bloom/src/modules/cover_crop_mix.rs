//! Cover-crop mix recommendation
//!
//! Rotation fit narrows the candidates, soil goals rank them, and the top of
//! that ranking becomes the suggested mix.

use agronomy::{
    CoverCropMatch, DEFAULT_MIX_TOP_K, DEFAULT_TARGET_TOP_K, IntersectionRanker, ReferenceData, Rotation, RuleEngine,
    ScoredCoverCrop, ScoringFilter,
};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{Generator, ModuleKind, RecommendationModule};
use crate::error::RecommendError;
use crate::inputs::FieldInputs;
use crate::llm::Recommendation;

#[derive(Debug, Serialize)]
pub struct CoverCropMixContext {
    pub rotation: Rotation,
    pub candidates: Vec<ScoredCoverCrop>,
    pub goals: Vec<String>,
    pub mix: Vec<CoverCropMatch>,
}

pub struct CoverCropMixModule {
    filter: ScoringFilter,
    rules: RuleEngine,
    ranker: IntersectionRanker,
    generator: Generator,
}

impl CoverCropMixModule {
    pub fn new(filter: ScoringFilter, rules: RuleEngine, ranker: IntersectionRanker, generator: Generator) -> Self {
        Self {
            filter,
            rules,
            ranker,
            generator,
        }
    }

    pub fn from_reference(data: &ReferenceData, generator: Generator) -> Self {
        Self::new(
            data.cover_crop_timing.clone(),
            data.cover_crop_goals.clone(),
            data.cover_crop_tags.clone(),
            generator,
        )
    }

    pub fn prepare(&self, inputs: &FieldInputs) -> CoverCropMixContext {
        let rotation = inputs.rotation();
        let candidates = self.filter.score(&rotation, DEFAULT_TARGET_TOP_K);
        let goals = self.rules.classify(&inputs.soil_values());
        let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        let mix = self.ranker.rank(&names, &goals, DEFAULT_MIX_TOP_K);
        debug!(candidates = candidates.len(), goals = goals.len(), mix = mix.len(), "prepare: mix ranked");

        CoverCropMixContext {
            rotation,
            candidates,
            goals: goals.into_iter().collect(),
            mix,
        }
    }
}

#[async_trait]
impl RecommendationModule for CoverCropMixModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::CoverCropMix
    }

    async fn recommend(&self, inputs: &FieldInputs) -> Result<Recommendation, RecommendError> {
        debug!("CoverCropMixModule::recommend: called");
        let context = self.prepare(inputs);
        self.generator.run(self.kind(), &context).await
    }
}
