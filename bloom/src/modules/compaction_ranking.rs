//! Compaction risk ranking
//!
//! A direct reading is classified against the texture thresholds before the
//! prompt is built. Without one, the field history must be complete and the
//! estimate is left to the generation call.

use agronomy::{
    AssessmentMethod, CompactionAssessor, CompactionClassification, FieldHistory, RecommendationBundle, ReferenceData,
    SoilComposition, SoilTexture,
};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{Generator, ModuleKind, RecommendationModule};
use crate::error::RecommendError;
use crate::inputs::FieldInputs;
use crate::llm::Recommendation;

const ESTIMATE_TEMPLATE: &str = "compaction-estimate";

#[derive(Debug, Serialize)]
pub struct MeasuredContext {
    pub texture: SoilTexture,
    pub composition: SoilComposition,
    pub method: &'static str,
    pub measurement: f64,
    pub classification: CompactionClassification,
    pub bundle: RecommendationBundle,
}

#[derive(Debug, Serialize)]
pub struct EstimateContext {
    pub texture: SoilTexture,
    pub composition: SoilComposition,
    pub method: &'static str,
    pub history: FieldHistory,
    pub bundle: RecommendationBundle,
}

#[derive(Debug)]
pub enum CompactionContext {
    Measured(MeasuredContext),
    Estimate(EstimateContext),
}

pub struct CompactionRankingModule {
    assessor: CompactionAssessor,
    generator: Generator,
}

impl CompactionRankingModule {
    pub fn new(assessor: CompactionAssessor, generator: Generator) -> Self {
        Self { assessor, generator }
    }

    pub fn from_reference(data: &ReferenceData, generator: Generator) -> Self {
        Self::new(data.compaction.clone(), generator)
    }

    /// Fails with an invalid argument when neither a reading nor the full history is given
    pub fn prepare(&self, inputs: &FieldInputs) -> Result<CompactionContext, RecommendError> {
        let assessment = self.assessor.assess(inputs.composition(), &inputs.compaction_query())?;
        let bundle = self.assessor.recommendations(&assessment);
        let method = assessment.method_label();
        debug!(texture = %assessment.texture, %method, action = %bundle.action_required, "prepare: assessed");

        let context = match assessment.method {
            AssessmentMethod::Measured { value, classification } => CompactionContext::Measured(MeasuredContext {
                texture: assessment.texture,
                composition: assessment.composition,
                method,
                measurement: value,
                classification,
                bundle,
            }),
            AssessmentMethod::Estimated { history } => CompactionContext::Estimate(EstimateContext {
                texture: assessment.texture,
                composition: assessment.composition,
                method,
                history,
                bundle,
            }),
        };
        Ok(context)
    }
}

#[async_trait]
impl RecommendationModule for CompactionRankingModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::CompactionRanking
    }

    async fn recommend(&self, inputs: &FieldInputs) -> Result<Recommendation, RecommendError> {
        debug!("CompactionRankingModule::recommend: called");
        match self.prepare(inputs)? {
            CompactionContext::Measured(context) => self.generator.run(self.kind(), &context).await,
            CompactionContext::Estimate(context) => {
                self.generator
                    .run_template(self.kind(), ESTIMATE_TEMPLATE, &context)
                    .await
            }
        }
    }
}
