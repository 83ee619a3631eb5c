//! Fertilizer (NPK) recommendation

use agronomy::{NpkLevels, NutrientGapCalculator, ReferenceData, SoilTexture};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{Generator, ModuleKind, RecommendationModule};
use crate::error::RecommendError;
use crate::inputs::{FieldInputs, SoilSample};
use crate::llm::Recommendation;

#[derive(Debug, Serialize)]
pub struct NpkContext<'a> {
    pub crop_type: &'a str,
    /// Crop of the target row actually used (the fallback row on a miss)
    pub target_crop: &'a str,
    pub soil: &'a SoilSample,
    pub texture: SoilTexture,
    pub recommended: NpkLevels,
}

pub struct NpkModule {
    calculator: NutrientGapCalculator,
    generator: Generator,
}

impl NpkModule {
    pub fn new(calculator: NutrientGapCalculator, generator: Generator) -> Self {
        Self { calculator, generator }
    }

    pub fn from_reference(data: &ReferenceData, generator: Generator) -> Self {
        Self::new(data.nutrients.clone(), generator)
    }

    pub fn prepare<'a>(&'a self, inputs: &'a FieldInputs) -> Result<NpkContext<'a>, RecommendError> {
        let crop = inputs.crop_type();
        let target = self.calculator.target(crop)?;
        let recommended = self.calculator.gap(crop, inputs.npk())?;
        debug!(%crop, target = %target.crop, ?recommended, "prepare: nutrient gaps");

        Ok(NpkContext {
            crop_type: crop,
            target_crop: &target.crop,
            soil: &inputs.soil,
            texture: inputs.composition().texture(),
            recommended,
        })
    }
}

#[async_trait]
impl RecommendationModule for NpkModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Npk
    }

    async fn recommend(&self, inputs: &FieldInputs) -> Result<Recommendation, RecommendError> {
        debug!("NpkModule::recommend: called");
        let context = self.prepare(inputs)?;
        self.generator.run(self.kind(), &context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::inputs::fixtures;
    use crate::llm::client::mock::MockLlmClient;
    use crate::modules::testing;

    fn module(mock: Arc<MockLlmClient>) -> NpkModule {
        NpkModule::from_reference(&testing::reference_data(), testing::generator(mock))
    }

    #[test]
    fn test_prepare_computes_gaps() {
        let inputs = fixtures::field();
        let module = module(Arc::new(MockLlmClient::repeating("ok")));
        let ctx = module.prepare(&inputs).unwrap();
        // maize N band 40-80: 40 is at the minimum
        assert_eq!(ctx.recommended.n, 0.0);
        // maize P band 20-40: midpoint 30 - 15
        assert_eq!(ctx.recommended.p, 15.0);
        assert_eq!(ctx.target_crop, "maize");
        assert_eq!(ctx.texture, SoilTexture::SandyClayLoam);
    }

    #[test]
    fn test_unknown_crop_uses_general_row() {
        let mut inputs = fixtures::field();
        inputs.crops.current = "quinoa".to_string();
        let module = module(Arc::new(MockLlmClient::repeating("ok")));
        assert_eq!(module.prepare(&inputs).unwrap().target_crop, "general");
    }

    #[tokio::test]
    async fn test_recommend_substitutes_gaps() {
        let mock = Arc::new(MockLlmClient::repeating("### Conclusion Section\nApply 15 kg/ha P."));
        let rec = module(mock.clone()).recommend(&fixtures::field()).await.unwrap();
        assert_eq!(rec.conclusion, "Apply 15 kg/ha P.");

        let prompt = testing::user_prompt(&mock);
        assert!(prompt.contains("Crop: maize"));
        assert!(prompt.contains("- P: 15.0"));
    }
}
