//! Final synthesis of the module conclusions into one field plan

use serde::Serialize;
use tracing::debug;

use super::{Generator, ModuleKind};
use crate::error::RecommendError;
use crate::llm::Recommendation;

/// One module's conclusion as fed to the synthesis prompt
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisSection<'a> {
    pub title: &'static str,
    pub conclusion: &'a str,
}

#[derive(Debug, Serialize)]
struct SynthesisContext<'a> {
    crop_type: &'a str,
    sections: &'a [SynthesisSection<'a>],
}

pub struct FinalSynthesizer {
    generator: Generator,
}

impl FinalSynthesizer {
    pub fn new(generator: Generator) -> Self {
        Self { generator }
    }

    /// One more prompt substitution and generation call over the module conclusions
    pub async fn recommend(
        &self,
        crop_type: &str,
        sections: &[SynthesisSection<'_>],
    ) -> Result<Recommendation, RecommendError> {
        debug!(%crop_type, section_count = sections.len(), "FinalSynthesizer::recommend: called");
        let context = SynthesisContext { crop_type, sections };
        self.generator.run(ModuleKind::Synthesis, &context).await
    }
}
