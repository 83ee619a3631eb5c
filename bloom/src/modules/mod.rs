//! Recommendation modules
//!
//! Each module runs its deterministic pre-computation against the reference
//! tables, renders its prompt pair and makes exactly one generation call.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RecommendError;
use crate::inputs::FieldInputs;
use crate::llm::{self, LlmClient, Recommendation};
use crate::prompts::PromptLoader;

mod compaction_ranking;
mod cover_crop_mix;
mod decompaction;
mod final_synthesis;
mod npk;
mod plant_timing;
mod seed_treatment;

pub use compaction_ranking::CompactionRankingModule;
pub use cover_crop_mix::CoverCropMixModule;
pub use decompaction::DecompactionModule;
pub use final_synthesis::{FinalSynthesizer, SynthesisSection};
pub use npk::NpkModule;
pub use plant_timing::PlantTimingModule;
pub use seed_treatment::SeedTreatmentModule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleKind {
    Npk,
    SeedTreatment,
    Decompaction,
    CoverCropMix,
    PlantTiming,
    CompactionRanking,
    Synthesis,
}

impl ModuleKind {
    /// The six independent modules, in report order
    pub const PIPELINE: [ModuleKind; 6] = [
        ModuleKind::Npk,
        ModuleKind::SeedTreatment,
        ModuleKind::Decompaction,
        ModuleKind::CoverCropMix,
        ModuleKind::PlantTiming,
        ModuleKind::CompactionRanking,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Npk => "npk",
            Self::SeedTreatment => "seed-treatment",
            Self::Decompaction => "decompaction",
            Self::CoverCropMix => "cover-crop-mix",
            Self::PlantTiming => "plant-timing",
            Self::CompactionRanking => "compaction-ranking",
            Self::Synthesis => "final",
        }
    }

    /// Heading used in reports and the synthesis prompt
    pub fn title(&self) -> &'static str {
        match self {
            Self::Npk => "Fertilizer (NPK)",
            Self::SeedTreatment => "Seed treatment",
            Self::Decompaction => "Decompaction",
            Self::CoverCropMix => "Cover crop mix",
            Self::PlantTiming => "Planting window",
            Self::CompactionRanking => "Compaction risk",
            Self::Synthesis => "Field plan",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ModuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleKind::PIPELINE
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = ModuleKind::PIPELINE.iter().map(|k| k.name()).collect();
                format!("Unknown module '{}'. Expected one of: {}", s, names.join(", "))
            })
    }
}

/// Renders a module's prompt pair and makes its generation call
#[derive(Clone)]
pub struct Generator {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
    max_tokens: u32,
}

impl Generator {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, max_tokens: u32) -> Self {
        Self {
            llm,
            prompts,
            max_tokens,
        }
    }

    /// Generate with the module's own `<name>-system`/`<name>-user` templates
    pub async fn run<C: Serialize + Sync>(&self, module: ModuleKind, context: &C) -> Result<Recommendation, RecommendError> {
        self.run_template(module, module.name(), context).await
    }

    /// Generate with the `<template>-system`/`<template>-user` pair
    pub async fn run_template<C: Serialize + Sync>(
        &self,
        module: ModuleKind,
        template: &str,
        context: &C,
    ) -> Result<Recommendation, RecommendError> {
        debug!(%module, %template, "run_template: called");
        // Both templates render before the call so substitution faults cost no request
        let system = self.prompts.render(&format!("{}-system", template), context)?;
        let user = self.prompts.render(&format!("{}-user", template), context)?;

        llm::generate(&self.llm, &system, &user, self.max_tokens)
            .await
            .map_err(|source| RecommendError::Generation { module, source })
    }
}

/// One independent recommendation module
#[async_trait]
pub trait RecommendationModule: Send + Sync {
    fn kind(&self) -> ModuleKind;

    async fn recommend(&self, inputs: &FieldInputs) -> Result<Recommendation, RecommendError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;
    use agronomy::ReferenceData;
    use std::path::Path;

    pub fn reference_data() -> Arc<ReferenceData> {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../data");
        Arc::new(ReferenceData::load(dir).unwrap())
    }

    pub fn generator(mock: Arc<MockLlmClient>) -> Generator {
        Generator::new(mock, Arc::new(PromptLoader::embedded_only()), 1024)
    }

    /// Text of the single user prompt the mock received
    pub fn user_prompt(mock: &MockLlmClient) -> String {
        let requests = mock.requests();
        assert_eq!(requests.len(), 1, "expected exactly one generation call");
        requests[0].messages[0].content.clone()
    }
}
