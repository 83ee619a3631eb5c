//! Advisor - concurrent fan-out of the recommendation modules
//!
//! All six modules run as independent tasks on a bounded pool. The advisor
//! waits for every task to finish, then walks the results in module order:
//! the first failure aborts the report and the synthesis call never runs.

use std::sync::Arc;

use agronomy::{ClimateSource, ReferenceData};
use futures::future::join_all;
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::error::RecommendError;
use crate::inputs::FieldInputs;
use crate::llm::Recommendation;
use crate::modules::{
    CompactionRankingModule, CoverCropMixModule, DecompactionModule, FinalSynthesizer, Generator, ModuleKind,
    NpkModule, PlantTimingModule, RecommendationModule, SeedTreatmentModule, SynthesisSection,
};

/// One module's recommendation within a report
#[derive(Debug, Clone, Serialize)]
pub struct ModuleOutput {
    pub module: ModuleKind,
    pub recommendation: Recommendation,
}

/// Full pipeline result
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Module outputs in pipeline order
    pub sections: Vec<ModuleOutput>,
    pub synthesis: Recommendation,
}

impl Report {
    pub fn section(&self, module: ModuleKind) -> Option<&Recommendation> {
        self.sections
            .iter()
            .find(|s| s.module == module)
            .map(|s| &s.recommendation)
    }
}

pub struct Advisor {
    modules: Vec<Arc<dyn RecommendationModule>>,
    synthesizer: FinalSynthesizer,
    semaphore: Arc<Semaphore>,
}

impl Advisor {
    pub fn new(
        modules: Vec<Arc<dyn RecommendationModule>>,
        synthesizer: FinalSynthesizer,
        max_parallel_calls: usize,
    ) -> Self {
        Self {
            modules,
            synthesizer,
            semaphore: Arc::new(Semaphore::new(max_parallel_calls.max(1))),
        }
    }

    /// Build the six modules from the reference tables, in pipeline order
    pub fn from_reference(
        data: &ReferenceData,
        climate: Arc<dyn ClimateSource>,
        generator: Generator,
        max_parallel_calls: usize,
    ) -> Self {
        let modules: Vec<Arc<dyn RecommendationModule>> = vec![
            Arc::new(NpkModule::from_reference(data, generator.clone())),
            Arc::new(SeedTreatmentModule::from_reference(data, generator.clone())),
            Arc::new(DecompactionModule::from_reference(data, generator.clone())),
            Arc::new(CoverCropMixModule::from_reference(data, generator.clone())),
            Arc::new(PlantTimingModule::from_reference(data, climate, generator.clone())),
            Arc::new(CompactionRankingModule::from_reference(data, generator.clone())),
        ];
        Self::new(modules, FinalSynthesizer::new(generator), max_parallel_calls)
    }

    pub fn module(&self, kind: ModuleKind) -> Option<&Arc<dyn RecommendationModule>> {
        self.modules.iter().find(|m| m.kind() == kind)
    }

    /// Run a single module on its own
    pub async fn run_module(&self, kind: ModuleKind, inputs: &FieldInputs) -> Result<Recommendation, RecommendError> {
        debug!(%kind, "run_module: called");
        let module = self.module(kind).ok_or(RecommendError::NotInPipeline(kind))?;
        module.recommend(inputs).await
    }

    /// Run every module concurrently, then synthesize their conclusions
    pub async fn advise(&self, inputs: &FieldInputs) -> Result<Report, RecommendError> {
        debug!(module_count = self.modules.len(), "advise: called");
        let inputs = Arc::new(inputs.clone());

        let handles: Vec<_> = self
            .modules
            .iter()
            .map(|module| {
                let module = module.clone();
                let inputs = inputs.clone();
                let semaphore = self.semaphore.clone();
                tokio::spawn(async move {
                    let kind = module.kind();
                    let permit = semaphore.acquire_owned().await.map_err(|e| RecommendError::Task {
                        module: kind,
                        message: e.to_string(),
                    })?;
                    debug!(%kind, "advise: module started");
                    let result = module.recommend(&inputs).await;
                    drop(permit);
                    result
                })
            })
            .collect();

        // Barrier: nothing proceeds until every module task has returned
        let results = join_all(handles).await;

        let mut sections = Vec::with_capacity(results.len());
        for (module, joined) in self.modules.iter().zip(results) {
            let kind = module.kind();
            let recommendation = match joined {
                Ok(Ok(recommendation)) => recommendation,
                Ok(Err(e)) => {
                    error!(%kind, error = %e, "advise: module failed");
                    return Err(e);
                }
                Err(e) => {
                    error!(%kind, error = %e, "advise: module task aborted");
                    return Err(RecommendError::Task {
                        module: kind,
                        message: e.to_string(),
                    });
                }
            };
            sections.push(ModuleOutput {
                module: kind,
                recommendation,
            });
        }
        info!(section_count = sections.len(), "advise: all modules finished");

        let synthesis_input: Vec<SynthesisSection<'_>> = sections
            .iter()
            .map(|s| SynthesisSection {
                title: s.module.title(),
                conclusion: &s.recommendation.conclusion,
            })
            .collect();
        let synthesis = self.synthesizer.recommend(inputs.crop_type(), &synthesis_input).await?;

        Ok(Report { sections, synthesis })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agronomy::StaticClimate;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::inputs::fixtures;
    use crate::llm::client::mock::MockLlmClient;
    use crate::modules::testing;

    fn advisor(mock: Arc<MockLlmClient>, max_parallel_calls: usize) -> Advisor {
        Advisor::from_reference(
            &testing::reference_data(),
            Arc::new(StaticClimate),
            testing::generator(mock),
            max_parallel_calls,
        )
    }

    #[tokio::test]
    async fn test_advise_runs_all_modules_then_synthesis() {
        let mock = Arc::new(MockLlmClient::repeating(
            "### Reasoning Section\nbecause\n### Conclusion Section\ndo this",
        ));
        let report = advisor(mock.clone(), 6).advise(&fixtures::field()).await.unwrap();

        let order: Vec<ModuleKind> = report.sections.iter().map(|s| s.module).collect();
        assert_eq!(order, ModuleKind::PIPELINE.to_vec());
        assert_eq!(report.synthesis.conclusion, "do this");
        assert_eq!(mock.call_count(), 7);

        // Synthesis is the last call and sees only the conclusions
        let requests = mock.requests();
        let last = &requests[6].messages[0].content;
        assert!(last.contains("## Compaction risk\ndo this"));
        assert!(!last.contains("because"));
    }

    #[tokio::test]
    async fn test_one_failure_prevents_synthesis() {
        let mock = Arc::new(MockLlmClient::repeating("ok").fail_on("inoculant specialist"));
        let err = advisor(mock.clone(), 6).advise(&fixtures::field()).await.unwrap_err();

        assert_eq!(err.module(), Some(ModuleKind::SeedTreatment));
        // Six module calls were made, the synthesis call never was
        assert_eq!(mock.call_count(), 6);
        assert!(
            mock.requests()
                .iter()
                .all(|r| !r.system_prompt.contains("senior farm advisor"))
        );
    }

    #[tokio::test]
    async fn test_first_failure_in_module_order_wins() {
        let mock = Arc::new(
            MockLlmClient::repeating("ok")
                .fail_on("crop establishment advisor")
                .fail_on("soil fertility advisor"),
        );
        let err = advisor(mock, 6).advise(&fixtures::field()).await.unwrap_err();
        assert_eq!(err.module(), Some(ModuleKind::Npk));
    }

    #[tokio::test]
    async fn test_invalid_argument_surfaces_without_synthesis() {
        let mock = Arc::new(MockLlmClient::repeating("ok"));
        let mut inputs = fixtures::field();
        inputs.management.compaction_measurement = None;

        let err = advisor(mock.clone(), 6).advise(&inputs).await.unwrap_err();
        assert!(err.is_invalid_argument());
        // The other five modules still ran behind the barrier
        assert_eq!(mock.call_count(), 5);
    }

    #[tokio::test]
    async fn test_run_module_makes_one_call() {
        let mock = Arc::new(MockLlmClient::repeating("single"));
        let advisor = advisor(mock.clone(), 1);
        let rec = advisor
            .run_module(ModuleKind::CoverCropMix, &fixtures::field())
            .await
            .unwrap();
        assert_eq!(rec.conclusion, "single");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_run_module_rejects_synthesis() {
        let mock = Arc::new(MockLlmClient::repeating("single"));
        let advisor = advisor(mock.clone(), 1);
        let err = advisor
            .run_module(ModuleKind::Synthesis, &fixtures::field())
            .await
            .unwrap_err();
        assert!(matches!(err, RecommendError::NotInPipeline(ModuleKind::Synthesis)));
        assert!(err.is_invalid_argument());
        assert_eq!(mock.call_count(), 0);
    }

    /// Records the peak number of concurrent recommend calls
    struct SlowModule {
        kind: ModuleKind,
        active: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RecommendationModule for SlowModule {
        fn kind(&self) -> ModuleKind {
            self.kind
        }

        async fn recommend(&self, _inputs: &FieldInputs) -> Result<Recommendation, RecommendError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(Recommendation::parse(self.kind.name()))
        }
    }

    #[tokio::test]
    async fn test_pool_bounds_parallel_calls() {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let modules: Vec<Arc<dyn RecommendationModule>> = ModuleKind::PIPELINE
            .iter()
            .map(|&kind| {
                Arc::new(SlowModule {
                    kind,
                    active: active.clone(),
                    peak: peak.clone(),
                }) as Arc<dyn RecommendationModule>
            })
            .collect();

        let mock = Arc::new(MockLlmClient::repeating("plan"));
        let advisor = Advisor::new(modules, FinalSynthesizer::new(testing::generator(mock)), 2);
        let report = advisor.advise(&fixtures::field()).await.unwrap();

        assert_eq!(report.sections.len(), 6);
        assert_eq!(report.section(ModuleKind::PlantTiming).unwrap().conclusion, "plant-timing");
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }
}
