//! Recommendation pipeline error types

use agronomy::AgronomyError;
use thiserror::Error;

use crate::llm::LlmError;
use crate::modules::ModuleKind;

/// Faults surfaced by a recommendation module or the advisor
#[derive(Debug, Error)]
pub enum RecommendError {
    /// Deterministic pre-computation failed (lookup miss, invalid argument)
    #[error(transparent)]
    Agronomy(#[from] AgronomyError),

    /// A prompt template could not be loaded or references a missing field
    #[error("Failed to render prompt template '{template}': {message}")]
    Template { template: String, message: String },

    /// The generation collaborator failed
    #[error("{module} generation failed: {source}")]
    Generation {
        module: ModuleKind,
        #[source]
        source: LlmError,
    },

    /// The requested module cannot run on its own
    #[error("{0} is not a pipeline module")]
    NotInPipeline(ModuleKind),

    /// A module task panicked or was cancelled before returning
    #[error("{module} task failed: {message}")]
    Task { module: ModuleKind, message: String },
}

impl RecommendError {
    /// Module the failure belongs to, when known
    pub fn module(&self) -> Option<ModuleKind> {
        match self {
            RecommendError::Generation { module, .. } | RecommendError::Task { module, .. } => Some(*module),
            RecommendError::NotInPipeline(module) => Some(*module),
            _ => None,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            RecommendError::Agronomy(AgronomyError::InvalidArgument(_)) | RecommendError::NotInPipeline(_)
        )
    }
}
