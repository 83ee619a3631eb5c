//! Bloom - agronomic recommendation pipeline
//!
//! Six independent modules (fertilizer, seed treatment, decompaction, cover
//! crop mix, planting window, compaction risk) each run a deterministic
//! pre-computation from [`agronomy`] and one text-generation call. The
//! [`orchestrator::Advisor`] runs them concurrently and merges their
//! conclusions into a single field plan.
//!
//! # Modules
//!
//! - [`llm`] - generation client trait and chat-completions implementation
//! - [`prompts`] - Handlebars prompt templates
//! - [`modules`] - the recommendation modules and final synthesis
//! - [`orchestrator`] - concurrent fan-out and report assembly
//! - [`inputs`] - field inputs
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod inputs;
pub mod llm;
pub mod modules;
pub mod orchestrator;
pub mod prompts;

pub use config::{Config, LlmConfig, ResolvedLlmConfig};
pub use error::RecommendError;
pub use inputs::FieldInputs;
pub use llm::{LlmClient, LlmError, Recommendation, create_client, generate};
pub use modules::{Generator, ModuleKind, RecommendationModule};
pub use orchestrator::{Advisor, ModuleOutput, Report};
pub use prompts::PromptLoader;
