//! Prompt templates for the recommendation modules

mod embedded;
mod loader;

pub use embedded::get_embedded;
pub use loader::PromptLoader;
