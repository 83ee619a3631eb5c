//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to
//! embedded defaults, and renders them in strict mode.

use std::path::{Path, PathBuf};

use handlebars::{Handlebars, no_escape};
use serde::Serialize;
use tracing::debug;

use super::embedded;
use crate::error::RecommendError;

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// Override directory searched for `<name>.pmt`
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that checks `override_dir` before the embedded prompts
    pub fn new(override_dir: Option<&Path>) -> Self {
        let override_dir = override_dir.filter(|d| d.exists()).map(Path::to_path_buf);
        if override_dir.is_none() {
            debug!("PromptLoader::new: no override directory, using embedded prompts");
        }
        Self {
            hbs: Self::engine(),
            override_dir,
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        Self {
            hbs: Self::engine(),
            override_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        hbs.register_escape_fn(no_escape);
        // The partial is embedded and known to parse
        if let Err(e) = hbs.register_partial("answer-format", embedded::ANSWER_FORMAT) {
            tracing::warn!("Failed to register answer-format partial: {}", e);
        }
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. Override: `<override_dir>/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String, RecommendError> {
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!("Loading prompt from override: {:?}", path);
                return std::fs::read_to_string(&path).map_err(|e| RecommendError::Template {
                    template: name.to_string(),
                    message: format!("Failed to read {}: {}", path.display(), e),
                });
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!("Using embedded prompt: {}", name);
            return Ok(content.to_string());
        }

        Err(RecommendError::Template {
            template: name.to_string(),
            message: "Prompt template not found".to_string(),
        })
    }

    /// Render a template with the given context
    ///
    /// Fails when the template references a field the context does not carry.
    pub fn render<C: Serialize>(&self, template_name: &str, context: &C) -> Result<String, RecommendError> {
        let template = self.load_template(template_name)?;
        debug!(template = %template_name, "render: called");

        self.hbs
            .render_template(&template, context)
            .map_err(|e| RecommendError::Template {
                template: template_name.to_string(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_render_embedded_system_prompt_includes_partial() {
        let loader = PromptLoader::embedded_only();
        let rendered = loader.render("npk-system", &json!({})).unwrap();
        assert!(rendered.contains("soil fertility advisor"));
        assert!(rendered.contains("### Conclusion Section"));
    }

    #[test]
    fn test_missing_field_is_template_fault() {
        let loader = PromptLoader::embedded_only();
        let err = loader.render("npk-user", &json!({"crop_type": "maize"})).unwrap_err();
        match err {
            RecommendError::Template { template, .. } => assert_eq!(template, "npk-user"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_values_are_not_html_escaped() {
        let loader = PromptLoader::embedded_only();
        let rendered = loader
            .render(
                "final-user",
                &json!({"crop_type": "maize", "sections": [{"title": "NPK", "conclusion": "N < 50 & P > 10"}]}),
            )
            .unwrap();
        assert!(rendered.contains("N < 50 & P > 10"));
    }

    #[test]
    fn test_override_dir_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("npk-user.pmt"), "Custom {{crop_type}}").unwrap();
        let loader = PromptLoader::new(Some(dir.path()));
        assert_eq!(loader.render("npk-user", &json!({"crop_type": "rice"})).unwrap(), "Custom rice");
        // Templates without an override still come from the embedded set
        assert!(loader.render("npk-system", &json!({})).is_ok());
    }

    #[test]
    fn test_override_with_unknown_field_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("npk-user.pmt"), "{{not_a_field}}").unwrap();
        let loader = PromptLoader::new(Some(dir.path()));
        assert!(loader.render("npk-user", &json!({"crop_type": "rice"})).is_err());
    }

    #[test]
    fn test_unknown_template() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.load_template("nonexistent-template").is_err());
    }
}
