//! Structured reasoning/conclusion result of a generation call

use serde::{Deserialize, Serialize};

/// Marker preceding the terminal answer block of a generated recommendation
pub const CONCLUSION_MARKER: &str = "### Conclusion Section\n";

/// Marker preceding the explanation block
pub const REASONING_MARKER: &str = "### Reasoning Section\n";

/// Text after the last conclusion marker, or the whole text when there is none
pub fn trailing_section(text: &str) -> &str {
    match text.rfind(CONCLUSION_MARKER) {
        Some(idx) => &text[idx + CONCLUSION_MARKER.len()..],
        None => text,
    }
}

/// A generated recommendation split into its two sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub reasoning: String,
    pub conclusion: String,
}

impl Recommendation {
    pub fn parse(text: &str) -> Self {
        let Some(idx) = text.rfind(CONCLUSION_MARKER) else {
            return Self {
                reasoning: String::new(),
                conclusion: text.trim().to_string(),
            };
        };

        let head = text[..idx].trim_start();
        let reasoning = head.strip_prefix(REASONING_MARKER).unwrap_or(head);
        Self {
            reasoning: reasoning.trim().to_string(),
            conclusion: text[idx + CONCLUSION_MARKER.len()..].trim().to_string(),
        }
    }

    pub fn has_reasoning(&self) -> bool {
        !self.reasoning.is_empty()
    }
}
