//! Generation collaborator
//!
//! Every recommendation module talks to the text-generation service through
//! [`LlmClient`]; [`generate`] is the single-turn wrapper that returns a
//! structured [`Recommendation`].

use std::sync::Arc;

use tracing::debug;

mod chat;
pub mod client;
mod error;
mod recommendation;
mod types;

pub use chat::ChatClient;
pub use client::LlmClient;
pub use error::LlmError;
pub use recommendation::{CONCLUSION_MARKER, REASONING_MARKER, Recommendation, trailing_section};
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage};

use crate::config::ResolvedLlmConfig;

/// Providers that speak the chat-completions protocol
pub const SUPPORTED_PROVIDERS: [&str; 3] = ["together", "openrouter", "openai"];

/// Create an LLM client for the configured provider
pub fn create_client(config: &ResolvedLlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    if SUPPORTED_PROVIDERS.contains(&config.provider.as_str()) {
        Ok(Arc::new(ChatClient::from_config(config)?))
    } else {
        debug!(provider = %config.provider, "create_client: unknown provider");
        Err(LlmError::InvalidResponse(format!(
            "Unknown LLM provider: '{}'. Supported: {}",
            config.provider,
            SUPPORTED_PROVIDERS.join(", ")
        )))
    }
}

/// One generation call: system + user prompt in, structured recommendation out
pub async fn generate(
    llm: &Arc<dyn LlmClient>,
    system_prompt: &str,
    user_prompt: &str,
    max_tokens: u32,
) -> Result<Recommendation, LlmError> {
    debug!(system_len = system_prompt.len(), user_len = user_prompt.len(), "generate: called");
    let request = CompletionRequest::single_turn(system_prompt, user_prompt, max_tokens);
    let response = llm.complete(request).await?;

    if response.stop_reason == StopReason::MaxTokens {
        debug!("generate: response truncated at max tokens");
    }
    let text = response
        .content
        .ok_or_else(|| LlmError::InvalidResponse("Response contained no text".to_string()))?;
    Ok(Recommendation::parse(&text))
}
