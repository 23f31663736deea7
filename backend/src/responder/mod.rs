use async_trait::async_trait;
use shared::models::{Character, ChatMessage};
use std::sync::Arc;
use thiserror::Error;

pub mod keyword;
pub mod openai;

#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("completion backend error: {0}")]
    Backend(String),
}

/// Produces the next assistant message from a character and the ordered
/// conversation history. Implementations are swappable without touching the
/// chat handlers.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(
        &self,
        character: &Character,
        history: &[ChatMessage],
    ) -> Result<String, ResponderError>;
}

#[derive(Clone, Debug)]
pub enum ResponderConfig {
    /// Canned keyword-matched replies; no external calls.
    Keyword,
    /// Chat-completion backend over the OpenAI wire protocol.
    OpenAi {
        api_key: String,
        api_base: Option<String>,
        model: String,
    },
}

pub fn build(config: &ResponderConfig) -> Arc<dyn Responder> {
    match config {
        ResponderConfig::Keyword => Arc::new(keyword::KeywordResponder),
        ResponderConfig::OpenAi {
            api_key,
            api_base,
            model,
        } => Arc::new(openai::OpenAiResponder::new(
            api_key,
            api_base.as_deref(),
            model,
        )),
    }
}
