//! AI-generated sleep hygiene tips.
//!
//! A record's duration, quality, and notes go in as plain values; an
//! opaque text blob comes back. Backend failure never surfaces as an
//! error to callers of [`TipGenerator::generate_or_fallback`] — they get
//! the fixed [`FALLBACK_TIP`] instead.

pub mod backend;

pub use backend::{OllamaBackend, TipBackend};

#[cfg(feature = "remote-ai")]
pub use backend::AnthropicBackend;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur while generating tips.
#[derive(Debug, Error)]
pub enum TipError {
    #[error("AI backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("AI response unparseable: {0}")]
    ResponseParse(String),
}

/// Fixed text substituted whenever the backend fails.
pub const FALLBACK_TIP: &str =
    "Sorry, sleep tips can't be generated right now. Please try again later.";

const SYSTEM_PROMPT: &str = "You are a sleep wellness assistant. Based on the user's \
sleep data, give 3 practical, personalized tips to improve their sleep, focused on \
sleep hygiene and healthy routines. Keep the tips direct and easy to follow. Do not \
give medical diagnoses. Format the answer as a numbered list.";

/// The inputs a tip request is derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipRequest {
    /// Slept duration as displayed (e.g. `"7h 30m"`).
    pub duration: String,

    /// Quality rating, 1-5.
    pub quality: u8,

    /// Free-text notes, possibly empty.
    #[serde(default)]
    pub notes: String,
}

/// Turns sleep metrics into advice via a [`TipBackend`].
pub struct TipGenerator {
    backend: Arc<dyn TipBackend>,
}

impl TipGenerator {
    pub fn new(backend: Arc<dyn TipBackend>) -> Self {
        Self { backend }
    }

    /// Ask the backend for tips. Errors propagate.
    pub async fn generate(&self, request: &TipRequest) -> Result<String, TipError> {
        let prompt = build_prompt(request);
        let text = self.backend.complete(SYSTEM_PROMPT, &prompt).await?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TipError::ResponseParse("empty completion".to_string()));
        }
        Ok(trimmed.to_string())
    }

    /// Ask the backend for tips, substituting [`FALLBACK_TIP`] on any
    /// failure.
    pub async fn generate_or_fallback(&self, request: &TipRequest) -> String {
        match self.generate(request).await {
            Ok(tips) => tips,
            Err(e) => {
                warn!("Tip generation failed, using fallback: {}", e);
                FALLBACK_TIP.to_string()
            }
        }
    }

    /// Whether the backend looks reachable.
    pub async fn backend_available(&self) -> bool {
        self.backend.health_check().await.unwrap_or(false)
    }

    /// Backend name, for logging and the health endpoint.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}

fn build_prompt(request: &TipRequest) -> String {
    let notes = if request.notes.trim().is_empty() {
        "none"
    } else {
        request.notes.trim()
    };

    format!(
        "Last night's sleep:\n\
         - Duration: {}\n\
         - Quality (scale of 1 to 5): {}\n\
         - Additional notes: {}",
        request.duration, request.quality, notes
    )
}
