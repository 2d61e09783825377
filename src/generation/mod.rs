//! Character image generation
//!
//! A prompt goes through validation and sanitization, is handed to an
//! [`ImageGenerator`] and the resulting image URL is recorded in a
//! [`GenerationStore`]. Storage is best effort: a generated image is returned
//! to the client even when it could not be saved.

pub mod sanitize;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::models::Generation;

pub use sanitize::{sanitize_input, validate_prompt};
pub use store::{GenerationStore, InMemoryGenerationStore, MySqlGenerationStore};

/// Longest image URL accepted by the `generations` table
const MAX_IMAGE_URL_LENGTH: usize = 500;

const STORAGE_WARNING: &str = "تم توليد الصورة لكن فشل حفظها في قاعدة البيانات";

/// Error type for generation requests
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("{0}")]
    InvalidPrompt(String),

    #[error("تم تجاوز الحد المسموح من الطلبات، حاول مرة أخرى لاحقاً")]
    RateLimited,

    #[error("Image provider error: {0}")]
    Api(String),

    #[error("لم يتم إرجاع URL للصورة")]
    EmptyResult,
}

/// Text-to-image backend
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// URL of an image generated for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Returns a fixed placeholder image until a real provider is configured
pub struct PlaceholderImageGenerator {
    url: String,
}

impl PlaceholderImageGenerator {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl ImageGenerator for PlaceholderImageGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Ok(self.url.clone())
    }
}

/// Result of a successful generation request
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub image_url: String,
    pub generation_id: Option<u64>,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Validates prompts, generates images and records them
#[derive(Clone)]
pub struct GenerationService {
    generator: Arc<dyn ImageGenerator>,
    store: Option<Arc<dyn GenerationStore>>,
    max_prompt_length: usize,
}

impl GenerationService {
    #[must_use]
    pub fn new(
        generator: Arc<dyn ImageGenerator>,
        store: Option<Arc<dyn GenerationStore>>,
        max_prompt_length: usize,
    ) -> Self {
        Self {
            generator,
            store,
            max_prompt_length,
        }
    }

    /// Generate an image for `raw_prompt` and try to persist it
    #[instrument(skip_all)]
    pub async fn generate(&self, raw_prompt: &str) -> Result<GenerationOutcome, GenerationError> {
        let prompt = raw_prompt.trim();
        validate_prompt(prompt, self.max_prompt_length)?;
        let prompt = sanitize_input(prompt, self.max_prompt_length);

        info!(prompt = %prompt, "Generating image");
        let image_url = self.generator.generate(&prompt).await?;
        if image_url.trim().is_empty() {
            return Err(GenerationError::EmptyResult);
        }
        info!(image_url = %image_url, "Image generated");

        let Some(store) = &self.store else {
            warn!("No database configured, generation not saved");
            return Ok(GenerationOutcome {
                image_url,
                generation_id: None,
                prompt,
                warning: Some(STORAGE_WARNING.to_string()),
            });
        };

        let safe_url = sanitize_input(&image_url, MAX_IMAGE_URL_LENGTH);
        let (generation_id, warning) = match store.insert(&prompt, &safe_url).await {
            Ok(id) => (Some(id), None),
            Err(e) => {
                warn!(error = %e, "Failed to save generation");
                (None, Some(STORAGE_WARNING.to_string()))
            }
        };

        Ok(GenerationOutcome {
            image_url,
            generation_id,
            prompt,
            warning,
        })
    }

    /// Recent gallery entries; empty when storage is missing or failing
    pub async fn recent(&self, limit: usize) -> Vec<Generation> {
        let Some(store) = &self.store else {
            return Vec::new();
        };
        match store.recent(limit).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "Failed to fetch generations");
                Vec::new()
            }
        }
    }
}
