pub mod client;
pub mod types;

use crate::{
    config::GenAiConfig,
    error::{RelayError, Result},
    models::GenerationResult,
};
use async_trait::async_trait;
use std::env;
use std::sync::{Arc, Mutex};

pub use client::GenAiClient;

/// Turns a prompt into an image. The request handler only sees this trait.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<GenerationResult>;
}

/// Where the API key comes from on each call.
#[derive(Debug, Clone)]
pub enum ApiKeySource {
    /// Read the named environment variable every time.
    Env(String),
    Fixed(Option<String>),
}

impl ApiKeySource {
    /// The current key, treating an empty value as absent.
    pub fn resolve(&self) -> Option<String> {
        let key = match self {
            ApiKeySource::Env(var) => env::var(var).ok(),
            ApiKeySource::Fixed(key) => key.clone(),
        };
        key.filter(|k| !k.is_empty())
    }
}

struct CachedClient {
    api_key: String,
    client: Arc<GenAiClient>,
}

/// Holds at most one upstream client, keyed by the API key it was built with.
pub struct KeyedClientCache {
    config: GenAiConfig,
    slot: Mutex<Option<CachedClient>>,
}

impl KeyedClientCache {
    pub fn new(config: GenAiConfig) -> Self {
        Self {
            config,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached client when `api_key` matches, otherwise build and
    /// cache a new one. Concurrent rebuilds for the same key are harmless.
    pub fn get_or_create(&self, api_key: &str) -> Arc<GenAiClient> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(cached) = slot.as_ref() {
            if cached.api_key == api_key {
                return Arc::clone(&cached.client);
            }
            log::info!("API key changed, rebuilding upstream client");
        }

        let client = Arc::new(GenAiClient::new(api_key, &self.config));
        *slot = Some(CachedClient {
            api_key: api_key.to_string(),
            client: Arc::clone(&client),
        });
        client
    }
}

/// [`ImageGenerator`] backed by the generative-content API.
pub struct GenAiImageClient {
    key_source: ApiKeySource,
    cache: KeyedClientCache,
}

impl GenAiImageClient {
    pub fn new(config: GenAiConfig) -> Self {
        let key_source = ApiKeySource::Env(config.api_key_var.clone());
        Self::with_key_source(config, key_source)
    }

    pub fn with_key_source(config: GenAiConfig, key_source: ApiKeySource) -> Self {
        Self {
            key_source,
            cache: KeyedClientCache::new(config),
        }
    }

    fn client(&self) -> Result<Arc<GenAiClient>> {
        let api_key = self.key_source.resolve().ok_or(RelayError::MissingApiKey)?;
        Ok(self.cache.get_or_create(&api_key))
    }
}

#[async_trait]
impl ImageGenerator for GenAiImageClient {
    async fn generate_image(&self, prompt: &str) -> Result<GenerationResult> {
        let client = self.client()?;

        log::debug!("Calling {}", client.endpoint());
        let response = client.generate_content(prompt).await?;

        response.first_inline_image().ok_or_else(|| {
            let reasons: Vec<&str> = response
                .candidates
                .iter()
                .filter_map(|c| c.finish_reason.as_deref())
                .collect();
            log::warn!(
                "Upstream returned {} candidate(s) without inline image data (finish reasons: {:?})",
                response.candidates.len(),
                reasons
            );
            RelayError::NoImageContent
        })
    }
}
