//! HTTP relay that turns a text prompt into a generated image and serves
//! the static demo page that calls it.

pub mod config;
pub mod env_file;
pub mod error;
pub mod genai;
pub mod logger;
pub mod models;
pub mod server;

pub use config::{Config, GenAiConfig};
pub use error::{RelayError, Result};
pub use genai::{ApiKeySource, GenAiImageClient, ImageGenerator};
pub use models::{GenerateImageResponse, GenerationRequest, GenerationResult};
