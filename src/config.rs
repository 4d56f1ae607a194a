use std::env;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_STATIC_ROOT: &str = "public";
pub const DEFAULT_BODY_LIMIT: usize = 1_000_000;

pub const API_KEY_VAR: &str = "GOOGLE_GENAI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Settings for the upstream generative-content API.
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    /// Name of the environment variable the API key is read from on every call.
    pub api_key_var: String,
    pub model: String,
    pub base_url: String,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        GenAiConfig {
            api_key_var: API_KEY_VAR.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl GenAiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key_var(mut self, var: impl Into<String>) -> Self {
        self.api_key_var = var.into();
        self
    }

    pub fn api_key_present(&self) -> bool {
        env::var(&self.api_key_var)
            .map(|key| !key.is_empty())
            .unwrap_or(false)
    }
}

/// Process configuration. Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub static_root: PathBuf,
    pub body_limit: usize,
    pub genai: GenAiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_root: PathBuf::from(DEFAULT_STATIC_ROOT),
            body_limit: DEFAULT_BODY_LIMIT,
            genai: GenAiConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `HOST`, `PORT`, `STATIC_ROOT` and `BODY_LIMIT_BYTES`.
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let host = env::var("HOST")
            .ok()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.trim().parse().ok())
            .filter(|p| *p != 0)
            .unwrap_or(DEFAULT_PORT);
        let static_root = env::var("STATIC_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_ROOT));
        let body_limit = env::var("BODY_LIMIT_BYTES")
            .ok()
            .and_then(|l| l.trim().parse().ok())
            .unwrap_or(DEFAULT_BODY_LIMIT);

        Config {
            host,
            port,
            static_root,
            body_limit,
            genai: GenAiConfig::default(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_static_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.static_root = root.into();
        self
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn with_genai(mut self, genai: GenAiConfig) -> Self {
        self.genai = genai;
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_setup() {
        let config = Config::new();
        assert_eq!(config.bind_address(), "127.0.0.1:4000");
        assert_eq!(config.body_limit, 1_000_000);
        assert_eq!(config.static_root, PathBuf::from("public"));
        assert_eq!(config.genai.model, "gemini-2.5-flash-image-preview");
        assert_eq!(config.genai.api_key_var, "GOOGLE_GENAI_API_KEY");
    }

    #[test]
    fn builder_overrides() {
        let config = Config::new()
            .with_host("0.0.0.0")
            .with_port(8080)
            .with_body_limit(10)
            .with_genai(GenAiConfig::new().with_base_url("http://localhost:9999/"));

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.body_limit, 10);
        assert_eq!(config.genai.base_url, "http://localhost:9999");
    }

    #[test]
    fn api_key_presence_ignores_empty_values() {
        let genai = GenAiConfig::new().with_api_key_var("IMAGELAB_TEST_EMPTY_KEY");
        env::set_var("IMAGELAB_TEST_EMPTY_KEY", "");
        assert!(!genai.api_key_present());
        env::set_var("IMAGELAB_TEST_EMPTY_KEY", "abc");
        assert!(genai.api_key_present());
    }
}
