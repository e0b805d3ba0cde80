//! Configuration loading and validation for the HTTP service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or
//! invalid, including a key of the wrong length.

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use sealer::KeyMaterial;
use serde::Deserialize;
use zeroize::Zeroize;

/// How `ENCRYPTION_KEY` is written in the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEncoding {
    /// Standard base64 of the 32 key bytes.
    Base64,
    /// The key bytes are the UTF-8 text itself (32 ASCII characters).
    Utf8,
}

/// Validated service configuration.
#[derive(Deserialize)]
pub struct Config {
    /// The shared secret. **Required.**
    pub encryption_key: String,

    /// Encoding of [`Config::encryption_key`].
    #[serde(default = "default_key_encoding")]
    pub encryption_key_encoding: KeyEncoding,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP endpoint for span export. Tracing stays local when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Comma-separated list of origins allowed by CORS.
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: String,

    /// Deployment label reported by `/health`.
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_key_encoding() -> KeyEncoding {
    KeyEncoding::Base64
}
fn default_port() -> u16 {
    3000
}
fn default_log_level() -> String {
    "info".into()
}
fn default_cors_allowed_origins() -> String {
    "http://localhost:8000,http://127.0.0.1:8000".into()
}
fn default_environment() -> String {
    "development".into()
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("encryption_key", &"[REDACTED]")
            .field("encryption_key_encoding", &self.encryption_key_encoding)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("otel_exporter_otlp_endpoint", &self.otel_exporter_otlp_endpoint)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("environment", &self.environment)
            .finish()
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.encryption_key.trim().is_empty() {
            anyhow::bail!("ENCRYPTION_KEY is required and must not be empty");
        }
        self.key_material()?;

        if self.port == 0 {
            anyhow::bail!("PORT must be > 0");
        }
        self.allowed_origins()?;
        Ok(())
    }

    /// Build the [`KeyMaterial`] described by the key variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be decoded or is not 32 bytes.
    pub fn key_material(&self) -> Result<KeyMaterial> {
        let key = match self.encryption_key_encoding {
            KeyEncoding::Base64 => KeyMaterial::from_base64(&self.encryption_key),
            KeyEncoding::Utf8 => KeyMaterial::from_slice(self.encryption_key.as_bytes()),
        };
        key.context("ENCRYPTION_KEY is not a valid AES-256 key")
    }

    /// Build the [`KeyMaterial`], then wipe [`Config::encryption_key`] so the
    /// encoded secret does not outlive startup.
    ///
    /// # Errors
    ///
    /// As [`Config::key_material`]. The key string is wiped either way.
    pub fn take_key_material(&mut self) -> Result<KeyMaterial> {
        let key = self.key_material();
        self.encryption_key.zeroize();
        key
    }

    /// Parse [`Config::cors_allowed_origins`] into header values.
    ///
    /// # Errors
    ///
    /// Returns an error if any entry is not a valid header value.
    pub fn allowed_origins(&self) -> Result<Vec<HeaderValue>> {
        self.cors_allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(|o| {
                HeaderValue::from_str(o)
                    .with_context(|| format!("CORS_ALLOWED_ORIGINS entry is invalid: {o}"))
            })
            .collect()
    }
}
