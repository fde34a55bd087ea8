//! Data models and configuration
//!
//! Defines the image record handed to the display layer, the provider
//! selector, and process-wide configuration loaded from the environment.

use crate::ai::mime::detect_image_mime;
use crate::{Error, Result};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// One generated wallpaper, as the display layer consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub id: String,
    /// Base64 payload without a data-URI prefix.
    pub base64: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl GeneratedImage {
    pub fn new(id: String, base64: String) -> Self {
        Self {
            id,
            base64,
            prompt: None,
            timestamp: None,
        }
    }

    pub fn with_prompt(mut self, prompt: &str) -> Self {
        self.prompt = Some(prompt.to_string());
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.base64)
            .map_err(|e| Error::Decode(format!("Invalid base64 in image {}: {}", self.id, e)))
    }

    pub fn mime_type(&self) -> Result<&'static str> {
        Ok(detect_image_mime(&self.decode()?))
    }

    pub fn data_uri(&self) -> Result<String> {
        Ok(format!("data:{};base64,{}", self.mime_type()?, self.base64))
    }
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Free public endpoint, no credential.
    Pollinations,
    /// Paid multimodal API, requires `API_KEY`.
    Gemini,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Pollinations => "pollinations",
            Provider::Gemini => "gemini",
        }
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pollinations" | "free" => Ok(Provider::Pollinations),
            "gemini" | "premium" => Ok(Provider::Gemini),
            other => Err(Error::Config(format!(
                "Unknown provider '{}'. Expected 'pollinations' or 'gemini'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_REMIX_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_POLLINATIONS_BASE_URL: &str = "https://image.pollinations.ai";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_VARIANT_COUNT: u32 = 4;
const MAX_VARIANT_COUNT: u32 = 4;

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: Provider,
    pub api_key: Option<String>,
    pub image_model: String,
    pub remix_model: String,
    pub variant_count: u32,
    pub pollinations_base_url: String,
    pub gemini_base_url: String,
    /// `None` leaves the HTTP client default in place (no timeout).
    pub request_timeout: Option<Duration>,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match lookup("WALLPAPER_PROVIDER") {
            Some(value) => value.parse()?,
            None => Provider::Gemini,
        };

        let api_key = lookup("API_KEY")
            .or_else(|| lookup("GEMINI_API_KEY"))
            .filter(|key| !key.trim().is_empty());

        if provider == Provider::Gemini && api_key.is_none() {
            return Err(Error::Config(
                "API_KEY environment variable not set".to_string(),
            ));
        }

        let variant_count = match lookup("WALLPAPER_COUNT") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| (1..=MAX_VARIANT_COUNT).contains(n))
                .ok_or_else(|| {
                    Error::Config(format!(
                        "WALLPAPER_COUNT must be between 1 and {}, got '{}'",
                        MAX_VARIANT_COUNT, value
                    ))
                })?,
            None => DEFAULT_VARIANT_COUNT,
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => Some(Duration::from_secs(value.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    value
                ))
            })?)),
            None => None,
        };

        Ok(Self {
            provider,
            api_key,
            image_model: lookup("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            remix_model: lookup("GEMINI_REMIX_MODEL")
                .unwrap_or_else(|| DEFAULT_REMIX_MODEL.to_string()),
            variant_count,
            pollinations_base_url: lookup("POLLINATIONS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_POLLINATIONS_BASE_URL.to_string()),
            gemini_base_url: lookup("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            request_timeout,
            output_dir: lookup("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("output")),
        })
    }
}
