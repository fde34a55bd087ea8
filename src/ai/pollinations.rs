use super::WallpaperService;
use crate::models::{now_millis, GeneratedImage};
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use rand::Rng;
use reqwest::{Client, Url};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://image.pollinations.ai";

pub const WALLPAPER_WIDTH: u32 = 1080;
pub const WALLPAPER_HEIGHT: u32 = 1920;

/// Seeds are drawn from `0..SEED_RANGE`.
pub const SEED_RANGE: u32 = 100_000;

const GENERATION_FAILED: &str = "Could not generate vibe. Try again.";

/// Client for the free Pollinations image endpoint. No credential needed.
pub struct PollinationsClient {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl PollinationsClient {
    pub fn new() -> Self {
        Self::new_with_client(Client::new())
    }

    pub fn new_with_client(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// A fresh seed so identical prompts still yield distinct images.
    pub fn random_seed() -> u32 {
        rand::thread_rng().gen_range(0..SEED_RANGE)
    }

    /// Builds the image URL for `prompt` and `seed`.
    ///
    /// The URL itself is a loadable image resource, so a display layer that
    /// can fetch images on its own may use it directly instead of calling
    /// [`WallpaperService::generate`].
    pub fn image_url(&self, prompt: &str, seed: u32) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            Error::Config(format!(
                "Invalid Pollinations base URL '{}': {}",
                self.base_url, e
            ))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                Error::Config(format!(
                    "Pollinations base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push("prompt")
            .push(prompt);

        url.query_pairs_mut()
            .append_pair("width", &WALLPAPER_WIDTH.to_string())
            .append_pair("height", &WALLPAPER_HEIGHT.to_string())
            .append_pair("seed", &seed.to_string())
            .append_pair("nologo", "true");

        Ok(url)
    }

    async fn fetch_wallpaper(&self, prompt: &str) -> Result<GeneratedImage> {
        let seed = Self::random_seed();
        let url = self.image_url(prompt, seed)?;
        tracing::debug!("Fetching Pollinations image with seed {}", seed);

        let mut request = self.client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Failed to send request to Pollinations: {}", e);
            e
        })?;

        if !response.status().is_success() {
            return Err(Error::AiProvider(format!(
                "Failed to fetch from Pollinations (status {})",
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(Error::AiProvider(
                "Pollinations returned an empty image body".to_string(),
            ));
        }

        tracing::debug!("Pollinations returned {} bytes", bytes.len());

        let timestamp = now_millis();
        Ok(GeneratedImage::new(
            timestamp.to_string(),
            base64::engine::general_purpose::STANDARD.encode(&bytes),
        )
        .with_prompt(prompt)
        .with_timestamp(timestamp))
    }
}

impl Default for PollinationsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WallpaperService for PollinationsClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<GeneratedImage>> {
        tracing::info!("Generating wallpaper via Pollinations for: {}", prompt);

        match self.fetch_wallpaper(prompt).await {
            Ok(image) => Ok(vec![image]),
            Err(e) => {
                tracing::error!("Pollinations generation failed: {}", e);
                Err(Error::Generation(GENERATION_FAILED.to_string()))
            }
        }
    }

    async fn remix(&self, _prompt: &str, _reference_base64: &str) -> Result<Vec<GeneratedImage>> {
        Err(Error::Unsupported(
            "remixing requires the gemini provider".to_string(),
        ))
    }
}
