//! Paid Gemini backend: Imagen for text-to-image, a multimodal model for remixes.

macro_rules! impl_gemini_client_builders {
    ($client:ty) => {
        impl $client {
            pub fn with_base_url(mut self, base_url: String) -> Self {
                self.http = self.http.with_base_url(base_url);
                self
            }

            pub fn with_timeout(mut self, timeout: Option<std::time::Duration>) -> Self {
                self.http = self.http.with_timeout(timeout);
                self
            }
        }
    };
}

pub(crate) use impl_gemini_client_builders;

pub mod client;
pub mod image;
pub mod remix;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::GeminiHttpClient;
pub use image::GeminiImageClient;
pub use remix::GeminiRemixClient;

use super::WallpaperService;
use crate::models::{GeneratedImage, DEFAULT_VARIANT_COUNT};
use crate::{Error, Result};
use async_trait::async_trait;

/// [`WallpaperService`] over the Gemini image and remix clients.
pub struct GeminiWallpaperClient {
    image: GeminiImageClient,
    remix: GeminiRemixClient,
    variant_count: u32,
}

impl GeminiWallpaperClient {
    pub fn new(image: GeminiImageClient, remix: GeminiRemixClient) -> Self {
        Self {
            image,
            remix,
            variant_count: DEFAULT_VARIANT_COUNT,
        }
    }

    pub fn with_variant_count(mut self, variant_count: u32) -> Self {
        self.variant_count = variant_count;
        self
    }
}

#[async_trait]
impl WallpaperService for GeminiWallpaperClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<GeneratedImage>> {
        tracing::info!("Generating {} wallpapers via Gemini", self.variant_count);

        self.image
            .generate_wallpapers(prompt, self.variant_count)
            .await
            .map_err(|e| {
                tracing::error!("Error generating wallpapers: {}", e);
                Error::Generation(format!("Failed to generate images: {}", e))
            })
    }

    async fn remix(&self, prompt: &str, reference_base64: &str) -> Result<Vec<GeneratedImage>> {
        tracing::info!("Remixing wallpaper via Gemini");

        self.remix
            .remix_wallpapers(prompt, reference_base64)
            .await
            .map_err(|e| {
                tracing::error!("Error remixing wallpaper: {}", e);
                Error::Generation(format!("Failed to remix image: {}", e))
            })
    }
}
