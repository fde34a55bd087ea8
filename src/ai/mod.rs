//! AI service integration for wallpaper generation
//!
//! Two interchangeable backends sit behind [`WallpaperService`]: the free
//! Pollinations endpoint and the paid Gemini API. Both hand back
//! [`GeneratedImage`] records carrying base64 payloads.

pub mod gemini;
pub mod mime;
pub mod mock;
pub mod pollinations;

pub use gemini::{GeminiImageClient, GeminiRemixClient, GeminiWallpaperClient};
pub use mock::MockWallpaperClient;
pub use pollinations::PollinationsClient;

use crate::models::GeneratedImage;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait WallpaperService: Send + Sync {
    /// Generate fresh wallpapers from a text prompt.
    async fn generate(&self, prompt: &str) -> Result<Vec<GeneratedImage>>;

    /// Generate variations of `reference_base64` steered by `prompt`.
    async fn remix(&self, prompt: &str, reference_base64: &str) -> Result<Vec<GeneratedImage>>;
}
