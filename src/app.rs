//! Application glue between the display layer and the configured backend.

use crate::ai::mime::{detect_image_mime, extension_for_mime};
use crate::ai::{
    GeminiImageClient, GeminiRemixClient, GeminiWallpaperClient, PollinationsClient,
    WallpaperService,
};
use crate::models::{Config, GeneratedImage, Provider};
use crate::{Error, Result};
use base64::Engine as _;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

const MANIFEST_FILE: &str = "images.json";

/// A generated wallpaper written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedImage {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    pub mime_type: String,
    pub path: PathBuf,
}

/// Runs generations against one backend and keeps the results in a session directory.
pub struct App {
    service: Box<dyn WallpaperService>,
    output_dir: PathBuf,
}

impl App {
    /// Build an app around an already constructed backend.
    pub fn with_services(service: Box<dyn WallpaperService>, output_dir: PathBuf) -> Self {
        Self {
            service,
            output_dir,
        }
    }

    /// Build the backend selected by `config`.
    pub fn build_service(config: &Config) -> Result<Box<dyn WallpaperService>> {
        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::new();

        match config.provider {
            Provider::Pollinations => {
                info!("Wallpaper provider: Pollinations");
                Ok(Box::new(
                    PollinationsClient::new_with_client(http_client)
                        .with_base_url(config.pollinations_base_url.clone())
                        .with_timeout(config.request_timeout),
                ))
            }
            Provider::Gemini => {
                let api_key = config.api_key.clone().ok_or_else(|| {
                    Error::Config("API_KEY environment variable not set".to_string())
                })?;
                info!(
                    "Wallpaper provider: Gemini (image model: {}, remix model: {})",
                    config.image_model, config.remix_model
                );

                let image = GeminiImageClient::new_with_client(
                    api_key.clone(),
                    config.image_model.clone(),
                    http_client.clone(),
                )
                .with_base_url(config.gemini_base_url.clone())
                .with_timeout(config.request_timeout);
                let remix = GeminiRemixClient::new_with_client(
                    api_key,
                    config.remix_model.clone(),
                    http_client,
                )
                .with_base_url(config.gemini_base_url.clone())
                .with_timeout(config.request_timeout);

                Ok(Box::new(
                    GeminiWallpaperClient::new(image, remix)
                        .with_variant_count(config.variant_count),
                ))
            }
        }
    }

    /// Construct an app from configuration, creating a fresh session directory.
    pub fn new(config: &Config) -> Result<Self> {
        let service = Self::build_service(config)?;

        let date = Local::now().format("%Y-%m-%d").to_string();
        let session_id = Uuid::new_v4();
        let output_dir = config
            .output_dir
            .join(format!("{}_{}", date, session_id));

        fs::create_dir_all(&output_dir)?;
        info!("Created output directory: {}", output_dir.display());

        Ok(Self::with_services(service, output_dir))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generate wallpapers for `prompt` and save them.
    pub async fn generate(&self, prompt: &str) -> Result<Vec<SavedImage>> {
        let prompt = Self::validate_prompt(prompt)?;
        info!("Generating wallpapers for prompt: {}", prompt);

        let images = self.service.generate(prompt).await?;
        self.save_images(&images)
    }

    /// Remix the image at `reference` with `prompt` and save the variations.
    pub async fn remix(&self, prompt: &str, reference: &Path) -> Result<Vec<SavedImage>> {
        let prompt = Self::validate_prompt(prompt)?;

        let reference_bytes = fs::read(reference)?;
        if reference_bytes.is_empty() {
            return Err(Error::InvalidInput(format!(
                "Reference image {} is empty",
                reference.display()
            )));
        }
        let reference_base64 =
            base64::engine::general_purpose::STANDARD.encode(&reference_bytes);

        info!(
            "Remixing {} with prompt: {}",
            reference.display(),
            prompt
        );

        let images = self.service.remix(prompt, &reference_base64).await?;
        self.save_images(&images)
    }

    fn validate_prompt(prompt: &str) -> Result<&str> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(Error::InvalidInput("Prompt must not be empty".to_string()));
        }
        Ok(prompt)
    }

    fn save_images(&self, images: &[GeneratedImage]) -> Result<Vec<SavedImage>> {
        let mut saved = Vec::with_capacity(images.len());

        for image in images {
            let bytes = image.decode()?;
            let mime_type = detect_image_mime(&bytes);
            let path = self
                .output_dir
                .join(format!("{}.{}", image.id, extension_for_mime(mime_type)));

            fs::write(&path, &bytes)?;
            info!("Saved {} ({} bytes) to {}", image.id, bytes.len(), path.display());

            saved.push(SavedImage {
                id: image.id.clone(),
                prompt: image.prompt.clone(),
                timestamp: image.timestamp,
                mime_type: mime_type.to_string(),
                path,
            });
        }

        self.append_manifest(&saved)?;
        Ok(saved)
    }

    fn append_manifest(&self, saved: &[SavedImage]) -> Result<()> {
        let manifest_path = self.output_dir.join(MANIFEST_FILE);

        let mut entries: Vec<SavedImage> = if manifest_path.exists() {
            serde_json::from_str(&fs::read_to_string(&manifest_path)?)?
        } else {
            Vec::new()
        };
        entries.extend_from_slice(saved);

        fs::write(&manifest_path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}
