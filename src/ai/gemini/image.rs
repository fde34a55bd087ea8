use super::client::GeminiHttpClient;
use super::types::{
    OutputOptions, PredictInstance, PredictParameters, PredictRequest, PredictResponse,
};
use crate::models::{now_millis, GeneratedImage};
use crate::{prompts, Error, Result};

pub const WALLPAPER_ASPECT_RATIO: &str = "9:16";
const OUTPUT_MIME_TYPE: &str = "image/jpeg";

pub(crate) const NO_IMAGES_GENERATED: &str =
    "No images were generated. The prompt may have been blocked.";

/// Text-to-image generation through an Imagen model.
pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, client),
        }
    }

    /// Generates up to `count` portrait wallpapers for `prompt`.
    ///
    /// Samples the provider filtered out are dropped; an answer with no
    /// usable sample at all is a [`Error::Refused`].
    pub async fn generate_wallpapers(
        &self,
        prompt: &str,
        count: u32,
    ) -> Result<Vec<GeneratedImage>> {
        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompts::render(prompts::WALLPAPER_GENERATE, &[("prompt", prompt)]),
            }],
            parameters: PredictParameters {
                sample_count: count,
                aspect_ratio: WALLPAPER_ASPECT_RATIO.to_string(),
                output_options: OutputOptions {
                    mime_type: OUTPUT_MIME_TYPE.to_string(),
                },
            },
        };

        tracing::debug!(
            "Requesting {} wallpapers from {}",
            count,
            self.http.model()
        );

        let response: PredictResponse = self.http.predict(&request).await?;

        let timestamp = now_millis();
        let images: Vec<GeneratedImage> = response
            .predictions
            .into_iter()
            .filter_map(|prediction| {
                if let Some(reason) = &prediction.rai_filtered_reason {
                    tracing::warn!("Imagen filtered a sample: {}", reason);
                }
                prediction
                    .bytes_base64_encoded
                    .filter(|data| !data.is_empty())
            })
            .take(count as usize)
            .enumerate()
            .map(|(index, data)| GeneratedImage::new(format!("img-{}-{}", timestamp, index), data))
            .collect();

        if images.is_empty() {
            return Err(Error::Refused(NO_IMAGES_GENERATED.to_string()));
        }

        tracing::debug!("Imagen returned {} usable wallpapers", images.len());
        Ok(images)
    }
}

super::impl_gemini_client_builders!(GeminiImageClient);
