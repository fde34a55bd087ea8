use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse, InlineData, Part};
use crate::ai::mime::{detect_image_mime, strip_data_uri};
use crate::models::{now_millis, GeneratedImage};
use crate::{prompts, Error, Result};
use base64::Engine as _;
use serde::Serialize;

pub(crate) const REMIX_REFUSED: &str =
    "Failed to remix image. The model might have refused the request.";

#[derive(Debug, Serialize)]
struct RemixRequest {
    contents: Vec<Content>,
}

/// Image-to-image variations through a multimodal Gemini model.
pub struct GeminiRemixClient {
    http: GeminiHttpClient,
}

impl GeminiRemixClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, client),
        }
    }

    /// Asks for two variations of `reference_base64` in parallel.
    ///
    /// A branch that errors or answers without an image is dropped; only when
    /// both come back empty is the call a [`Error::Refused`].
    pub async fn remix_wallpapers(
        &self,
        prompt: &str,
        reference_base64: &str,
    ) -> Result<Vec<GeneratedImage>> {
        let reference = strip_data_uri(reference_base64.trim());
        let reference_bytes = base64::engine::general_purpose::STANDARD
            .decode(reference)
            .map_err(|e| Error::Decode(format!("Reference image is not valid base64: {}", e)))?;
        if reference_bytes.is_empty() {
            return Err(Error::InvalidInput(
                "Reference image is empty".to_string(),
            ));
        }

        let request = RemixRequest {
            contents: vec![Content {
                role: None,
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: detect_image_mime(&reference_bytes).to_string(),
                            data: reference.to_string(),
                        },
                    },
                    Part::Text {
                        text: prompts::render(prompts::WALLPAPER_REMIX, &[("prompt", prompt)]),
                    },
                ],
            }],
        };

        let (first, second) = tokio::join!(
            self.remix_branch(&request, 1),
            self.remix_branch(&request, 2)
        );

        let images: Vec<GeneratedImage> = [first, second].into_iter().flatten().collect();
        if images.is_empty() {
            return Err(Error::Refused(REMIX_REFUSED.to_string()));
        }

        tracing::debug!("Remix produced {} of 2 variations", images.len());
        Ok(images)
    }

    async fn remix_branch(&self, request: &RemixRequest, branch: usize) -> Option<GeneratedImage> {
        let response: GenerateContentResponse = match self.http.generate_content(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Remix branch {} failed: {}", branch, e);
                return None;
            }
        };

        match response.first_inline_image() {
            Some(inline) if !inline.data.is_empty() => {
                tracing::debug!(
                    "Remix branch {} returned image with mime_type: {}",
                    branch,
                    inline.mime_type
                );
                Some(GeneratedImage::new(
                    format!("remix-{}-{}", now_millis(), branch),
                    inline.data.clone(),
                ))
            }
            _ => {
                tracing::warn!("Remix branch {} returned no image data", branch);
                None
            }
        }
    }
}

super::impl_gemini_client_builders!(GeminiRemixClient);
