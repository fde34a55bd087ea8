use super::WallpaperService;
use crate::models::{now_millis, GeneratedImage};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Tiny JPEG header, enough for mime sniffing.
pub const MOCK_JPEG_BASE64: &str = "/9j/4AAQ";

#[derive(Clone)]
pub struct MockWallpaperClient {
    generate_responses: Arc<Mutex<Vec<Vec<GeneratedImage>>>>,
    remix_responses: Arc<Mutex<Vec<Vec<GeneratedImage>>>>,
    failure: Arc<Mutex<Option<String>>>,
    generate_count: Arc<Mutex<usize>>,
    remix_count: Arc<Mutex<usize>>,
    last_reference: Arc<Mutex<Option<String>>>,
}

impl MockWallpaperClient {
    pub fn new() -> Self {
        Self {
            generate_responses: Arc::new(Mutex::new(Vec::new())),
            remix_responses: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            generate_count: Arc::new(Mutex::new(0)),
            remix_count: Arc::new(Mutex::new(0)),
            last_reference: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_generate_response(self, images: Vec<GeneratedImage>) -> Self {
        self.generate_responses.lock().unwrap().push(images);
        self
    }

    pub fn with_remix_response(self, images: Vec<GeneratedImage>) -> Self {
        self.remix_responses.lock().unwrap().push(images);
        self
    }

    /// Every call fails with `Error::Generation(message)`.
    pub fn with_failure(self, message: &str) -> Self {
        *self.failure.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn get_generate_count(&self) -> usize {
        *self.generate_count.lock().unwrap()
    }

    pub fn get_remix_count(&self) -> usize {
        *self.remix_count.lock().unwrap()
    }

    pub fn get_last_reference(&self) -> Option<String> {
        self.last_reference.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<()> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(Error::Generation(message.clone())),
            None => Ok(()),
        }
    }

    fn next_response(
        responses: &Mutex<Vec<Vec<GeneratedImage>>>,
        call: usize,
    ) -> Option<Vec<GeneratedImage>> {
        let responses = responses.lock().unwrap();
        if responses.is_empty() {
            None
        } else {
            Some(responses[(call - 1) % responses.len()].clone())
        }
    }
}

impl Default for MockWallpaperClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WallpaperService for MockWallpaperClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<GeneratedImage>> {
        let call = {
            let mut count = self.generate_count.lock().unwrap();
            *count += 1;
            *count
        };
        self.check_failure()?;

        Ok(
            Self::next_response(&self.generate_responses, call).unwrap_or_else(|| {
                let timestamp = now_millis();
                vec![
                    GeneratedImage::new(
                        format!("mock-{}-{}", timestamp, call),
                        MOCK_JPEG_BASE64.to_string(),
                    )
                    .with_prompt(prompt)
                    .with_timestamp(timestamp),
                ]
            }),
        )
    }

    async fn remix(&self, _prompt: &str, reference_base64: &str) -> Result<Vec<GeneratedImage>> {
        let call = {
            let mut count = self.remix_count.lock().unwrap();
            *count += 1;
            *count
        };
        *self.last_reference.lock().unwrap() = Some(reference_base64.to_string());
        self.check_failure()?;

        Ok(
            Self::next_response(&self.remix_responses, call).unwrap_or_else(|| {
                let timestamp = now_millis();
                (1..=2)
                    .map(|branch| {
                        GeneratedImage::new(
                            format!("remix-{}-{}", timestamp, branch),
                            MOCK_JPEG_BASE64.to_string(),
                        )
                    })
                    .collect()
            }),
        )
    }
}
