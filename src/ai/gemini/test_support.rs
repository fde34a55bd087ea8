use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockBuilder};

pub const GENERATE_CONTENT_PATH_REGEX: &str = r"^/v1beta/models/[^/]+:generateContent$";
pub const PREDICT_PATH_REGEX: &str = r"^/v1beta/models/[^/]+:predict$";

pub fn post_path_regex(regex: &str) -> MockBuilder {
    Mock::given(method("POST")).and(path_regex(regex))
}

/// A `generateContent` body whose only part is an inline image.
pub fn inline_image_body(mime_type: &str, data: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {
                "parts": [{
                    "inlineData": { "mimeType": mime_type, "data": data }
                }]
            }
        }]
    })
}

/// A `generateContent` body with text only, as when the model declines.
pub fn text_only_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] }
        }]
    })
}
