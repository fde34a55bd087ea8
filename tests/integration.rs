use base64::Engine as _;
use std::fs;
use wallpaper_generator::{
    ai::{
        GeminiImageClient, GeminiRemixClient, GeminiWallpaperClient, MockWallpaperClient,
        PollinationsClient, WallpaperService,
    },
    app::App,
    models::{Config, GeneratedImage, Provider},
    Error,
};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JPEG_BYTES: [u8; 8] = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];

fn jpeg_b64() -> String {
    base64::engine::general_purpose::STANDARD.encode(JPEG_BYTES)
}

fn gemini_service(server: &MockServer) -> GeminiWallpaperClient {
    GeminiWallpaperClient::new(
        GeminiImageClient::new("key".to_string(), "imagen-4.0-generate-001".to_string())
            .with_base_url(server.uri()),
        GeminiRemixClient::new("key".to_string(), "gemini-2.5-flash-image".to_string())
            .with_base_url(server.uri()),
    )
}

#[tokio::test]
async fn test_free_tier_scenario_round_trips_jpeg() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/prompt/rainy%20cyberpunk%20lo-fi$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JPEG_BYTES.to_vec()))
        .mount(&server)
        .await;

    let service = PollinationsClient::new().with_base_url(server.uri());
    let images = service.generate("rainy cyberpunk lo-fi").await.unwrap();

    assert_eq!(images.len(), 1);
    let image = &images[0];
    assert!(image.id.parse::<i64>().is_ok());
    assert_eq!(image.prompt.as_deref(), Some("rainy cyberpunk lo-fi"));
    assert!(image.timestamp.unwrap() > 0);
    assert_eq!(image.decode().unwrap(), JPEG_BYTES.to_vec());
    assert_eq!(image.mime_type().unwrap(), "image/jpeg");
}

#[tokio::test]
async fn test_premium_generate_returns_between_one_and_four() {
    let server = MockServer::start().await;
    let predictions: Vec<_> = (0..4)
        .map(|_| serde_json::json!({ "bytesBase64Encoded": jpeg_b64(), "mimeType": "image/jpeg" }))
        .collect();
    Mock::given(method("POST"))
        .and(path_regex(r":predict$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "predictions": predictions })),
        )
        .mount(&server)
        .await;

    let images = gemini_service(&server).generate("tokyo at dusk").await.unwrap();

    assert!((1..=4).contains(&images.len()));
    for image in &images {
        assert!(image.id.starts_with("img-"));
        assert!(!image.base64.is_empty());
        assert!(image.decode().unwrap().starts_with(&[0xFF, 0xD8, 0xFF]));
    }
}

#[tokio::test]
async fn test_premium_generate_zero_images_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r":predict$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let err = gemini_service(&server)
        .generate("something blocked")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("No images were generated"));
}

#[tokio::test]
async fn test_remix_through_service_seam() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r":generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "inlineData": { "mimeType": "image/jpeg", "data": jpeg_b64() } }]
                }
            }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let service: Box<dyn WallpaperService> = Box::new(gemini_service(&server));
    let images = service.remix("add neon rain", &jpeg_b64()).await.unwrap();

    assert_eq!(images.len(), 2);
    assert!(images.iter().all(|i| i.id.starts_with("remix-")));
}

#[tokio::test]
async fn test_app_with_pollinations_backend_saves_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JPEG_BYTES.to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let base_url = server.uri();
    let output_root = dir.path().to_string_lossy().to_string();
    let config = Config::from_lookup(|key| match key {
        "WALLPAPER_PROVIDER" => Some("pollinations".to_string()),
        "POLLINATIONS_BASE_URL" => Some(base_url.clone()),
        "OUTPUT_DIR" => Some(output_root.clone()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.provider, Provider::Pollinations);

    let app = App::new(&config).unwrap();
    let saved = app.generate("misty fjord").await.unwrap();

    assert_eq!(saved.len(), 1);
    assert_eq!(fs::read(&saved[0].path).unwrap(), JPEG_BYTES.to_vec());
    assert!(app.output_dir().join("images.json").exists());
}

#[tokio::test]
async fn test_app_remix_with_pollinations_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let reference = dir.path().join("ref.jpg");
    fs::write(&reference, JPEG_BYTES).unwrap();

    let app = App::with_services(
        Box::new(PollinationsClient::new()),
        dir.path().to_path_buf(),
    );
    let err = app.remix("more stars", &reference).await.unwrap_err();
    assert!(matches!(err, Error::Unsupported(_)));
}

#[tokio::test]
async fn test_app_with_mock_backend_keeps_all_images() {
    let dir = tempfile::tempdir().unwrap();
    let images: Vec<GeneratedImage> = (0..4)
        .map(|i| GeneratedImage::new(format!("img-1-{}", i), jpeg_b64()))
        .collect();
    let service = MockWallpaperClient::new().with_generate_response(images);
    let probe = service.clone();

    let app = App::with_services(Box::new(service), dir.path().to_path_buf());
    let saved = app.generate("desert bloom").await.unwrap();

    assert_eq!(saved.len(), 4);
    assert_eq!(probe.get_generate_count(), 1);
    assert!(saved.iter().all(|s| s.path.exists()));
}

#[test]
fn test_missing_credential_is_fatal_for_gemini() {
    let err = Config::from_lookup(|_| None).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
