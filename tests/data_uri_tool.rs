use base64::{engine::general_purpose::STANDARD, Engine as _};
use inline_asset_optimizer::data_uri::{DataUriEncoder, ImageSource};
use inline_asset_optimizer::OptimizeError;
use tempfile::TempDir;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

#[tokio::test]
async fn test_url_source_uses_served_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .and(header_exists("user-agent"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png; charset=binary")
                .set_body_bytes(PNG_SIGNATURE),
        )
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("base64_output.txt");
    let source = ImageSource::parse(&format!("'{}/logo.png'", server.uri())).unwrap();

    let data_uri = DataUriEncoder::new().unwrap().convert(&source, &output).await.unwrap();

    let expected = format!("data:image/png;base64,{}", STANDARD.encode(PNG_SIGNATURE));
    assert_eq!(data_uri, expected);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), expected);
}

#[tokio::test]
async fn test_url_without_content_type_is_sniffed() {
    let server = MockServer::start().await;
    let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;".to_vec();
    Mock::given(method("GET"))
        .and(path("/pixel"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(gif.clone()))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.txt");
    let source = ImageSource::parse(&format!("{}/pixel", server.uri())).unwrap();

    let data_uri = DataUriEncoder::new().unwrap().convert(&source, &output).await.unwrap();
    assert!(data_uri.starts_with("data:image/gif;base64,"));
}

#[tokio::test]
async fn test_http_error_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("base64_output.txt");
    let source = ImageSource::parse(&format!("{}/missing.png", server.uri())).unwrap();

    let err = DataUriEncoder::new()
        .unwrap()
        .convert(&source, &output)
        .await
        .unwrap_err();

    assert!(matches!(err, OptimizeError::Fetch(_)));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_http_error_keeps_previous_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("base64_output.txt");
    std::fs::write(&output, "data:image/png;base64,previous").unwrap();
    let source = ImageSource::parse(&format!("{}/broken.png", server.uri())).unwrap();

    assert!(DataUriEncoder::new().unwrap().convert(&source, &output).await.is_err());
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "data:image/png;base64,previous"
    );
}

#[tokio::test]
async fn test_local_file_source() {
    let temp_dir = TempDir::new().unwrap();
    let image = temp_dir.path().join("icon.jpg");
    std::fs::write(&image, b"\xff\xd8\xff\xe0fake").unwrap();
    let output = temp_dir.path().join("out.txt");

    let source = ImageSource::parse(&format!("\"{}\"", image.display())).unwrap();
    let data_uri = DataUriEncoder::new().unwrap().convert(&source, &output).await.unwrap();

    assert_eq!(
        data_uri,
        format!("data:image/jpeg;base64,{}", STANDARD.encode(b"\xff\xd8\xff\xe0fake"))
    );
    // Exactly one line, no trailing newline
    let written = std::fs::read_to_string(&output).unwrap();
    assert!(!written.contains('\n'));
}

#[tokio::test]
async fn test_unknown_local_file_defaults_to_png() {
    let temp_dir = TempDir::new().unwrap();
    let blob = temp_dir.path().join("blob");
    std::fs::write(&blob, b"opaque bytes").unwrap();
    let output = temp_dir.path().join("out.txt");

    let data_uri = DataUriEncoder::new()
        .unwrap()
        .convert(&ImageSource::File(blob), &output)
        .await
        .unwrap();
    assert!(data_uri.starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_missing_local_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.txt");
    let source = ImageSource::File(temp_dir.path().join("nope.png"));

    let err = DataUriEncoder::new()
        .unwrap()
        .convert(&source, &output)
        .await
        .unwrap_err();
    assert!(matches!(err, OptimizeError::Fetch(_)));
    assert!(!output.exists());
}
