use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::config::ApiConfig;
use crate::net::auth::NoAuth;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgo=";

fn client(server: &MockServer) -> ApiClient {
    let cfg = ApiConfig { base_url: format!("{}/api", server.uri()), ..ApiConfig::default() };
    ApiClient::new(&cfg, Arc::new(NoAuth)).unwrap()
}

fn token(value: serde_json::Value) -> Token {
    serde_json::from_value(value).unwrap()
}

// =============================================================================
// sources
// =============================================================================

#[test]
fn data_uri_decodes_inline() {
    let source = ImageSource::parse(PNG_DATA_URI).unwrap();
    assert_eq!(source, ImageSource::Inline { media_type: "image/png", bytes: PNG_MAGIC.to_vec() });
}

#[test]
fn anything_else_is_remote() {
    assert_eq!(ImageSource::parse("/media/qr/T1.png").unwrap(), ImageSource::Remote("/media/qr/T1.png"));
    assert_eq!(
        ImageSource::parse("https://cdn.test/T1.png").unwrap(),
        ImageSource::Remote("https://cdn.test/T1.png")
    );
}

#[test]
fn malformed_data_uris_are_rejected() {
    assert!(matches!(ImageSource::parse("data:image/png;base64"), Err(ExportError::DataUri(_))));
    assert!(matches!(ImageSource::parse("data:text/plain,hello"), Err(ExportError::DataUri(_))));
    assert!(matches!(ImageSource::parse("data:image/png;base64,@@@"), Err(ExportError::DataUri(_))));
}

#[test]
fn filename_keeps_ids_inside_the_directory() {
    assert_eq!(qr_image_filename("T-100"), "qr_T-100.png");
    assert_eq!(qr_image_filename("../etc/x"), "qr____etc_x.png");
}

// =============================================================================
// export
// =============================================================================

#[tokio::test]
async fn exports_url_and_data_uri_images() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/qr/T2.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"remote-png".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = vec![
        token(json!({ "token_id": "T1", "qr_code": PNG_DATA_URI })),
        token(json!({ "token_id": "T2", "qr_image": "/media/qr/T2.png" })),
        token(json!({ "token_id": "T3" })),
    ];
    let dir = tempfile::tempdir().unwrap();
    let written = export_token_images(&client(&server), &tokens, dir.path()).await.unwrap();

    assert_eq!(written, [dir.path().join("qr_T1.png"), dir.path().join("qr_T2.png")]);
    assert_eq!(std::fs::read(dir.path().join("qr_T1.png")).unwrap(), PNG_MAGIC);
    assert_eq!(std::fs::read(dir.path().join("qr_T2.png")).unwrap(), b"remote-png");
    assert!(!dir.path().join("qr_T3.png").exists());
}

#[tokio::test]
async fn missing_media_fails_the_export() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/qr/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let tokens = vec![token(json!({ "token_id": "T9", "qr_image": "/media/qr/gone.png" }))];
    let dir = tempfile::tempdir().unwrap();
    let err = export_token_images(&client(&server), &tokens, dir.path()).await.unwrap_err();

    assert!(matches!(err, ExportError::Api(ApiError::Status { status: 404, .. })));
    assert!(!err.is_auth_failure());
}

#[test]
fn write_into_missing_directory_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = write_image(&missing, "T1", PNG_MAGIC).unwrap_err();
    assert!(matches!(err, ExportError::Write { ref path, .. } if *path == missing.join("qr_T1.png")));
}
