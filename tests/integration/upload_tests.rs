//! Upload endpoint tests.
//!
//! Tests verify:
//! - Validation order and error bodies
//! - Key derivation and the returned public URL
//! - Backend failures surface as 500

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use image_gallery::RouterConfig;

use super::test_utils::{
    public_url, response_json, test_router, test_router_with_config, upload_request,
    MockObjectStore, Part,
};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really a png";

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_upload_without_file_field() {
    let store = MockObjectStore::new();
    let router = test_router(store.clone());

    let request = upload_request(&[Part::text("comment", "spotted near the creek")]);
    let response = router.oneshot(request).await.unwrap();

    let (status, json) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, serde_json::json!({"ok": false, "error": "No file part"}));
    assert!(store.objects().await.is_empty());
}

#[tokio::test]
async fn test_upload_empty_form() {
    let router = test_router(MockObjectStore::new());

    let response = router.oneshot(upload_request(&[])).await.unwrap();

    let (status, json) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file part");
}

#[tokio::test]
async fn test_upload_not_multipart() {
    let router = test_router(MockObjectStore::new());

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/upload")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"file": "x"}"#))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    let (status, json) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, serde_json::json!({"ok": false, "error": "No file part"}));
}

#[tokio::test]
async fn test_upload_empty_filename() {
    let store = MockObjectStore::new();
    let router = test_router(store.clone());

    let request = upload_request(&[Part::file("", "image/png", PNG_BYTES)]);
    let response = router.oneshot(request).await.unwrap();

    let (status, json) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        serde_json::json!({"ok": false, "error": "No selected file"})
    );
    assert!(store.objects().await.is_empty());
}

#[tokio::test]
async fn test_upload_file_field_without_filename() {
    let router = test_router(MockObjectStore::new());

    let request = upload_request(&[Part {
        name: "file",
        filename: None,
        content_type: Some("image/png"),
        data: PNG_BYTES,
    }]);
    let response = router.oneshot(request).await.unwrap();

    let (status, json) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file part");
}

#[tokio::test]
async fn test_upload_plain_file_value_is_skipped() {
    let store = MockObjectStore::new();
    let router = test_router(store.clone());

    let request = upload_request(&[
        Part {
            name: "file",
            filename: None,
            content_type: None,
            data: b"not a file",
        },
        Part::file("a.png", "image/png", PNG_BYTES),
    ]);
    let response = router.oneshot(request).await.unwrap();

    let (status, json) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["url"], public_url("20240102T030405-a.png"));

    let objects = store.objects().await;
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].key, "20240102T030405-a.png");
    assert_eq!(&objects[0].body[..], PNG_BYTES);
}

#[tokio::test]
async fn test_upload_invalid_content_type() {
    let store = MockObjectStore::new();
    let router = test_router(store.clone());

    let request = upload_request(&[Part::file("bug report!!.png", "text/plain", b"hello")]);
    let response = router.oneshot(request).await.unwrap();

    let (status, json) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        serde_json::json!({"ok": false, "error": "Invalid content type"})
    );
    assert!(store.objects().await.is_empty());
}

#[tokio::test]
async fn test_upload_missing_content_type() {
    let router = test_router(MockObjectStore::new());

    let request = upload_request(&[Part {
        name: "file",
        filename: Some("photo.jpg"),
        content_type: None,
        data: b"data",
    }]);
    let response = router.oneshot(request).await.unwrap();

    let (status, json) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid content type");
}

#[tokio::test]
async fn test_upload_content_type_prefix_is_case_sensitive() {
    let store = MockObjectStore::new();
    let router = test_router(store.clone());

    let request = upload_request(&[Part::file("a.png", "IMAGE/PNG", PNG_BYTES)]);
    let response = router.oneshot(request).await.unwrap();

    let (status, json) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        serde_json::json!({"ok": false, "error": "Invalid content type"})
    );
    assert!(store.objects().await.is_empty());
}

#[tokio::test]
async fn test_upload_content_type_stored_as_declared() {
    let store = MockObjectStore::new();
    let router = test_router(store.clone());

    let request = upload_request(&[Part::file("a.png", "image/PNG", PNG_BYTES)]);
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let objects = store.objects().await;
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].content_type, "image/PNG");
}

#[tokio::test]
async fn test_upload_filename_checked_before_content_type() {
    let router = test_router(MockObjectStore::new());

    let request = upload_request(&[Part::file("", "text/plain", b"hello")]);
    let response = router.oneshot(request).await.unwrap();

    let (status, json) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No selected file");
}

#[tokio::test]
async fn test_upload_too_large() {
    let store = MockObjectStore::new();
    let router = test_router_with_config(
        store.clone(),
        RouterConfig::new().with_max_upload_size(1024),
    );

    let big = vec![0u8; 8 * 1024];
    let request = upload_request(&[Part::file("big.png", "image/png", &big)]);
    let response = router.oneshot(request).await.unwrap();

    let (status, json) = response_json(response).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["ok"], false);
    assert!(store.objects().await.is_empty());
}

// =============================================================================
// Successful Uploads
// =============================================================================

#[tokio::test]
async fn test_upload_success_sanitizes_and_timestamps() {
    let store = MockObjectStore::new();
    let router = test_router(store.clone());

    let request = upload_request(&[Part::file("bug report!!.png", "image/png", PNG_BYTES)]);
    let response = router.oneshot(request).await.unwrap();

    let (status, json) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        serde_json::json!({
            "ok": true,
            "url": public_url("20240102T030405-bug_report__.png"),
        })
    );

    let objects = store.objects().await;
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].key, "20240102T030405-bug_report__.png");
    assert_eq!(objects[0].content_type, "image/png");
    assert_eq!(&objects[0].body[..], PNG_BYTES);
}

#[tokio::test]
async fn test_upload_path_like_filename_is_flattened() {
    let store = MockObjectStore::new();
    let router = test_router(store.clone());

    let request = upload_request(&[Part::file("../../etc/passwd", "image/jpeg", b"x")]);
    let response = router.oneshot(request).await.unwrap();

    let (status, json) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["url"],
        public_url("20240102T030405-.._.._etc_passwd")
    );
    assert_eq!(
        store.objects().await[0].key,
        "20240102T030405-.._.._etc_passwd"
    );
}

#[tokio::test]
async fn test_upload_skips_other_fields() {
    let store = MockObjectStore::new();
    let router = test_router(store.clone());

    let request = upload_request(&[
        Part::text("comment", "adult on a maple"),
        Part::file("lanternfly.jpg", "image/jpeg", b"jpeg bytes"),
    ]);
    let response = router.oneshot(request).await.unwrap();

    let (status, json) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["url"], public_url("20240102T030405-lanternfly.jpg"));
    assert_eq!(store.objects().await.len(), 1);
}

#[tokio::test]
async fn test_upload_same_second_overwrites() {
    let store = MockObjectStore::new();
    let router = test_router(store.clone());

    for body in [&b"first"[..], &b"second"[..]] {
        let request = upload_request(&[Part::file("a.png", "image/png", body)]);
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let objects = store.objects().await;
    assert_eq!(objects.len(), 1);
    assert_eq!(&objects[0].body[..], b"second");
}

// =============================================================================
// Backend Failures
// =============================================================================

#[tokio::test]
async fn test_upload_storage_failure() {
    let router = test_router(MockObjectStore::failing(
        "AccessDenied: The request signature does not match",
    ));

    let request = upload_request(&[Part::file("a.png", "image/png", PNG_BYTES)]);
    let response = router.oneshot(request).await.unwrap();

    let (status, json) = response_json(response).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["ok"], false);
    assert_eq!(
        json["error"],
        "AccessDenied: The request signature does not match"
    );
}

#[tokio::test]
async fn test_upload_validation_precedes_storage() {
    // A broken backend is never reached by an invalid request
    let router = test_router(MockObjectStore::failing("unreachable"));

    let request = upload_request(&[Part::file("a.txt", "text/plain", b"x")]);
    let response = router.oneshot(request).await.unwrap();

    let (status, json) = response_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid content type");
}
