//! Security tests for the web surface
//!
//! Exercise the full middleware stack: security headers, path traversal on
//! record downloads, and sanitized error responses.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use kifu_finder::web::server::{create_router, AppState};

fn state_with_records(dir: &std::path::Path) -> Arc<AppState> {
    std::fs::write(dir.join("game.sgf"), b"(;B[pd];W[dd])").unwrap();
    std::fs::write(dir.join("other.sgf"), b"(;B[qq];W[cc])").unwrap();
    Arc::new(AppState::load(dir.to_path_buf(), 50).unwrap())
}

/// The rate limiter keys on the peer address, which a real server injects
fn get(uri: &str) -> Request<Body> {
    let mut request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));
    request
}

#[tokio::test]
async fn test_security_headers_present() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_router(state_with_records(dir.path()));

    let response = app.oneshot(get("/api/database")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["referrer-policy"], "strict-origin-when-cross-origin");
}

#[tokio::test]
async fn test_record_download_rejects_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_with_records(dir.path());

    for uri in [
        "/database/..%2F..%2Fetc%2Fpasswd",
        "/database/..",
        "/database/%2E%2E%5Cwindows",
    ] {
        let response = create_router(Arc::clone(&state))
            .oneshot(get(uri))
            .await
            .unwrap();
        assert!(
            response.status().is_client_error(),
            "{uri} returned {}",
            response.status()
        );
    }
}

#[tokio::test]
async fn test_record_download_only_serves_loaded_records() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_with_records(dir.path());
    // Written after the database was loaded, so never served
    std::fs::write(dir.path().join("late.sgf"), b"(;B[aa])").unwrap();

    let response = create_router(Arc::clone(&state))
        .oneshot(get("/database/late.sgf"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = create_router(state)
        .oneshot(get("/database/game.sgf"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn test_error_sanitization() {
    use kifu_finder::web::server::create_safe_error_response;

    let response = create_safe_error_response(
        "parse_error",
        "Failed to read the uploaded record",
        Some("/srv/kifu/database/private.sgf: permission denied"),
    );

    assert_eq!(response.error, "Failed to read the uploaded record");
    assert_eq!(response.error_type, "parse_error");
    assert!(response.details.is_none());
}

#[test]
fn test_filename_validation_security() {
    use kifu_finder::utils::validation::{validate_filename, ValidationError};

    let dangerous = [
        "../../../etc/passwd",
        "..\\..\\windows\\system32",
        "record.sgf\0.exe",
        "/etc/shadow",
    ];
    for name in dangerous {
        assert!(validate_filename(name).is_err(), "{name:?} should be rejected");
    }

    assert!(matches!(
        validate_filename(&"a".repeat(1000)),
        Err(ValidationError::FilenameTooLong)
    ));
}

