//! Exclusion / optional rule behavior through a real router.

use axum::http::{Method, StatusCode};
use serde_json::json;

use bearer_gate::GateConfig;

mod common;
use common::{SECRET, body_json, gated_app, send, sign};

#[tokio::test]
async fn test_exclude_passes_exact_path() {
    let app = gated_app(GateConfig::new(SECRET).exclude(["/static"]));

    for uri in ["/static", "/static/", "/static/foo/bar"] {
        let response = send(&app, Method::GET, uri, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn test_exclude_is_segment_bounded() {
    let app = gated_app(GateConfig::new(SECRET).exclude(["/static"]));

    for uri in ["/staticfoo", "/staticfoo/bar"] {
        let response = send(&app, Method::GET, uri, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn test_exclude_with_multiple_paths() {
    let app = gated_app(GateConfig::new(SECRET).exclude(["/docs", "/books", "/static"]));

    let response = send(&app, Method::GET, "/static/foo/bar", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, Method::GET, "/somewhere", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({"error": "Missing token"}));
}

#[tokio::test]
async fn test_excluded_path_ignores_bad_token() {
    let app = gated_app(GateConfig::new(SECRET).exclude(["/static"]));

    let response = send(&app, Method::GET, "/static", Some("Bearer garbage")).await;
    assert_eq!(response.status(), StatusCode::OK);
    // Excluded requests are forwarded without identity.
    assert_eq!(body_json(response).await, json!({"claims": null}));
}

#[tokio::test]
async fn test_exclude_with_single_method() {
    let app = gated_app(GateConfig::new(SECRET).exclude([("/static", "get")]));

    let response = send(&app, Method::GET, "/static", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, Method::POST, "/static", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_exclude_with_method_pattern() {
    let app = gated_app(GateConfig::new(SECRET).exclude([("/static", "get|put")]));

    for method in [Method::GET, Method::PUT] {
        let response = send(&app, method.clone(), "/static", None).await;
        assert_eq!(response.status(), StatusCode::OK, "{method}");
    }

    let response = send(&app, Method::POST, "/static", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_exclude_method_is_case_insensitive() {
    let app = gated_app(GateConfig::new(SECRET).exclude([("/static", "gEt")]));

    let response = send(&app, Method::GET, "/static", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_optional_without_header() {
    let app = gated_app(GateConfig::new(SECRET).optional(["/static"]));

    let response = send(&app, Method::GET, "/static", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"claims": null}));
}

#[tokio::test]
async fn test_optional_with_bad_header() {
    let app = gated_app(GateConfig::new(SECRET).optional(["/static"]));

    let response = send(
        &app,
        Method::GET,
        "/static",
        Some("Bearer I'm not that bad of a header. Let me in please."),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Invalid token: malformed token"})
    );
}

#[tokio::test]
async fn test_optional_with_good_header() {
    let app = gated_app(GateConfig::new(SECRET).optional(["/static"]));
    let token = sign(&json!({"foo": "bar"}), SECRET);

    let response = send(&app, Method::GET, "/static", Some(&format!("Bearer {token}"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"claims": {"foo": "bar"}}));
}

#[tokio::test]
async fn test_optional_with_wrong_signature() {
    let app = gated_app(GateConfig::new(SECRET).optional(["/static"]));
    let token = sign(&json!({"foo": "bar"}), "not-the-secret");

    let response = send(&app, Method::GET, "/static", Some(&format!("Bearer {token}"))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Invalid token: signature mismatch"})
    );
}

#[tokio::test]
async fn test_optional_with_method() {
    let app = gated_app(GateConfig::new(SECRET).optional([("/static", "get")]));

    let response = send(&app, Method::GET, "/static", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, Method::POST, "/static", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_optional_no_matching_path_and_no_token() {
    let app = gated_app(GateConfig::new(SECRET).optional(["/docs", "/books", "/static"]));

    let response = send(&app, Method::GET, "/somewhere", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
