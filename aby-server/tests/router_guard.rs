//! Router behavior that never reaches the database

mod common;

use aby_server::auth::session;
use common::{app_without_db, body_json, get, json_request, with_cookie};
use http::{StatusCode, header};
use shared::models::{Admin, AdminRole};

fn admin() -> Admin {
    Admin {
        id: 42,
        email: "ops@abyhr.rw".into(),
        first_name: "Aline".into(),
        last_name: "Uwase".into(),
        phone: None,
        role: AdminRole::Admin,
        profile_img: None,
        is_active: true,
        created_at: 0,
        updated_at: 0,
    }
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let t = app_without_db();
    for uri in ["/clients", "/applicants", "/departments", "/activities", "/admin", "/admin/me"] {
        let res = t.send(get(uri)).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{uri}");
        let body = body_json(res).await;
        assert_eq!(body["code"], 1001, "{uri}");
    }
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let t = app_without_db();
    let res = t.send(with_cookie(get("/clients"), "not-a-jwt")).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(res).await["code"], 1004);
}

#[tokio::test]
async fn bearer_header_is_accepted_as_token_source() {
    let t = app_without_db();
    let req = http::Request::builder()
        .uri("/departments")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = t.send(req).await;
    assert_eq!(body_json(res).await["code"], 1004);
}

#[tokio::test]
async fn revoked_session_is_refused() {
    let t = app_without_db();
    let (token, claims) = t.state.jwt.generate_token(&admin()).unwrap();
    session::revoke(&t.state.kv, &claims).await.unwrap();

    let res = t.send(with_cookie(get("/clients"), &token)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(res).await["code"], 1005);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_invalid() {
    let t = app_without_db();
    let other = aby_server::auth::JwtService::new("another-secret-that-is-long-enough-123", 7);
    let (token, _) = other.generate_token(&admin()).unwrap();

    let res = t.send(with_cookie(get("/activities"), &token)).await;
    assert_eq!(body_json(res).await["code"], 1004);
}

#[tokio::test]
async fn login_payload_is_validated_before_lookup() {
    let t = app_without_db();
    let res = t
        .send(json_request(
            "POST",
            "/admin/login",
            serde_json::json!({"email": "not-an-email", "password": "x"}),
        ))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(body["code"], 2);
    assert!(body["details"]["email"].is_array());
}

#[tokio::test]
async fn otp_must_be_six_characters() {
    let t = app_without_db();
    let res = t
        .send(json_request(
            "POST",
            "/admin/verify-otp",
            serde_json::json!({"email": "ops@abyhr.rw", "otp": "123"}),
        ))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_is_rate_limited_per_ip() {
    let t = app_without_db();
    let attempt = || {
        let mut req = json_request(
            "POST",
            "/admin/login",
            serde_json::json!({"email": "bad", "password": "x"}),
        );
        req.headers_mut()
            .insert("x-forwarded-for", "203.0.113.9".parse().unwrap());
        req
    };

    for _ in 0..5 {
        assert_eq!(t.send(attempt()).await.status(), StatusCode::BAD_REQUEST);
    }
    let res = t.send(attempt()).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_json(res).await["code"], 9);

    // The OTP route has its own bucket
    let mut other = json_request(
        "POST",
        "/admin/verify-otp",
        serde_json::json!({"email": "bad", "otp": "1"}),
    );
    other
        .headers_mut()
        .insert("x-forwarded-for", "203.0.113.9".parse().unwrap());
    assert_eq!(t.send(other).await.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_without_session_clears_cookie() {
    let t = app_without_db();
    let res = t
        .send(json_request("POST", "/admin/logout", serde_json::json!({})))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("AccessAdminToken=;"));
    assert!(cookie.contains("Max-Age=0"));
    assert_eq!(body_json(res).await["state"], "unauthenticated");
}

#[tokio::test]
async fn logout_revokes_the_presented_token() {
    let t = app_without_db();
    let (token, claims) = t.state.jwt.generate_token(&admin()).unwrap();
    let res = t
        .send(with_cookie(
            json_request("POST", "/admin/logout", serde_json::json!({})),
            &token,
        ))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        session::status(&t.state.kv, &claims).await.unwrap(),
        session::SessionStatus::Revoked
    );
}

#[tokio::test]
async fn health_reports_unavailable_database() {
    let t = app_without_db();
    let res = t.send(get("/health")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["service"], "aby-server");
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "unavailable");
    assert_eq!(body["cache"], "ok");
}

#[tokio::test]
async fn uploads_are_served_read_only() {
    let t = app_without_db();
    let dir = t.uploads.path().join("clients");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("sample.png"), common::tiny_png()).unwrap();

    let res = t.send(get("/uploads/clients/sample.png")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "image/png");

    let missing = t.send(get("/uploads/clients/absent.png")).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let t = app_without_db();
    let res = t.send(get("/clients")).await;
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn cors_allows_configured_origin_with_credentials() {
    let t = app_without_db();
    let req = http::Request::builder()
        .method("OPTIONS")
        .uri("/clients")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = t.send(req).await;
    assert_eq!(
        res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}
