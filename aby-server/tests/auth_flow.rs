//! Two-step admin login against a real database
//!
//! Skipped unless `DATABASE_URL` points at a disposable PostgreSQL.

mod common;

use aby_server::auth::otp;
use common::{
    PASSWORD, app_with_db, app_with_db_config, body_json, get, json_request, seed_admin, sign_in,
    with_cookie,
};
use http::{StatusCode, header};
use serde_json::json;
use shared::models::AdminRole;

#[tokio::test]
async fn login_then_verify_issues_cookie() {
    let Some(app) = app_with_db().await else { return };
    let admin = seed_admin(&app, AdminRole::Admin).await;

    let res = app
        .send(json_request(
            "POST",
            "/admin/login",
            json!({"email": admin.email.to_uppercase(), "password": PASSWORD}),
        ))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["state"], "otp_pending");
    assert_eq!(body["expires_in"], 300);

    let code = otp::issue(&app.state.kv, app.state.otp_policy, admin.id)
        .await
        .unwrap();
    let res = app
        .send(json_request(
            "POST",
            "/admin/verify-otp",
            json!({"email": admin.email, "otp": code}),
        ))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("AccessAdminToken="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains(&format!("Max-Age={}", 7 * 24 * 3600)));

    let body = body_json(res).await;
    assert_eq!(body["state"], "authenticated");
    assert_eq!(body["admin"]["id"], admin.id);
    assert!(body["admin"].get("password_hash").is_none());

    let token = body["token"].as_str().unwrap();
    let res = app.send(with_cookie(get("/admin/session"), token)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["state"], "authenticated");
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let Some(app) = app_with_db().await else { return };
    let admin = seed_admin(&app, AdminRole::Admin).await;

    let res = app
        .send(json_request(
            "POST",
            "/admin/login",
            json!({"email": admin.email, "password": "not-the-password"}),
        ))
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(res).await["code"], 1002);

    let res = app
        .send(json_request(
            "POST",
            "/admin/login",
            json!({"email": "nobody@abyhr.rw", "password": PASSWORD}),
        ))
        .await;
    assert_eq!(body_json(res).await["code"], 1002);
}

#[tokio::test]
async fn wrong_code_then_exhausted_attempts() {
    let Some(app) = app_with_db().await else { return };
    let admin = seed_admin(&app, AdminRole::Admin).await;
    otp::issue(&app.state.kv, app.state.otp_policy, admin.id)
        .await
        .unwrap();

    let attempt = || {
        json_request(
            "POST",
            "/admin/verify-otp",
            json!({"email": admin.email, "otp": "abcdef"}),
        )
    };
    let res = app.send(attempt()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(body_json(res).await["code"], 1102);

    app.send(attempt()).await;
    let res = app.send(attempt()).await;
    assert_eq!(body_json(res).await["code"], 1103);
    // The code is gone once the attempts are used up
    let res = app.send(attempt()).await;
    assert_eq!(body_json(res).await["code"], 1101);
}

#[tokio::test]
async fn expired_code_is_refused() {
    let Some(app) = app_with_db_config(|c| c.otp_ttl_secs = 1).await else {
        return;
    };
    let admin = seed_admin(&app, AdminRole::Admin).await;
    let code = otp::issue(&app.state.kv, app.state.otp_policy, admin.id)
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(1500)).await;

    let res = app
        .send(json_request(
            "POST",
            "/admin/verify-otp",
            json!({"email": admin.email, "otp": code}),
        ))
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(body_json(res).await["code"], 1101);
}

#[tokio::test]
async fn lock_unlock_and_logout() {
    let Some(app) = app_with_db().await else { return };
    let admin = seed_admin(&app, AdminRole::Admin).await;
    let token = sign_in(&app, &admin).await;

    let res = app.send(with_cookie(get("/departments"), &token)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .send(with_cookie(json_request("POST", "/admin/lock", json!({})), &token))
        .await;
    assert_eq!(body_json(res).await["state"], "locked");

    let res = app.send(with_cookie(get("/departments"), &token)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(res).await["code"], 1006);

    let res = app.send(with_cookie(get("/admin/session"), &token)).await;
    assert_eq!(body_json(res).await["state"], "locked");

    let res = app
        .send(with_cookie(
            json_request("POST", "/admin/unlock", json!({"password": "wrong"})),
            &token,
        ))
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .send(with_cookie(
            json_request("POST", "/admin/unlock", json!({"password": PASSWORD})),
            &token,
        ))
        .await;
    assert_eq!(body_json(res).await["state"], "authenticated");

    let res = app.send(with_cookie(get("/departments"), &token)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .send(with_cookie(json_request("POST", "/admin/logout", json!({})), &token))
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.send(with_cookie(get("/departments"), &token)).await;
    assert_eq!(body_json(res).await["code"], 1005);
}

#[tokio::test]
async fn disabled_admin_loses_access() {
    let Some(app) = app_with_db().await else { return };
    let admin = seed_admin(&app, AdminRole::Admin).await;
    let token = sign_in(&app, &admin).await;

    sqlx::query("UPDATE admins SET is_active = FALSE WHERE id = $1")
        .bind(admin.id)
        .execute(&app.state.pool)
        .await
        .unwrap();

    let res = app.send(with_cookie(get("/departments"), &token)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(res).await["code"], 1007);
}

#[tokio::test]
async fn plain_admin_cannot_manage_admins() {
    let Some(app) = app_with_db().await else { return };
    let admin = seed_admin(&app, AdminRole::Admin).await;
    let token = sign_in(&app, &admin).await;

    let res = app.send(with_cookie(get("/admin"), &token)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app.send(with_cookie(get("/admin/me"), &token)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["email"], admin.email);
}
