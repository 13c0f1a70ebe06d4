#[macro_use]
mod common;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};

use common::*;
use rental_profiles::auth::SESSION_COOKIE;
use rental_profiles::models::Role;

#[actix_web::test]
async fn login_issues_session_cookie_usable_by_gate() {
    let pool = test_pool().await;
    let user_id = seed_user(&pool, "r@example.com", Role::Renter, Some("secret")).await;
    seed_renter_profile(&pool, &user_id, Some("sleepy")).await;
    let app = test_app!(pool);

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "r@example.com", "password": "secret" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("session cookie")
        .into_owned();
    assert_eq!(cookie.http_only(), Some(true));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert_eq!(body["user"]["role"], "RENTER");
    assert_eq!(body["token"], cookie.value());

    let req = test::TestRequest::get().uri("/me").cookie(cookie).to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["profile"]["nickname"], "sleepy");
}

#[actix_web::test]
async fn login_rejects_bad_credentials() {
    let pool = test_pool().await;
    seed_user(&pool, "r@example.com", Role::Renter, Some("secret")).await;
    seed_user(&pool, "nopass@example.com", Role::Renter, None).await;
    let app = test_app!(pool);

    for (email, password) in [
        ("r@example.com", "wrong"),
        ("ghost@example.com", "secret"),
        ("nopass@example.com", ""),
    ] {
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid credentials");
    }
}

#[actix_web::test]
async fn logout_revokes_session() {
    let pool = test_pool().await;
    let user_id = seed_user(&pool, "r@example.com", Role::Renter, None).await;
    seed_renter_profile(&pool, &user_id, None).await;
    let token = seed_session(&pool, &user_id).await;
    let app = test_app!(pool);

    let req = test::TestRequest::post()
        .uri("/auth/logout")
        .cookie(Cookie::new(SESSION_COOKIE, token.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/me")
        .cookie(Cookie::new(SESSION_COOKIE, token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn expired_session_is_rejected() {
    let pool = test_pool().await;
    let user_id = seed_user(&pool, "r@example.com", Role::Renter, None).await;
    seed_renter_profile(&pool, &user_id, None).await;
    let past = (chrono::Utc::now() - chrono::Duration::days(1)).to_rfc3339();
    sqlx::query("INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)")
        .bind("stale-token")
        .bind(&user_id)
        .bind(&past)
        .bind(&past)
        .execute(&pool)
        .await
        .unwrap();
    let app = test_app!(pool);

    let req = test::TestRequest::get()
        .uri("/me")
        .cookie(Cookie::new(SESSION_COOKIE, "stale-token"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn health_is_public() {
    let pool = test_pool().await;
    let app = test_app!(pool);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "OK");
}
