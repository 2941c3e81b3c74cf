use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{Request, StatusCode};
use chrono::Local;
use jsonwebtoken::{encode, EncodingKey, Header};

use mmart_order::auth::AppAuthedClaim;

fn ut_parts_with_auth(value: Option<&str>) -> Parts {
    let mut builder = Request::builder().uri("/1.1/order");
    if let Some(v) = value {
        builder = builder.header(AUTHORIZATION, v);
    }
    let (parts, _body) = builder.body(()).unwrap().into_parts();
    parts
}

fn ut_encode_token(profile: u32, iat: i64, exp: i64) -> String {
    let claims = serde_json::json!({
        "profile": profile, "iat": iat, "exp": exp
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"utest"),
    )
    .unwrap()
}

async fn ut_expect_reject(mut parts: Parts) -> StatusCode {
    let result = AppAuthedClaim::from_request_parts(&mut parts, &()).await;
    match result {
        Ok(_claim) => panic!("expect the extractor to reject"),
        Err(status) => status,
    }
}

#[tokio::test]
async fn valid_bearer_token() {
    let now = Local::now().timestamp();
    let token = ut_encode_token(101, now - 5, now + 600);
    let header_val = format!("Bearer {}", token);
    let mut parts = ut_parts_with_auth(Some(header_val.as_str()));
    let result = AppAuthedClaim::from_request_parts(&mut parts, &()).await;
    match result {
        Ok(claim) => {
            assert_eq!(claim.profile, 101);
        }
        Err(_status) => panic!("expect the extractor to accept"),
    }
}

#[tokio::test]
async fn missing_header_rejected() {
    let parts = ut_parts_with_auth(None);
    let status = ut_expect_reject(parts).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_scheme_rejected() {
    let now = Local::now().timestamp();
    let token = ut_encode_token(101, now - 5, now + 600);
    let header_val = format!("Basic {}", token);
    let parts = ut_parts_with_auth(Some(header_val.as_str()));
    let status = ut_expect_reject(parts).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_rejected() {
    let now = Local::now().timestamp();
    // expiry far enough in the past to exceed the default leeway
    let token = ut_encode_token(101, now - 3600, now - 1800);
    let header_val = format!("Bearer {}", token);
    let parts = ut_parts_with_auth(Some(header_val.as_str()));
    let status = ut_expect_reject(parts).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_rejected() {
    let parts = ut_parts_with_auth(Some("Bearer not.a.jwt"));
    let status = ut_expect_reject(parts).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
