use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

const BEARER_PREFIX: &str = "Bearer ";

// claims propagated by the API gateway in front of this service, the
// gateway already verified the token signature against the identity
// provider, only claim content and expiry are examined here
#[derive(Deserialize, Clone)]
pub struct AppAuthedClaim {
    pub profile: u32,
    pub iat: i64,
    pub exp: i64,
}

#[async_trait]
impl<S> FromRequestParts<S> for AppAuthedClaim
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(StatusCode::UNAUTHORIZED)?;
        let raw = header.to_str().map_err(|_e| StatusCode::UNAUTHORIZED)?;
        let token = raw
            .strip_prefix(BEARER_PREFIX)
            .ok_or(StatusCode::UNAUTHORIZED)?;
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = true;
        let key = DecodingKey::from_secret(&[]);
        decode::<AppAuthedClaim>(token, &key, &validation)
            .map(|d| d.claims)
            .map_err(|_e| StatusCode::UNAUTHORIZED)
    }
}
