// ============================================================================
// Sitenav API - Request User
// File: crates/sitenav-api/src/auth.rs
// Description: JWT bearer tokens mapped onto the menu engine's request user
// ============================================================================

use std::collections::BTreeSet;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use sitenav_core::domain::{Permission, RequestUser};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // Username
    pub exp: usize,
    #[serde(default)]
    pub staff: bool,
    #[serde(default)]
    pub superuser: bool,
    #[serde(default)]
    pub perms: Vec<String>,
}

impl From<Claims> for RequestUser {
    fn from(claims: Claims) -> Self {
        RequestUser::Authenticated {
            username: claims.sub,
            is_staff: claims.staff,
            is_superuser: claims.superuser,
            permissions: claims.perms.into_iter().map(Permission::from).collect::<BTreeSet<_>>(),
        }
    }
}

pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_seconds: u64,
}

impl JwtManager {
    pub fn new(secret: &str, expiration_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_seconds,
        }
    }

    pub fn generate_token(
        &self,
        username: &str,
        staff: bool,
        superuser: bool,
        perms: &[&str],
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = usize::try_from(Utc::now().timestamp()).unwrap_or_default();
        let expiration = now + self.expiration_seconds as usize;

        let claims = Claims {
            sub: username.to_string(),
            exp: expiration,
            staff,
            superuser,
            perms: perms.iter().map(|p| p.to_string()).collect(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }

    /// Anonymous without an `Authorization` header; a header that is not a
    /// valid bearer token is rejected.
    pub fn user_from_headers(&self, headers: &HeaderMap) -> Result<RequestUser, ApiError> {
        let Some(value) = headers.get(AUTHORIZATION) else {
            return Ok(RequestUser::Anonymous);
        };

        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Expected a bearer token".to_string()))?;

        self.validate_token(token)
            .map(RequestUser::from)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {}", e)))
    }
}

/// The user a request is served for.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub RequestUser);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state.jwt.user_from_headers(&parts.headers).map(CurrentUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token)).unwrap());
        headers
    }

    #[test]
    fn test_token_round_trip_keeps_flags() {
        let jwt = JwtManager::new("secret", 60);
        let token = jwt.generate_token("ana", true, false, &["blog.add_post"]).unwrap();

        let user = jwt.user_from_headers(&bearer(&token)).unwrap();
        assert!(user.is_staff());
        assert_eq!(user.username(), Some("ana"));
        assert!(user.has_all([&Permission::from("blog.add_post")]));
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        let jwt = JwtManager::new("secret", 60);
        assert!(jwt.user_from_headers(&HeaderMap::new()).unwrap().is_anonymous());
    }

    #[test]
    fn test_bad_tokens_are_rejected() {
        let jwt = JwtManager::new("secret", 60);
        let foreign = JwtManager::new("other", 60).generate_token("ana", false, false, &[]).unwrap();

        assert!(matches!(jwt.user_from_headers(&bearer(&foreign)), Err(ApiError::Unauthorized(_))));
        assert!(matches!(jwt.user_from_headers(&bearer("garbage")), Err(ApiError::Unauthorized(_))));

        let mut basic = HeaderMap::new();
        basic.insert(AUTHORIZATION, HeaderValue::from_static("Basic YWxhZGRpbjpvcGVuc2VzYW1l"));
        assert!(jwt.user_from_headers(&basic).is_err());
    }
}
