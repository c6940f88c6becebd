//! Admin session gate.
//!
//! There is no session table: the token is a deterministic hash of the two
//! configured secrets, so exactly one value is valid system-wide and it
//! only changes when a secret changes. Logout clears the cookie; nothing
//! can be selectively revoked.

use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use super::error::{ApiError, Result};
use super::AppState;

pub const ADMIN_COOKIE: &str = "admin_token";

/// Used in token derivation when no newsletter secret is configured
const FALLBACK_SECRET: &str = "fallback-secret";

const COOKIE_MAX_AGE_DAYS: i64 = 7;

/// The one valid token value: `hex(sha256(password + secret))`
pub fn session_token(password: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn expected_token(state: &AppState) -> Option<String> {
    let password = state.config.admin_password.as_deref()?;
    let secret = state
        .config
        .newsletter_secret
        .as_deref()
        .unwrap_or(FALLBACK_SECRET);
    Some(session_token(password, secret))
}

/// Extractor guarding admin routes: the request must carry an
/// `admin_token` cookie matching the recomputed expected hash.
pub struct AdminSession;

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let expected =
            expected_token(state).ok_or(ApiError::Unavailable("admin not configured"))?;

        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(ADMIN_COOKIE)
            .map(|cookie| cookie.value())
            .ok_or(ApiError::Unauthorized("missing admin token"))?;

        if token != expected {
            return Err(ApiError::Unauthorized("invalid admin token"));
        }

        Ok(AdminSession)
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

/// POST /api/admin/auth - login, or logout with `action: "logout"`
pub async fn auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<AuthRequest>,
) -> Result<(CookieJar, Json<Value>)> {
    if request.action.as_deref() == Some("logout") {
        let jar = jar.remove(Cookie::build(ADMIN_COOKIE).path("/"));
        return Ok((jar, Json(json!({ "message": "Logged out" }))));
    }

    let configured = state
        .config
        .admin_password
        .as_deref()
        .ok_or(ApiError::Unavailable("admin not configured"))?;

    let password = request
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::Validation("password required".to_string()))?;

    if password != configured {
        return Err(ApiError::Unauthorized("invalid password"));
    }

    let secret = state
        .config
        .newsletter_secret
        .as_deref()
        .unwrap_or(FALLBACK_SECRET);
    let cookie = Cookie::build((ADMIN_COOKIE, session_token(configured, secret)))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::days(COOKIE_MAX_AGE_DAYS))
        .build();

    tracing::info!("Admin authenticated");
    Ok((jar.add(cookie), Json(json!({ "message": "Authenticated" }))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_deterministic() {
        assert_eq!(
            session_token("hunter2", "secret"),
            session_token("hunter2", "secret")
        );
    }

    #[test]
    fn test_token_is_hex_sha256() {
        let token = session_token("pw", "s");
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_changing_either_secret_invalidates() {
        let token = session_token("pw", "secret");
        assert_ne!(token, session_token("pw2", "secret"));
        assert_ne!(token, session_token("pw", "secret2"));
    }
}
