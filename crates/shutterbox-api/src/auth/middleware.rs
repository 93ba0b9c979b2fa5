use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

pub const AUTH_REALM: &str = "shutterbox";

/// Decode `Authorization: Basic <base64(user:pass)>`.
pub fn parse_basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn challenge() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(
            header::WWW_AUTHENTICATE,
            format!("Basic realm=\"{}\"", AUTH_REALM),
        )],
        "Unauthorized",
    )
        .into_response()
}

/// Basic-auth gate for admin routes. Runs before the handler, so a rejected
/// request never reaches storage.
pub async fn basic_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some((username, password)) = parse_basic_auth(request.headers()) else {
        tracing::debug!(path = %request.uri().path(), "Missing or malformed basic auth header");
        return challenge();
    };

    match state.credential.verify(&username, &password) {
        Some(identity) => {
            tracing::debug!(username = %identity.username, "Admin authenticated");
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        None => {
            tracing::warn!(
                username = %username,
                path = %request.uri().path(),
                "Admin authentication failed"
            );
            challenge()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_parse_basic_auth() {
        let encoded = STANDARD.encode("admin:pa:ss");
        let parsed = parse_basic_auth(&headers_with(&format!("Basic {}", encoded)));
        assert_eq!(parsed, Some(("admin".to_string(), "pa:ss".to_string())));
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        assert!(parse_basic_auth(&headers_with("Bearer abc")).is_none());
        assert!(parse_basic_auth(&headers_with("Basic !!!notbase64")).is_none());
        assert!(parse_basic_auth(&HeaderMap::new()).is_none());
        let no_colon = STANDARD.encode("admin");
        assert!(parse_basic_auth(&headers_with(&format!("Basic {}", no_colon))).is_none());
    }

    #[test]
    fn test_challenge_header() {
        let response = challenge();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let value = response.headers().get(header::WWW_AUTHENTICATE).unwrap();
        assert!(value.to_str().unwrap().starts_with("Basic realm=\"shutterbox\""));
    }
}
