//! Admin authorization gate.
//!
//! Every route under `/posts/admin` passes through [`require_admin`] before
//! any handler logic runs; rejected requests never touch the post store.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use subtle::ConstantTimeEq;

use crate::application::error::{ErrorReport, HttpError};
use crate::domain::entities::AdminIdentity;

const ADMIN_COOKIE: &str = "foglio_admin";
const ADMIN_ACTOR: &str = "admin";

/// Verifier for the configured admin bearer token.
#[derive(Clone)]
pub struct AdminGate {
    token: Arc<str>,
    login_url: Arc<str>,
}

impl AdminGate {
    pub fn new(token: impl Into<Arc<str>>, login_url: impl Into<Arc<str>>) -> Self {
        Self {
            token: token.into(),
            login_url: login_url.into(),
        }
    }

    fn verify(&self, presented: &str) -> bool {
        presented
            .as_bytes()
            .ct_eq(self.token.as_bytes())
            .into()
    }
}

pub async fn require_admin(
    State(gate): State<AdminGate>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let presented = bearer_token(request.headers()).or_else(|| cookie_token(request.headers()));

    match presented {
        Some(token) if gate.verify(&token) => {
            request
                .extensions_mut()
                .insert(AdminIdentity::new(ADMIN_ACTOR));
            next.run(request).await
        }
        _ => reject(&gate, request.headers()),
    }
}

fn reject(gate: &AdminGate, headers: &HeaderMap) -> Response {
    if accepts_html(headers) {
        let mut response = Redirect::to(&gate.login_url).into_response();
        ErrorReport::from_message(
            "infra::http::auth::require_admin",
            StatusCode::SEE_OTHER,
            "admin request without a valid token redirected to login",
        )
        .attach(&mut response);
        response
    } else {
        HttpError::new(
            "infra::http::auth::require_admin",
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "admin request without a valid token",
        )
        .into_response()
    }
}

fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let bearer = raw.strip_prefix("Bearer ")?;
    Some(bearer.to_string())
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == ADMIN_COOKIE).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_accepts_only_the_exact_token() {
        let gate = AdminGate::new("sekrit", "/posts");
        assert!(gate.verify("sekrit"));
        assert!(!gate.verify("sekri"));
        assert!(!gate.verify("sekrit2"));
        assert!(!gate.verify(""));
    }

    #[test]
    fn cookie_token_is_extracted_from_the_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "theme=dark; foglio_admin=sekrit".parse().unwrap(),
        );
        assert_eq!(cookie_token(&headers).as_deref(), Some("sekrit"));
    }

    #[test]
    fn bearer_token_requires_the_scheme_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc"));

        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
