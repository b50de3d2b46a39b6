//! Bearer token authentication

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use subtle::ConstantTimeEq;

use crate::error::Error;

use super::state::AppState;

/// Set of tokens accepted in `Authorization: Bearer <token>`
pub struct ApiTokens {
    tokens: Vec<Vec<u8>>,
}

impl ApiTokens {
    pub fn new(tokens: &[String]) -> Self {
        Self {
            tokens: tokens.iter().map(|t| t.as_bytes().to_vec()).collect(),
        }
    }

    /// Check `candidate` against every configured token in constant time
    pub fn verify(&self, candidate: &str) -> bool {
        let candidate = candidate.as_bytes();
        self.tokens
            .iter()
            .fold(subtle::Choice::from(0), |matched, token| {
                matched | token.as_slice().ct_eq(candidate)
            })
            .into()
    }
}

/// Extractor that succeeds only for requests carrying a valid token
///
/// Handlers take it before the body so rejected requests do no work.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated;

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or(Error::Unauthorized)?;

        if state.tokens().verify(token) {
            Ok(Authenticated)
        } else {
            tracing::warn!("Rejected request with invalid API token");
            Err(Error::Unauthorized)
        }
    }
}

/// Token part of a `Bearer` authorization value
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
