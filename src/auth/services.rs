use async_trait::async_trait;
use rand::{rngs::OsRng, RngCore};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::event::ApiRequest;

/// Header carrying the bearer token. Looked up with this exact casing.
pub const AUTH_HEADER: &str = "X-Authorization";

const TOKEN_BYTES: usize = 32;
pub const TOKEN_LEN: usize = TOKEN_BYTES * 2;

/// Generate an opaque session token: 256 random bits, hex-encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Who the caller is, as far as the authorizer can tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub token: String,
}

/// Precondition for every protected handler.
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorize(&self, req: &ApiRequest) -> Result<Principal, AppError>;
}

/// Accepts any bearer value of exactly [`TOKEN_LEN`] characters.
///
/// Issued tokens are never stored, so this is a shape check only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthTokenAuthorizer;

pub fn bearer_token(req: &ApiRequest) -> &str {
    let raw = req.header(AUTH_HEADER).unwrap_or_default();
    raw.strip_prefix("Bearer ").unwrap_or(raw)
}

#[async_trait]
impl Authorizer for LengthTokenAuthorizer {
    async fn authorize(&self, req: &ApiRequest) -> Result<Principal, AppError> {
        let token = bearer_token(req);
        if token.chars().count() != TOKEN_LEN {
            warn!(len = token.len(), "bearer token rejected");
            return Err(AppError::Unauthorized);
        }
        debug!("bearer token accepted");
        Ok(Principal {
            token: token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req_with(value: &str) -> ApiRequest {
        ApiRequest::new("GET").with_header(AUTH_HEADER, value)
    }

    #[test]
    fn generated_token_is_64_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }

    #[tokio::test]
    async fn accepts_bearer_prefixed_token() {
        let token = generate_token();
        let principal = LengthTokenAuthorizer
            .authorize(&req_with(&format!("Bearer {token}")))
            .await
            .expect("authorized");
        assert_eq!(principal.token, token);
    }

    #[tokio::test]
    async fn accepts_bare_token() {
        let token = "a".repeat(64);
        assert!(LengthTokenAuthorizer.authorize(&req_with(&token)).await.is_ok());
    }

    #[tokio::test]
    async fn rejects_wrong_lengths_and_missing_header() {
        let values = vec![
            String::new(),
            "Bearer ".to_string(),
            "Bearer abc".to_string(),
            "b".repeat(63),
            "c".repeat(65),
            format!("Bearer {}", "d".repeat(65)),
        ];
        for value in &values {
            let err = LengthTokenAuthorizer.authorize(&req_with(value)).await;
            assert!(matches!(err, Err(AppError::Unauthorized)), "{value:?}");
        }
        let err = LengthTokenAuthorizer.authorize(&ApiRequest::new("GET")).await;
        assert!(matches!(err, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn lowercase_header_is_not_looked_up() {
        let req = ApiRequest::new("GET").with_header("x-authorization", &generate_token());
        assert!(LengthTokenAuthorizer.authorize(&req).await.is_err());
    }
}
