use async_trait::async_trait;
use axum::http::HeaderMap;

use fcl_types::Identity;

use crate::error::{ServerError, ServerResult};

/// Header carrying the caller identity on mutation requests.
pub const CALLER_HEADER: &str = "x-caller-identity";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    /// Raw value of the caller header.
    CallerHeader(String),
    Anonymous,
}

impl Credentials {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(CALLER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| Self::CallerHeader(value.to_string()))
            .unwrap_or(Self::Anonymous)
    }
}

/// Resolves request credentials to the identity a mutation runs as.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity>;
}

/// Trusts the caller header as-is. Suitable for local operation behind a
/// trusted front end.
pub struct HeaderAuth;

#[async_trait]
impl AuthProvider for HeaderAuth {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity> {
        match credentials {
            Credentials::CallerHeader(raw) => {
                let identity: Identity = raw
                    .parse()
                    .map_err(|_| ServerError::Unauthenticated("empty caller identity".into()))?;
                if identity.is_null() {
                    return Err(ServerError::Unauthenticated(
                        "null caller identity".into(),
                    ));
                }
                Ok(identity)
            }
            Credentials::Anonymous => Err(ServerError::Unauthenticated(format!(
                "missing {CALLER_HEADER} header"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn credentials_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(Credentials::from_headers(&headers), Credentials::Anonymous);

        headers.insert(CALLER_HEADER, HeaderValue::from_static("0xabc"));
        assert_eq!(
            Credentials::from_headers(&headers),
            Credentials::CallerHeader("0xabc".into())
        );
    }

    #[tokio::test]
    async fn header_auth_accepts_identity() {
        let id = HeaderAuth
            .authenticate(&Credentials::CallerHeader(" 0xabc ".into()))
            .await
            .unwrap();
        assert_eq!(id.as_str(), "0xabc");
    }

    #[tokio::test]
    async fn header_auth_refuses_anonymous_and_null() {
        for creds in [
            Credentials::Anonymous,
            Credentials::CallerHeader("   ".into()),
            Credentials::CallerHeader("0x0000".into()),
        ] {
            let err = HeaderAuth.authenticate(&creds).await.unwrap_err();
            assert!(matches!(err, ServerError::Unauthenticated(_)));
        }
    }
}
