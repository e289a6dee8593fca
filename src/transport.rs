use std::time::Duration;

use async_trait::async_trait;
use http::Method;

use crate::error::TransportResult;

/// Configuration for the default transport.
///
/// TLS verification is on by default; turning it off is an explicit opt-in
/// for test servers with self-signed certificates.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub verify_tls: bool,
    pub follow_redirects: bool,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportOptions {
    fn default() -> Self {
        TransportOptions {
            verify_tls: true,
            follow_redirects: true,
            timeout: Duration::from_secs(30),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}

/// A fully signed request, ready for transport.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub method: Method,
    /// Final URL; for non-POST requests the encoded parameters are already
    /// appended as the query string.
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Form body, present for POST requests only.
    pub body: Option<String>,
}

/// Raw response handed back by a transport.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// HTTP transport capability.
///
/// The client performs no retries; a failed send surfaces as a
/// [`TransportError`](crate::error::TransportError) unmodified.
/// Cancellation propagates by dropping the returned future, and the
/// timeout comes from the transport's own configuration.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: SignedRequest) -> TransportResult<TransportResponse>;
}

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use async_trait::async_trait;
    use tracing::debug;

    use super::{SignedRequest, Transport, TransportOptions, TransportResponse};
    use crate::error::{TransportError, TransportErrorKind, TransportResult};

    /// Default transport backed by [`reqwest::Client`].
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new(options: &TransportOptions) -> TransportResult<Self> {
            let mut builder = reqwest::Client::builder()
                .timeout(options.timeout)
                .user_agent(options.user_agent.clone());
            if !options.verify_tls {
                builder = builder.danger_accept_invalid_certs(true);
            }
            if !options.follow_redirects {
                builder = builder.redirect(reqwest::redirect::Policy::none());
            }
            let client = builder.build().map_err(|e| TransportError {
                kind: TransportErrorKind::Builder,
                message: e.to_string(),
            })?;
            Ok(ReqwestTransport { client })
        }
    }

    #[async_trait]
    impl Transport for ReqwestTransport {
        async fn send(&self, request: SignedRequest) -> TransportResult<TransportResponse> {
            let SignedRequest {
                method,
                url,
                headers,
                body,
            } = request;
            debug!(method = %method, url = %url, "sending signed request");
            let mut builder = self.client.request(method, url.as_str());
            for (name, value) in &headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = body {
                builder = builder.body(body);
            }
            let response = builder.send().await.map_err(TransportError::from)?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let body = response.text().await.map_err(|e| TransportError {
                kind: TransportErrorKind::Body,
                message: e.to_string(),
            })?;
            debug!(status, "response received");
            Ok(TransportResponse {
                status,
                headers,
                body,
            })
        }
    }

    impl From<reqwest::Error> for TransportError {
        fn from(error: reqwest::Error) -> Self {
            let kind = if error.is_timeout() {
                TransportErrorKind::Timeout
            } else if error.is_connect() {
                TransportErrorKind::Connect
            } else if error.is_redirect() {
                TransportErrorKind::Redirect
            } else {
                TransportErrorKind::Other
            };
            TransportError {
                kind,
                message: error.to_string(),
            }
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_transport::ReqwestTransport;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_to_verified_tls() {
        let options = TransportOptions::default();
        assert!(options.verify_tls);
        assert!(options.follow_redirects);
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert!(options.user_agent.starts_with("oauth1-client/"));
    }
}
