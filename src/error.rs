use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type TransportResult<T> = std::result::Result<T, TransportError>;
pub type TokenReaderResult<T> = std::result::Result<T, TokenReaderError>;

/// Any failure surfaced by the client.
#[derive(Error, Debug)]
pub enum Error {
    #[error("request transport failed : {0}")]
    Transport(#[from] TransportError),
    #[error("client configuration is incomplete : {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("token acquisition failed : {0}")]
    TokenReader(#[from] TokenReaderError),
    #[error("invalid endpoint url : {0}")]
    Url(#[from] url::ParseError),
}

/// A dance step was invoked before the credentials it needs were set.
///
/// Raised before anything is signed, so a malformed request never leaves
/// the client.
#[derive(Error, Debug, Clone)]
pub enum ConfigurationError {
    #[error("oauth_token is not set; obtain a request token first")]
    MissingToken,
    #[error("oauth_verifier is not set; complete the authorization step first")]
    MissingVerifier,
}

#[derive(Error, Debug, Clone)]
pub enum TokenReaderError {
    #[error("response has malformed format: not found {0} in {1}")]
    TokenKeyNotFound(&'static str, String),
}

/// Failure reported by the underlying HTTP transport (connection, DNS, TLS,
/// timeout). Propagated to the caller unmodified; the client never retries.
#[derive(Error, Debug, Clone)]
#[error("{kind} : {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

/// Coarse classification of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The transport itself could not be constructed.
    Builder,
    Connect,
    Timeout,
    Redirect,
    /// The response body could not be read.
    Body,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Builder => "builder",
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Redirect => "redirect",
            TransportErrorKind::Body => "body",
            TransportErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}
