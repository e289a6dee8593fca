/*!
oauth1-client: OAuth 1.0 request signing and the three-legged token dance.

# Overview

This library implements an OAuth 1.0 client core: deterministic parameter
normalization, signature base-string construction, HMAC-SHA1 / PLAINTEXT
signing and `Authorization`-header encoding, plus the request-token and
access-token legs of the dance. The HTTP transport is an injected
capability: a [`reqwest`](https://crates.io/crates/reqwest)-backed default
ships behind the default-on `reqwest` feature, and anything implementing
[`Transport`] can stand in for it (tests use an in-memory mock).

# How to use

## Basic usecase 1 - a signed API call

```no_run
use oauth1_client::{Method, OAuthClient, TransportOptions};

# async fn run() -> oauth1_client::Result<()> {
let mut client = OAuthClient::with_default_transport(
    "[CONSUMER_KEY]",
    "[CONSUMER_SECRET]",
    &TransportOptions::default(),
)?;
client.set_token("[ACCESS_TOKEN]");
client.set_token_secret("[TOKEN_SECRET]");

let body = client
    .call(
        "https://example.com/api/get_some_lines.json",
        &[("count", "5")],
        Method::GET,
    )
    .await?;
println!("{}", body);
# Ok(())
# }
```

## Basic usecase 2 - acquiring OAuth token & secret

```no_run
use oauth1_client::{authorize_url, OAuthClient, TokenReader, TransportOptions};

# async fn run() -> oauth1_client::Result<()> {
let mut client = OAuthClient::with_default_transport(
    "[CONSUMER_KEY]",
    "[CONSUMER_SECRET]",
    &TransportOptions::default(),
)?;

// step 1: acquire request token & token secret
let resp = client
    .request_token(
        "https://example.com/oauth/request_token",
        Some("http://localhost/cb"),
    )
    .await
    .parse_oauth_token()?;
client.set_token(resp.oauth_token.clone());
client.set_token_secret(resp.oauth_token_secret);

// step 2: send the user to the authorization page; the verifier comes
// back on the callback
println!(
    "please access to: {}",
    authorize_url("https://example.com/oauth/authenticate", &resp.oauth_token)
);

// step 3: exchange for the access token
client.set_verifier("[VERIFIER_FROM_CALLBACK]");
let resp = client
    .access_token("https://example.com/oauth/access_token")
    .await
    .parse_oauth_token()?;
client.set_token(resp.oauth_token);
client.set_token_secret(resp.oauth_token_secret);
# Ok(())
# }
```
*/
mod client;
mod credentials;
mod error;
mod nonce;
mod signer;
mod token_reader;
mod transport;

// exposed to external program
pub use client::{authorize_url, OAuthClient};
pub use credentials::Credentials;
pub use error::{
    ConfigurationError, Error, Result, TokenReaderError, TokenReaderResult, TransportError,
    TransportErrorKind, TransportResult,
};
pub use http::Method;
pub use nonce::{Clock, NonceSource, RandomNonce, SystemClock};
pub use signer::SignatureMethod;
pub use token_reader::{TokenReader, TokenResponse};
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
pub use transport::{SignedRequest, Transport, TransportOptions, TransportResponse};

// exposed constant variables
/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_verifier`.
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";

// crate-private constant variables
pub(crate) const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
pub(crate) const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
pub(crate) const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
pub(crate) const OAUTH_TOKEN_KEY: &str = "oauth_token";
pub(crate) const OAUTH_VERSION_VALUE: &str = "1.0";
