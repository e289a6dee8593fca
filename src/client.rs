use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tracing::debug;

use crate::credentials::Credentials;
use crate::error::{ConfigurationError, Result};
use crate::nonce::{Clock, NonceSource, RandomNonce, SystemClock};
use crate::signer::{self, ParameterSet, SignatureMethod};
use crate::transport::{SignedRequest, Transport};
use crate::{
    OAUTH_CALLBACK_KEY, OAUTH_CONSUMER_KEY, OAUTH_NONCE_KEY, OAUTH_SIGNATURE_KEY,
    OAUTH_SIGNATURE_METHOD_KEY, OAUTH_TIMESTAMP_KEY, OAUTH_TOKEN_KEY, OAUTH_VERIFIER_KEY,
    OAUTH_VERSION_KEY, OAUTH_VERSION_VALUE,
};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// OAuth 1.0 client: signs requests and drives the three-legged dance
/// through an injected [`Transport`].
///
/// The client holds whatever credentials are currently set and signs with
/// them; tracking which phase of the dance it is in (and persisting tokens
/// between phases) is the caller's job. One client serves one logical
/// dance; it is not internally synchronized for concurrent mutation.
pub struct OAuthClient<T> {
    credentials: Credentials,
    signature_method: SignatureMethod,
    nonce_override: Option<String>,
    nonce_source: Box<dyn NonceSource>,
    clock: Box<dyn Clock>,
    transport: T,
}

impl<T> OAuthClient<T>
where
    T: Transport,
{
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        transport: T,
    ) -> Self {
        OAuthClient {
            credentials: Credentials::new(consumer_key, consumer_secret),
            signature_method: SignatureMethod::default(),
            nonce_override: None,
            nonce_source: Box::new(RandomNonce),
            clock: Box::new(SystemClock),
            transport,
        }
    }

    /// Replace the nonce source (the default draws v4 UUIDs).
    pub fn with_nonce_source(mut self, source: impl NonceSource + 'static) -> Self {
        self.nonce_source = Box::new(source);
        self
    }

    /// Replace the timestamp source (the default reads the system clock).
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn set_consumer_key(&mut self, consumer_key: impl Into<String>) {
        self.credentials.set_consumer_key(consumer_key);
    }

    pub fn set_consumer_secret(&mut self, consumer_secret: impl Into<String>) {
        self.credentials.set_consumer_secret(consumer_secret);
    }

    /// Set the token obtained from the request-token or access-token step.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.credentials.set_token(token);
    }

    pub fn set_token_secret(&mut self, token_secret: impl Into<String>) {
        self.credentials.set_token_secret(token_secret);
    }

    /// Set the verifier received on the authorization callback.
    pub fn set_verifier(&mut self, verifier: impl Into<String>) {
        self.credentials.set_verifier(verifier);
    }

    /// Pin the nonce to a fixed value. For deterministic tests only; leave
    /// unset in production so every request draws a fresh random nonce.
    pub fn set_nonce_override(&mut self, nonce: impl Into<String>) {
        self.nonce_override = Some(nonce.into());
    }

    /// Select the signing method by wire name, case-insensitively. Anything
    /// other than `PLAINTEXT` selects HMAC-SHA1.
    pub fn set_signature_method(&mut self, value: &str) {
        self.signature_method = SignatureMethod::parse(value);
    }

    /// Obtain a request token: a signed GET to `endpoint`, carrying
    /// `oauth_callback` when one is given. Returns the raw `key=value&...`
    /// body; see [`TokenReader`](crate::TokenReader) for parsing it.
    pub async fn request_token(&self, endpoint: &str, callback: Option<&str>) -> Result<String> {
        let mut parameters = Vec::new();
        if let Some(callback) = callback {
            parameters.push((OAUTH_CALLBACK_KEY, callback));
        }
        self.call(endpoint, &parameters, Method::GET).await
    }

    /// Exchange an authorized request token for an access token: a signed
    /// GET carrying the stored `oauth_token` and `oauth_verifier`. Fails
    /// fast when either is unset.
    pub async fn access_token(&self, endpoint: &str) -> Result<String> {
        let token = self
            .credentials
            .token()
            .ok_or(ConfigurationError::MissingToken)?;
        let verifier = self
            .credentials
            .verifier()
            .ok_or(ConfigurationError::MissingVerifier)?;
        let parameters = [(OAUTH_TOKEN_KEY, token), (OAUTH_VERIFIER_KEY, verifier)];
        self.call(endpoint, &parameters, Method::GET).await
    }

    /// Perform a signed call and return the raw response body.
    ///
    /// The pipeline: merge the protocol parameters over `parameters`, sort,
    /// build the base string, sign, re-sort with `oauth_signature`
    /// included, render the `Authorization` header, then dispatch. For
    /// POST the encoded parameters travel as the form body; for every
    /// other method they are appended to `url` as the query string.
    ///
    /// `url` is signed exactly as given; pass query parameters through
    /// `parameters`, not inside `url`.
    pub async fn call(
        &self,
        url: &str,
        parameters: &[(&str, &str)],
        method: Method,
    ) -> Result<String> {
        // reject garbage before signing it
        url::Url::parse(url)?;

        let mut params: ParameterSet = parameters
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        // Protocol parameters win over caller-supplied duplicates.
        params.insert(OAUTH_CONSUMER_KEY.into(), self.credentials.consumer_key().into());
        params.insert(OAUTH_NONCE_KEY.into(), self.nonce());
        params.insert(
            OAUTH_SIGNATURE_METHOD_KEY.into(),
            self.signature_method.as_str().into(),
        );
        params.insert(
            OAUTH_TIMESTAMP_KEY.into(),
            self.clock.unix_timestamp().to_string(),
        );
        params.insert(OAUTH_VERSION_KEY.into(), OAUTH_VERSION_VALUE.into());
        if let Some(token) = self.credentials.token() {
            params.insert(OAUTH_TOKEN_KEY.into(), token.into());
        }

        let base_string = signer::signature_base_string(&method, url, &params);
        let signing_key = signer::signing_key(
            self.credentials.consumer_secret(),
            self.credentials.token_secret(),
        );
        let signature = signer::sign(self.signature_method, &base_string, &signing_key);
        // The map re-sorts on insert, so the signature lands in key order.
        params.insert(OAUTH_SIGNATURE_KEY.into(), signature);

        let authorization = signer::authorization_header(&params);
        let encoded = signer::form_encoded(&params);

        let (url, body, mut headers) = if method == Method::POST {
            (
                url.to_string(),
                Some(encoded),
                vec![(CONTENT_TYPE.as_str().to_string(), FORM_URLENCODED.to_string())],
            )
        } else {
            (format!("{}?{}", url, encoded), None, Vec::new())
        };
        headers.push((AUTHORIZATION.as_str().to_string(), authorization));

        debug!(method = %method, url = %url, "dispatching signed request");
        let response = self
            .transport
            .send(SignedRequest {
                method,
                url,
                headers,
                body,
            })
            .await?;
        Ok(response.body)
    }

    fn nonce(&self) -> String {
        match &self.nonce_override {
            Some(nonce) => nonce.clone(),
            None => self.nonce_source.generate(),
        }
    }
}

#[cfg(feature = "reqwest")]
impl OAuthClient<crate::transport::ReqwestTransport> {
    /// Build a client over the default reqwest transport.
    pub fn with_default_transport(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        options: &crate::transport::TransportOptions,
    ) -> Result<Self> {
        let transport = crate::transport::ReqwestTransport::new(options)?;
        Ok(OAuthClient::new(consumer_key, consumer_secret, transport))
    }
}

/// Build the user-authorization redirect URL for the second leg of the
/// dance: `endpoint?oauth_token=<token>`.
pub fn authorize_url(endpoint: &str, oauth_token: &str) -> String {
    format!(
        "{}?{}={}",
        endpoint,
        OAUTH_TOKEN_KEY,
        signer::percent_encode(oauth_token)
    )
}
