use std::collections::HashMap;

use serde::Deserialize;

use crate::{Result, TokenReaderError, TokenReaderResult};

const OAUTH_TOKEN_KEY: &str = "oauth_token";

const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";

/// Token pair returned by the request-token and access-token endpoints.
#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    pub oauth_token: String,
    pub oauth_token_secret: String,
    /// Whatever else the endpoint sent, e.g. `oauth_callback_confirmed`.
    #[serde(flatten)]
    pub extra: HashMap<String, String>,
}

/// Parse the conventional `key=value&...` body returned by the request
/// token and access token endpoints.
// this trait is sealed
pub trait TokenReader: private::Sealed {
    fn parse_oauth_token(self) -> Result<TokenResponse>;
}

impl TokenReader for String {
    fn parse_oauth_token(self) -> Result<TokenResponse> {
        Ok(parse_token_body(&self)?)
    }
}

/// Chains directly off `request_token` / `access_token` results.
impl TokenReader for Result<String> {
    fn parse_oauth_token(self) -> Result<TokenResponse> {
        Ok(parse_token_body(&self?)?)
    }
}

fn parse_token_body(body: &str) -> TokenReaderResult<TokenResponse> {
    let mut fields = body.split('&').map(split_pair).collect::<HashMap<_, _>>();
    let oauth_token = take_required(&mut fields, OAUTH_TOKEN_KEY, body)?;
    let oauth_token_secret = take_required(&mut fields, OAUTH_TOKEN_SECRET_KEY, body)?;
    Ok(TokenResponse {
        oauth_token,
        oauth_token_secret,
        extra: fields,
    })
}

// A pair without `=` is kept as a key with an empty value.
fn split_pair(pair: &str) -> (String, String) {
    match pair.find('=') {
        Some(at) => (pair[..at].to_string(), pair[at + 1..].to_string()),
        None => (pair.to_string(), String::new()),
    }
}

fn take_required(
    fields: &mut HashMap<String, String>,
    key: &'static str,
    body: &str,
) -> TokenReaderResult<String> {
    fields
        .remove(key)
        .ok_or_else(|| TokenReaderError::TokenKeyNotFound(key, body.to_string()))
}

mod private {
    pub trait Sealed {}
    impl Sealed for String {}
    impl Sealed for crate::Result<String> {}
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn parses_a_request_token_body() {
        // token pair from the rfc 5849 walkthrough
        let body = "oauth_token=hh5s93j4hdidpola&oauth_token_secret=hdhd0244k9j7ao03\
                    &oauth_callback_confirmed=true";
        let parsed = parse_token_body(body).unwrap();
        assert_eq!(parsed.oauth_token, "hh5s93j4hdidpola");
        assert_eq!(parsed.oauth_token_secret, "hdhd0244k9j7ao03");
        assert_eq!(parsed.extra.len(), 1);
        assert_eq!(
            parsed.extra.get("oauth_callback_confirmed").map(String::as_str),
            Some("true")
        );
    }

    #[test]
    fn agrees_with_serde_urlencoded() {
        let body = "oauth_token=nnch734d00sl2jdk&oauth_token_secret=pfkkdhi9sl3r4s00\
                    &screen_name=jacoblampaert";
        let by_hand = parse_token_body(body).unwrap();
        let by_serde = serde_urlencoded::from_str::<TokenResponse>(body).unwrap();
        assert_eq!(by_hand.oauth_token, by_serde.oauth_token);
        assert_eq!(by_hand.oauth_token_secret, by_serde.oauth_token_secret);
        assert_eq!(by_hand.extra, by_serde.extra);
    }

    #[test]
    fn tolerates_empty_and_valueless_pairs() {
        let parsed = parse_token_body("oauth_token=&oauth_token_secret&flag&&x=1").unwrap();
        assert_eq!(parsed.oauth_token, "");
        assert_eq!(parsed.oauth_token_secret, "");
        // "flag", the empty pair and "x" all survive into extra
        assert_eq!(parsed.extra.len(), 3);
        assert_eq!(parsed.extra.get("flag").map(String::as_str), Some(""));
        assert_eq!(parsed.extra.get("").map(String::as_str), Some(""));
        assert_eq!(parsed.extra.get("x").map(String::as_str), Some("1"));
    }

    #[test]
    fn value_may_contain_an_equals_sign() {
        let parsed =
            parse_token_body("oauth_token=a=b&oauth_token_secret=s").unwrap();
        assert_eq!(parsed.oauth_token, "a=b");
    }

    #[test]
    fn missing_token_is_reported() {
        let body = "oauth_callback_confirmed=true";
        match parse_token_body(body) {
            Err(TokenReaderError::TokenKeyNotFound(key, reported)) => {
                assert_eq!(key, OAUTH_TOKEN_KEY);
                assert_eq!(reported, body);
            }
            other => panic!("expected TokenKeyNotFound, got {:?}", other),
        }
    }

    #[test]
    fn missing_token_secret_is_reported() {
        let body = "oauth_token=hh5s93j4hdidpola";
        match parse_token_body(body) {
            Err(TokenReaderError::TokenKeyNotFound(key, reported)) => {
                assert_eq!(key, OAUTH_TOKEN_SECRET_KEY);
                assert_eq!(reported, body);
            }
            other => panic!("expected TokenKeyNotFound, got {:?}", other),
        }
    }

    #[test]
    fn parse_chains_off_a_client_result() {
        let ok: crate::Result<String> = Ok("oauth_token=t&oauth_token_secret=s".to_string());
        let parsed = ok.parse_oauth_token().unwrap();
        assert_eq!(parsed.oauth_token, "t");
        assert_eq!(parsed.oauth_token_secret, "s");
    }
}
