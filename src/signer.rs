use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use http::Method;
use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD_HMAC_SHA1: &str = "HMAC-SHA1";
const SIGNATURE_METHOD_PLAINTEXT: &str = "PLAINTEXT";

// https://tools.ietf.org/html/rfc5849#section-3.6
// * ALPHA, DIGIT, '-', '.', '_', '~' MUST NOT be encoded.
// * All other characters MUST be encoded.
// * The two hexadecimal characters used to represent encoded
//   characters MUST be uppercase.
const ENCODE_TARGETS: &AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Parameter name to value, unique keys. `BTreeMap` iteration yields the
/// byte-lexicographic ascending key order the signature depends on.
pub(crate) type ParameterSet = BTreeMap<String, String>;

/// OAuth signature methods supported by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureMethod {
    HmacSha1,
    PlainText,
}

impl SignatureMethod {
    /// Wire name carried in the `oauth_signature_method` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SignatureMethod::HmacSha1 => SIGNATURE_METHOD_HMAC_SHA1,
            SignatureMethod::PlainText => SIGNATURE_METHOD_PLAINTEXT,
        }
    }

    /// Case-insensitive parse. Anything other than `PLAINTEXT` selects
    /// HMAC-SHA1.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case(SIGNATURE_METHOD_PLAINTEXT) {
            SignatureMethod::PlainText
        } else {
            SignatureMethod::HmacSha1
        }
    }
}

impl Default for SignatureMethod {
    fn default() -> Self {
        SignatureMethod::HmacSha1
    }
}

/// Percent-encode with the RFC 3986 unreserved set.
pub(crate) fn percent_encode(input: &str) -> PercentEncode<'_> {
    utf8_percent_encode(input, ENCODE_TARGETS)
}

/// Render the parameter set as `k=v` pairs joined by `&`, both sides
/// percent-encoded. Used for the base string, the query string and the
/// form body, which all share this encoding.
pub(crate) fn form_encoded(params: &ParameterSet) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<String>>()
        .join("&")
}

/// Render the `Authorization` header value: `OAuth k="v", ...`.
pub(crate) fn authorization_header(params: &ParameterSet) -> String {
    let attributes = params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<String>>()
        .join(", ");
    format!("OAuth {}", attributes)
}

// GET, POST, PUT and DELETE sign as themselves (upper-cased); anything else
// is coerced to GET so the base string stays within the methods the
// protocol peers agree on.
fn base_string_method(method: &Method) -> String {
    let upper = method.as_str().to_ascii_uppercase();
    match upper.as_str() {
        "GET" | "POST" | "PUT" | "DELETE" => upper,
        _ => "GET".to_string(),
    }
}

/// Build the signature base string:
/// `METHOD&pe(url)&pe(normalized-parameter-string)`.
pub(crate) fn signature_base_string(method: &Method, url: &str, params: &ParameterSet) -> String {
    format!(
        "{}&{}&{}",
        base_string_method(method),
        percent_encode(url),
        percent_encode(&form_encoded(params))
    )
}

/// Derive the signing key: `pe(consumer_secret)&pe(token_secret)`, with an
/// absent token secret contributing the empty string.
pub(crate) fn signing_key(consumer_secret: &str, token_secret: Option<&str>) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret.unwrap_or(""))
    )
}

/// Compute the `oauth_signature` value. PLAINTEXT is the signing key
/// verbatim; HMAC-SHA1 is the base64 digest of the base string under the
/// signing key.
pub(crate) fn sign(method: SignatureMethod, base_string: &str, key: &str) -> String {
    match method {
        SignatureMethod::PlainText => key.to_string(),
        SignatureMethod::HmacSha1 => {
            let mut mac = HmacSha1::new_varkey(key.as_bytes())
                .expect("HMAC-SHA1 accepts any size of keys");
            mac.input(base_string.as_bytes());
            let hash = mac.result().code();
            base64::encode(&hash)
        }
    }
}

#[cfg(test)]
mod tests {
    use percent_encoding::percent_decode_str;

    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ParameterSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn sign_rfc5849_initiate() {
        // https://tools.ietf.org/html/rfc5849
        let set = params(&[
            ("oauth_callback", "http://printer.example.com/ready"),
            ("oauth_consumer_key", "dpf43f3p2l4k3l03"),
            ("oauth_nonce", "wIjqoS"),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", "137131200"),
        ]);
        let base =
            signature_base_string(&Method::POST, "https://photos.example.net/initiate", &set);
        let key = signing_key("kd94hf93k423kf44", None);
        assert_eq!(
            sign(SignatureMethod::HmacSha1, &base, &key),
            "74KNZJeDHnMBp0EMJ9ZHt/XKycU="
        );
    }

    #[test]
    fn sign_twitter_status_update() {
        // https://developer.twitter.com/ja/docs/basics/authentication/guides/creating-a-signature
        let set = params(&[
            ("include_entities", "true"),
            ("oauth_consumer_key", "xvz1evFS4wEEPTGEFPHBog"),
            ("oauth_nonce", "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg"),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", "1318622958"),
            (
                "oauth_token",
                "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            ),
            ("oauth_version", "1.0"),
            ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
        ]);
        let base = signature_base_string(
            &Method::POST,
            "https://api.twitter.com/1.1/statuses/update.json",
            &set,
        );
        let key = signing_key(
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            Some("LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE"),
        );
        assert_eq!(
            sign(SignatureMethod::HmacSha1, &base, &key),
            "hCtSmYh+iHYCEqBWrE7C7hYmtUk="
        );
    }

    #[test]
    fn plaintext_signature_is_the_signing_key() {
        let key = signing_key("secret&1", Some("tok/en"));
        assert_eq!(key, "secret%261&tok%2Fen");
        assert_eq!(sign(SignatureMethod::PlainText, "ignored", &key), key);
    }

    #[test]
    fn plaintext_without_token_secret_keeps_trailing_ampersand() {
        let key = signing_key("1234567890", None);
        assert_eq!(key, "1234567890&");
        assert_eq!(sign(SignatureMethod::PlainText, "", &key), "1234567890&");
    }

    #[test]
    fn base_string_method_passes_the_allowed_set() {
        let set = params(&[("a", "b")]);
        for method in &[Method::GET, Method::POST, Method::PUT, Method::DELETE] {
            let base = signature_base_string(method, "https://example.com/", &set);
            assert!(base.starts_with(&format!("{}&", method.as_str())));
        }
    }

    #[test]
    fn base_string_method_coerces_everything_else_to_get() {
        let set = params(&[("a", "b")]);
        for method in &[Method::PATCH, Method::HEAD, Method::OPTIONS] {
            let base = signature_base_string(method, "https://example.com/", &set);
            assert!(base.starts_with("GET&"), "{} must sign as GET", method);
        }
    }

    #[test]
    fn base_string_method_is_case_insensitive() {
        let lowercase_get = Method::from_bytes(b"get").unwrap();
        let set = params(&[("a", "b")]);
        let base = signature_base_string(&lowercase_get, "https://example.com/", &set);
        assert!(base.starts_with("GET&"));
    }

    #[test]
    fn normalization_is_deterministic_and_insertion_order_independent() {
        let forward = params(&[("b", "2"), ("a", "1"), ("c", "3")]);
        let mut backward = ParameterSet::new();
        backward.insert("c".to_string(), "3".to_string());
        backward.insert("a".to_string(), "1".to_string());
        backward.insert("b".to_string(), "2".to_string());
        assert_eq!(form_encoded(&forward), "a=1&b=2&c=3");
        assert_eq!(form_encoded(&forward), form_encoded(&backward));
        // re-running yields byte-identical output
        assert_eq!(form_encoded(&forward), form_encoded(&forward));
    }

    #[test]
    fn authorization_header_round_trips_reserved_characters() {
        let set = params(&[
            ("a&b", "x=y"),
            ("space", "a b"),
            ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
            ("unicode", "少女終末旅行"),
        ]);
        let header = authorization_header(&set);
        let content = header.strip_prefix("OAuth ").unwrap();
        let recovered = content
            .split(", ")
            .map(|item| {
                let mut kv = item.splitn(2, '=');
                let key = kv.next().unwrap();
                let value = kv.next().unwrap().trim_matches('"');
                (
                    percent_decode_str(key).decode_utf8().unwrap().into_owned(),
                    percent_decode_str(value).decode_utf8().unwrap().into_owned(),
                )
            })
            .collect::<ParameterSet>();
        assert_eq!(recovered, set);
    }

    #[test]
    fn signature_method_parse_is_case_insensitive_with_hmac_fallback() {
        assert_eq!(SignatureMethod::parse("PLAINTEXT"), SignatureMethod::PlainText);
        assert_eq!(SignatureMethod::parse("plaintext"), SignatureMethod::PlainText);
        assert_eq!(SignatureMethod::parse("PlainText"), SignatureMethod::PlainText);
        assert_eq!(SignatureMethod::parse("HMAC-SHA1"), SignatureMethod::HmacSha1);
        assert_eq!(SignatureMethod::parse("bogus"), SignatureMethod::HmacSha1);
        assert_eq!(SignatureMethod::parse(""), SignatureMethod::HmacSha1);
    }

    #[test]
    fn wire_names() {
        assert_eq!(SignatureMethod::HmacSha1.as_str(), "HMAC-SHA1");
        assert_eq!(SignatureMethod::PlainText.as_str(), "PLAINTEXT");
    }
}
