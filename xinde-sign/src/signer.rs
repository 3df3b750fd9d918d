use std::fmt;

use sha1::{Digest, Sha1};
use tracing::debug;

use crate::error::SignError;
use crate::params::QueryParams;

/// Name of the query parameter that carries the signature
pub const SIGNATURE_PARAM: &str = "signature";

/// A request signature: the SHA-1 digest of the canonical string as
/// 40 lowercase hex characters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    /// Hash a canonical string
    pub fn compute(canonical: &str) -> Self {
        let digest = Sha1::digest(canonical.as_bytes());
        Signature(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A URL with its `signature` parameter appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    url: String,
    signature: Signature,
}

impl SignedUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn into_string(self) -> String {
        self.url
    }
}

impl fmt::Display for SignedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl From<SignedUrl> for String {
    fn from(signed: SignedUrl) -> Self {
        signed.url
    }
}

/// Compute the signature for the query parameters of `url`
///
/// # Arguments
///
/// * `url` - URL with a query string, e.g. `https://api.xindedata.com/v1/task?appid=myappid&time=1467372594`
/// * `secret` - The app secret issued with the app id
///
/// # Errors
///
/// Returns a [`SignError`] if the query string cannot be parsed.
pub fn signature(url: &str, secret: &str) -> Result<Signature, SignError> {
    let params = QueryParams::parse(url)?;
    let signature = Signature::compute(&params.canonical_string(secret));
    debug!(params = params.len(), %signature, "computed request signature");
    Ok(signature)
}

/// Sign `url` with `secret`, returning the URL with `&signature=<hex>` appended.
///
/// The original URL text is kept as given; only the parameter order used for
/// hashing is canonical.
///
/// # Example
///
/// ```
/// let signed = xinde_sign::sign_url("https://api.example.com/v1/task?b=2&a=1", "s3cr3t")?;
/// assert!(signed.as_str().starts_with("https://api.example.com/v1/task?b=2&a=1&signature="));
/// assert_eq!(signed.signature().as_str().len(), 40);
/// # Ok::<(), xinde_sign::SignError>(())
/// ```
pub fn sign_url(url: &str, secret: &str) -> Result<SignedUrl, SignError> {
    let signature = signature(url, secret)?;
    Ok(SignedUrl {
        url: format!("{}&{}={}", url, SIGNATURE_PARAM, signature),
        signature,
    })
}

/// Check a URL produced by [`sign_url`] against `secret`.
///
/// Returns `Ok(false)` if the URL does not end with a signature parameter or
/// the signature does not match.
pub fn verify_signed_url(signed_url: &str, secret: &str) -> Result<bool, SignError> {
    let marker = format!("&{}=", SIGNATURE_PARAM);
    let Some((url, given)) = signed_url.rsplit_once(marker.as_str()) else {
        return Ok(false);
    };

    let expected = signature(url, secret)?;
    Ok(expected.as_str() == given)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO_URL: &str = "https://api.xindedata.com/v1/task?appid=myappid&time=1467372594";

    #[test]
    fn test_known_signature() {
        let signed = sign_url(DEMO_URL, "mySecret").unwrap();
        assert_eq!(
            signed.as_str(),
            "https://api.xindedata.com/v1/task?appid=myappid&time=1467372594\
             &signature=ae59ebf624b748374d69268e022147691a5ff0e6"
        );
    }

    #[test]
    fn test_signature_is_deterministic() {
        let url = "https://api.example.com/v1/task?appid=test&time=1467372594";
        let first = signature(url, "s3cr3t").unwrap();
        let second = signature(url, "s3cr3t").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.as_str(), "ba15430438cde3fd90659290d3dade9a357f0d46");
        assert!(first
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_signature_ignores_parameter_order() {
        let a = signature("https://api.example.com/v1/task?b=2&a=1", "s3cr3t").unwrap();
        let b = signature("https://api.example.com/v1/task?a=1&b=2", "s3cr3t").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "050c262eb3ac15cbb318748b0c5a98747c8aade4");
    }

    #[test]
    fn test_signature_changes_with_value() {
        let base = signature("u?appid=test&time=1467372594", "s3cr3t").unwrap();
        let changed = signature("u?appid=test&time=1467372595", "s3cr3t").unwrap();
        let other_secret = signature("u?appid=test&time=1467372594", "s3cr3T").unwrap();

        assert_ne!(base, changed);
        assert_ne!(base, other_secret);
    }

    #[test]
    fn test_duplicate_key_uses_last_value() {
        let duplicated = signature("u?a=0&b=2&a=1", "s3cr3t").unwrap();
        let single = signature("u?a=1&b=2", "s3cr3t").unwrap();
        assert_eq!(duplicated, single);
    }

    #[test]
    fn test_empty_query_hashes_secret_twice() {
        let signed = sign_url("https://api.example.com/v1/task?", "s3cr3t").unwrap();
        assert_eq!(signed.signature(), &Signature::compute("s3cr3ts3cr3t"));
        assert_eq!(
            signed.signature().as_str(),
            "31f08ead8c715fb11dfe8688fb5828a9ccd89f77"
        );
        assert!(signed
            .as_str()
            .ends_with("v1/task?&signature=31f08ead8c715fb11dfe8688fb5828a9ccd89f77"));
    }

    #[test]
    fn test_utf8_is_hashed_as_bytes() {
        let sig = signature("u?name=张三", "密钥").unwrap();
        assert_eq!(sig.as_str(), "fd7ae58d7579afd108460258f1274e0864dc8d04");
    }

    #[test]
    fn test_task_status_url() {
        let signed = sign_url(
            "https://api.xindedata.com/v1/task?tid=42&appid=myapp&time=1467372594",
            "s3cr3t",
        )
        .unwrap();
        assert_eq!(
            signed.signature().as_str(),
            "69dcd9797af680741f924d82b9ed90d5ec4ab37e"
        );
    }

    #[test]
    fn test_missing_query_fails() {
        assert!(matches!(
            sign_url("https://api.example.com/v1/task", "s3cr3t"),
            Err(SignError::MissingQuery(_))
        ));
    }

    #[test]
    fn test_verify_signed_url() {
        let signed = sign_url(DEMO_URL, "mySecret").unwrap();

        assert!(verify_signed_url(signed.as_str(), "mySecret").unwrap());
        assert!(!verify_signed_url(signed.as_str(), "wrong").unwrap());
        assert!(!verify_signed_url(DEMO_URL, "mySecret").unwrap());

        let tampered = signed.as_str().replace("myappid", "otherapp");
        assert!(!verify_signed_url(&tampered, "mySecret").unwrap());
    }
}
