use std::collections::btree_map::{BTreeMap, Iter};

use crate::error::SignError;

/// The query parameters of a request URL, ordered by key.
///
/// Keys compare by byte value, which is the ordering the service uses when
/// it recomputes the signature. A key given more than once keeps the value
/// of its last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<String, String>,
}

impl QueryParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the query string of `url` (everything after the first `?`).
    ///
    /// Values are taken verbatim without percent-decoding. Empty segments
    /// are skipped. For a value that itself contains `=`, only the text up
    /// to the next `=` is kept (`a=b=c` yields `a` => `b`); the service
    /// computes signatures the same way.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::MissingQuery`] if the URL has no `?` and
    /// [`SignError::MalformedParameter`] for a segment without `=`.
    pub fn parse(url: &str) -> Result<Self, SignError> {
        let (_, query) = url
            .split_once('?')
            .ok_or_else(|| SignError::MissingQuery(url.to_string()))?;

        let mut params = Self::new();
        for segment in query.split('&').filter(|s| !s.is_empty()) {
            let mut parts = segment.split('=');
            let key = parts.next().unwrap_or_default();
            let value = parts
                .next()
                .ok_or_else(|| SignError::MalformedParameter(segment.to_string()))?;
            params.insert(key, value);
        }

        Ok(params)
    }

    /// Insert a parameter, replacing any previous value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.params.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over the parameters in ascending key order
    pub fn iter(&self) -> Iter<'_, String, String> {
        self.params.iter()
    }

    /// Build the string that gets hashed: the secret, then every key
    /// immediately followed by its value in key order, then the secret again.
    pub fn canonical_string(&self, secret: &str) -> String {
        let mut canonical = self.iter().fold(String::from(secret), |mut acc, (k, v)| {
            acc.push_str(k);
            acc.push_str(v);
            acc
        });
        canonical.push_str(secret);
        canonical
    }
}

impl<'a> IntoIterator for &'a QueryParams {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sorts_by_key() {
        let params = QueryParams::parse("https://api.example.com/v1/task?time=2&appid=x&tid=7")
            .unwrap();

        let keys: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["appid", "tid", "time"]);
        assert_eq!(params.get("tid"), Some("7"));
    }

    #[test]
    fn test_parse_orders_by_byte_value() {
        // Uppercase sorts before lowercase
        let params = QueryParams::parse("u?b=1&B=2&a=3").unwrap();
        let keys: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["B", "a", "b"]);
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let params = QueryParams::parse("u?a=1&b=2&a=3").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("a"), Some("3"));
    }

    #[test]
    fn test_value_truncated_at_second_equals() {
        let params = QueryParams::parse("u?a=b=c&d=e").unwrap();
        assert_eq!(params.get("a"), Some("b"));
        assert_eq!(params.get("d"), Some("e"));
    }

    #[test]
    fn test_values_are_not_percent_decoded() {
        let params = QueryParams::parse("u?name=%E5%BC%A0").unwrap();
        assert_eq!(params.get("name"), Some("%E5%BC%A0"));
    }

    #[test]
    fn test_empty_query_and_segments() {
        assert!(QueryParams::parse("https://api.example.com/v1/task?")
            .unwrap()
            .is_empty());

        let params = QueryParams::parse("u?a=1&&b=2&").unwrap();
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_empty_value() {
        let params = QueryParams::parse("u?a=&b=2").unwrap();
        assert_eq!(params.get("a"), Some(""));
    }

    #[test]
    fn test_missing_query_is_error() {
        match QueryParams::parse("https://api.example.com/v1/task") {
            Err(SignError::MissingQuery(url)) => {
                assert_eq!(url, "https://api.example.com/v1/task")
            }
            other => panic!("Expected MissingQuery, got {:?}", other),
        }
    }

    #[test]
    fn test_segment_without_equals_is_error() {
        assert_eq!(
            QueryParams::parse("u?a=1&flag"),
            Err(SignError::MalformedParameter("flag".to_string()))
        );
    }

    #[test]
    fn test_canonical_string() {
        let params = QueryParams::parse("u?time=1467372594&appid=myappid").unwrap();
        assert_eq!(
            params.canonical_string("mySecret"),
            "mySecretappidmyappidtime1467372594mySecret"
        );
    }

    #[test]
    fn test_canonical_string_without_params() {
        let params = QueryParams::parse("u?").unwrap();
        assert_eq!(params.canonical_string("s3cr3t"), "s3cr3ts3cr3t");
    }
}
