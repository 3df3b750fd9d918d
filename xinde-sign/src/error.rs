use thiserror::Error;

/// Errors raised while parsing or signing a request URL
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    /// The URL has no `?`, so there is no query string to sign
    #[error("URL has no query string: {0}")]
    MissingQuery(String),

    /// A query segment is not of the form `key=value`
    #[error("Malformed query parameter: {0:?}")]
    MalformedParameter(String),
}
