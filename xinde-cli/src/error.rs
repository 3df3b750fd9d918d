use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("API error: {0}")]
    Api(#[from] xinde_api::ApiError),

    #[error("Signing error: {0}")]
    Sign(#[from] xinde_sign::SignError),

    #[error("Client configuration error: {0}")]
    ClientConfig(#[from] xinde_config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Render an error followed by each of its sources.
///
/// A source whose message already appears in the text so far is skipped, so
/// wrappers that repeat their inner error are not printed twice.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("error sending request")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_error_chain_shows_hidden_cause() {
        let error = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert_eq!(
            error_chain(&error),
            "error sending request: connection refused"
        );
    }

    #[test]
    fn test_error_chain_skips_repeated_cause() {
        let error = CliError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "config missing",
        ));
        assert_eq!(error_chain(&error), "IO error: config missing");
    }

    #[test]
    fn test_error_chain_through_api_error() {
        let error = CliError::from(xinde_api::ApiError::from(
            xinde_sign::SignError::MissingQuery("https://api.example.com".to_string()),
        ));
        assert_eq!(
            error_chain(&error),
            "API error: Signing error: URL has no query string: https://api.example.com"
        );
    }
}
