//! Error types for the leaderboard service

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving leaderboards
#[derive(Error, Debug)]
pub enum Error {
    /// Leaderboard source (balance store) failure
    #[error("Leaderboard source error: {0}")]
    Source(String),

    /// Cache backend failure
    #[error("Cache error: {0}")]
    Cache(String),

    /// JSON encode/decode failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_error_display() {
        let err = Error::Source("connection reset".into());
        assert_eq!(err.to_string(), "Leaderboard source error: connection reset");

        let err = Error::Cache("timeout".into());
        assert_eq!(err.to_string(), "Cache error: timeout");
    }

    #[test]
    fn test_serialization_from() {
        let parse = serde_json::from_str::<Vec<u8>>("{not json").unwrap_err();
        let err: Error = parse.into();
        assert_matches!(err, Error::Serialization(_));
    }

    #[test]
    fn test_io_from() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "seed.json").into();
        assert_matches!(err, Error::Io(_));
    }
}
