//! Error types shared by the scanning engine.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The configuration overlay could not be read, parsed or validated.
    #[error("Invalid configuration {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory traversal itself reported an error; the source names
    /// the failing path.
    #[error("Failed to walk directory tree: {0}")]
    Walk(#[source] ignore::Error),

    #[error("Invalid exclusion pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Keyword {0} not found")]
    KeywordNotFound(String),

    #[error("Line {row} is not valid UTF-8")]
    MatchDecode { row: usize },
}

impl Error {
    /// True for failures that come from the filesystem rather than from
    /// configuration or matching.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io { .. } | Error::Walk(_))
    }

    /// Per-line anomalies that the file scanner recovers from.
    pub fn is_line_local(&self) -> bool {
        matches!(self, Error::KeywordNotFound(_) | Error::MatchDecode { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        let io = Error::Io {
            path: PathBuf::from("a.rs"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(io.is_io());
        assert!(!io.is_line_local());

        let decode = Error::MatchDecode { row: 3 };
        assert!(decode.is_line_local());
        assert!(!decode.is_io());

        let unknown = Error::KeywordNotFound("HACK".to_string());
        assert!(unknown.is_line_local());

        let config = Error::Config {
            path: PathBuf::from("overlay.json"),
            message: "bad".to_string(),
        };
        assert!(!config.is_line_local());
        assert!(!config.is_io());
    }
}
