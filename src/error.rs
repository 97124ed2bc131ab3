//! Error types for the tsundoku library layer.

use tsundoku_search::SearchError;

/// Top-level error type for library, source and preference operations.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// Search aggregation error.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Configuration error (parse, serialize, invalid values).
    #[error("config error: {0}")]
    Config(String),

    /// Preference value could not be stored or decoded.
    #[error("preference error: {0}")]
    Preference(String),

    /// Source not registered or lacking a required capability.
    #[error("source error: {0}")]
    Source(String),

    /// Local library layout problem (missing manga directory...).
    #[error("local library error: {0}")]
    Local(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_errors_convert() {
        let err: LibraryError = SearchError::Cancelled.into();
        assert_eq!(err.to_string(), "search error: search cancelled");
    }

    #[test]
    fn io_errors_convert() {
        let err: LibraryError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, LibraryError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: gone");
    }
}
