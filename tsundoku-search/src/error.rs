//! Error types for the tsundoku-search crate.
//!
//! Errors carry plain string messages so they can be cloned into the
//! observer-visible search state and rendered as-is.

/// Errors that can occur while searching sources.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The source's search capability failed (network, parse, rate limit...).
    #[error("source error: {0}")]
    Source(String),

    /// The source does not expose a search capability.
    #[error("source {0} is not searchable")]
    NotSearchable(String),

    /// The per-source search panicked; the panic was contained to its slot.
    #[error("source search panicked: {0}")]
    Panicked(String),

    /// The run this search belonged to was replaced or cancelled.
    #[error("search cancelled")]
    Cancelled,

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A source URL could not be built.
    #[error("invalid url: {0}")]
    Url(String),
}

impl From<url::ParseError> for SearchError {
    fn from(err: url::ParseError) -> Self {
        Self::Url(err.to_string())
    }
}

/// Convenience type alias for tsundoku-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_source() {
        let err = SearchError::Source("HTTP 503".into());
        assert_eq!(err.to_string(), "source error: HTTP 503");
    }

    #[test]
    fn display_not_searchable() {
        let err = SearchError::NotSearchable("Local source".into());
        assert_eq!(err.to_string(), "source Local source is not searchable");
    }

    #[test]
    fn display_panicked() {
        let err = SearchError::Panicked("index out of bounds".into());
        assert_eq!(err.to_string(), "source search panicked: index out of bounds");
    }

    #[test]
    fn url_parse_errors_convert() {
        let err: SearchError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, SearchError::Url(_)));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
