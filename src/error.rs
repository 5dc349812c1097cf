//! Error types for canvas data loading.
//!
//! Every failure in this crate surfaces as a [`DataLoadError`] tagged with
//! the place it originated, so UI code can branch on [`ErrorSource`] to pick
//! the right message ("check your connection" vs "malformed content").

use serde::Serialize;
use thiserror::Error;

/// Where a load failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSource {
    /// Structural or referential problem in the card tree itself.
    Validation,
    /// Remote fetch failure (HTTP status, network, or bad response body).
    Url,
    /// A caller-supplied loader failed.
    Loader,
}

/// The only structured error contract exposed by this crate.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("invalid canvas data: {0}")]
    Validation(String),

    #[error("failed to load canvas data: {0}")]
    Url(String),

    #[error("canvas loader failed: {0}")]
    Loader(String),
}

impl DataLoadError {
    /// Discriminant for branching without matching on variants.
    pub fn source_tag(&self) -> ErrorSource {
        match self {
            DataLoadError::Validation(_) => ErrorSource::Validation,
            DataLoadError::Url(_) => ErrorSource::Url,
            DataLoadError::Loader(_) => ErrorSource::Loader,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_tags() {
        assert_eq!(
            DataLoadError::Validation("x".into()).source_tag(),
            ErrorSource::Validation
        );
        assert_eq!(DataLoadError::Url("x".into()).source_tag(), ErrorSource::Url);
        assert_eq!(
            DataLoadError::Loader("x".into()).source_tag(),
            ErrorSource::Loader
        );
    }

    #[test]
    fn test_display_includes_message() {
        let err = DataLoadError::Validation("card missing id".into());
        assert!(err.to_string().contains("card missing id"));
    }
}
