//! Top-level error type.

use std::fmt;
use std::io;

use crate::collection::CollectionError;

/// Errors that stop the application from starting or running.
#[derive(Debug)]
pub enum Error {
    /// Terminal I/O failure.
    Io(io::Error),
    /// Invalid bootstrap data.
    Collection(CollectionError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Collection(e) => write!(f, "invalid story data: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Collection(e) => Some(e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<CollectionError> for Error {
    fn from(e: CollectionError) -> Self {
        Self::Collection(e)
    }
}

/// Standard result type for Hacker Stories.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::StoryId;
    use std::error::Error as _;

    #[test]
    fn wraps_sources() {
        let err: Error = CollectionError::DuplicateId(StoryId(1)).into();
        assert_eq!(err.to_string(), "invalid story data: duplicate story id #1");
        assert!(err.source().is_some());

        let err: Error = io::Error::other("tty gone").into();
        assert!(err.to_string().contains("tty gone"));
    }
}
