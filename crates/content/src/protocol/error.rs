use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("cannot access a disposed object: {type_name}")]
    Disposed { type_name: &'static str },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ContentError {
    pub fn invalid_argument<S: ToString>(name: &'static str, reason: S) -> Self {
        Self::InvalidArgument { name, reason: reason.to_string() }
    }

    pub fn empty_string(name: &'static str) -> Self {
        Self::invalid_argument(name, "the value can not be an empty string")
    }

    pub fn can_not_be_less<N: std::fmt::Display>(name: &'static str, min: N) -> Self {
        Self::invalid_argument(name, format!("the value can not be less than {min}"))
    }

    pub fn can_not_be_greater<N: std::fmt::Display>(name: &'static str, max: N) -> Self {
        Self::invalid_argument(name, format!("the value can not be greater than {max}"))
    }

    pub fn disposed(type_name: &'static str) -> Self {
        Self::Disposed { type_name }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Returns true if this error was raised by an operation on a disposed object
    #[inline]
    pub fn is_disposed(&self) -> bool {
        matches!(self, ContentError::Disposed { .. })
    }

    /// Returns true if this error was raised by argument validation
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ContentError::InvalidArgument { .. })
    }

    /// Returns the underlying io error kind, if this is an io error
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            ContentError::Io { source } => Some(source.kind()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ContentError::can_not_be_greater("boundary", 70);
        assert_eq!(err.to_string(), "invalid argument `boundary`: the value can not be greater than 70");

        let err = ContentError::disposed("MultipartFormContent");
        assert_eq!(err.to_string(), "cannot access a disposed object: MultipartFormContent");
    }

    #[test]
    fn test_io_kind_preserved() {
        let err = ContentError::io(io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.io_kind(), Some(io::ErrorKind::NotFound));
        assert!(!err.is_disposed());
        assert!(ContentError::empty_string("name").is_invalid_argument());
    }
}
