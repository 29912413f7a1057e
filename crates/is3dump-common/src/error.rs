//! Common error types used throughout is3dump.

/// Common error type for is3dump.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Encoding name is not one the dumper can frame.
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new UnknownEncoding error.
    pub fn unknown_encoding<S: Into<String>>(name: S) -> Self {
        Self::UnknownEncoding(name.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::unknown_encoding("opus");
        assert_eq!(err.to_string(), "Unknown encoding: opus");

        let err = Error::invalid_input("bad range");
        assert_eq!(err.to_string(), "Invalid input: bad range");
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(
            Error::unknown_encoding(String::from("vp8")),
            Error::UnknownEncoding(_)
        ));
        assert!(matches!(Error::invalid_input("x"), Error::InvalidInput(_)));
    }
}
