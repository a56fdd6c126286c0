//! Application error type.
//!
//! Every failure carries a [`ErrorKind`] (what went wrong), a process exit code
//! and a human-readable message. Nothing is retried internally; errors bubble
//! up to `main`, which prints the message and exits with the code.

/// Failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing API key or otherwise unusable configuration.
    Config,
    /// Network failure or a non-success HTTP status.
    Request,
    /// Response body is not the JSON/CSV shape we expect.
    Decode,
    /// A local file (cached report, cached dataset) is malformed.
    Parse,
    /// Filesystem failure.
    Io,
}

impl ErrorKind {
    fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Config => 2,
            ErrorKind::Parse => 3,
            ErrorKind::Request | ErrorKind::Decode => 4,
            ErrorKind::Io => 5,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            exit_code: kind.exit_code(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Request, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(AppError::config("x").exit_code(), 2);
        assert_eq!(AppError::parse("x").exit_code(), 3);
        assert_eq!(AppError::request("x").exit_code(), 4);
        assert_eq!(AppError::decode("x").exit_code(), 4);
        assert_eq!(AppError::io("x").exit_code(), 5);
    }

    #[test]
    fn display_is_the_message() {
        let err = AppError::request("QuickStats request failed with status 500.");
        assert_eq!(err.to_string(), "QuickStats request failed with status 500.");
        assert_eq!(err.kind(), ErrorKind::Request);
    }
}
