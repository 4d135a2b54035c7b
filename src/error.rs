//! Application error type.
//!
//! Numeric domain problems never surface here (they become undefined cells).
//! `AppError` is reserved for structural failures: a config document that is
//! not a JSON object, an unknown series name, or I/O trouble in the CLI.

/// Exit code for malformed input (bad config document, bad CLI values).
pub const EXIT_INVALID_INPUT: u8 = 2;
/// Exit code for a series name that does not name a dataset column.
pub const EXIT_UNKNOWN_SERIES: u8 = 3;
/// Exit code for file or serialization failures.
pub const EXIT_IO: u8 = 4;

#[derive(Clone, PartialEq, Eq)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// The inbound config could not be read as a key/value mapping.
    pub fn import(message: impl Into<String>) -> Self {
        Self::new(EXIT_INVALID_INPUT, format!("Config import failed: {}", message.into()))
    }

    pub fn unknown_series(name: &str) -> Self {
        Self::new(
            EXIT_UNKNOWN_SERIES,
            format!("Unknown series '{name}' (run `pcurves series` for the list)."),
        )
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(EXIT_IO, message)
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
    fn import_errors_use_invalid_input_code() {
        let err = AppError::import("expected a JSON object");
        assert_eq!(err.exit_code(), EXIT_INVALID_INPUT);
        assert!(err.to_string().contains("expected a JSON object"));
    }
}
