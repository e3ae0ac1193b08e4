//! CLI output: command results and error mapping.

use crate::error::ApiError;

/// Text produced by a command plus whether it succeeded.
///
/// A failed verification is not an error: its report is still printed, and
/// the binary exits non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }

    pub fn failed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
        }
    }
}

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    format!("sumfile: {}", e)
}
