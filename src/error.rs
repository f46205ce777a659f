//! Panel error type
//!
//! The layout core has no fallible I/O; failures are contract violations
//! (a render request below the retained window, for instance) or terminal
//! I/O errors surfaced by the crossterm backend.

use std::fmt;

#[derive(Debug, Clone)]
pub struct PanelError {
    pub message: String,
}

impl PanelError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Panel error: {}", self.message)
    }
}

impl std::error::Error for PanelError {}

impl From<std::io::Error> for PanelError {
    fn from(error: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", error))
    }
}

impl From<PanelError> for String {
    fn from(error: PanelError) -> String {
        error.message
    }
}
