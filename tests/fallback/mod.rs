//! Tests for reservation-client-fallback, organized into:
//!
//! - **integration**: the layer around plain services
//! - **predicates**: selective handling of errors
//! - **reservations**: the layer around the reservations client

mod integration;
mod predicates;
mod reservations;

use std::fmt;

/// Error returned by test services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestError {
    pub message: String,
    pub code: u16,
}

impl TestError {
    pub fn new(message: &str) -> Self {
        Self::with_code(message, 503)
    }

    pub fn with_code(message: &str, code: u16) -> Self {
        Self {
            message: message.to_string(),
            code,
        }
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TestError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for TestError {}
