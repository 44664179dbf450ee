//! Error type for the fallback service.

use std::fmt;

/// Error returned when a fallback could not produce a response.
#[derive(Debug, Clone)]
pub enum FallbackError<E> {
    /// The inner call failed and the error was not eligible for fallback.
    Inner(E),

    /// The backup provider failed too.
    FallbackFailed(E),
}

impl<E> FallbackError<E> {
    /// Unwraps to the underlying error regardless of where it came from.
    pub fn into_inner(self) -> E {
        match self {
            Self::Inner(e) | Self::FallbackFailed(e) => e,
        }
    }

    pub fn inner(&self) -> &E {
        match self {
            Self::Inner(e) | Self::FallbackFailed(e) => e,
        }
    }
}

impl<E: fmt::Display> fmt::Display for FallbackError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inner(e) => write!(f, "inner service error: {}", e),
            Self::FallbackFailed(e) => write!(f, "fallback failed: {}", e),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for FallbackError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner())
    }
}
