//! Events emitted by the fallback service.

use reservation_client_core::ClientEvent;
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum FallbackEvent {
    /// The inner call succeeded; no fallback was needed.
    Success {
        source_name: String,
        timestamp: Instant,
    },

    /// The inner call failed; a fallback will be applied.
    FailedAttempt {
        source_name: String,
        timestamp: Instant,
        /// Display form of the inner error.
        reason: String,
    },

    /// The fallback produced the response.
    Applied {
        source_name: String,
        timestamp: Instant,
        /// `"value"`, `"from_error"`, or `"service"`.
        strategy: &'static str,
    },

    /// The backup provider failed as well.
    Failed {
        source_name: String,
        timestamp: Instant,
    },

    /// The error did not match the handle predicate and was propagated.
    Skipped {
        source_name: String,
        timestamp: Instant,
    },
}

impl ClientEvent for FallbackEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::FailedAttempt { .. } => "failed_attempt",
            Self::Applied { .. } => "applied",
            Self::Failed { .. } => "failed",
            Self::Skipped { .. } => "skipped",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            Self::Success { timestamp, .. }
            | Self::FailedAttempt { timestamp, .. }
            | Self::Applied { timestamp, .. }
            | Self::Failed { timestamp, .. }
            | Self::Skipped { timestamp, .. } => *timestamp,
        }
    }

    fn source_name(&self) -> &str {
        match self {
            Self::Success { source_name, .. }
            | Self::FailedAttempt { source_name, .. }
            | Self::Applied { source_name, .. }
            | Self::Failed { source_name, .. }
            | Self::Skipped { source_name, .. } => source_name,
        }
    }
}
