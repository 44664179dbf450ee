//! The error type shared by every layer of the reservation client.
//!
//! [`ClientError`] is `Clone` so it can pass through layers that need to keep
//! a copy of the failure (the fallback layer hands it to `from_error`
//! closures and to event listeners). Transport errors from the HTTP client are
//! therefore captured as strings rather than wrapped.
//!
//! # Pattern Matching
//!
//! ```rust
//! use reservation_client_core::ClientError;
//!
//! fn describe(error: &ClientError) -> &'static str {
//!     match error {
//!         ClientError::NoInstances { .. } => "nothing registered",
//!         ClientError::Registry { .. } => "registry down",
//!         ClientError::UpstreamUnavailable { .. } => "upstream down",
//!         ClientError::UpstreamStatus { .. } => "upstream rejected the call",
//!         ClientError::Decode { .. } => "upstream sent garbage",
//!         ClientError::Configuration { .. } | ClientError::InvalidUri { .. } => "misconfigured",
//!     }
//! }
//! ```

/// Failure of a registry lookup or an outbound call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The registry knows no usable instance of the service.
    #[error("no available instances for service '{service}'")]
    NoInstances {
        service: String,
    },

    /// The registry itself could not be queried.
    #[error("registry lookup for '{service}' failed: {reason}")]
    Registry {
        service: String,
        reason: String,
    },

    /// The client was configured with values it cannot use.
    #[error("invalid client configuration: {reason}")]
    Configuration {
        reason: String,
    },

    /// A logical URI could not be parsed or rewritten onto an instance.
    #[error("invalid uri '{uri}': {reason}")]
    InvalidUri {
        uri: String,
        reason: String,
    },

    /// Connecting to the selected instance failed or timed out.
    #[error("service '{service}' is unavailable: {reason}")]
    UpstreamUnavailable {
        service: String,
        reason: String,
    },

    /// The instance answered with a non-success status.
    #[error("{url} answered with status {status}")]
    UpstreamStatus {
        url: String,
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("could not decode response from {url}: {reason}")]
    Decode {
        url: String,
        reason: String,
    },
}

impl ClientError {
    /// Returns `true` if the upstream could not be reached at all.
    ///
    /// Covers empty registries, registry outages, and transport failures.
    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(
            self,
            ClientError::NoInstances { .. }
                | ClientError::Registry { .. }
                | ClientError::UpstreamUnavailable { .. }
        )
    }

    /// Returns `true` if the upstream was reached but the exchange failed.
    pub fn is_bad_upstream_response(&self) -> bool {
        matches!(
            self,
            ClientError::UpstreamStatus { .. } | ClientError::Decode { .. }
        )
    }

    /// The HTTP status a server should answer with when this error ends a request.
    ///
    /// Unreachable upstreams map to `503`, bad upstream answers to `502`, and
    /// local misconfiguration to `500`.
    pub fn http_status(&self) -> u16 {
        if self.is_upstream_unavailable() {
            503
        } else if self.is_bad_upstream_response() {
            502
        } else {
            500
        }
    }

    /// A short machine-readable name for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::NoInstances { .. } => "no_instances",
            ClientError::Registry { .. } => "registry",
            ClientError::Configuration { .. } => "configuration",
            ClientError::InvalidUri { .. } => "invalid_uri",
            ClientError::UpstreamUnavailable { .. } => "upstream_unavailable",
            ClientError::UpstreamStatus { .. } => "upstream_status",
            ClientError::Decode { .. } => "decode",
        }
    }
}
