//! Registered service instances.

use reservation_client_core::ClientError;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Registration status of an instance as reported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InstanceStatus {
    /// Instance is registered and accepting traffic.
    #[default]
    Up,

    /// Instance is registered but failing its own health checks.
    Down,

    /// Instance is registered and still booting.
    Starting,

    /// Instance was taken out of rotation by an operator.
    OutOfService,

    /// Registry did not report a status.
    Unknown,
}

impl InstanceStatus {
    /// Only instances that are up receive traffic.
    pub fn is_usable(&self) -> bool {
        matches!(self, InstanceStatus::Up)
    }
}

impl FromStr for InstanceStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "UP" => InstanceStatus::Up,
            "DOWN" => InstanceStatus::Down,
            "STARTING" => InstanceStatus::Starting,
            "OUT_OF_SERVICE" => InstanceStatus::OutOfService,
            _ => InstanceStatus::Unknown,
        })
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstanceStatus::Up => "UP",
            InstanceStatus::Down => "DOWN",
            InstanceStatus::Starting => "STARTING",
            InstanceStatus::OutOfService => "OUT_OF_SERVICE",
            InstanceStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// One registered instance of a logical service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInstance {
    service_id: String,
    uri: Url,
    metadata: BTreeMap<String, String>,
    status: InstanceStatus,
}

impl ServiceInstance {
    pub fn new(service_id: impl Into<String>, uri: Url) -> Self {
        Self {
            service_id: service_id.into(),
            uri,
            metadata: BTreeMap::new(),
            status: InstanceStatus::Up,
        }
    }

    /// Builds an instance from a textual base URI.
    pub fn parse(service_id: impl Into<String>, uri: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(uri).map_err(|e| ClientError::InvalidUri {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;
        if !parsed.has_host() {
            return Err(ClientError::InvalidUri {
                uri: uri.to_string(),
                reason: "instance uri has no host".to_string(),
            });
        }
        Ok(Self::new(service_id, parsed))
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_status(mut self, status: InstanceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn status(&self) -> InstanceStatus {
        self.status
    }

    /// Rewrites a logical URI onto this instance.
    ///
    /// Scheme, host, and port come from the instance; path and query come from
    /// the logical URI. `http://reservationservice/reservations?page=1` on an
    /// instance at `http://10.0.0.1:8000` becomes
    /// `http://10.0.0.1:8000/reservations?page=1`.
    pub fn reconstruct(&self, logical: &Url) -> Result<Url, ClientError> {
        let reference = match logical.query() {
            Some(query) => format!("{}?{}", logical.path(), query),
            None => logical.path().to_string(),
        };
        self.uri
            .join(&reference)
            .map_err(|e| ClientError::InvalidUri {
                uri: logical.to_string(),
                reason: e.to_string(),
            })
    }
}
