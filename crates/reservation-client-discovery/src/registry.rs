//! The discovery capability and an in-memory registry.

use crate::ServiceInstance;
use async_trait::async_trait;
use reservation_client_core::ClientError;
use std::collections::BTreeMap;

/// Looks up the live instances of a logical service.
///
/// Implementations return instances in the order the registry reports them and
/// an empty list (not an error) for services nobody registered. An error means
/// the registry itself could not be asked.
#[async_trait]
pub trait DiscoveryClient: Send + Sync {
    /// Human readable name of the backing registry, used in logs.
    fn description(&self) -> &str;

    async fn get_instances(&self, service_id: &str) -> Result<Vec<ServiceInstance>, ClientError>;

    /// Names of every service the registry knows about.
    async fn services(&self) -> Result<Vec<String>, ClientError>;
}

/// A registry held in memory, populated at startup from configuration.
///
/// Service ids are matched case-insensitively, as Eureka does; `services`
/// reports them lowercased.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    services: BTreeMap<String, Vec<ServiceInstance>>,
}

impl StaticDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an instance under its own service id.
    pub fn with_instance(mut self, instance: ServiceInstance) -> Self {
        self.register(instance);
        self
    }

    pub fn register(&mut self, instance: ServiceInstance) {
        self.services
            .entry(instance.service_id().to_ascii_lowercase())
            .or_default()
            .push(instance);
    }
}

impl FromIterator<ServiceInstance> for StaticDiscovery {
    fn from_iter<I: IntoIterator<Item = ServiceInstance>>(iter: I) -> Self {
        let mut discovery = StaticDiscovery::new();
        for instance in iter {
            discovery.register(instance);
        }
        discovery
    }
}

#[async_trait]
impl DiscoveryClient for StaticDiscovery {
    fn description(&self) -> &str {
        "static"
    }

    async fn get_instances(&self, service_id: &str) -> Result<Vec<ServiceInstance>, ClientError> {
        Ok(self
            .services
            .get(&service_id.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default())
    }

    async fn services(&self) -> Result<Vec<String>, ClientError> {
        Ok(self.services.keys().cloned().collect())
    }
}
