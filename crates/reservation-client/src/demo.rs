//! Startup discovery demonstration.
//!
//! Logs what the registry currently knows about the upstream service. Purely
//! informational: nothing downstream depends on it, and a registry failure is
//! logged and swallowed.

use reservation_client_discovery::DiscoveryClient;

/// Logs every registered instance of `service_id`, then every service the
/// registry knows about.
///
/// Returns the number of instances logged, or `None` if the registry could
/// not be queried.
pub async fn run_discovery_demo(discovery: &dyn DiscoveryClient, service_id: &str) -> Option<usize> {
    tracing::info!("------------------------------");
    tracing::info!(registry = discovery.description(), "DiscoveryClient Example");

    let instances = match discovery.get_instances(service_id).await {
        Ok(instances) => instances,
        Err(error) => {
            tracing::error!(%error, "DiscoveryClient Example Error!");
            return None;
        }
    };

    for instance in &instances {
        tracing::info!(
            id = instance.service_id(),
            uri = %instance.uri(),
            status = %instance.status(),
            meta = ?instance.metadata(),
            "Reservation service"
        );
    }
    if instances.is_empty() {
        tracing::info!(service = service_id, "no instances registered");
    }

    match discovery.services().await {
        Ok(services) => tracing::info!(?services, "registered services"),
        Err(error) => tracing::warn!(%error, "could not list registered services"),
    }

    tracing::info!("------------------------------");
    Some(instances.len())
}
