//! Process configuration from command-line flags and environment variables.

use clap::{ArgAction, Parser};
use reservation_client_discovery::{SelectionStrategy, ServiceInstance};
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "reservation-client",
    version,
    about = "Lists reservation names from a discovered reservation service"
)]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Prefix for both endpoints, e.g. `/client`.
    #[arg(long, env = "ROUTE_PREFIX", default_value = "")]
    pub route_prefix: String,

    /// Logical name of the upstream reservation service.
    #[arg(long, env = "RESERVATION_SERVICE", default_value = "reservationservice")]
    pub service_name: String,

    /// Path of the reservation collection on the upstream service.
    #[arg(long, env = "RESERVATIONS_PATH", default_value = "/reservations")]
    pub reservations_path: String,

    /// Log the registry's view of the upstream service once at startup.
    #[arg(long, env = "DISCOVERY_ENABLED", default_value_t = true, action = ArgAction::Set)]
    pub discovery_enabled: bool,

    /// Base URL of a Eureka registry, e.g. `http://localhost:8761/eureka`.
    #[arg(long, env = "EUREKA_URL")]
    pub eureka_url: Option<String>,

    /// Static registry entry `name=uri`; repeat for several instances.
    #[arg(
        long = "instance",
        env = "SERVICE_INSTANCES",
        value_delimiter = ',',
        value_parser = parse_instance
    )]
    pub instances: Vec<ServiceInstance>,

    /// Instance selection: round-robin, first-available or random.
    #[arg(long, env = "LB_SELECTION", default_value = "round-robin", value_parser = parse_selection)]
    pub selection: SelectionStrategy,

    /// Timeout for each outbound request, in seconds. Unset means no timeout.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// The logical URI of the reservation collection.
    pub fn reservations_uri(&self) -> String {
        let path = self.reservations_path.trim();
        if path.starts_with('/') {
            format!("http://{}{}", self.service_name, path)
        } else {
            format!("http://{}/{}", self.service_name, path)
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_instance(entry: &str) -> Result<ServiceInstance, String> {
    let (name, uri) = entry
        .split_once('=')
        .ok_or_else(|| format!("expected name=uri, got '{}'", entry))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing service name in '{}'", entry));
    }
    ServiceInstance::parse(name, uri.trim()).map_err(|e| e.to_string())
}

fn parse_selection(value: &str) -> Result<SelectionStrategy, String> {
    value.parse()
}
