//! Registry lookup and client-side load balancing.
//!
//! A caller addresses a remote service by its logical name, for example
//! `http://reservationservice/reservations`. The [`LoadBalancedClient`] asks a
//! [`DiscoveryClient`] for the instances currently registered under
//! `reservationservice`, lets a [`LoadBalancer`] pick one, rewrites the URI
//! onto that instance, and performs the call.
//!
//! # Examples
//!
//! ```rust,no_run
//! use reservation_client_discovery::{
//!     LoadBalancedClient, SelectionStrategy, ServiceInstance, StaticDiscovery,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let discovery = StaticDiscovery::new()
//!     .with_instance(ServiceInstance::parse("reservationservice", "http://10.0.0.1:8000")?)
//!     .with_instance(ServiceInstance::parse("reservationservice", "http://10.0.0.2:8000")?);
//!
//! let client = LoadBalancedClient::builder(Arc::new(discovery))
//!     .strategy(SelectionStrategy::RoundRobin)
//!     .build()?;
//!
//! let body: Option<serde_json::Value> = client
//!     .get_json("http://reservationservice/reservations")
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod balancer;
mod client;
mod eureka;
mod instance;
mod registry;

pub use balancer::{CustomSelectorFn, LoadBalancer, SelectionStrategy};
pub use client::{LoadBalancedClient, LoadBalancedClientBuilder};
pub use eureka::EurekaDiscovery;
pub use instance::{InstanceStatus, ServiceInstance};
pub use registry::{DiscoveryClient, StaticDiscovery};
