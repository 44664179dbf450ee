//! Startup wiring: builds the clients once and hands them to the routes.

use crate::api::{self, AppState};
use crate::client::{HttpReservationsClient, ReservationsFallback, WithFallback};
use crate::config::Config;
use crate::demo::run_discovery_demo;
use axum::Router;
use reservation_client_core::ClientError;
use reservation_client_discovery::{
    DiscoveryClient, EurekaDiscovery, LoadBalancedClient, StaticDiscovery,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("could not build clients: {0}")]
    Client(#[from] ClientError),

    #[error("server i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A fully wired application, ready to serve.
pub struct App {
    config: Config,
    discovery: Arc<dyn DiscoveryClient>,
    state: AppState,
}

impl App {
    pub fn build(config: Config) -> Result<Self, StartupError> {
        let discovery = discovery_from(&config)?;

        let mut rest = LoadBalancedClient::builder(Arc::clone(&discovery))
            .strategy(config.selection.clone());
        if let Some(timeout) = config.request_timeout() {
            rest = rest.timeout(timeout);
        }
        let rest = rest.build()?;

        let declarative = HttpReservationsClient::new(
            rest.clone(),
            &config.service_name,
            &config.reservations_path,
        );
        let client = WithFallback::new(declarative, ReservationsFallback);

        let state = AppState::new(rest, config.reservations_uri(), Arc::new(client));

        Ok(Self {
            config,
            discovery,
            state,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn router(&self) -> Router {
        api::router(self.state.clone(), &self.config.route_prefix)
    }

    /// Serves until `shutdown` resolves.
    ///
    /// The discovery demo is spawned after the listener is bound, so a slow or
    /// failing registry never delays the endpoints.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), StartupError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        let router = self.router();

        if self.config.discovery_enabled {
            let discovery = Arc::clone(&self.discovery);
            let service = self.config.service_name.clone();
            tokio::spawn(async move {
                run_discovery_demo(discovery.as_ref(), &service).await;
            });
        }

        let prefix = api::normalize_prefix(&self.config.route_prefix);
        tracing::info!(%addr, "listening");
        tracing::info!("  GET http://{}{}/names", addr, prefix);
        tracing::info!("  GET http://{}{}/feign-names", addr, prefix);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("server stopped");
        Ok(())
    }
}

fn discovery_from(config: &Config) -> Result<Arc<dyn DiscoveryClient>, ClientError> {
    match &config.eureka_url {
        Some(url) => {
            if !config.instances.is_empty() {
                tracing::warn!(
                    ignored = config.instances.len(),
                    "static instances are ignored when a eureka registry is configured"
                );
            }
            let mut http = reqwest::Client::builder();
            if let Some(timeout) = config.request_timeout() {
                http = http.timeout(timeout);
            }
            let http = http.build().map_err(|e| ClientError::Configuration {
                reason: format!("could not build registry http client: {}", e),
            })?;
            Ok(Arc::new(EurekaDiscovery::new(url, http)?))
        }
        None => Ok(Arc::new(
            config.instances.iter().cloned().collect::<StaticDiscovery>(),
        )),
    }
}

