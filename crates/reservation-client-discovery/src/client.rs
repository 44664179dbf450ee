//! HTTP client that resolves logical service names before calling.

use crate::{DiscoveryClient, LoadBalancer, SelectionStrategy, ServiceInstance};
use reservation_client_core::ClientError;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// An HTTP client whose URIs name services rather than hosts.
///
/// `http://reservationservice/reservations` is resolved on every call: the
/// registry is asked for `reservationservice`, the balancer picks one usable
/// instance, and the request goes to that instance's address with the
/// original path and query.
///
/// Cloning is cheap; clones share the HTTP connection pool, the registry, and
/// the balancer position.
#[derive(Clone)]
pub struct LoadBalancedClient {
    http: reqwest::Client,
    discovery: Arc<dyn DiscoveryClient>,
    balancer: Arc<LoadBalancer>,
}

/// Builder for [`LoadBalancedClient`].
pub struct LoadBalancedClientBuilder {
    discovery: Arc<dyn DiscoveryClient>,
    strategy: SelectionStrategy,
    timeout: Option<Duration>,
    http: Option<reqwest::Client>,
}

impl LoadBalancedClientBuilder {
    pub fn strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Overall timeout per outbound request. Unset means the HTTP client's default (none).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured HTTP client; `timeout` is ignored in that case.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Result<LoadBalancedClient, ClientError> {
        let http = match self.http {
            Some(http) => http,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build().map_err(|e| ClientError::Configuration {
                    reason: format!("could not build http client: {}", e),
                })?
            }
        };

        Ok(LoadBalancedClient {
            http,
            discovery: self.discovery,
            balancer: Arc::new(LoadBalancer::new(self.strategy)),
        })
    }
}

impl LoadBalancedClient {
    pub fn builder(discovery: Arc<dyn DiscoveryClient>) -> LoadBalancedClientBuilder {
        LoadBalancedClientBuilder {
            discovery,
            strategy: SelectionStrategy::default(),
            timeout: None,
            http: None,
        }
    }

    /// Resolves a logical URI to the concrete URI of one selected instance.
    pub async fn resolve(&self, logical: &str) -> Result<(ServiceInstance, Url), ClientError> {
        let logical_url = Url::parse(logical).map_err(|e| ClientError::InvalidUri {
            uri: logical.to_string(),
            reason: e.to_string(),
        })?;
        let service = logical_url
            .host_str()
            .ok_or_else(|| ClientError::InvalidUri {
                uri: logical.to_string(),
                reason: "logical uri names no service".to_string(),
            })?
            .to_string();

        let instances = self.discovery.get_instances(&service).await?;
        let instance = self
            .balancer
            .choose(&instances)
            .cloned()
            .ok_or_else(|| ClientError::NoInstances {
                service: service.clone(),
            })?;

        let resolved = instance.reconstruct(&logical_url)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            service = %service,
            instance = %instance.uri(),
            resolved = %resolved,
            "resolved logical uri"
        );

        Ok((instance, resolved))
    }

    /// GETs a logical URI and decodes the JSON body.
    ///
    /// A 2xx answer with an empty body or a literal `null` yields `Ok(None)`.
    pub async fn get_json<T: DeserializeOwned>(&self, logical: &str) -> Result<Option<T>, ClientError> {
        let (instance, url) = self.resolve(logical).await?;
        let unavailable = |reason: String| ClientError::UpstreamUnavailable {
            service: instance.service_id().to_string(),
            reason,
        };

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice::<Option<T>>(&body).map_err(|e| ClientError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
