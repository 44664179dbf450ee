//! Discovery backed by a Eureka server's REST API.
//!
//! Uses `GET {base}/apps/{APP}` and `GET {base}/apps` with
//! `Accept: application/json`. Eureka serialises its XML model to JSON, so a
//! list with one element may come back as a bare object and ports come back as
//! `{"$": 8080, "@enabled": "true"}`; both quirks are handled here.

use crate::{DiscoveryClient, InstanceStatus, ServiceInstance};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use reservation_client_core::ClientError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use url::Url;

/// A [`DiscoveryClient`] that queries a Eureka registry.
#[derive(Debug, Clone)]
pub struct EurekaDiscovery {
    base: Url,
    http: reqwest::Client,
}

impl EurekaDiscovery {
    /// `base` is the registry's REST root, e.g. `http://localhost:8761/eureka`.
    pub fn new(base: &str, http: reqwest::Client) -> Result<Self, ClientError> {
        let mut base = Url::parse(base).map_err(|e| ClientError::InvalidUri {
            uri: base.to_string(),
            reason: e.to_string(),
        })?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base, http })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        service: &str,
        path: &str,
    ) -> Result<Option<T>, ClientError> {
        let registry_error = |reason: String| ClientError::Registry {
            service: service.to_string(),
            reason,
        };

        let url = self
            .base
            .join(path)
            .map_err(|e| registry_error(e.to_string()))?;

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| registry_error(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(registry_error(format!(
                "registry answered with status {}",
                response.status().as_u16()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| registry_error(e.to_string()))?;
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| registry_error(format!("malformed registry response: {}", e)))
    }
}

#[async_trait]
impl DiscoveryClient for EurekaDiscovery {
    fn description(&self) -> &str {
        "eureka"
    }

    async fn get_instances(&self, service_id: &str) -> Result<Vec<ServiceInstance>, ClientError> {
        let path = format!("apps/{}", service_id.to_ascii_uppercase());
        let Some(envelope) = self.fetch::<ApplicationEnvelope>(service_id, &path).await? else {
            return Ok(Vec::new());
        };

        let mut instances = Vec::new();
        for raw in envelope.application.instance.into_vec() {
            match raw.into_instance(service_id) {
                Ok(instance) => instances.push(instance),
                Err(_error) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(service = service_id, error = %_error, "skipping unusable eureka instance");
                }
            }
        }
        Ok(instances)
    }

    async fn services(&self) -> Result<Vec<String>, ClientError> {
        let Some(envelope) = self.fetch::<ApplicationsEnvelope>("*", "apps").await? else {
            return Ok(Vec::new());
        };

        Ok(envelope
            .applications
            .application
            .into_vec()
            .into_iter()
            .map(|app| app.name.to_ascii_lowercase())
            .collect())
    }
}

#[derive(Deserialize)]
struct ApplicationEnvelope {
    application: Application,
}

#[derive(Deserialize)]
struct ApplicationsEnvelope {
    applications: Applications,
}

#[derive(Deserialize)]
struct Applications {
    #[serde(default)]
    application: OneOrMany<Application>,
}

#[derive(Deserialize)]
struct Application {
    #[serde(default)]
    name: String,
    #[serde(default)]
    instance: OneOrMany<RawInstance>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInstance {
    host_name: String,
    #[serde(default)]
    port: Option<RawPort>,
    #[serde(default)]
    secure_port: Option<RawPort>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    metadata: BTreeMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct RawPort {
    #[serde(rename = "$")]
    port: u16,
    #[serde(rename = "@enabled", default)]
    enabled: Option<String>,
}

impl RawPort {
    fn is_enabled(&self) -> bool {
        self.enabled.as_deref().map(|e| e == "true").unwrap_or(true)
    }
}

impl RawInstance {
    fn into_instance(self, service_id: &str) -> Result<ServiceInstance, ClientError> {
        let secure = self
            .secure_port
            .as_ref()
            .filter(|p| p.enabled.is_some() && p.is_enabled());

        let uri = match (secure, self.port.as_ref()) {
            (Some(port), _) => format!("https://{}:{}", self.host_name, port.port),
            (None, Some(port)) => format!("http://{}:{}", self.host_name, port.port),
            (None, None) => format!("http://{}", self.host_name),
        };

        let mut instance = ServiceInstance::parse(service_id, &uri)?.with_status(
            self.status
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(InstanceStatus::Unknown),
        );

        for (key, value) in self.metadata {
            // "@class" and friends are XStream artefacts, not user metadata.
            if key.starts_with('@') {
                continue;
            }
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            instance = instance.with_metadata(key, value);
        }

        Ok(instance)
    }
}
