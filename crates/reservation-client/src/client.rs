//! The reservations capability and its implementations.
//!
//! [`ReservationsClient`] is the typed interface endpoints program against.
//! Three implementations exist:
//!
//! - [`HttpReservationsClient`] calls `GET http://<service>/reservations`
//!   through the load-balanced client.
//! - [`ReservationsFallback`] answers with a canned collection and never
//!   touches the network.
//! - [`WithFallback`] wraps a network-backed client in the fallback layer so
//!   any failure is answered by the fallback provider instead.

use crate::model::{Reservation, Resources};
use async_trait::async_trait;
use futures::future::BoxFuture;
use reservation_client_core::{ClientError, ClientEvent};
use reservation_client_discovery::LoadBalancedClient;
use reservation_client_fallback::{Fallback, FallbackError, FallbackEvent, FallbackLayer};
use std::task::{Context, Poll};
use tower::{Layer, Service, ServiceExt};

/// Names returned by [`ReservationsFallback`], in order.
pub const FALLBACK_NAMES: [&str; 3] = ["This", "is", "fallback"];

/// The request value for a `find_all` call when a client is driven as a Tower service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FindAll;

#[async_trait]
pub trait ReservationsClient: Send + Sync {
    async fn find_all(&self) -> Result<Resources<Reservation>, ClientError>;
}

/// Fetches reservations from the upstream service resolved through discovery.
#[derive(Clone)]
pub struct HttpReservationsClient {
    http: LoadBalancedClient,
    uri: String,
}

impl HttpReservationsClient {
    /// Targets `http://{service}{path}`.
    pub fn new(http: LoadBalancedClient, service: &str, path: &str) -> Self {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        Self {
            http,
            uri: format!("http://{}{}", service, path),
        }
    }
}

#[async_trait]
impl ReservationsClient for HttpReservationsClient {
    async fn find_all(&self) -> Result<Resources<Reservation>, ClientError> {
        Ok(self
            .http
            .get_json::<Resources<Reservation>>(&self.uri)
            .await?
            .unwrap_or_default())
    }
}

impl Service<FindAll> for HttpReservationsClient {
    type Response = Resources<Reservation>;
    type Error = ClientError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: FindAll) -> Self::Future {
        let client = self.clone();
        Box::pin(async move { client.find_all().await })
    }
}

/// Canned provider used when the upstream cannot answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReservationsFallback;

impl ReservationsFallback {
    pub fn reservations() -> Resources<Reservation> {
        FALLBACK_NAMES.into_iter().map(Reservation::new).collect()
    }
}

#[async_trait]
impl ReservationsClient for ReservationsFallback {
    async fn find_all(&self) -> Result<Resources<Reservation>, ClientError> {
        Ok(Self::reservations())
    }
}

/// A network-backed client whose failures are answered by a fallback provider.
///
/// Each call is either `SUCCESS` (upstream data) or `FAILURE` (fallback data);
/// there are no retries.
pub struct WithFallback<S> {
    inner: Fallback<S, FindAll, Resources<Reservation>, ClientError>,
}

impl<S> WithFallback<S>
where
    S: Service<FindAll, Response = Resources<Reservation>, Error = ClientError>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    pub fn new<F>(primary: S, fallback: F) -> Self
    where
        F: ReservationsClient + Clone + 'static,
    {
        let layer = FallbackLayer::builder()
            .name("reservations-client")
            .service(move |_req: FindAll| {
                let fallback = fallback.clone();
                async move { fallback.find_all().await }
            })
            .on_event(log_fallback_event)
            .build();

        Self {
            inner: layer.layer(primary),
        }
    }
}

fn log_fallback_event(event: &FallbackEvent) {
    match event {
        FallbackEvent::FailedAttempt { reason, .. } => {
            tracing::warn!(client = event.source_name(), %reason, "upstream call failed, using fallback");
        }
        FallbackEvent::Failed { .. } => {
            tracing::error!(client = event.source_name(), "fallback provider failed");
        }
        _ => {
            tracing::debug!(client = event.source_name(), event = event.event_type(), "fallback event");
        }
    }
}

#[async_trait]
impl<S> ReservationsClient for WithFallback<S>
where
    S: Service<FindAll, Response = Resources<Reservation>, Error = ClientError>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    async fn find_all(&self) -> Result<Resources<Reservation>, ClientError> {
        self.inner
            .clone()
            .oneshot(FindAll)
            .await
            .map_err(FallbackError::into_inner)
    }
}
