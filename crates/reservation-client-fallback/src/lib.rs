//! Fallback middleware for remote-call services.
//!
//! Wraps a Tower service that performs a remote call and, when the call fails,
//! answers with a substitute response instead of the error. This is the
//! "fail open to a canned response" policy: callers of the wrapped service see
//! either the real answer or the substitute, never the transport failure.
//!
//! # Strategies
//!
//! ## Static Value
//!
//! ```rust
//! use reservation_client_fallback::FallbackLayer;
//!
//! # #[derive(Debug, Clone)]
//! # struct CallError;
//! let layer = FallbackLayer::<(), Vec<String>, CallError>::value(vec![
//!     "This".to_string(),
//!     "is".to_string(),
//!     "fallback".to_string(),
//! ]);
//! ```
//!
//! ## From the Error
//!
//! ```rust
//! use reservation_client_fallback::FallbackLayer;
//!
//! # #[derive(Debug, Clone)]
//! # struct CallError { service: String }
//! let layer = FallbackLayer::<(), String, CallError>::from_error(|error: &CallError| {
//!     format!("{} is unavailable", error.service)
//! });
//! ```
//!
//! ## Backup Provider
//!
//! Delegate to another implementation of the same capability, for example a
//! provider that never touches the network:
//!
//! ```rust
//! use reservation_client_fallback::FallbackLayer;
//!
//! # #[derive(Debug, Clone)]
//! # struct CallError;
//! let layer = FallbackLayer::<(), Vec<String>, CallError>::service(|_req: ()| async move {
//!     Ok::<_, CallError>(vec!["cached".to_string()])
//! });
//! ```
//!
//! # Selective Handling
//!
//! ```rust
//! use reservation_client_fallback::FallbackLayer;
//!
//! # #[derive(Debug, Clone)]
//! # struct CallError { transient: bool }
//! let layer: FallbackLayer<(), String, CallError> = FallbackLayer::builder()
//!     .name("reservations")
//!     .value("unavailable".to_string())
//!     .handle(|e: &CallError| e.transient)
//!     .build();
//! ```
//!
//! # Events
//!
//! - `Success`: the inner call succeeded
//! - `FailedAttempt`: the inner call failed and a fallback will be applied
//! - `Applied`: the fallback produced the response
//! - `Failed`: the backup provider failed too
//! - `Skipped`: the error did not match the `handle` predicate

mod config;
mod error;
mod events;
mod layer;

pub use config::{FallbackConfig, FallbackConfigBuilder};
pub use error::FallbackError;
pub use events::FallbackEvent;
pub use layer::FallbackLayer;

use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tower_service::Service;

#[cfg(feature = "metrics")]
use metrics::{counter, describe_counter};

#[cfg(feature = "metrics")]
static METRICS_INIT: std::sync::Once = std::sync::Once::new();

/// Computes a fallback response from the error.
pub type FromErrorFn<Res, E> = Arc<dyn Fn(&E) -> Res + Send + Sync>;

/// Calls a backup provider asynchronously.
pub type ServiceFn<Req, Res, E> =
    Arc<dyn Fn(Req) -> BoxFuture<'static, Result<Res, E>> + Send + Sync>;

/// Decides whether an error should trigger the fallback.
pub type HandlePredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// How the fallback response is produced.
pub enum FallbackStrategy<Req, Res, E> {
    /// Return a fixed value, cloned for each fallback.
    Value(Res),

    /// Compute a response from the error.
    FromError(FromErrorFn<Res, E>),

    /// Call a backup provider with the original request.
    Service(ServiceFn<Req, Res, E>),
}

impl<Req, Res, E> FallbackStrategy<Req, Res, E> {
    fn label(&self) -> &'static str {
        match self {
            Self::Value(_) => "value",
            Self::FromError(_) => "from_error",
            Self::Service(_) => "service",
        }
    }
}

impl<Req, Res: Clone, E> Clone for FallbackStrategy<Req, Res, E> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(v) => Self::Value(v.clone()),
            Self::FromError(f) => Self::FromError(Arc::clone(f)),
            Self::Service(s) => Self::Service(Arc::clone(s)),
        }
    }
}

/// A Tower service that answers with a fallback response when the inner service fails.
///
/// See the [crate documentation](crate) for usage examples.
pub struct Fallback<S, Req, Res, E> {
    inner: S,
    config: Arc<FallbackConfig<Req, Res, E>>,
}

impl<S, Req, Res, E> Fallback<S, Req, Res, E> {
    /// Creates a new `Fallback` service wrapping the given service.
    pub fn new(inner: S, config: Arc<FallbackConfig<Req, Res, E>>) -> Self {
        #[cfg(feature = "metrics")]
        METRICS_INIT.call_once(|| {
            describe_counter!(
                "fallback_calls_total",
                "Total number of calls that passed through a fallback layer"
            );
        });

        Self { inner, config }
    }
}

impl<S: Clone, Req, Res, E> Clone for Fallback<S, Req, Res, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S, Req, Res, E> Service<Req> for Fallback<S, Req, Res, E>
where
    S: Service<Req, Response = Res, Error = E> + Clone + Send + 'static,
    S::Future: Send + 'static,
    Req: Clone + Send + Sync + 'static,
    Res: Clone + Send + Sync + 'static,
    E: fmt::Display + Send + Sync + 'static,
{
    type Response = Res;
    type Error = FallbackError<E>;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(FallbackError::Inner)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        // Drive the clone that was polled ready and leave a fresh one behind.
        let clone = self.inner.clone();
        let mut service = std::mem::replace(&mut self.inner, clone);
        let config = Arc::clone(&self.config);
        let backup_req = req.clone();

        Box::pin(async move {
            let error = match service.call(req).await {
                Ok(response) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(fallback = %config.name, "inner call succeeded");

                    record(&config, "success", None);
                    config.event_listeners.emit(&FallbackEvent::Success {
                        source_name: config.name.clone(),
                        timestamp: Instant::now(),
                    });
                    return Ok(response);
                }
                Err(error) => error,
            };

            let should_handle = config
                .handle_predicate
                .as_ref()
                .map(|p| p(&error))
                .unwrap_or(true);

            if !should_handle {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    fallback = %config.name,
                    error = %error,
                    "error does not match predicate, propagating"
                );

                record(&config, "skipped", None);
                config.event_listeners.emit(&FallbackEvent::Skipped {
                    source_name: config.name.clone(),
                    timestamp: Instant::now(),
                });
                return Err(FallbackError::Inner(error));
            }

            #[cfg(feature = "tracing")]
            tracing::warn!(fallback = %config.name, error = %error, "inner call failed, applying fallback");

            config.event_listeners.emit(&FallbackEvent::FailedAttempt {
                source_name: config.name.clone(),
                timestamp: Instant::now(),
                reason: error.to_string(),
            });

            let strategy = config.strategy.label();
            let response = match &config.strategy {
                FallbackStrategy::Value(v) => v.clone(),
                FallbackStrategy::FromError(f) => f(&error),
                FallbackStrategy::Service(backup) => match backup(backup_req).await {
                    Ok(response) => response,
                    Err(backup_error) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            fallback = %config.name,
                            error = %backup_error,
                            "backup provider failed too"
                        );

                        record(&config, "failed", Some(strategy));
                        config.event_listeners.emit(&FallbackEvent::Failed {
                            source_name: config.name.clone(),
                            timestamp: Instant::now(),
                        });
                        return Err(FallbackError::FallbackFailed(backup_error));
                    }
                },
            };

            record(&config, "applied", Some(strategy));
            config.event_listeners.emit(&FallbackEvent::Applied {
                source_name: config.name.clone(),
                timestamp: Instant::now(),
                strategy,
            });
            Ok(response)
        })
    }
}

#[cfg(feature = "metrics")]
fn record<Req, Res, E>(
    config: &FallbackConfig<Req, Res, E>,
    result: &'static str,
    strategy: Option<&'static str>,
) {
    counter!(
        "fallback_calls_total",
        "fallback" => config.name.clone(),
        "result" => result,
        "strategy" => strategy.unwrap_or("none")
    )
    .increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record<Req, Res, E>(
    _config: &FallbackConfig<Req, Res, E>,
    _result: &'static str,
    _strategy: Option<&'static str>,
) {
}
