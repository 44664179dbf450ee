//! A small front end over a discovered reservation service.
//!
//! Two endpoints list reservation names:
//!
//! - `GET /names` resolves `reservationservice` through the registry, calls
//!   one instance directly, and reports upstream failures as errors.
//! - `GET /feign-names` goes through the typed [`ReservationsClient`], which
//!   answers `["This", "is", "fallback"]` whenever the upstream call fails.
//!
//! At startup the registry's view of the upstream service is logged once.
//!
//! ```rust,no_run
//! use clap::Parser;
//! use reservation_client::{App, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::parse();
//! let listener = tokio::net::TcpListener::bind(config.bind).await?;
//! App::build(config)?
//!     .serve(listener, async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod client;
pub mod config;
pub mod demo;
pub mod model;

pub use api::{router, ApiError, AppState};
pub use app::{App, StartupError};
pub use client::{
    FindAll, HttpReservationsClient, ReservationsClient, ReservationsFallback, WithFallback,
    FALLBACK_NAMES,
};
pub use config::Config;
pub use demo::run_discovery_demo;
pub use model::{Reservation, Resources};
