//! Shared infrastructure for the reservation client crates.
//!
//! This crate provides the pieces every other crate in the workspace leans on:
//! - An event system so client layers can be observed without coupling to a logger
//! - [`ClientError`], the error type that flows through discovery, load balancing,
//!   and fallback

pub mod error;
pub mod events;

pub use error::ClientError;
pub use events::{ClientEvent, EventListener, EventListeners, FnListener};
