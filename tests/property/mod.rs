//! Property-based tests, one module per concern.

pub mod balancer;
pub mod projection;
