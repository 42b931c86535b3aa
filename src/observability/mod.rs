//! # Observability
//!
//! Structured logging for appliance calls. Every request made through the
//! accessor runs inside a `bigip_request` span.

pub mod logging;

pub use logging::init_logging;
