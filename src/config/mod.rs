//! # Configuration Management
//!
//! Settings for reaching an appliance (address, credentials, TLS trust),
//! bounding status polls, and shaping log output. Values come from the
//! environment; the CLI layers its profile file and flags on top.

pub mod settings;

pub use settings::{BigIpConfig, LoggingConfig, PollConfig};
