//! # bigip
//!
//! Typed client for the F5 BIG-IP management REST API (`/mgmt/...`).
//!
//! ## Architecture
//!
//! ```text
//! resources / as3 / fast / licensing / ilx    (typed operations)
//!                     ↓
//!        client::BigIp typed resource accessor
//!   get_for_entity · post · post_req · put · patch · delete
//!                     ↓
//!          reqwest → appliance (HTTPS JSON)
//! ```
//!
//! Resource structs expose child collections as plain `Vec<T>`; the
//! [`resources::reference`] serde helper maps them to and from the appliance's
//! `<name>Reference: {"items": [...]}` envelope.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bigip::{BigIp, BigIpConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = BigIpConfig::from_env();
//!     let bigip = BigIp::connect(&config).await?;
//!
//!     match bigip.get_pool("/Common/web_pool").await? {
//!         Some(pool) => println!("{} has {} members", pool.name, pool.members.len()),
//!         None => println!("pool not found"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod as3;
pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod fast;
pub mod ilx;
pub mod licensing;
pub mod observability;
pub mod resources;

pub use client::BigIp;
pub use config::{BigIpConfig, LoggingConfig, PollConfig};
pub use errors::{BigIpError, Result};
pub use observability::init_logging;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
