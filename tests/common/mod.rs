//! Shared helpers for tests that run against a wiremock fake appliance.

#![allow(dead_code)]

use bigip::{BigIp, BigIpConfig, PollConfig};
use wiremock::MockServer;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";

/// Connection settings pointing at `server` with basic auth
pub fn config_for(server: &MockServer) -> BigIpConfig {
    BigIpConfig {
        host: server.uri(),
        username: USERNAME.to_string(),
        password: PASSWORD.to_string(),
        timeout_seconds: 5,
        ..BigIpConfig::default()
    }
}

/// Start a fake appliance and a client bound to it
pub async fn fake_appliance() -> (MockServer, BigIp) {
    let server = MockServer::start().await;
    let bigip = BigIp::new(&config_for(&server)).expect("client builds for mock server");
    (server, bigip)
}

/// Poll settings that never sleep
pub fn instant_poll(max_attempts: u32) -> PollConfig {
    PollConfig {
        max_attempts,
        initial_interval_ms: 0,
        max_interval_ms: 0,
        backoff_multiplier: 1.0,
    }
}
