//! HTTP client for the BIG-IP management API
//!
//! [`BigIp`] owns the connection settings and exposes the typed resource
//! accessor (`get_for_entity`, `post`, `post_req`, `put`, `patch`, `delete`).
//! Resource families (`resources`, `as3`, `fast`, `licensing`, `ilx`) add
//! their operations as further `impl BigIp` blocks on top of it.

mod command;
mod rest;
pub mod uri;

pub use command::BashCommand;

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::BigIpConfig;
use crate::errors::{BigIpError, Result};
use uri::{AUTHN, LOGIN, MGMT, SHARED};

/// Header carrying a session token obtained from the login endpoint
pub const AUTH_TOKEN_HEADER: &str = "X-F5-Auth-Token";

#[derive(Clone)]
enum Auth {
    Basic { username: String, password: String },
    Token(String),
}

/// Authenticated handle to one appliance
#[derive(Clone)]
pub struct BigIp {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl std::fmt::Debug for BigIp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let auth = match self.auth {
            Auth::Basic { .. } => "basic",
            Auth::Token(_) => "token",
        };
        f.debug_struct("BigIp").field("base_url", &self.base_url).field("auth", &auth).finish()
    }
}

/// Request body for the token login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    username: String,
    password: String,
    login_provider_name: String,
}

/// Response from the token login endpoint
#[derive(Debug, Clone, Deserialize)]
struct LoginResponse {
    token: LoginToken,
}

#[derive(Debug, Clone, Deserialize)]
struct LoginToken {
    token: String,
}

impl BigIp {
    /// Create a client that sends basic auth on every request
    pub fn new(config: &BigIpConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder().timeout(config.timeout());

        if config.insecure_skip_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(path) = &config.trusted_cert_path {
            let pem = std::fs::read(path).map_err(|e| BigIpError::Io {
                context: format!("Failed to read trusted certificate: {}", path),
                source: e,
            })?;
            let cert = reqwest::Certificate::from_pem(&pem)
                .map_err(|e| BigIpError::transport("Invalid trusted certificate", e))?;
            builder = builder.add_root_certificate(cert);
        }

        let client =
            builder.build().map_err(|e| BigIpError::transport("Failed to build HTTP client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            auth: Auth::Basic {
                username: config.username.clone(),
                password: config.password.clone(),
            },
        })
    }

    /// Create a client, exchanging credentials for a token when `token_auth` is set
    pub async fn connect(config: &BigIpConfig) -> Result<Self> {
        let bigip = Self::new(config)?;
        if !config.token_auth {
            return Ok(bigip);
        }

        let request = LoginRequest {
            username: config.username.clone(),
            password: config.password.clone(),
            login_provider_name: config.login_provider.clone(),
        };

        let body = bigip.post_req(&request, &[MGMT, SHARED, AUTHN, LOGIN]).await?;
        let response: LoginResponse = serde_json::from_slice(&body)
            .map_err(|e| BigIpError::serialization("Failed to decode login response", e))?;

        info!(username = %config.username, "Obtained BIG-IP auth token");
        Ok(bigip.with_token(response.token.token))
    }

    /// Replace the credentials with an existing session token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth = Auth::Token(token.into());
        self
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Build a request with authentication applied
    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let req = self.client.request(method, url);
        match &self.auth {
            Auth::Basic { username, password } => req.basic_auth(username, Some(password)),
            Auth::Token(token) => req.header(AUTH_TOKEN_HEADER, token),
        }
    }
}
