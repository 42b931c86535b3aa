//! Typed REST resource accessor
//!
//! All verbs share [`join_path`] and one status contract: any non-2xx answer
//! is an error, except that a GET answered with 404 reports `Ok(None)`.

use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, trace, Instrument};

use super::uri::join_path;
use super::BigIp;
use crate::errors::{BigIpError, Result};
use crate::request_span;

impl BigIp {
    /// GET the resource at `path` and decode it into `T`.
    ///
    /// Returns `Ok(None)` when the appliance answers 404.
    pub async fn get_for_entity<T>(&self, path: &[&str]) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        self.get_for_entity_with_query(path, &[]).await
    }

    /// GET with URL query parameters (`$filter`, `expandSubcollections`, ...).
    pub async fn get_for_entity_with_query<T>(
        &self,
        path: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let joined = join_path(path);
        let mut req = self.request(Method::GET, &joined);
        if !query.is_empty() {
            req = req.query(query);
        }

        let (status, body) = self.execute(Method::GET, &joined, req).await?;
        if status == StatusCode::NOT_FOUND {
            debug!(path = %joined, "Resource not found");
            return Ok(None);
        }
        check_status(&Method::GET, &joined, status, &body)?;

        let entity = serde_json::from_slice(&body).map_err(|e| {
            BigIpError::serialization(format!("Failed to decode response from /{}", joined), e)
        })?;
        Ok(Some(entity))
    }

    /// POST `payload` as JSON.
    pub async fn post<B>(&self, payload: &B, path: &[&str]) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send_json(Method::POST, payload, path, &[]).await.map(|_| ())
    }

    /// POST `payload` as JSON and hand back the raw response body.
    pub async fn post_req<B>(&self, payload: &B, path: &[&str]) -> Result<Bytes>
    where
        B: Serialize + ?Sized,
    {
        self.send_json(Method::POST, payload, path, &[]).await
    }

    /// PUT `payload` as JSON (full replace).
    pub async fn put<B>(&self, payload: &B, path: &[&str]) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PUT, payload, path, &[]).await.map(|_| ())
    }

    /// PATCH `payload` as JSON (partial update).
    pub async fn patch<B>(&self, payload: &B, path: &[&str]) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PATCH, payload, path, &[]).await.map(|_| ())
    }

    /// DELETE the resource at `path`. A missing resource is an error.
    pub async fn delete(&self, path: &[&str]) -> Result<()> {
        let joined = join_path(path);
        let req = self.request(Method::DELETE, &joined);
        let (status, body) = self.execute(Method::DELETE, &joined, req).await?;
        check_status(&Method::DELETE, &joined, status, &body)
    }

    pub(crate) async fn send_json<B>(
        &self,
        method: Method,
        payload: &B,
        path: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Bytes>
    where
        B: Serialize + ?Sized,
    {
        let joined = join_path(path);
        let body = serde_json::to_vec(payload).map_err(|e| {
            BigIpError::serialization(format!("Failed to encode request for /{}", joined), e)
        })?;
        trace!(path = %joined, body = %String::from_utf8_lossy(&body), "Request body");

        let mut req = self
            .request(method.clone(), &joined)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if !query.is_empty() {
            req = req.query(query);
        }

        let (status, response) = self.execute(method.clone(), &joined, req).await?;
        check_status(&method, &joined, status, &response)?;
        Ok(response)
    }

    /// Send a prepared request and read the full body.
    pub(crate) async fn execute(
        &self,
        method: Method,
        path: &str,
        req: RequestBuilder,
    ) -> Result<(StatusCode, Bytes)> {
        let span = request_span!(method, format!("/{}", path));
        async move {
            let started = Instant::now();
            let response = req.send().await.map_err(|e| {
                BigIpError::transport(format!("Failed to send {} /{}", method, path), e)
            })?;

            let status = response.status();
            let body = response.bytes().await.map_err(|e| {
                BigIpError::transport(format!("Failed to read response from /{}", path), e)
            })?;

            debug!(
                status = status.as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Response received"
            );
            trace!(body = %String::from_utf8_lossy(&body), "Response body");

            Ok::<_, BigIpError>((status, body))
        }
        .instrument(span)
        .await
    }
}

pub(super) fn check_status(method: &Method, path: &str, status: StatusCode, body: &[u8]) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }

    Err(BigIpError::http(
        method.as_str(),
        format!("/{}", path),
        status.as_u16(),
        extract_error_message(body).unwrap_or_else(|| status.to_string()),
    ))
}

/// Pull the human-readable message out of an appliance error body.
///
/// iControl REST answers `{"code": 404, "message": "...", "errorStack": []}`;
/// anything else falls back to the trimmed body text.
fn extract_error_message(body: &[u8]) -> Option<String> {
    if let Ok(val) = serde_json::from_slice::<Value>(body) {
        if let Some(msg) = val.get("message").and_then(|m| m.as_str()) {
            return Some(msg.to_string());
        }
    }
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BigIpConfig;
    use serde_json::json;
    use tracing_test::traced_test;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_extract_error_message_prefers_json_message() {
        let body = br#"{"code":404,"message":"01020036:3: The requested Pool (/Common/x) was not found.","errorStack":[]}"#;
        assert_eq!(
            extract_error_message(body),
            Some("01020036:3: The requested Pool (/Common/x) was not found.".to_string())
        );
        assert_eq!(extract_error_message(b"plain text"), Some("plain text".to_string()));
        assert_eq!(extract_error_message(b"   "), None);
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(&Method::GET, "mgmt", StatusCode::OK, b"").is_ok());
        assert!(check_status(&Method::POST, "mgmt", StatusCode::NO_CONTENT, b"").is_ok());

        let err = check_status(&Method::DELETE, "mgmt/tm/ltm/pool/x", StatusCode::NOT_FOUND, b"")
            .unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert!(err.to_string().contains("/mgmt/tm/ltm/pool/x"));
        assert!(err.to_string().contains("404 Not Found"));
    }

    #[traced_test]
    #[tokio::test]
    async fn test_requests_logged_inside_request_span() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mgmt/tm/sys/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"kind": "tm:sys:version:versionstats"})))
            .mount(&server)
            .await;

        let config = BigIpConfig { host: server.uri(), password: "secret".into(), ..Default::default() };
        let bigip = BigIp::new(&config).unwrap();
        let version: Option<Value> = bigip.get_for_entity(&["mgmt", "tm", "sys", "version"]).await.unwrap();

        assert!(version.is_some());
        assert!(logs_contain("bigip_request"));
        assert!(logs_contain("Response received"));
        assert!(logs_contain("status=200"));
    }
}
