// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! REST connector for Home Assistant.

use std::fmt::Display;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde_json::{Value, json};

use crate::config::ClientConfig;
use crate::error::{Error, ParseError, ProtocolError};
use crate::protocol::Connector;
use crate::types::{Attributes, RawEntity};

/// Connector over the Home Assistant REST API.
///
/// Each call is an independent request carrying the bearer token and the
/// configured timeout. Cloning is cheap; clones share the connection pool.
///
/// # Examples
///
/// ```no_run
/// use hass_voice::{ClientConfig, protocol::{Connector, RestConnector}};
///
/// # async fn example() -> hass_voice::Result<()> {
/// let config = ClientConfig::new("http://homeassistant.local:8123", "token");
/// let connector = RestConnector::from_config(&config)?;
///
/// connector.check_connection().await?;
/// let entities = connector.fetch_all().await;
/// println!("{} entities", entities.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RestConnector {
    base_url: String,
    client: Client,
    assist_only: bool,
}

impl RestConnector {
    /// Creates a connector with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty, the token is not a valid header
    /// value, or the HTTP client cannot be created.
    pub fn new(host: impl Into<String>, api_key: &str) -> Result<Self, ProtocolError> {
        Self::build(
            &host.into(),
            api_key,
            Duration::from_secs(ClientConfig::DEFAULT_TIMEOUT_SECS),
            true,
            true,
        )
    }

    /// Creates a connector from a full client configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty, the token is not a valid header
    /// value, or the HTTP client cannot be created.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ProtocolError> {
        Self::build(
            &config.host,
            &config.api_key,
            config.timeout_duration(),
            config.verify_ssl,
            config.assist_only,
        )
    }

    fn build(
        host: &str,
        api_key: &str,
        timeout: Duration,
        verify_ssl: bool,
        assist_only: bool,
    ) -> Result<Self, ProtocolError> {
        let host = host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()));
        }
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{host}")
        };

        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| ProtocolError::InvalidToken)?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .danger_accept_invalid_certs(!verify_ssl)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(Self {
            base_url,
            client,
            assist_only,
        })
    }

    /// Returns the base URL of the instance.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns whether the caller asked for Assist-exposed entities only.
    ///
    /// The states endpoint carries no exposure information, so the flag is
    /// kept for the host application and does not filter results here.
    #[must_use]
    pub fn assist_only(&self) -> bool {
        self.assist_only
    }

    /// Verifies that the instance is reachable and accepts the token.
    ///
    /// Unlike the [`Connector`] methods this reports the failure.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` on transport failure, rejected token or
    /// non-success status.
    pub async fn check_connection(&self) -> Result<(), Error> {
        let body = self.request(Method::GET, "/api/", None).await?;
        tracing::debug!(base_url = %self.base_url, body = %body, "Home Assistant API reachable");
        Ok(())
    }

    fn state_path(entity_id: &str) -> String {
        format!("/api/states/{}", urlencoding::encode(entity_id))
    }

    fn service_path(domain: &str, service: &str) -> String {
        format!(
            "/api/services/{}/{}",
            urlencoding::encode(domain),
            urlencoding::encode(service)
        )
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ProtocolError> {
        let url = format!("{}{path}", self.base_url);

        tracing::debug!(method = %method, url = %url, "Sending Home Assistant request");

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(ProtocolError::Http)?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProtocolError::AuthenticationFailed);
        }

        if !response.status().is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "HTTP {} - {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.json::<Value>().await.map_err(ProtocolError::Http)?;

        tracing::debug!(url = %url, "Received Home Assistant response");

        Ok(body)
    }

    async fn request_entity(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RawEntity, Error> {
        let value = self.request(method, path, body).await?;
        serde_json::from_value(value).map_err(|e| Error::Parse(ParseError::Json(e)))
    }
}

/// Logs a failed call and converts it to `None`.
fn soft<T>(action: &str, target: &str, result: Result<T, impl Display>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(target_id = %target, error = %err, "Error {action}");
            None
        }
    }
}

impl Connector for RestConnector {
    async fn fetch_all(&self) -> Vec<RawEntity> {
        let result = match self.request(Method::GET, "/api/states", None).await {
            Ok(Value::Array(items)) => {
                let total = items.len();
                let entities: Vec<RawEntity> = items
                    .into_iter()
                    .filter_map(|item| {
                        soft(
                            "parsing entity",
                            item.get("entity_id").and_then(Value::as_str).unwrap_or("?"),
                            serde_json::from_value::<RawEntity>(item.clone()),
                        )
                    })
                    .collect();
                tracing::debug!(total, parsed = entities.len(), "Fetched entity states");
                Ok(entities)
            }
            Ok(other) => Err(Error::Parse(ParseError::UnexpectedFormat(format!(
                "expected a list of states, got {other}"
            )))),
            Err(err) => Err(Error::Protocol(err)),
        };
        soft("fetching devices", &self.base_url, result).unwrap_or_default()
    }

    async fn fetch_one(&self, entity_id: &str) -> Option<RawEntity> {
        let result = self
            .request_entity(Method::GET, &Self::state_path(entity_id), None)
            .await;
        soft("fetching device state", entity_id, result)
    }

    async fn write_state(
        &self,
        entity_id: &str,
        state: &str,
        attributes: Option<&Attributes>,
    ) -> Option<RawEntity> {
        let mut payload = json!({ "state": state });
        if let Some(attributes) = attributes {
            payload["attributes"] = Value::Object(attributes.clone());
        }
        let result = self
            .request_entity(Method::POST, &Self::state_path(entity_id), Some(&payload))
            .await;
        soft("setting device state", entity_id, result)
    }

    async fn invoke_service(
        &self,
        domain: &str,
        service: &str,
        entity_id: &str,
        extra: Option<&Attributes>,
    ) -> Option<Value> {
        let mut payload = Attributes::new();
        payload.insert("entity_id".to_string(), Value::String(entity_id.to_string()));
        if let Some(extra) = extra {
            for (key, value) in extra {
                payload.insert(key.clone(), value.clone());
            }
        }
        let payload = Value::Object(payload);

        let result = self
            .request(
                Method::POST,
                &Self::service_path(domain, service),
                Some(&payload),
            )
            .await;
        soft(&format!("calling {domain}.{service}"), entity_id, result)
    }

    async fn send_freeform(&self, text: &str, language: &str) -> Option<Value> {
        let payload = json!({ "text": text, "language": language });
        let result = self
            .request(Method::POST, "/api/conversation/process", Some(&payload))
            .await;
        soft("sending Assist command", text, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_scheme() {
        let connector = RestConnector::new("homeassistant.local:8123", "token").unwrap();
        assert_eq!(connector.base_url(), "http://homeassistant.local:8123");
    }

    #[test]
    fn base_url_keeps_https_and_drops_trailing_slash() {
        let connector = RestConnector::new("https://ha.example.com/", "token").unwrap();
        assert_eq!(connector.base_url(), "https://ha.example.com");
    }

    #[test]
    fn empty_host_rejected() {
        let result = RestConnector::new("   ", "token");
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[test]
    fn token_with_newline_rejected() {
        let result = RestConnector::new("http://ha", "bad\ntoken");
        assert!(matches!(result, Err(ProtocolError::InvalidToken)));
    }

    #[test]
    fn from_config_keeps_assist_flag() {
        let config = ClientConfig::new("http://ha:8123", "token").with_assist_only(false);
        let connector = RestConnector::from_config(&config).unwrap();
        assert!(!connector.assist_only());
        assert_eq!(connector.base_url(), "http://ha:8123");
    }

    #[test]
    fn paths_are_encoded() {
        assert_eq!(
            RestConnector::state_path("light.kitchen"),
            "/api/states/light.kitchen"
        );
        assert_eq!(
            RestConnector::state_path("light/../x"),
            "/api/states/light%2F..%2Fx"
        );
        assert_eq!(
            RestConnector::service_path("climate", "set_temperature"),
            "/api/services/climate/set_temperature"
        );
    }
}
