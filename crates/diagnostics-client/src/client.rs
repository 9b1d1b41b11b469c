// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Blocking HTTP client for the admin diagnostics endpoints.
//!
//! Every request is a single GET bounded by the configured timeouts. The
//! outcome is either the decoded body or [`DiagnosticRequestFailed`]; the
//! reason for a failure is logged here and not passed on.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::error::{ConfigError, DiagnosticRequestFailed};

/// Default connect and read timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const APPLICATION_JSON: &str = "application/json";

/// Media type the admin endpoints put on their JSON bodies.
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";

/// Configuration for [`DiagnosticClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Maximum time to establish a connection.
    pub connect_timeout: Duration,
    /// Maximum time to wait for the response.
    pub read_timeout: Duration,
    /// Content types whose bodies are decoded as JSON.
    pub decodable_content_types: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_TIMEOUT,
            read_timeout: DEFAULT_TIMEOUT,
            decodable_content_types: vec![
                APPLICATION_JSON.to_string(),
                APPLICATION_OCTET_STREAM.to_string(),
            ],
        }
    }
}

/// Thread-safe client issuing diagnostics GET requests.
#[derive(Debug, Clone)]
pub struct DiagnosticClient {
    http: reqwest::blocking::Client,
    decodable_content_types: Arc<[String]>,
}

impl DiagnosticClient {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        // Admin ports are local; never route them through a proxy.
        let http = reqwest::blocking::Client::builder()
            .no_proxy()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;

        let decodable_content_types = config
            .decodable_content_types
            .iter()
            .map(String::as_str)
            .map(media_type)
            .collect();

        Ok(Self {
            http,
            decodable_content_types,
        })
    }

    /// Send a GET request to `address` and decode the JSON body.
    pub fn get<T: DeserializeOwned>(&self, address: &Url) -> Result<T, DiagnosticRequestFailed> {
        debug!("GET {address}");

        let response = self.http.get(address.clone()).send().map_err(|e| {
            error!("unable to connect to admin port ({address}): {e}");
            DiagnosticRequestFailed
        })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            error!("unable to get a response from {address}: HTTP {status}");
            return Err(DiagnosticRequestFailed);
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        {
            if !self.is_decodable(content_type) {
                error!("unexpected content type '{content_type}' from {address}");
                return Err(DiagnosticRequestFailed);
            }
        }

        let body = response.bytes().map_err(|e| {
            error!("unable to read response body from {address}: {e}");
            DiagnosticRequestFailed
        })?;
        if body.iter().all(u8::is_ascii_whitespace) {
            error!("unable to get a response from {address}: empty body");
            return Err(DiagnosticRequestFailed);
        }

        serde_json::from_slice(&body).map_err(|e| {
            error!("invalid diagnostics response from {address}: {e}");
            DiagnosticRequestFailed
        })
    }

    fn is_decodable(&self, content_type: &str) -> bool {
        let media_type = media_type(content_type);
        self.decodable_content_types
            .iter()
            .any(|accepted| *accepted == media_type)
    }
}

/// Media type of a `Content-Type` value without parameters, lowercased.
fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
