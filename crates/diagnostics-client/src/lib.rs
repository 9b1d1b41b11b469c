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

//! Diagnostics client for the admin endpoints of a security-infrastructure node.
//!
//! A node runs three subsystems that each report their health over a local
//! admin HTTP port:
//!
//! - **Configuration client**: global configuration download and validation
//! - **Proxy**: timestamping services, keyed by service name
//! - **Signer**: OCSP responders, keyed by certification authority
//!
//! [`DiagnosticService`] queries each of them with a single blocking GET and
//! reshapes the responses into [`DiagnosticsStatus`] records. Any failure
//! (unreachable host, error status, empty or malformed body) surfaces as
//! [`DiagnosticError::RequestFailed`] without partial results.
//!
//! ```no_run
//! use diagnostics_client::{DiagnosticService, DiagnosticsConfig};
//!
//! let service = DiagnosticService::new(&DiagnosticsConfig::default())?;
//! for status in service.query_timestamping_status()? {
//!     println!("{:?}: {}", status.description, status.status_code);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod address;
pub mod client;
pub mod error;
pub mod model;
pub mod normalize;

#[cfg(test)]
mod test_support;

use chrono::{DateTime, Utc};
use log::{debug, info};

pub use address::{resolve_address, DiagnosticAddresses};
pub use client::{ClientConfig, DiagnosticClient};
pub use error::{ConfigError, DiagnosticError, DiagnosticRequestFailed, ERROR_DIAGNOSTIC_REQUEST_FAILED};
pub use model::{
    CertificationServiceDiagnostics, CertificationServiceStatus, ConfigurationStatus,
    DiagnosticsStatus, OcspResponderDiagnosticsStatus, OcspResponderStatus, OcspStatus,
    StatusCode, TimestampingStatusResponse,
};
pub use indexmap::IndexMap;

/// Default URL template of the configuration client admin endpoint.
pub const DEFAULT_GLOBAL_CONF_URL: &str = "http://localhost:%d/status";
/// Default URL template of the proxy timestamping status endpoint.
pub const DEFAULT_TIMESTAMPING_URL: &str = "http://localhost:%d/timestampstatus";
/// Default URL template of the signer OCSP status endpoint.
pub const DEFAULT_OCSP_RESPONDERS_URL: &str = "http://localhost:%d/status";

pub const DEFAULT_CONFIGURATION_CLIENT_ADMIN_PORT: u16 = 5675;
pub const DEFAULT_PROXY_ADMIN_PORT: u16 = 5566;
pub const DEFAULT_SIGNER_ADMIN_PORT: u16 = 5677;

/// Endpoint templates, ports and transport settings for [`DiagnosticService`].
#[derive(Debug, Clone)]
pub struct DiagnosticsConfig {
    pub global_conf_url: String,
    pub global_conf_port: u16,
    pub timestamping_url: String,
    pub timestamping_port: u16,
    pub ocsp_responders_url: String,
    pub ocsp_responders_port: u16,
    pub client: ClientConfig,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            global_conf_url: DEFAULT_GLOBAL_CONF_URL.to_string(),
            global_conf_port: DEFAULT_CONFIGURATION_CLIENT_ADMIN_PORT,
            timestamping_url: DEFAULT_TIMESTAMPING_URL.to_string(),
            timestamping_port: DEFAULT_PROXY_ADMIN_PORT,
            ocsp_responders_url: DEFAULT_OCSP_RESPONDERS_URL.to_string(),
            ocsp_responders_port: DEFAULT_SIGNER_ADMIN_PORT,
            client: ClientConfig::default(),
        }
    }
}

/// Queries the admin endpoints and normalizes their responses.
///
/// Holds only the resolved addresses and a shareable HTTP client, so a single
/// instance can serve concurrent callers from any number of threads.
#[derive(Debug, Clone)]
pub struct DiagnosticService {
    client: DiagnosticClient,
    addresses: DiagnosticAddresses,
}

impl DiagnosticService {
    /// Resolve the endpoint addresses and build the HTTP client.
    pub fn new(config: &DiagnosticsConfig) -> Result<Self, ConfigError> {
        let addresses = DiagnosticAddresses::resolve(config)?;
        let client = DiagnosticClient::new(config.client.clone())?;
        Ok(Self::with_client(client, addresses))
    }

    #[must_use]
    pub fn with_client(client: DiagnosticClient, addresses: DiagnosticAddresses) -> Self {
        Self { client, addresses }
    }

    #[must_use]
    pub fn addresses(&self) -> &DiagnosticAddresses {
        &self.addresses
    }

    /// Query global configuration status from the configuration client.
    pub fn query_global_conf_status(&self) -> Result<DiagnosticsStatus, DiagnosticError> {
        debug!("Query global configuration status");
        Ok(self.client.get(&self.addresses.global_conf)?)
    }

    /// Query timestamping service statuses from the proxy.
    ///
    /// Each status is described by the name of its timestamping service.
    pub fn query_timestamping_status(&self) -> Result<Vec<DiagnosticsStatus>, DiagnosticError> {
        info!("Query timestamper status");
        let response: TimestampingStatusResponse = self.client.get(&self.addresses.timestamping)?;
        Ok(normalize::timestamping_statuses(response))
    }

    /// Query OCSP responder statuses from the signer, grouped by CA.
    pub fn query_ocsp_responder_status(
        &self,
    ) -> Result<Vec<OcspResponderDiagnosticsStatus>, DiagnosticError> {
        info!("Query OCSP status");
        let diagnostics: CertificationServiceDiagnostics =
            self.client.get(&self.addresses.ocsp_responders)?;
        Ok(normalize::ocsp_responder_statuses(diagnostics))
    }

    /// Run all three queries one after another.
    ///
    /// A failing query does not prevent the others from running.
    #[must_use]
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            taken_at: Utc::now(),
            global_conf: self.query_global_conf_status(),
            timestamping: self.query_timestamping_status(),
            ocsp_responders: self.query_ocsp_responder_status(),
        }
    }
}

/// Results of querying every subsystem once.
#[derive(Debug, Clone)]
pub struct DiagnosticsSnapshot {
    pub taken_at: DateTime<Utc>,
    pub global_conf: Result<DiagnosticsStatus, DiagnosticError>,
    pub timestamping: Result<Vec<DiagnosticsStatus>, DiagnosticError>,
    pub ocsp_responders: Result<Vec<OcspResponderDiagnosticsStatus>, DiagnosticError>,
}

impl DiagnosticsSnapshot {
    /// Whether every subsystem answered.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.global_conf.is_ok() && self.timestamping.is_ok() && self.ocsp_responders.is_ok()
    }
}
