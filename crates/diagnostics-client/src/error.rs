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

//! Error types for diagnostics queries and service construction.

use thiserror::Error;

/// Code attached to every failed diagnostics query.
pub const ERROR_DIAGNOSTIC_REQUEST_FAILED: &str = "diagnostic_request_failed";

/// A diagnostics request did not produce a usable body.
///
/// Covers every failure at the transport boundary: connection refused,
/// timeouts, error statuses, empty bodies and undecodable bodies. The
/// underlying cause is logged where it happens and deliberately not carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("diagnostic request failed")]
pub struct DiagnosticRequestFailed;

/// Error returned by the diagnostics query operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticError {
    #[error("diagnostic request failed ({})", ERROR_DIAGNOSTIC_REQUEST_FAILED)]
    RequestFailed(#[from] DiagnosticRequestFailed),
}

impl DiagnosticError {
    /// Fixed error code for display and API responses.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::RequestFailed(_) => ERROR_DIAGNOSTIC_REQUEST_FAILED,
        }
    }
}

/// Errors raised while building a [`crate::DiagnosticService`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("url template '{0}' has no port placeholder")]
    MissingPlaceholder(String),

    #[error("url template '{0}' has more than one port placeholder")]
    AmbiguousPlaceholder(String),

    #[error("invalid diagnostics address '{address}': {reason}")]
    InvalidUrl { address: String, reason: String },

    #[error("unsupported scheme '{scheme}' in diagnostics address '{address}'")]
    UnsupportedScheme { address: String, scheme: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
