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

//! Wire and output records for the admin diagnostics endpoints.
//!
//! The remote subsystems answer with three differently shaped JSON bodies:
//! a flat [`DiagnosticsStatus`], a [`TimestampingStatusResponse`] keyed by
//! service name, and a [`CertificationServiceDiagnostics`] keyed by CA name
//! with a nested map of OCSP responders per CA. All map-shaped bodies are
//! decoded into an [`IndexMap`] so that document order survives decoding.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Status code reported by a subsystem.
///
/// Subsystems report either a numeric return code (`0` meaning success) or a
/// symbolic name such as `"SUCCESS"` or `"ERROR_CODE_EXPIRED_CONF"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusCode {
    /// Numeric return code.
    Code(i64),
    /// Symbolic status name.
    Name(String),
}

impl StatusCode {
    /// Whether the code denotes a healthy subsystem.
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Self::Code(code) => *code == 0,
            Self::Name(name) => name == "SUCCESS" || name == "OK",
        }
    }

    fn name(&self) -> Option<&str> {
        match self {
            Self::Code(_) => None,
            Self::Name(name) => Some(name),
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for StatusCode {
    fn from(code: i64) -> Self {
        Self::Code(code)
    }
}

impl From<&str> for StatusCode {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// Uniform status record produced for every subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsStatus {
    /// Status reported by the subsystem.
    #[serde(alias = "returnCode", alias = "status")]
    pub status_code: StatusCode,

    /// When the subsystem last refreshed this status.
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub prev_update: Option<DateTime<Utc>>,

    /// When the subsystem expects to refresh this status next.
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub next_update: Option<DateTime<Utc>>,

    /// Caller-assigned label: a service name or a responder URL.
    #[serde(default)]
    pub description: Option<String>,
}

impl DiagnosticsStatus {
    /// Create a status without a description.
    pub fn new(
        status_code: impl Into<StatusCode>,
        prev_update: Option<DateTime<Utc>>,
        next_update: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            status_code: status_code.into(),
            prev_update,
            next_update,
            description: None,
        }
    }

    /// Return the status labelled with `description`.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Timestamping service name to status, as returned by the proxy admin port.
pub type TimestampingStatusResponse = IndexMap<String, DiagnosticsStatus>;

/// Status of a single OCSP responder as reported by the signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcspResponderStatus {
    pub status: StatusCode,
    #[serde(default)]
    pub url: String,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub prev_update: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub next_update: Option<DateTime<Utc>>,
}

/// A certification authority and the responders that serve it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationServiceStatus {
    #[serde(default)]
    pub name: String,
    /// Responder URL to responder status.
    #[serde(default)]
    pub ocsp_responder_status_map: IndexMap<String, OcspResponderStatus>,
}

/// CA name to CA status, as returned by the signer admin port.
///
/// The signer wraps the map in a `certificationServiceStatusMap` field; a
/// bare map of CA entries is accepted as well. Once the wrapper field is
/// present its content must decode, there is no fallback to the bare form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationServiceDiagnostics {
    pub certification_service_status_map: IndexMap<String, CertificationServiceStatus>,
}

const CERTIFICATION_SERVICE_STATUS_MAP: &str = "certificationServiceStatusMap";

impl<'de> Deserialize<'de> for CertificationServiceDiagnostics {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut body = Map::deserialize(deserializer)?;
        let map = match body.remove(CERTIFICATION_SERVICE_STATUS_MAP) {
            Some(wrapped) => IndexMap::deserialize(wrapped),
            None => IndexMap::deserialize(Value::Object(body)),
        }
        .map_err(D::Error::custom)?;

        Ok(Self {
            certification_service_status_map: map,
        })
    }
}

/// Responder statuses of one certification authority, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcspResponderDiagnosticsStatus {
    pub ca_name: String,
    /// One entry per responder, each described by the responder URL.
    pub ocsp_responder_status_map: Vec<DiagnosticsStatus>,
}

impl OcspResponderDiagnosticsStatus {
    pub fn new(ca_name: impl Into<String>) -> Self {
        Self {
            ca_name: ca_name.into(),
            ocsp_responder_status_map: Vec::new(),
        }
    }
}

/// Global configuration status as shown to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigurationStatus {
    Success,
    ErrorCodeInternal,
    ErrorCodeInvalidSignatureValue,
    ErrorCodeExpiredConf,
    ErrorCodeCannotDownloadConf,
    ErrorCodeMissingPrivateParams,
    ErrorCodeUninitialized,
    Unknown,
}

impl ConfigurationStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::ErrorCodeInternal => "ERROR_CODE_INTERNAL",
            Self::ErrorCodeInvalidSignatureValue => "ERROR_CODE_INVALID_SIGNATURE_VALUE",
            Self::ErrorCodeExpiredConf => "ERROR_CODE_EXPIRED_CONF",
            Self::ErrorCodeCannotDownloadConf => "ERROR_CODE_CANNOT_DOWNLOAD_CONF",
            Self::ErrorCodeMissingPrivateParams => "ERROR_CODE_MISSING_PRIVATE_PARAMS",
            Self::ErrorCodeUninitialized => "ERROR_CODE_UNINITIALIZED",
            Self::Unknown => "UNKNOWN",
        }
    }

    fn from_name(name: &str) -> Self {
        match name {
            "ERROR_CODE_INTERNAL" => Self::ErrorCodeInternal,
            "ERROR_CODE_INVALID_SIGNATURE_VALUE" => Self::ErrorCodeInvalidSignatureValue,
            "ERROR_CODE_EXPIRED_CONF" => Self::ErrorCodeExpiredConf,
            "ERROR_CODE_CANNOT_DOWNLOAD_CONF" => Self::ErrorCodeCannotDownloadConf,
            "ERROR_CODE_MISSING_PRIVATE_PARAMS" => Self::ErrorCodeMissingPrivateParams,
            "ERROR_CODE_UNINITIALIZED" => Self::ErrorCodeUninitialized,
            _ => Self::Unknown,
        }
    }
}

impl From<&StatusCode> for ConfigurationStatus {
    fn from(code: &StatusCode) -> Self {
        if code.is_success() {
            return Self::Success;
        }
        code.name().map_or(Self::Unknown, Self::from_name)
    }
}

impl fmt::Display for ConfigurationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OCSP responder status as shown to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OcspStatus {
    Success,
    ErrorCodeOcspConnectionError,
    ErrorCodeOcspFailed,
    ErrorCodeOcspResponseInvalid,
    ErrorCodeOcspUninitialized,
    ErrorCodeOcspResponseUnverified,
    Unknown,
}

impl OcspStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::ErrorCodeOcspConnectionError => "ERROR_CODE_OCSP_CONNECTION_ERROR",
            Self::ErrorCodeOcspFailed => "ERROR_CODE_OCSP_FAILED",
            Self::ErrorCodeOcspResponseInvalid => "ERROR_CODE_OCSP_RESPONSE_INVALID",
            Self::ErrorCodeOcspUninitialized => "ERROR_CODE_OCSP_UNINITIALIZED",
            Self::ErrorCodeOcspResponseUnverified => "ERROR_CODE_OCSP_RESPONSE_UNVERIFIED",
            Self::Unknown => "UNKNOWN",
        }
    }

    fn from_name(name: &str) -> Self {
        match name {
            "ERROR_CODE_OCSP_CONNECTION_ERROR" => Self::ErrorCodeOcspConnectionError,
            "ERROR_CODE_OCSP_FAILED" => Self::ErrorCodeOcspFailed,
            "ERROR_CODE_OCSP_RESPONSE_INVALID" => Self::ErrorCodeOcspResponseInvalid,
            "ERROR_CODE_OCSP_UNINITIALIZED" => Self::ErrorCodeOcspUninitialized,
            "ERROR_CODE_OCSP_RESPONSE_UNVERIFIED" => Self::ErrorCodeOcspResponseUnverified,
            _ => Self::Unknown,
        }
    }
}

impl From<&StatusCode> for OcspStatus {
    fn from(code: &StatusCode) -> Self {
        if code.is_success() {
            return Self::Success;
        }
        code.name().map_or(Self::Unknown, Self::from_name)
    }
}

impl fmt::Display for OcspStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timestamp decoding for the Java admin endpoints.
///
/// Accepts RFC 3339 values and offset-less local date-times, which are
/// taken as UTC.
mod timestamp {
    use super::{DateTime, Deserialize, Deserializer, NaiveDateTime, Utc};
    use serde::de::Error as _;

    const LOCAL_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub(super) fn parse(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        if let Ok(time) = DateTime::parse_from_rfc3339(text) {
            return Ok(time.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(text, LOCAL_DATE_TIME).map(|local| local.and_utc())
    }

    pub(super) fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|text| parse(&text).map_err(D::Error::custom))
            .transpose()
    }
}
