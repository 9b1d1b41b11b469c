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

//! Construction-time resolution of admin endpoint addresses.
//!
//! Each subsystem is configured with a URL template holding a single port
//! placeholder (`%d`, `%s` or `{port}`). Templates are resolved once when the
//! service is built; a bad template is a configuration error and never shows
//! up as a failed diagnostics query.

use reqwest::Url;

use crate::error::ConfigError;
use crate::DiagnosticsConfig;

const PORT_PLACEHOLDERS: [&str; 3] = ["%d", "%s", "{port}"];

/// Substitute `port` into `template` and validate the result.
pub fn resolve_address(template: &str, port: u16) -> Result<Url, ConfigError> {
    let mut found = PORT_PLACEHOLDERS
        .iter()
        .copied()
        .flat_map(|placeholder| template.matches(placeholder));

    let placeholder = found
        .next()
        .ok_or_else(|| ConfigError::MissingPlaceholder(template.to_string()))?;
    if found.next().is_some() {
        return Err(ConfigError::AmbiguousPlaceholder(template.to_string()));
    }

    let address = template.replacen(placeholder, &port.to_string(), 1);
    let url = Url::parse(&address).map_err(|e| ConfigError::InvalidUrl {
        address: address.clone(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::UnsupportedScheme {
            scheme: scheme.to_string(),
            address,
        }),
    }
}

/// Resolved admin endpoint of each subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticAddresses {
    /// Configuration client admin endpoint.
    pub global_conf: Url,
    /// Proxy admin endpoint reporting timestamping services.
    pub timestamping: Url,
    /// Signer admin endpoint reporting OCSP responders.
    pub ocsp_responders: Url,
}

impl DiagnosticAddresses {
    pub fn resolve(config: &DiagnosticsConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            global_conf: resolve_address(&config.global_conf_url, config.global_conf_port)?,
            timestamping: resolve_address(&config.timestamping_url, config.timestamping_port)?,
            ocsp_responders: resolve_address(
                &config.ocsp_responders_url,
                config.ocsp_responders_port,
            )?,
        })
    }
}
