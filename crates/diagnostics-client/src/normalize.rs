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

//! Reshaping of subsystem payloads into uniform status records.

use crate::model::{
    CertificationServiceDiagnostics, CertificationServiceStatus, DiagnosticsStatus,
    OcspResponderDiagnosticsStatus, TimestampingStatusResponse,
};

/// One status per timestamping service, described by the service name.
#[must_use]
pub fn timestamping_statuses(response: TimestampingStatusResponse) -> Vec<DiagnosticsStatus> {
    response
        .into_iter()
        .map(|(name, status)| status.with_description(name))
        .collect()
}

/// One record per certification authority, each listing its responders.
#[must_use]
pub fn ocsp_responder_statuses(
    diagnostics: CertificationServiceDiagnostics,
) -> Vec<OcspResponderDiagnosticsStatus> {
    diagnostics
        .certification_service_status_map
        .into_iter()
        .map(|(key, ca)| ca_responder_statuses(key, ca))
        .collect()
}

fn ca_responder_statuses(key: String, ca: CertificationServiceStatus) -> OcspResponderDiagnosticsStatus {
    // Fall back to the map keys when the signer leaves names out.
    let ca_name = if ca.name.is_empty() { key } else { ca.name };

    let mut status = OcspResponderDiagnosticsStatus::new(ca_name);
    status.ocsp_responder_status_map = ca
        .ocsp_responder_status_map
        .into_iter()
        .map(|(url_key, responder)| {
            let url = if responder.url.is_empty() { url_key } else { responder.url };
            DiagnosticsStatus::new(responder.status, responder.prev_update, responder.next_update)
                .with_description(url)
        })
        .collect();
    status
}
