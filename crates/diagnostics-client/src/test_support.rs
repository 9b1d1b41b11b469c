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

//! Mock admin endpoints for exercising the client over real connections.

use std::net::TcpListener;
use std::thread;

use mockito::{Mock, Server, ServerGuard};
use reqwest::Url;

use crate::client::APPLICATION_OCTET_STREAM;

const STATUS_PATH: &str = "/status";

/// Mock admin endpoint answering `GET /status`.
pub struct AdminEndpoint {
    mock: Mock,
    _server: ServerGuard,
    pub url: Url,
}

impl AdminEndpoint {
    /// Respond like the real admin ports: JSON labelled as an octet stream.
    pub fn new(status: usize, body: &str) -> Self {
        Self::build(status, body, Some(APPLICATION_OCTET_STREAM), 1)
    }

    pub fn with_content_type(status: usize, body: &str, content_type: &str) -> Self {
        Self::build(status, body, Some(content_type), 1)
    }

    pub fn without_content_type(status: usize, body: &str) -> Self {
        Self::build(status, body, None, 1)
    }

    /// Endpoint expected to be queried exactly `hits` times.
    pub fn expecting(hits: usize, body: &str) -> Self {
        Self::build(200, body, Some(APPLICATION_OCTET_STREAM), hits)
    }

    fn build(status: usize, body: &str, content_type: Option<&str>, hits: usize) -> Self {
        let mut server = Server::new();
        let mut mock = server
            .mock("GET", STATUS_PATH)
            .with_status(status)
            .with_body(body)
            .expect(hits);
        if let Some(content_type) = content_type {
            mock = mock.with_header("content-type", content_type);
        }
        let mock = mock.create();
        let url = Url::parse(&format!("{}{STATUS_PATH}", server.url())).unwrap();

        Self {
            mock,
            _server: server,
            url,
        }
    }

    /// Check the endpoint was queried the expected number of times.
    pub fn assert(&self) {
        self.mock.assert();
    }
}

fn bind() -> (TcpListener, Url) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let url = Url::parse(&format!("http://127.0.0.1:{port}{STATUS_PATH}")).unwrap();
    (listener, url)
}

/// Accept connections and hold them open without answering.
///
/// mockito always answers, so read timeouts need a listener of their own.
pub fn silent_address() -> Url {
    let (listener, url) = bind();
    thread::spawn(move || {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept() {
            held.push(stream);
        }
    });
    url
}

/// Address on which nothing is listening.
pub fn unused_address() -> Url {
    let (listener, url) = bind();
    drop(listener);
    url
}
