// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Reqwest-based `HttpSend` for the radosgw exporter.
//!
//! One `ReqwestHttpSend` wraps one `reqwest::Client`, so every admin call
//! shares the same connection pool for the lifetime of the process.
//!
//! ```no_run
//! use radosgw_exporter_core::Context;
//! use radosgw_exporter_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! # fn example() -> anyhow::Result<()> {
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::with_timeout(Duration::from_secs(300))?);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use log::debug;
use radosgw_exporter_core::{Error, HttpSend, Result};
use reqwest::{Client, Request};
use std::time::Duration;

/// HttpSend implementation over a shared reqwest client.
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a new ReqwestHttpSend whose client gives up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let uri = req.uri().to_string();
        let req = Request::try_from(req).map_err(|e| {
            Error::request_invalid("failed to convert request")
                .with_source(e)
                .with_context(format!("uri: {uri}"))
        })?;

        let resp = self.client.execute(req).await.map_err(|e| {
            let message = if e.is_timeout() {
                "request timed out"
            } else {
                "failed to send request"
            };
            Error::transport(message)
                .with_source(e)
                .with_context(format!("uri: {uri}"))
        })?;
        let resp: http::Response<_> = resp.into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| {
                Error::transport("failed to read response body")
                    .with_source(e)
                    .with_context(format!("uri: {uri}"))
            })?;
        debug!("{uri} responded {} with {} bytes", parts.status, bs.len());

        Ok(http::Response::from_parts(parts, bs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radosgw_exporter_core::{Context, ErrorKind};

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let send = ReqwestHttpSend::with_timeout(Duration::from_secs(5)).unwrap();
        let ctx = Context::new().with_http_send(send);

        // Port 9 (discard) is closed on any sane test host.
        let req = http::Request::get("http://127.0.0.1:9/admin/bucket?format=json")
            .body(Bytes::new())
            .unwrap();
        let err = ctx.http_send(req).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(
            err.status(),
            Some(http::StatusCode::INTERNAL_SERVER_ERROR)
        );
    }
}
