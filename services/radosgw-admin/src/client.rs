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

use crate::constants::AWS_URI_ENCODE_SET;
use crate::sign_request::encode_query;
use crate::{BucketQuery, Config, Credential, RequestSigner, UsageQuery};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use log::debug;
use percent_encoding::utf8_percent_encode;
use radosgw_exporter_core::{Context, Error, Result};
use std::sync::Arc;
use std::time::Duration;

/// A request against the admin api, relative to the admin prefix.
#[derive(Debug, Clone)]
pub struct AdminRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
}

impl AdminRequest {
    /// Create a request for `path`, like `/bucket`.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Create a GET request for `path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Append a query pair. Repeated keys are kept.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set an extra header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Method of this request.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path of this request, relative to the admin prefix.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query pairs in insertion order.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}

/// AdminClient sends signed requests to the gateway admin api.
///
/// Every call is a single attempt, the response is returned as is whatever
/// its status. Only a missing response is an error, carrying a synthetic
/// `500 Internal Server Error` status.
#[derive(Debug, Clone)]
pub struct AdminClient {
    ctx: Context,
    endpoint: String,
    prefix: String,
    timeout: Duration,
    credential: Arc<Credential>,
    signer: RequestSigner,
}

impl AdminClient {
    /// Create a new client, validating `config`.
    pub fn new(ctx: Context, config: &Config) -> Result<Self> {
        Ok(Self {
            ctx,
            endpoint: config.endpoint()?,
            prefix: config.admin_prefix(),
            timeout: config.timeout()?,
            credential: Arc::new(config.credential()?),
            signer: RequestSigner::new(),
        })
    }

    /// Replace the request signer.
    pub fn with_signer(mut self, signer: RequestSigner) -> Self {
        self.signer = signer;
        self
    }

    /// The normalized endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sign and send `req` once.
    pub async fn send(&self, req: AdminRequest) -> Result<http::Response<Bytes>> {
        let mut url = format!(
            "{}{}{}",
            self.endpoint,
            self.prefix,
            utf8_percent_encode(&req.path, &AWS_URI_ENCODE_SET)
        );
        if !req.query.is_empty() {
            url.push('?');
            url.push_str(&encode_query(&req.query));
        }

        let (mut parts, body) = http::Request::builder()
            .method(req.method)
            .uri(&url)
            .body(req.body)
            .map_err(|e| Error::from(e).with_context(format!("uri: {url}")))?
            .into_parts();
        parts.headers.extend(req.headers);

        self.signer.sign(&mut parts, &body, &self.credential)?;
        debug!("sending admin request: {} {url}", parts.method);

        let fut = self.ctx.http_send(http::Request::from_parts(parts, body));
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(resp) => resp,
            Err(_) => Err(Error::transport("request timed out")
                .with_context(format!("timeout: {:?}", self.timeout))
                .with_context(format!("uri: {url}"))),
        }
    }

    /// Fetch bucket info, the raw response is returned.
    pub async fn get_bucket(&self, query: &BucketQuery) -> Result<http::Response<Bytes>> {
        self.send(query.to_request()).await
    }

    /// Fetch usage info, the raw response is returned.
    pub async fn get_usage(&self, query: &UsageQuery) -> Result<http::Response<Bytes>> {
        self.send(query.to_request()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radosgw_exporter_core::ErrorKind;

    fn config(endpoint: &str) -> Config {
        Config {
            endpoint: Some(endpoint.to_string()),
            access_key: Some("access".to_string()),
            secret_key: Some("secret".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = AdminClient::new(Context::new(), &Config::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

        let cfg = Config {
            secret_key: None,
            ..config("http://127.0.0.1:7480")
        };
        let err = AdminClient::new(Context::new(), &cfg).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_new_normalizes_endpoint() {
        let client = AdminClient::new(Context::new(), &config("127.0.0.1:7480/")).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:7480");
    }

    #[test]
    fn test_admin_request_builder() {
        let req = AdminRequest::get("/bucket")
            .with_query("format", "json")
            .with_query("stats", "true")
            .with_body("payload");

        assert_eq!(req.method(), Method::GET);
        assert_eq!(req.path(), "/bucket");
        assert_eq!(
            req.query(),
            &[
                ("format".to_string(), "json".to_string()),
                ("stats".to_string(), "true".to_string())
            ]
        );
        assert_eq!(req.body, Bytes::from_static(b"payload"));
    }

    #[tokio::test]
    async fn test_noop_http_send_is_transport_error() {
        let client = AdminClient::new(Context::new(), &config("http://127.0.0.1:7480")).unwrap();
        let err = client.send(AdminRequest::get("/bucket")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.status(), Some(http::StatusCode::INTERNAL_SERVER_ERROR));
    }
}
