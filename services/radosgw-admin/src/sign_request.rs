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

use crate::constants::*;
use crate::Credential;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use http::request::Parts;
use http::{HeaderMap, HeaderValue};
use log::debug;
use percent_encoding::{percent_decode_str, percent_encode, utf8_percent_encode};
use radosgw_exporter_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use radosgw_exporter_core::time::{format_date, format_iso8601, now, DateTime};
use radosgw_exporter_core::{Error, Result};
use std::fmt::{self, Display, Formatter};

/// RequestSigner signs admin requests the way the gateway's S3 auth expects.
///
/// The scheme is AWS SigV4 with a fixed `us-east-1/s3` scope. Signing only
/// adds headers: `x-amz-content-sha256`, `x-amz-date`, `host` (if missing),
/// `content-type` (if missing) and `authorization`.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug, Default, Clone)]
pub struct RequestSigner {
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer using the current time for every request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Sign the request in place.
    ///
    /// `body` is the full buffered payload, it's only read.
    pub fn sign(&self, req: &mut Parts, body: &[u8], cred: &Credential) -> Result<()> {
        // Taken once, every step below uses the same instant.
        let now = self.time.unwrap_or_else(now);
        let payload_hash = hex_sha256(body);

        canonicalize_header(req, &payload_hash, now)?;
        let creq = CanonicalRequest::build(req, payload_hash)?;
        debug!("calculated canonical request: {creq}");

        // Scope: "20220313/us-east-1/s3/aws4_request"
        let scope = scope(now);
        let string_to_sign = string_to_sign(now, &scope, &hex_sha256(creq.to_string().as_bytes()));
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = generate_signing_key(cred.secret_key(), now);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization = HeaderValue::from_str(&format!(
            "{SIGN_ALGORITHM} Credential={}/{scope}, SignedHeaders={}, Signature={signature}",
            cred.access_key(),
            creq.signed_headers,
        ))
        .map_err(|e| Error::request_invalid("failed to create authorization header").with_source(e))?;
        authorization.set_sensitive(true);
        req.headers.insert(AUTHORIZATION, authorization);

        Ok(())
    }
}

/// The byte exact form of a request that gets hashed during signing.
#[derive(Debug)]
struct CanonicalRequest {
    method: String,
    uri: String,
    query: String,
    headers: Vec<(String, String)>,
    signed_headers: String,
    payload_hash: String,
}

impl CanonicalRequest {
    fn build(req: &Parts, payload_hash: String) -> Result<Self> {
        let headers = canonical_headers(&req.headers)?;
        let signed_headers = headers
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";");

        Ok(Self {
            method: req.method.to_string(),
            uri: canonical_uri(req.uri.path()),
            query: canonical_query(req.uri.query().unwrap_or_default()),
            headers,
            signed_headers,
            payload_hash,
        })
    }
}

impl Display for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.uri)?;
        writeln!(f, "{}", self.query)?;
        for (k, v) in &self.headers {
            writeln!(f, "{k}:{v}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.signed_headers)?;
        write!(f, "{}", self.payload_hash)
    }
}

fn canonicalize_header(req: &mut Parts, payload_hash: &str, now: DateTime) -> Result<()> {
    // Insert HOST header if not present.
    if req.headers.get(HOST).is_none() {
        let authority = req.uri.authority().ok_or_else(|| {
            Error::request_invalid("request without authority is invalid for signing")
        })?;
        req.headers
            .insert(HOST, HeaderValue::from_str(authority.as_str())?);
    }

    if req.headers.get(CONTENT_TYPE).is_none() {
        req.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    }

    req.headers
        .insert(X_AMZ_CONTENT_SHA_256, HeaderValue::from_str(payload_hash)?);
    // Always overwritten so the header and the scope can't disagree.
    req.headers
        .insert(X_AMZ_DATE, HeaderValue::from_str(&format_iso8601(now))?);

    Ok(())
}

/// Select, normalize and sort the headers taking part in signing.
fn canonical_headers(headers: &HeaderMap) -> Result<Vec<(String, String)>> {
    let mut signed = Vec::with_capacity(headers.keys_len());

    // Header names from http are lower-cased already.
    for name in headers.keys() {
        let name = name.as_str();
        if name != CONTENT_TYPE.as_str()
            && name != CONTENT_MD5
            && name != HOST.as_str()
            && !name.starts_with(X_AMZ_PREFIX)
        {
            continue;
        }

        let Some(value) = headers.get(name) else {
            continue;
        };
        let value = value
            .to_str()
            .map_err(|e| {
                Error::request_invalid("header value is not visible ascii")
                    .with_source(e)
                    .with_context(format!("header: {name}"))
            })?
            .trim();
        let value = if name == HOST.as_str() {
            strip_default_port(value)
        } else {
            value
        };

        signed.push((name.to_string(), value.to_string()));
    }

    signed.sort();
    Ok(signed)
}

/// The gateway signs `host` without the default http/https port.
fn strip_default_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((h, "80")) | Some((h, "443")) => h,
        _ => host,
    }
}

/// Canonical form of a request path.
///
/// The path is decoded first so that already encoded paths are not encoded twice.
pub fn canonical_uri(path: &str) -> String {
    let decoded = percent_decode_str(path).collect::<Vec<u8>>();
    let decoded = decoded.strip_prefix(b"/").unwrap_or(&decoded);

    format!("/{}", percent_encode(decoded, &AWS_URI_ENCODE_SET))
}

/// Canonical form of a raw query string.
///
/// Pairs are decoded, then re-encoded by [`encode_query`].
pub fn canonical_query(query: &str) -> String {
    let pairs = form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect::<Vec<_>>();

    encode_query(&pairs)
}

/// Encode query pairs sorted by key, spaces as `%20`.
///
/// The sort is stable: values of a repeated key keep their order. An empty
/// value still renders as `key=`.
pub fn encode_query(pairs: &[(String, String)]) -> String {
    let mut pairs = pairs.iter().collect::<Vec<_>>();
    pairs.sort_by(|(l, _), (r, _)| l.cmp(r));

    pairs
        .into_iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn scope(now: DateTime) -> String {
    format!(
        "{}/{SIGN_REGION}/{SIGN_SERVICE}/{SIGN_TERMINATOR}",
        format_date(now)
    )
}

// StringToSign:
//
// AWS4-HMAC-SHA256
// 20220313T072004Z
// 20220313/us-east-1/s3/aws4_request
// <hashed_canonical_request>
fn string_to_sign(now: DateTime, scope: &str, hashed_canonical_request: &str) -> String {
    format!(
        "{SIGN_ALGORITHM}\n{}\n{scope}\n{hashed_canonical_request}",
        format_iso8601(now)
    )
}

fn generate_signing_key(secret: &str, time: DateTime) -> Vec<u8> {
    // Sign secret
    let secret = format!("{SIGN_KEY_PREFIX}{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), SIGN_REGION.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), SIGN_SERVICE.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), SIGN_TERMINATOR.as_bytes())
}
