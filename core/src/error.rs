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

use bytes::Bytes;
use http::StatusCode;
use std::fmt;
use thiserror::Error;

/// The error type for radosgw exporter operations.
#[derive(Error, Debug)]
#[error("{kind}: {message}{}", format_context(.context))]
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<String>,
    status: Option<StatusCode>,
    body: Option<Bytes>,
    #[source]
    source: Option<anyhow::Error>,
}

fn format_context(context: &[String]) -> String {
    if context.is_empty() {
        return String::new();
    }
    format!(" ({})", context.join(", "))
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration is missing or invalid, for example empty credentials.
    ///
    /// Fatal at startup: nothing can be constructed from an invalid config.
    ConfigInvalid,

    /// Request cannot be built or signed (invalid path, header value, etc.)
    RequestInvalid,

    /// No response was obtained: connection refused, DNS failure, timeout.
    Transport,

    /// A response was obtained but its status signals failure.
    Upstream,

    /// The response body does not match the expected JSON shape.
    Parse,

    /// Unexpected errors
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::new(),
            status: None,
            body: None,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Add a piece of context, rendered after the message.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Attach the http status related to this error.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach the raw response body related to this error.
    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the http status carried by this error.
    ///
    /// Transport errors carry a synthetic `500 Internal Server Error` since no
    /// real status was received.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Get the raw response body carried by this error, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Get the attached context.
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// Check if this error only aborts the current poll cycle.
    pub fn is_cycle_local(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Transport | ErrorKind::Upstream | ErrorKind::Parse
        )
    }

    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        self.kind == ErrorKind::ConfigInvalid
    }
}

/// Upstream body bytes kept in the message of an [`ErrorKind::Upstream`] error.
pub const UPSTREAM_BODY_LIMIT: usize = 256;

// Convenience constructors
impl Error {
    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a transport error with the synthetic internal error status.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message).with_status(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Create an upstream error from the status and body of a failed response.
    ///
    /// Only the first [`UPSTREAM_BODY_LIMIT`] bytes of the body make it into
    /// the message, the full body stays available through [`Error::body`].
    pub fn upstream(status: StatusCode, body: Bytes) -> Self {
        let shown = String::from_utf8_lossy(&body[..body.len().min(UPSTREAM_BODY_LIMIT)]);
        let message = if body.len() > UPSTREAM_BODY_LIMIT {
            format!("upstream responded {status}: {shown}... ({} bytes)", body.len())
        } else {
            format!("upstream responded {status}: {shown}")
        };
        Self::new(ErrorKind::Upstream, message)
            .with_status(status)
            .with_body(body)
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::Upstream => write!(f, "upstream error"),
            ErrorKind::Parse => write!(f, "parse error"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
