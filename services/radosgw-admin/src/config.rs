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
use http::uri::Scheme;
use http::Uri;
use radosgw_exporter_core::utils::Redact;
use radosgw_exporter_core::{Context, Error, Result};
use std::fmt::{Debug, Formatter};
use std::time::Duration;

/// Config for the gateway admin client.
#[derive(Clone, Default)]
pub struct Config {
    /// Endpoint of the gateway, like `http://127.0.0.1:7480` or `127.0.0.1:7480`.
    pub endpoint: Option<String>,
    /// Access key of the admin user.
    pub access_key: Option<String>,
    /// Secret key of the admin user.
    pub secret_key: Option<String>,
    /// Path prefix of the admin api, defaults to `/admin`.
    pub admin_prefix: Option<String>,
    /// Timeout of every admin request, defaults to 300s.
    pub timeout: Option<Duration>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("access_key", &Redact::from(&self.access_key))
            .field("secret_key", &Redact::from(&self.secret_key))
            .field("admin_prefix", &self.admin_prefix)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Load config from environment variables.
    pub fn from_env(ctx: &Context) -> Result<Self> {
        let timeout = match ctx.env_var(RADOSGW_TIMEOUT) {
            None => None,
            Some(v) => {
                let secs = v.trim().parse::<u64>().map_err(|e| {
                    Error::config_invalid("timeout must be a number of seconds")
                        .with_source(e)
                        .with_context(format!("env: {RADOSGW_TIMEOUT}={v}"))
                })?;
                if secs == 0 {
                    return Err(Error::config_invalid("timeout must not be zero")
                        .with_context(format!("env: {RADOSGW_TIMEOUT}={v}")));
                }
                Some(Duration::from_secs(secs))
            }
        };

        Ok(Self {
            endpoint: ctx.env_var(RADOSGW_ENDPOINT),
            access_key: ctx.env_var(RADOSGW_ACCESS_KEY),
            secret_key: ctx.env_var(RADOSGW_SECRET_KEY),
            admin_prefix: ctx.env_var(RADOSGW_ADMIN_PREFIX),
            timeout,
        })
    }

    /// Check that a client can be built from this config.
    pub fn validate(&self) -> Result<()> {
        self.endpoint()?;
        self.credential()?;
        self.timeout()?;
        Ok(())
    }

    /// Build the credential out of this config.
    pub fn credential(&self) -> Result<Credential> {
        Credential::new(
            self.access_key.clone().unwrap_or_default(),
            self.secret_key.clone().unwrap_or_default(),
        )
        .map_err(|e| e.with_context(format!("env: {RADOSGW_ACCESS_KEY}, {RADOSGW_SECRET_KEY}")))
    }

    /// Normalized endpoint: scheme and authority, no trailing `/`.
    pub fn endpoint(&self) -> Result<String> {
        let raw = self.endpoint.as_deref().unwrap_or_default().trim();
        if raw.is_empty() {
            return Err(Error::config_invalid("endpoint must not be empty")
                .with_context(format!("env: {RADOSGW_ENDPOINT}")));
        }

        let raw = raw.trim_end_matches('/');
        let endpoint = if raw.contains("://") {
            raw.to_string()
        } else {
            format!("http://{raw}")
        };

        let uri: Uri = endpoint.parse().map_err(|e| {
            Error::config_invalid("endpoint is not a valid uri")
                .with_source(e)
                .with_context(format!("endpoint: {endpoint}"))
        })?;
        match uri.scheme() {
            Some(s) if *s == Scheme::HTTP || *s == Scheme::HTTPS => {}
            _ => {
                return Err(Error::config_invalid("endpoint scheme must be http or https")
                    .with_context(format!("endpoint: {endpoint}")))
            }
        }
        if uri.authority().is_none() {
            return Err(Error::config_invalid("endpoint must have a host")
                .with_context(format!("endpoint: {endpoint}")));
        }

        Ok(endpoint)
    }

    /// Admin prefix, always starting with `/` unless empty.
    pub fn admin_prefix(&self) -> String {
        match self.admin_prefix.as_deref().map(|v| v.trim_matches('/')) {
            None => DEFAULT_ADMIN_PREFIX.to_string(),
            Some("") => String::new(),
            Some(v) => format!("/{v}"),
        }
    }

    /// Timeout of every admin request, a zero timeout is rejected.
    pub fn timeout(&self) -> Result<Duration> {
        match self.timeout {
            None => Ok(DEFAULT_TIMEOUT),
            Some(t) if t.is_zero() => Err(Error::config_invalid("timeout must not be zero")
                .with_context(format!("env: {RADOSGW_TIMEOUT}"))),
            Some(t) => Ok(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radosgw_exporter_core::{ErrorKind, StaticEnv};
    use std::collections::HashMap;
    use test_case::test_case;

    fn ctx_with(envs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv {
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[test]
    fn test_from_env() {
        let ctx = ctx_with(&[
            (RADOSGW_ENDPOINT, "http://10.0.0.1:7480/"),
            (RADOSGW_ACCESS_KEY, "admin"),
            (RADOSGW_SECRET_KEY, "secret"),
            (RADOSGW_TIMEOUT, "30"),
        ]);
        let cfg = Config::from_env(&ctx).unwrap();

        assert_eq!(cfg.endpoint().unwrap(), "http://10.0.0.1:7480");
        assert_eq!(cfg.admin_prefix(), "/admin");
        assert_eq!(cfg.timeout().unwrap(), Duration::from_secs(30));
        assert_eq!(cfg.credential().unwrap().access_key(), "admin");
        cfg.validate().unwrap();
    }

    #[test_case("five minutes"; "not a number")]
    #[test_case("-5"; "negative")]
    #[test_case("0"; "zero")]
    #[test_case(" 0 "; "zero with spaces")]
    fn test_from_env_invalid_timeout(timeout: &str) {
        let ctx = ctx_with(&[(RADOSGW_TIMEOUT, timeout)]);
        let err = Config::from_env(&ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(err.context(), &[format!("env: {RADOSGW_TIMEOUT}={timeout}")]);
    }

    #[test]
    fn test_zero_timeout_fails_validation() {
        let cfg = Config {
            endpoint: Some("http://rgw:7480".to_string()),
            access_key: Some("admin".to_string()),
            secret_key: Some("secret".to_string()),
            timeout: Some(Duration::ZERO),
            ..Default::default()
        };
        assert!(cfg.validate().unwrap_err().is_config_error());
        assert!(cfg.timeout().unwrap_err().is_config_error());
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.admin_prefix(), "/admin");
        assert_eq!(cfg.timeout().unwrap(), Duration::from_secs(300));
        assert!(cfg.credential().unwrap_err().is_config_error());
        assert!(cfg.endpoint().unwrap_err().is_config_error());
    }

    #[test_case("127.0.0.1:8080", "http://127.0.0.1:8080"; "bare host and port")]
    #[test_case("https://rgw.example.com/", "https://rgw.example.com"; "trailing slash")]
    #[test_case("http://rgw:7480", "http://rgw:7480"; "untouched")]
    fn test_endpoint(input: &str, expected: &str) {
        let cfg = Config {
            endpoint: Some(input.to_string()),
            ..Default::default()
        };
        assert_eq!(cfg.endpoint().unwrap(), expected);
    }

    #[test_case("ftp://rgw:21"; "unsupported scheme")]
    #[test_case("   "; "blank")]
    fn test_invalid_endpoint(input: &str) {
        let cfg = Config {
            endpoint: Some(input.to_string()),
            ..Default::default()
        };
        assert!(cfg.endpoint().unwrap_err().is_config_error());
    }

    #[test_case(Some("/admin/"), "/admin"; "trailing slash")]
    #[test_case(Some("ops"), "/ops"; "missing leading slash")]
    #[test_case(Some(""), ""; "gateway root")]
    fn test_admin_prefix(input: Option<&str>, expected: &str) {
        let cfg = Config {
            admin_prefix: input.map(|v| v.to_string()),
            ..Default::default()
        };
        assert_eq!(cfg.admin_prefix(), expected);
    }

    #[test]
    fn test_debug_redacts_keys() {
        let cfg = Config {
            access_key: Some("3AZRWFYUYKRJHKJ4YI29".to_string()),
            secret_key: Some("NZnrUDMOOKnPeQQCki8ANc07FLhpCpDDK9M3ZjeX".to_string()),
            ..Default::default()
        };
        let s = format!("{cfg:?}");
        assert!(!s.contains("NZnrUDMOOKnPeQQCki8ANc07FLhpCpDDK9M3ZjeX"));
    }
}
