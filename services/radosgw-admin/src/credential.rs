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

use radosgw_exporter_core::utils::Redact;
use radosgw_exporter_core::{Error, Result};
use std::fmt::{Debug, Formatter};

/// Credential of the gateway admin user.
///
/// Created once at startup and only read afterwards.
#[derive(Clone)]
pub struct Credential {
    access_key: String,
    secret_key: String,
}

impl Credential {
    /// Create a credential, rejecting keys that can't be used for signing.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        let access_key = access_key.into();
        let secret_key = secret_key.into();

        if access_key.is_empty() {
            return Err(Error::config_invalid("access key must not be empty"));
        }
        if secret_key.is_empty() {
            return Err(Error::config_invalid("secret key must not be empty"));
        }
        // The access key lands in the authorization header verbatim.
        if !access_key.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(Error::config_invalid(
                "access key must only contain visible ascii characters",
            )
            .with_context(format!("access_key: {:?}", Redact::from(&access_key))));
        }

        Ok(Self {
            access_key,
            secret_key,
        })
    }

    /// Access key of the admin user.
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub(crate) fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key", &Redact::from(&self.access_key))
            .field("secret_key", &Redact::from(&self.secret_key))
            .finish()
    }
}
