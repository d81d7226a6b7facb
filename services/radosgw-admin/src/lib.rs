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

//! Client for the RADOS gateway admin api.
//!
//! Requests are signed with the gateway's S3 style SigV4 scheme and sent
//! once through the [`radosgw_exporter_core::HttpSend`] of a `Context`.
//!
//! ```no_run
//! use radosgw_admin::{AdminClient, BucketQuery, Config};
//! use radosgw_exporter_core::{Context, OsEnv};
//!
//! # async fn example() -> radosgw_exporter_core::Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let config = Config::from_env(&ctx)?;
//! let client = AdminClient::new(ctx, &config)?;
//!
//! let resp = client.get_bucket(&BucketQuery::all_with_stats()).await?;
//! let buckets = radosgw_admin::parse_bucket_list(resp.body())?;
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::{DEFAULT_ADMIN_PREFIX, DEFAULT_TIMEOUT};

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::{canonical_query, canonical_uri, encode_query, RequestSigner};

mod client;
pub use client::{AdminClient, AdminRequest};

mod bucket;
pub use bucket::{
    parse_bucket_list, BucketEntry, BucketQuery, BucketStats, BucketUsage, Quota, RgwMainUsage,
};

mod usage;
pub use usage::{
    parse_usage, Usage, UsageBucket, UsageCategory, UsageEntry, UsageQuery, UsageSummary,
    UsageTotal,
};
