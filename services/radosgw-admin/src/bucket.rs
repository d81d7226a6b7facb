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

use crate::AdminRequest;
use radosgw_exporter_core::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// Parameters of `GET <prefix>/bucket`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketQuery {
    /// Only return this bucket.
    pub bucket: Option<String>,
    /// Only return buckets owned by this user.
    pub uid: Option<String>,
    /// Return full stat objects instead of bare names.
    pub stats: bool,
}

impl BucketQuery {
    /// All buckets of all users, with stats.
    pub fn all_with_stats() -> Self {
        Self {
            stats: true,
            ..Default::default()
        }
    }

    /// Build the admin request for this query.
    pub fn to_request(&self) -> AdminRequest {
        let mut req = AdminRequest::get("/bucket").with_query("format", "json");
        if let Some(bucket) = &self.bucket {
            req = req.with_query("bucket", bucket);
        }
        if let Some(uid) = &self.uid {
            req = req.with_query("uid", uid);
        }
        req.with_query("stats", self.stats.to_string())
    }
}

/// One element of a bucket list response.
#[derive(Debug, Clone, PartialEq)]
pub enum BucketEntry {
    /// Bare bucket name, returned when stats were not requested.
    Name(String),
    /// Full stat object.
    Stats(Box<BucketStats>),
}

impl BucketEntry {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(name) => Ok(BucketEntry::Name(name)),
            obj @ Value::Object(_) => Ok(BucketEntry::Stats(Box::new(serde_json::from_value(obj)?))),
            other => Err(Error::parse(format!(
                "bucket entry must be a name or an object, got {}",
                json_type(&other)
            ))),
        }
    }
}

/// Stats of one bucket.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BucketStats {
    pub bucket: String,
    pub owner: String,
    pub zonegroup: String,
    pub placement_rule: String,
    pub id: String,
    pub marker: String,
    pub index_pool: String,
    pub ver: String,
    pub master_ver: String,
    pub mtime: String,
    pub max_marker: String,
    pub usage: BucketUsage,
    pub bucket_quota: Quota,
}

/// Usage section of bucket stats.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BucketUsage {
    /// Absent for empty buckets.
    #[serde(rename = "rgw.main")]
    pub rgw_main: Option<RgwMainUsage>,
}

/// Usage of the main storage class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RgwMainUsage {
    pub num_objects: i64,
    pub size: i64,
    pub size_actual: i64,
}

/// Quota settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Quota {
    pub enabled: bool,
    pub max_objects: i64,
    pub max_size: i64,
}

impl BucketStats {
    /// Object count, zero for a bucket without main usage.
    pub fn num_objects(&self) -> i64 {
        self.usage.rgw_main.map(|u| u.num_objects).unwrap_or_default()
    }

    /// Size in bytes, zero for a bucket without main usage.
    pub fn size(&self) -> i64 {
        self.usage.rgw_main.map(|u| u.size).unwrap_or_default()
    }
}

/// Parse a bucket list response.
///
/// The top level is either an array, whose elements are names or stat
/// objects, or a single stat object.
pub fn parse_bucket_list(body: &[u8]) -> Result<Vec<BucketEntry>> {
    let value: Value = serde_json::from_slice(body)?;

    match value {
        Value::Array(items) => items.into_iter().map(BucketEntry::from_value).collect(),
        obj @ Value::Object(_) => Ok(vec![BucketEntry::from_value(obj)?]),
        other => Err(Error::parse(format!(
            "bucket list must be an array or an object, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
