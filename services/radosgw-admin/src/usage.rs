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
use radosgw_exporter_core::time::{format_admin, DateTime};
use radosgw_exporter_core::Result;
use serde::Deserialize;

/// Parameters of `GET <prefix>/usage`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageQuery {
    /// Only return usage of this user.
    pub uid: Option<String>,
    /// Inclusive start of the usage window.
    pub start: Option<DateTime>,
    /// Exclusive end of the usage window.
    pub end: Option<DateTime>,
    /// Return per bucket entries.
    pub show_entries: bool,
    /// Return per user summaries.
    pub show_summary: bool,
}

impl UsageQuery {
    /// All users, entries only, over the whole retained window.
    pub fn entries_only() -> Self {
        Self {
            show_entries: true,
            ..Default::default()
        }
    }

    /// Build the admin request for this query.
    pub fn to_request(&self) -> AdminRequest {
        let mut req = AdminRequest::get("/usage").with_query("format", "json");
        if let Some(uid) = &self.uid {
            req = req.with_query("uid", uid);
        }
        if let Some(start) = self.start {
            req = req.with_query("start", format_admin(start));
        }
        if let Some(end) = self.end {
            req = req.with_query("end", format_admin(end));
        }
        req.with_query("show-entries", self.show_entries.to_string())
            .with_query("show-summary", self.show_summary.to_string())
    }
}

/// Usage response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub entries: Vec<UsageEntry>,
    pub summary: Vec<UsageSummary>,
}

/// Usage of one user.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UsageEntry {
    pub user: String,
    pub buckets: Vec<UsageBucket>,
}

/// Usage of one bucket during one period.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UsageBucket {
    pub bucket: String,
    pub time: String,
    pub epoch: i64,
    pub owner: String,
    pub categories: Vec<UsageCategory>,
}

/// Counters of one api category, like `get_obj`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UsageCategory {
    pub category: String,
    pub bytes_sent: i64,
    pub bytes_received: i64,
    pub ops: i64,
    pub successful_ops: i64,
}

/// Usage summary of one user.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UsageSummary {
    pub user: String,
    pub categories: Vec<UsageCategory>,
    pub total: UsageTotal,
}

/// Counters summed over all categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UsageTotal {
    pub bytes_sent: i64,
    pub bytes_received: i64,
    pub ops: i64,
    pub successful_ops: i64,
}

/// Parse a usage response.
pub fn parse_usage(body: &[u8]) -> Result<Usage> {
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use radosgw_exporter_core::ErrorKind;

    #[test]
    fn test_entries_only_query() {
        let req = UsageQuery::entries_only().to_request();
        assert_eq!(req.path(), "/usage");
        assert_eq!(
            req.query(),
            &[
                ("format".to_string(), "json".to_string()),
                ("show-entries".to_string(), "true".to_string()),
                ("show-summary".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_window_query() {
        let req = UsageQuery {
            uid: Some("alice".to_string()),
            start: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            end: Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
            show_entries: false,
            show_summary: true,
        }
        .to_request();

        assert_eq!(
            req.query(),
            &[
                ("format".to_string(), "json".to_string()),
                ("uid".to_string(), "alice".to_string()),
                ("start".to_string(), "2024-01-01 00:00:00".to_string()),
                ("end".to_string(), "2024-02-01 00:00:00".to_string()),
                ("show-entries".to_string(), "false".to_string()),
                ("show-summary".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_usage() {
        let body = br#"{
            "entries": [{
                "user": "alice",
                "buckets": [{
                    "bucket": "photos",
                    "time": "2024-01-15 12:00:00.000000Z",
                    "epoch": 1705320000,
                    "owner": "alice",
                    "categories": [
                        {"category": "get_obj", "bytes_sent": 500, "bytes_received": 0, "ops": 3, "successful_ops": 3},
                        {"category": "put_obj", "bytes_sent": 0, "bytes_received": 2048, "ops": 1, "successful_ops": 1}
                    ]
                }]
            }],
            "summary": [{
                "user": "alice",
                "categories": [],
                "total": {"bytes_sent": 500, "bytes_received": 2048, "ops": 4, "successful_ops": 4}
            }]
        }"#;
        let usage = parse_usage(body).unwrap();

        assert_eq!(usage.entries.len(), 1);
        let bucket = &usage.entries[0].buckets[0];
        assert_eq!(bucket.epoch, 1705320000);
        assert_eq!(
            bucket.categories[1],
            UsageCategory {
                category: "put_obj".to_string(),
                bytes_sent: 0,
                bytes_received: 2048,
                ops: 1,
                successful_ops: 1,
            }
        );
        assert_eq!(usage.summary[0].total.ops, 4);
    }

    #[test]
    fn test_parse_empty_usage() {
        assert_eq!(parse_usage(b"{}").unwrap(), Usage::default());
        assert_eq!(
            parse_usage(br#"{"entries": [], "summary": []}"#).unwrap(),
            Usage::default()
        );
    }

    #[test]
    fn test_parse_invalid_usage() {
        assert_eq!(parse_usage(b"<html>").unwrap_err().kind(), ErrorKind::Parse);
        assert_eq!(parse_usage(br#""usage""#).unwrap_err().kind(), ErrorKind::Parse);
        assert_eq!(
            parse_usage(br#"{"entries": {"user": "alice"}}"#)
                .unwrap_err()
                .kind(),
            ErrorKind::Parse
        );
    }
}
