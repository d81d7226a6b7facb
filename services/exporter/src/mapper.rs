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

//! Flatten admin api responses into samples.

use crate::{MetricKind, Sample};
use radosgw_admin::{parse_bucket_list, parse_usage, BucketEntry, Usage};
use radosgw_exporter_core::Result;

/// Map the raw bucket stats and usage bodies of one cycle into samples.
pub fn map_samples(bucket_body: &[u8], usage_body: &[u8]) -> Result<Vec<Sample>> {
    let buckets = parse_bucket_list(bucket_body)
        .map_err(|e| e.with_context("response: bucket stats"))?;
    let usage = parse_usage(usage_body).map_err(|e| e.with_context("response: usage"))?;

    let mut samples = bucket_samples(&buckets);
    samples.extend(usage_samples(&usage));
    Ok(samples)
}

/// Two samples per stat object, bare names yield nothing.
pub fn bucket_samples(entries: &[BucketEntry]) -> Vec<Sample> {
    let mut samples = Vec::with_capacity(entries.len() * 2);

    for entry in entries {
        let BucketEntry::Stats(stats) = entry else {
            continue;
        };
        let labels = vec![stats.owner.clone(), stats.bucket.clone()];

        samples.push(Sample::new(
            MetricKind::NumObjects,
            labels.clone(),
            stats.num_objects() as f64,
        ));
        samples.push(Sample::new(
            MetricKind::Capacity,
            labels,
            stats.size() as f64,
        ));
    }

    samples
}

/// Four samples per `(user, bucket, category)` leaf.
pub fn usage_samples(usage: &Usage) -> Vec<Sample> {
    let mut samples = Vec::new();

    for entry in &usage.entries {
        for bucket in &entry.buckets {
            for category in &bucket.categories {
                let labels = vec![
                    entry.user.clone(),
                    bucket.bucket.clone(),
                    category.category.clone(),
                ];

                for (metric, value) in [
                    (MetricKind::BytesSent, category.bytes_sent),
                    (MetricKind::BytesRecv, category.bytes_received),
                    (MetricKind::Ops, category.ops),
                    (MetricKind::OpsOk, category.successful_ops),
                ] {
                    samples.push(Sample::new(metric, labels.clone(), value as f64));
                }
            }
        }
    }

    samples
}
