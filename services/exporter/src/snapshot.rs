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

use prometheus::proto::{Gauge, LabelPair, Metric, MetricFamily, MetricType};
use prometheus::{Encoder, TextEncoder};
use radosgw_exporter_core::{Error, Result};
use std::collections::BTreeMap;

/// Namespace of every exported metric.
pub const NAMESPACE: &str = "radosgw";

const STAT_LABELS: &[&str] = &["user", "bucket"];
const USAGE_LABELS: &[&str] = &["user", "bucket", "api"];

/// The metrics this exporter knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricKind {
    /// Objects stored in a bucket.
    NumObjects,
    /// Bytes stored in a bucket.
    Capacity,
    /// Bytes sent per api category.
    BytesSent,
    /// Bytes received per api category.
    BytesRecv,
    /// Operations per api category.
    Ops,
    /// Successful operations per api category.
    OpsOk,
}

impl MetricKind {
    /// All kinds, in exposition order.
    pub const ALL: [MetricKind; 6] = [
        MetricKind::NumObjects,
        MetricKind::Capacity,
        MetricKind::BytesSent,
        MetricKind::BytesRecv,
        MetricKind::Ops,
        MetricKind::OpsOk,
    ];

    /// Name without namespace.
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::NumObjects => "num_objects",
            MetricKind::Capacity => "capacity",
            MetricKind::BytesSent => "bytes_sent_total",
            MetricKind::BytesRecv => "bytes_recv_total",
            MetricKind::Ops => "ops_total",
            MetricKind::OpsOk => "ops_ok_total",
        }
    }

    /// Fully qualified name, like `radosgw_num_objects`.
    pub fn fq_name(&self) -> String {
        format!("{NAMESPACE}_{}", self.name())
    }

    pub fn help(&self) -> &'static str {
        match self {
            MetricKind::NumObjects => "total object number",
            MetricKind::Capacity => "current disk space usage of all objects",
            MetricKind::BytesSent => "currently total sent throughput",
            MetricKind::BytesRecv => "currently total recv throughput",
            MetricKind::Ops => "currently total ops",
            MetricKind::OpsOk => "currently total ops ok",
        }
    }

    /// Label keys, in the order sample labels are stored.
    pub fn label_names(&self) -> &'static [&'static str] {
        if self.is_usage() {
            USAGE_LABELS
        } else {
            STAT_LABELS
        }
    }

    /// Whether this kind comes from the usage log rather than bucket stats.
    pub fn is_usage(&self) -> bool {
        !matches!(self, MetricKind::NumObjects | MetricKind::Capacity)
    }

    /// Descriptor of this kind.
    pub fn desc(&self) -> MetricDesc {
        MetricDesc {
            fq_name: self.fq_name(),
            help: self.help(),
            label_names: self.label_names(),
        }
    }
}

/// Descriptor of one exported metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDesc {
    pub fq_name: String,
    pub help: &'static str,
    pub label_names: &'static [&'static str],
}

/// One labelled value.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub metric: MetricKind,
    /// Values matching `metric.label_names()`.
    pub labels: Vec<String>,
    pub value: f64,
}

impl Sample {
    /// Create a new sample.
    pub fn new(metric: MetricKind, labels: Vec<String>, value: f64) -> Self {
        debug_assert_eq!(labels.len(), metric.label_names().len());
        Self {
            metric,
            labels,
            value,
        }
    }

    /// Value of label `name`, if this metric has it.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.metric
            .label_names()
            .iter()
            .position(|v| *v == name)
            .and_then(|idx| self.labels.get(idx))
            .map(|v| v.as_str())
    }
}

/// All samples of one poll cycle.
///
/// A snapshot is never modified after it is built. Label sets are unique:
/// usage samples sharing labels are summed, a later stat sample replaces an
/// earlier one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    cycle: u64,
    samples: Vec<Sample>,
}

impl Snapshot {
    /// The snapshot published before any cycle succeeded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the snapshot of `cycle` out of `samples`.
    pub fn new(cycle: u64, samples: impl IntoIterator<Item = Sample>) -> Self {
        let mut merged: BTreeMap<(MetricKind, Vec<String>), f64> = BTreeMap::new();
        for sample in samples {
            let value = merged.entry((sample.metric, sample.labels)).or_insert(0.0);
            if sample.metric.is_usage() {
                *value += sample.value;
            } else {
                *value = sample.value;
            }
        }

        Self {
            cycle,
            samples: merged
                .into_iter()
                .map(|((metric, labels), value)| Sample {
                    metric,
                    labels,
                    value,
                })
                .collect(),
        }
    }

    /// Poll cycle this snapshot was built by, `0` for the empty snapshot.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Samples sorted by metric then labels.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Look up the value of `metric` with exactly `labels`.
    pub fn get(&self, metric: MetricKind, labels: &[&str]) -> Option<f64> {
        self.samples
            .iter()
            .find(|s| s.metric == metric && s.labels.iter().map(|v| v.as_str()).eq(labels.iter().copied()))
            .map(|s| s.value)
    }

    /// Descriptors of the metrics present in this snapshot.
    pub fn descriptors(&self) -> Vec<MetricDesc> {
        MetricKind::ALL
            .iter()
            .filter(|kind| self.samples.iter().any(|s| s.metric == **kind))
            .map(|kind| kind.desc())
            .collect()
    }

    /// Gauge families of this snapshot, empty families are left out.
    pub fn metric_families(&self) -> Vec<MetricFamily> {
        let mut families = Vec::new();

        for kind in MetricKind::ALL {
            let mut family = MetricFamily::default();
            family.set_name(kind.fq_name());
            family.set_help(kind.help().to_string());
            family.set_field_type(MetricType::GAUGE);

            for sample in self.samples.iter().filter(|s| s.metric == kind) {
                let labels: Vec<LabelPair> = kind
                    .label_names()
                    .iter()
                    .zip(&sample.labels)
                    .map(|(name, value)| {
                        let mut pair = LabelPair::default();
                        pair.set_name(name.to_string());
                        pair.set_value(value.clone());
                        pair
                    })
                    .collect();
                let mut metric = Metric::default();
                metric.set_label(labels);
                let mut gauge = Gauge::default();
                gauge.set_value(sample.value);
                metric.set_gauge(gauge);
                family.mut_metric().push(metric);
            }

            if !family.get_metric().is_empty() {
                families.push(family);
            }
        }

        families
    }

    /// Render the text exposition format.
    pub fn encode_text(&self) -> Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.metric_families(), &mut buf)
            .map_err(|e| Error::unexpected(format!("failed to encode metrics: {e}")))?;

        String::from_utf8(buf).map_err(|e| {
            Error::unexpected("encoded metrics are not valid utf-8").with_source(e)
        })
    }
}
