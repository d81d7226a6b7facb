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

use crate::mapper::map_samples;
use crate::{MetricDesc, Sample, Snapshot};
use bytes::Bytes;
use http::Response;
use log::{debug, error, info, warn};
use prometheus::proto::MetricFamily;
use radosgw_admin::{AdminClient, BucketQuery, Config, UsageQuery};
use radosgw_exporter_core::{Context, Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Collector polls the gateway and publishes one snapshot per successful cycle.
///
/// Every call to [`Collector::describe`], [`Collector::collect`] or
/// [`Collector::gather`] runs a fresh poll cycle. Concurrent calls are not
/// merged: each one talks to the gateway on its own. A failed cycle leaves
/// the published snapshot as it was.
///
/// This is not a [`prometheus::core::Collector`] and can't be registered in a
/// [`prometheus::Registry`]: polling is async while the registry collects
/// synchronously. Serve scrapes by calling [`Collector::gather`] and encoding
/// the families yourself, or use [`Snapshot::encode_text`].
///
/// ```no_run
/// use prometheus::{Encoder, TextEncoder};
/// use radosgw_exporter::Collector;
///
/// async fn scrape(collector: &Collector) -> anyhow::Result<String> {
///     let families = collector.gather().await;
///     let mut buf = Vec::new();
///     TextEncoder::new().encode(&families, &mut buf)?;
///     Ok(String::from_utf8(buf)?)
/// }
/// ```
#[derive(Debug)]
pub struct Collector {
    client: AdminClient,
    published: RwLock<Arc<Snapshot>>,
    cycles: AtomicU64,
}

impl Collector {
    /// Create a new collector over `client`.
    pub fn new(client: AdminClient) -> Self {
        Self {
            client,
            published: RwLock::new(Arc::new(Snapshot::empty())),
            cycles: AtomicU64::new(0),
        }
    }

    /// Create a new collector, failing on invalid config.
    pub fn from_config(ctx: Context, config: &Config) -> Result<Self> {
        Ok(Self::new(AdminClient::new(ctx, config)?))
    }

    /// Run one poll cycle and publish its snapshot.
    ///
    /// The usage call is skipped if the bucket stats call fails.
    pub async fn poll(&self) -> Result<Arc<Snapshot>> {
        let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("poll cycle {cycle} started");

        let buckets = self
            .client
            .get_bucket(&BucketQuery::all_with_stats())
            .await
            .and_then(ensure_success)
            .map_err(|e| e.with_context("step: bucket stats"))?;
        let usage = self
            .client
            .get_usage(&UsageQuery::entries_only())
            .await
            .and_then(ensure_success)
            .map_err(|e| e.with_context("step: usage"))?;

        let samples = map_samples(buckets.body(), usage.body())?;
        let snapshot = Arc::new(Snapshot::new(cycle, samples));
        self.publish(snapshot.clone());

        Ok(snapshot)
    }

    fn publish(&self, snapshot: Arc<Snapshot>) {
        let mut published = self.published.write().expect("lock poisoned");
        // A slow cycle must not replace the result of a newer one.
        if snapshot.cycle() <= published.cycle() {
            debug!(
                "poll cycle {} finished after cycle {}, not published",
                snapshot.cycle(),
                published.cycle()
            );
            return;
        }

        info!(
            "poll cycle {} published {} samples",
            snapshot.cycle(),
            snapshot.len()
        );
        *published = snapshot;
    }

    async fn refresh(&self) -> Arc<Snapshot> {
        match self.poll().await {
            Ok(_) => {}
            Err(err) if err.is_cycle_local() => {
                warn!("poll cycle aborted, keep serving the previous snapshot: {err}")
            }
            Err(err) => error!("poll cycle failed, keep serving the previous snapshot: {err}"),
        }
        self.snapshot()
    }

    /// Poll, then list descriptors of the published snapshot.
    pub async fn describe(&self) -> Vec<MetricDesc> {
        self.refresh().await.descriptors()
    }

    /// Poll, then list samples of the published snapshot.
    pub async fn collect(&self) -> Vec<Sample> {
        self.refresh().await.samples().to_vec()
    }

    /// Poll, then return the published snapshot as gauge families.
    pub async fn gather(&self) -> Vec<MetricFamily> {
        self.refresh().await.metric_families()
    }

    /// The currently published snapshot, without polling.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.published.read().expect("lock poisoned").clone()
    }
}

/// Turn a non 2xx response into an upstream error.
fn ensure_success(resp: Response<Bytes>) -> Result<Response<Bytes>> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    Err(Error::upstream(resp.status(), resp.body().clone()))
}
