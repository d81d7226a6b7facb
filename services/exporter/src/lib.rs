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

//! Export RADOS gateway usage and capacity statistics as gauges.
//!
//! ```no_run
//! use radosgw_admin::Config;
//! use radosgw_exporter::Collector;
//! use radosgw_exporter_core::{Context, OsEnv};
//!
//! # async fn example() -> radosgw_exporter_core::Result<()> {
//! # let http_send = radosgw_exporter_core::NoopHttpSend;
//! let ctx = Context::new().with_env(OsEnv).with_http_send(http_send);
//! let collector = Collector::from_config(ctx.clone(), &Config::from_env(&ctx)?)?;
//!
//! collector.collect().await;
//! println!("{}", collector.snapshot().encode_text()?);
//! # Ok(())
//! # }
//! ```

mod collector;
pub use collector::Collector;

pub mod mapper;

mod snapshot;
pub use snapshot::{MetricDesc, MetricKind, Sample, Snapshot, NAMESPACE};
