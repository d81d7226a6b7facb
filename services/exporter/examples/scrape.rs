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

//! Run one scrape against a live gateway and print the exposition text.
//!
//! ```shell
//! RADOSGW_ENDPOINT=http://127.0.0.1:7480 \
//! RADOSGW_ACCESS_KEY=... RADOSGW_SECRET_KEY=... \
//! cargo run -p radosgw-exporter --example scrape
//! ```

use anyhow::Result;
use radosgw_admin::Config;
use radosgw_exporter::Collector;
use radosgw_exporter_core::{Context, OsEnv};
use radosgw_exporter_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let env_ctx = Context::new().with_env(OsEnv);
    let config = Config::from_env(&env_ctx)?;
    println!("Loaded config: {config:?}");

    // The client keeps its own timeout on top of the one enforced per call.
    let ctx = env_ctx.with_http_send(ReqwestHttpSend::with_timeout(config.timeout()?)?);
    let collector = Collector::from_config(ctx, &config)?;

    match collector.poll().await {
        Ok(snapshot) => {
            println!("Poll cycle {} got {} samples\n", snapshot.cycle(), snapshot.len());
            print!("{}", snapshot.encode_text()?);
        }
        Err(e) => {
            eprintln!("Poll cycle failed: {e}");
            if let Some(body) = e.body() {
                eprintln!("Response body: {}", String::from_utf8_lossy(body));
            }
        }
    }

    Ok(())
}
