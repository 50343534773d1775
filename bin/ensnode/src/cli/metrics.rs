// This file is part of ENSNode.
//
// ENSNode is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// ENSNode is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with ENSNode.
// If not, see https://www.gnu.org/licenses/.

use std::{net::SocketAddr, time::Duration};

use metrics_exporter_prometheus::PrometheusBuilder;
use metrics_process::Collector;
use metrics_util::layers::{PrefixLayer, Stack};

/// Install the prometheus recorder and serve it on `listen_addr`
pub fn initialize<'a>(
    listen_addr: SocketAddr,
    tags: impl IntoIterator<Item = &'a String>,
    sample_interval: Duration,
) -> anyhow::Result<()> {
    let mut builder = PrometheusBuilder::new().with_http_listener(listen_addr);

    for (k, v) in tags.into_iter().filter_map(|t| t.split_once('=')) {
        builder = builder.add_global_label(k, v);
    }

    let (recorder, exporter) = builder.build()?;
    tokio::spawn(async move {
        if exporter.await.is_err() {
            tracing::error!("metrics exporter failed");
        }
    });
    Stack::new(recorder)
        .push(PrefixLayer::new("ensnode"))
        .install()?;

    tokio::spawn(async move {
        let collector = Collector::default();
        collector.describe();
        loop {
            collector.collect();
            tokio::time::sleep(sample_interval).await;
        }
    });

    Ok(())
}
