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

use std::{sync::Arc, time::Duration};

use clap::Args;
use ensnode_resolution::AccelerationSettings;
use ensnode_rpc::{RpcTask, RpcTaskArgs};
use ensnode_status::{IndexingStatusHandle, RefresherSettings, StatusRefresherTask};
use ensnode_task::{spawn_tasks_with_shutdown, Task};
use ensnode_types::NamespaceSpec;

use super::CommonArgs;

#[derive(Debug, Args)]
#[command(next_help_heading = "RPC")]
pub struct RpcArgs {
    /// Port to listen on for JSON-RPC requests
    #[arg(
        long = "rpc.port",
        name = "rpc.port",
        env = "RPC_PORT",
        default_value = "3000"
    )]
    port: u16,

    /// Host to listen on for JSON-RPC requests
    #[arg(
        long = "rpc.host",
        name = "rpc.host",
        env = "RPC_HOST",
        default_value = "0.0.0.0"
    )]
    host: String,

    /// Timeout for RPC requests
    #[arg(
        long = "rpc.timeout_seconds",
        name = "rpc.timeout_seconds",
        env = "RPC_TIMEOUT_SECONDS",
        default_value = "20"
    )]
    timeout_seconds: u64,

    /// Maximum number of concurrent connections
    #[arg(
        long = "rpc.max_connections",
        name = "rpc.max_connections",
        env = "RPC_MAX_CONNECTIONS",
        default_value = "100"
    )]
    max_connections: u32,
}

impl RpcArgs {
    fn to_args(&self) -> RpcTaskArgs {
        RpcTaskArgs {
            port: self.port,
            host: self.host.clone(),
            rpc_timeout: Duration::from_secs(self.timeout_seconds),
            max_connections: self.max_connections,
        }
    }
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Status")]
pub struct StatusRefresherArgs {
    /// Interval between indexing status refreshes
    #[arg(
        long = "status.poll_interval_millis",
        name = "status.poll_interval_millis",
        env = "STATUS_POLL_INTERVAL_MILLIS",
        default_value = "5000"
    )]
    poll_interval_millis: u64,

    /// Attempts of a single chain metadata fetch
    #[arg(
        long = "status.max_attempts",
        name = "status.max_attempts",
        env = "STATUS_MAX_ATTEMPTS",
        default_value = "3"
    )]
    max_attempts: u64,

    #[arg(
        long = "status.retry_interval_millis",
        name = "status.retry_interval_millis",
        env = "STATUS_RETRY_INTERVAL_MILLIS",
        default_value = "1000"
    )]
    retry_interval_millis: u64,
}

impl From<&StatusRefresherArgs> for RefresherSettings {
    fn from(value: &StatusRefresherArgs) -> Self {
        Self {
            poll_interval: Duration::from_millis(value.poll_interval_millis),
            max_attempts: value.max_attempts,
            retry_interval: Duration::from_millis(value.retry_interval_millis),
        }
    }
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Acceleration")]
pub struct AccelerationArgs {
    /// Never answer from indexed data, even when requested
    #[arg(
        long = "acceleration.disabled",
        name = "acceleration.disabled",
        env = "ACCELERATION_DISABLED",
        default_value = "false"
    )]
    disabled: bool,

    /// Largest overall realtime distance, in seconds, at which indexed data is used
    #[arg(
        long = "acceleration.max_realtime_distance",
        name = "acceleration.max_realtime_distance",
        env = "ACCELERATION_MAX_REALTIME_DISTANCE",
        default_value = "60"
    )]
    max_realtime_distance: u64,
}

impl From<&AccelerationArgs> for AccelerationSettings {
    fn from(value: &AccelerationArgs) -> Self {
        Self {
            enabled: !value.disabled,
            max_realtime_distance: value.max_realtime_distance,
        }
    }
}

#[derive(Debug, Args)]
pub struct NodeCliArgs {
    #[command(flatten)]
    rpc: RpcArgs,

    #[command(flatten)]
    status: StatusRefresherArgs,

    #[command(flatten)]
    acceleration: AccelerationArgs,
}

pub async fn run(
    node_args: NodeCliArgs,
    common_args: CommonArgs,
    namespace: NamespaceSpec,
) -> anyhow::Result<()> {
    let providers = super::construct_providers(&common_args)?;
    let indexing = super::load_indexing_config(&common_args)?;
    let status = IndexingStatusHandle::new();

    let mut tasks: Vec<Box<dyn Task>> = vec![];
    if common_args.indexer_url.is_some() && !indexing.chains.is_empty() {
        let source =
            super::construct_metadata_source(&common_args, indexing.clone(), &providers)?;
        tasks.push(Box::new(StatusRefresherTask::new(
            Arc::new(source),
            status.clone(),
            (&node_args.status).into(),
        )));
    } else {
        tracing::warn!("No indexer configured, indexing status stays unavailable");
    }

    let resolver = super::construct_resolver(
        &common_args,
        namespace,
        &providers,
        indexing,
        (&node_args.acceleration).into(),
        status.clone(),
    )
    .await?;
    tasks.push(RpcTask::new(node_args.rpc.to_args(), resolver, status).boxed());

    spawn_tasks_with_shutdown(tasks, tokio::signal::ctrl_c()).await
}
