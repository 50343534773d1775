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

use std::time::Duration;

use anyhow::bail;
use async_trait::async_trait;
use ensnode_resolution::ForwardResolver;
use ensnode_status::IndexingStatusHandle;
use ensnode_task::{
    server::{parse_socket_addr, HealthCheck},
    Task,
};
use jsonrpsee::{
    server::{
        middleware::{http::ProxyGetRequestLayer, rpc::RpcServiceBuilder},
        ServerBuilder,
    },
    RpcModule,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    ens::{EnsApi, EnsApiServer},
    health::{HealthChecker, IndexingStatusHealth, SystemApiServer},
    metrics::RpcMetricsMiddleware,
};

/// RPC server arguments
#[derive(Debug)]
pub struct Args {
    /// Port to listen on.
    pub port: u16,
    /// Host to listen on.
    pub host: String,
    /// RPC timeout.
    pub rpc_timeout: Duration,
    /// Max number of connections.
    pub max_connections: u32,
}

/// JSON-RPC server task
pub struct RpcTask {
    args: Args,
    resolver: ForwardResolver,
    status: IndexingStatusHandle,
}

#[async_trait]
impl Task for RpcTask {
    fn name(&self) -> &'static str {
        "rpc server"
    }

    async fn run(self: Box<Self>, shutdown_token: CancellationToken) -> anyhow::Result<()> {
        let addr = parse_socket_addr(&self.args.host, self.args.port)?;
        info!("Starting rpc server on {}", addr);

        let mut module = RpcModule::new(());
        module.merge(EnsApi::new(self.resolver, self.status.clone()).into_rpc())?;

        let servers: Vec<Box<dyn HealthCheck>> =
            vec![Box::new(IndexingStatusHealth::new(self.status))];
        module.merge(HealthChecker::new(servers).into_rpc())?;

        let http_middleware = tower::ServiceBuilder::new()
            // Proxy `GET /health` requests to internal `system_health` method.
            .layer(ProxyGetRequestLayer::new("/health", "system_health")?)
            .layer(ProxyGetRequestLayer::new(
                "/indexing-status",
                "ens_indexingStatus",
            )?)
            .timeout(self.args.rpc_timeout);
        let rpc_middleware = RpcServiceBuilder::new().layer_fn(RpcMetricsMiddleware::new);

        let server = ServerBuilder::default()
            .set_http_middleware(http_middleware)
            .set_rpc_middleware(rpc_middleware)
            .max_connections(self.args.max_connections)
            .http_only()
            .build(addr)
            .await?;
        let handle = server.start(module);

        info!("Started RPC server");

        tokio::select! {
            _ = handle.clone().stopped() => {
                tracing::error!("RPC server stopped unexpectedly");
                bail!("RPC server stopped unexpectedly")
            }
            _ = shutdown_token.cancelled() => {
                let _ = handle.stop();
                info!("Server shutdown");
                Ok(())
            }
        }
    }
}

impl RpcTask {
    /// Creates a new RPC server task.
    pub fn new(args: Args, resolver: ForwardResolver, status: IndexingStatusHandle) -> Self {
        Self {
            args,
            resolver,
            status,
        }
    }

    /// Converts the task into a boxed trait object.
    pub fn boxed(self) -> Box<dyn Task> {
        Box::new(self)
    }
}
