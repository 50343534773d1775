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

//! Client side deadline for requests to a chain's RPC node.

use std::{
    task::{Context, Poll},
    time::Duration,
};

use alloy_json_rpc::{RequestPacket, ResponsePacket};
use alloy_transport::{TransportError, TransportFut};
use tower::{Layer, Service};

#[derive(Clone, Debug)]
pub(crate) struct ProviderTimeoutLayer {
    chain_id: u64,
    timeout: Duration,
}

impl ProviderTimeoutLayer {
    pub(crate) fn new(chain_id: u64, timeout: Duration) -> Self {
        Self { chain_id, timeout }
    }
}

impl<S> Layer<S> for ProviderTimeoutLayer
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError> + Sync,
{
    type Service = ProviderTimeout<S>;

    fn layer(&self, service: S) -> Self::Service {
        ProviderTimeout {
            service,
            chain_id: self.chain_id,
            timeout: self.timeout,
        }
    }
}

/// Fails requests that outlive the timeout with a local transport error,
/// which upstream error handling treats as retryable.
#[derive(Clone, Debug)]
pub struct ProviderTimeout<S> {
    service: S,
    chain_id: u64,
    timeout: Duration,
}

impl<S> Service<RequestPacket> for ProviderTimeout<S>
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>
        + Sync
        + Send
        + Clone
        + 'static,
    S::Future: Send,
{
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = TransportFut<'static>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: RequestPacket) -> Self::Future {
        let response = self.service.call(request);
        let chain_id = self.chain_id;
        let timeout = self.timeout;
        Box::pin(async move {
            let Ok(response) = tokio::time::timeout(timeout, response).await else {
                tracing::debug!("rpc request on chain {chain_id} timed out after {timeout:?}");
                metrics::counter!("provider_timeouts_total", "chain_id" => chain_id.to_string())
                    .increment(1);
                return Err(TransportError::local_usage_str(&format!(
                    "rpc request on chain {chain_id} timed out after {timeout:?}"
                )));
            };
            response
        })
    }
}
