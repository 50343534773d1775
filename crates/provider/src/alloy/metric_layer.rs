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

use std::{
    task::{Context, Poll},
    time::Instant,
};

use alloy_json_rpc::{RequestPacket, ResponsePacket, ResponsePayload};
use alloy_transport::{TransportError, TransportFut};
use tower::{Layer, Service};

/// Alloy provider metric layer.
#[derive(Clone, Debug)]
pub(crate) struct AlloyMetricLayer {
    chain_id: u64,
}

impl AlloyMetricLayer {
    pub(crate) fn new(chain_id: u64) -> Self {
        Self { chain_id }
    }
}

impl<S> Layer<S> for AlloyMetricLayer
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError> + Sync,
{
    type Service = AlloyMetricMiddleware<S>;

    fn layer(&self, service: S) -> Self::Service {
        AlloyMetricMiddleware {
            service,
            chain_id: self.chain_id,
        }
    }
}

/// Records per method request counts, outcomes and latency.
#[derive(Clone, Debug)]
pub struct AlloyMetricMiddleware<S> {
    service: S,
    chain_id: u64,
}

impl<S> Service<RequestPacket> for AlloyMetricMiddleware<S>
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
        let method_name = get_method_name(&request);
        let chain_id = self.chain_id.to_string();
        let start = Instant::now();
        let response = self.service.call(request);
        Box::pin(async move {
            let response = response.await;
            let status = match &response {
                Ok(resp) if is_success(resp) => "ok",
                Ok(_) => "rpc_error",
                Err(TransportError::ErrorResp(_)) => "rpc_error",
                Err(_) => "transport_error",
            };
            metrics::counter!(
                "provider_requests_total",
                "chain_id" => chain_id.clone(),
                "method" => method_name.clone(),
                "status" => status
            )
            .increment(1);
            metrics::histogram!(
                "provider_request_duration_ms",
                "chain_id" => chain_id,
                "method" => method_name
            )
            .record(start.elapsed().as_millis() as f64);
            response
        })
    }
}

/// Get the method name from the request
fn get_method_name(req: &RequestPacket) -> String {
    match req {
        RequestPacket::Single(request) => request.method().to_string(),
        RequestPacket::Batch(_) => {
            // can't extract method name for batch.
            "batch".to_string()
        }
    }
}

fn is_success(response_packet: &ResponsePacket) -> bool {
    match response_packet {
        ResponsePacket::Single(resp) => matches!(resp.payload, ResponsePayload::Success(_)),
        ResponsePacket::Batch(resps) => resps
            .iter()
            .all(|r| matches!(r.payload, ResponsePayload::Success(_))),
    }
}
