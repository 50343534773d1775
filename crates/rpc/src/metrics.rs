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

use std::time::{Duration, Instant};

use futures::{future::BoxFuture, FutureExt};
use jsonrpsee::{server::middleware::rpc::RpcServiceT, types::Request, MethodResponse};

/// Records request counts, latencies and errors per method
#[derive(Clone)]
pub(crate) struct RpcMetricsMiddleware<S> {
    service: S,
}

impl<S> RpcMetricsMiddleware<S> {
    pub(crate) fn new(service: S) -> Self {
        Self { service }
    }
}

impl<'a, S> RpcServiceT<'a> for RpcMetricsMiddleware<S>
where
    S: RpcServiceT<'a> + Send + Sync + 'a,
{
    type Future = BoxFuture<'a, MethodResponse>;

    fn call(&self, request: Request<'a>) -> Self::Future {
        let method_name = request.method_name().to_string();
        RpcMetrics::increment_num_requests(method_name.clone());
        RpcMetrics::increment_open_requests(method_name.clone());
        let started_at = Instant::now();

        let response = self.service.call(request);
        async move {
            let response = response.await;

            RpcMetrics::record_request_latency(method_name.clone(), started_at.elapsed());
            RpcMetrics::decrement_open_requests(method_name.clone());
            if response.is_error() {
                RpcMetrics::increment_rpc_error_count(method_name);
            }
            response
        }
        .boxed()
    }
}

struct RpcMetrics {}

impl RpcMetrics {
    fn increment_num_requests(method_name: String) {
        metrics::counter!("rpc_num_requests", "method_name" => method_name).increment(1);
    }

    fn increment_open_requests(method_name: String) {
        metrics::gauge!("rpc_open_requests", "method_name" => method_name).increment(1_f64);
    }

    fn decrement_open_requests(method_name: String) {
        metrics::gauge!("rpc_open_requests", "method_name" => method_name).decrement(1_f64);
    }

    fn increment_rpc_error_count(method_name: String) {
        metrics::counter!("rpc_error_count", "method_name" => method_name).increment(1);
    }

    fn record_request_latency(method_name: String, latency: Duration) {
        metrics::histogram!("rpc_request_latency", "method_name" => method_name).record(latency);
    }
}
