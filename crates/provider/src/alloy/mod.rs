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

use alloy_provider::{Provider as AlloyProvider, ProviderBuilder};
use alloy_rpc_client::ClientBuilder;
use alloy_transport::layers::RetryBackoffLayer;
use anyhow::Context;
use evm::AlloyEvmProvider;
use metric_layer::AlloyMetricLayer;
use provider_timeout::ProviderTimeoutLayer;
use url::Url;

use crate::EvmProvider;

pub(crate) mod evm;
pub(crate) mod metric_layer;
mod provider_timeout;

/// Create a new alloy evm provider from a given RPC URL
pub fn new_alloy_evm_provider(
    chain_id: u64,
    rpc_url: &str,
    provider_client_timeout_seconds: u64,
) -> anyhow::Result<impl EvmProvider + Clone> {
    let provider = new_alloy_provider(chain_id, rpc_url, provider_client_timeout_seconds)?;
    Ok(AlloyEvmProvider::new(provider))
}

/// Create a new alloy provider from a given RPC URL
pub fn new_alloy_provider(
    chain_id: u64,
    rpc_url: &str,
    provider_client_timeout_seconds: u64,
) -> anyhow::Result<impl AlloyProvider + Clone> {
    let url = Url::parse(rpc_url).context("invalid rpc url")?;
    let metric_layer = AlloyMetricLayer::new(chain_id);
    // use a large number for CUPS, rate limiting is left to the node
    let retry_layer = RetryBackoffLayer::new(10, 500, 1_000_000);
    let timeout_layer =
        ProviderTimeoutLayer::new(chain_id, Duration::from_secs(provider_client_timeout_seconds));
    let client = ClientBuilder::default()
        .layer(retry_layer)
        .layer(metric_layer)
        .layer(timeout_layer)
        .http(url);
    let provider = ProviderBuilder::new().connect_client(client);
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_rpc_url() {
        assert!(new_alloy_provider(1, "not a url", 10).is_err());
        assert!(new_alloy_provider(1, "http://localhost:8545", 10).is_ok());
    }
}
