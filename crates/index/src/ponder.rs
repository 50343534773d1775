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

//! Chain metadata from a Ponder indexer's `/status` and `/metrics` endpoints.

use std::{collections::HashMap, sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use ensnode_provider::EvmProvider;
use ensnode_types::{BlockRef, ChainIndexingConfig, ChainMetadata, Timestamp};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use url::Url;

use crate::{
    prometheus::{self, Sample},
    ChainIndexingRange, ChainMetadataSource, IndexResult, IndexingConfig,
};

const SYNC_BLOCK_METRIC: &str = "ponder_sync_block";
const SYNC_IS_REALTIME_METRIC: &str = "ponder_sync_is_realtime";
const SYNC_IS_COMPLETE_METRIC: &str = "ponder_sync_is_complete";
const HISTORICAL_TOTAL_BLOCKS_METRIC: &str = "ponder_historical_total_blocks";

#[derive(Clone, Copy, Debug, Deserialize)]
struct PonderBlock {
    number: u64,
    timestamp: u64,
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct PonderChainStatus {
    id: u64,
    block: Option<PonderBlock>,
}

/// `/status` response, keyed by chain name
type PonderStatus = HashMap<String, PonderChainStatus>;

/// [`ChainMetadataSource`] reading a Ponder indexer
pub struct PonderMetadataSource {
    client: Client,
    base_url: Url,
    config: IndexingConfig,
    providers: HashMap<u64, Arc<dyn EvmProvider>>,
    // finalized block timestamps never change
    block_cache: RwLock<HashMap<(u64, u64), BlockRef>>,
}

impl PonderMetadataSource {
    /// Create a new source. Every indexed chain needs a provider to look up block timestamps.
    pub fn new(
        base_url: Url,
        config: IndexingConfig,
        providers: HashMap<u64, Arc<dyn EvmProvider>>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        for chain_id in config.chains.keys() {
            anyhow::ensure!(
                providers.contains_key(chain_id),
                "no rpc provider configured for indexed chain {chain_id}"
            );
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("should build ponder http client")?;
        Ok(Self {
            client,
            base_url,
            config,
            providers,
            block_cache: RwLock::new(HashMap::new()),
        })
    }

    async fn fetch_status(&self) -> IndexResult<PonderStatus> {
        let url = self.base_url.join("status").context("invalid status url")?;
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    async fn fetch_metrics(&self) -> IndexResult<Vec<Sample>> {
        let url = self.base_url.join("metrics").context("invalid metrics url")?;
        let text = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(prometheus::parse(&text))
    }

    async fn block_ref(&self, chain_id: u64, number: u64, cache: bool) -> IndexResult<BlockRef> {
        if cache {
            if let Some(block) = self.block_cache.read().await.get(&(chain_id, number)) {
                return Ok(*block);
            }
        }
        let provider = self
            .providers
            .get(&chain_id)
            .ok_or_else(|| anyhow!("no rpc provider configured for chain {chain_id}"))?;
        let block = provider
            .get_block_ref(number)
            .await?
            .ok_or_else(|| anyhow!("block {number} not found on chain {chain_id}"))?;
        if cache {
            self.block_cache
                .write()
                .await
                .insert((chain_id, number), block);
        }
        Ok(block)
    }

    async fn indexing_config(
        &self,
        chain_id: u64,
        range: ChainIndexingRange,
    ) -> IndexResult<ChainIndexingConfig> {
        let start_block = self.block_ref(chain_id, range.start_block, true).await?;
        Ok(match range.end_block {
            None => ChainIndexingConfig::Indefinite { start_block },
            Some(end) => ChainIndexingConfig::Definite {
                start_block,
                end_block: self.block_ref(chain_id, end, true).await?,
            },
        })
    }

    async fn build_metadata(
        &self,
        chain_id: u64,
        status: &PonderStatus,
        samples: &[Sample],
    ) -> IndexResult<ChainMetadata> {
        let range = *self
            .config
            .chains
            .get(&chain_id)
            .ok_or_else(|| anyhow!("chain {chain_id} is not indexed"))?;
        let config = self.indexing_config(chain_id, range).await?;

        let chain_name = status
            .iter()
            .find(|(_, s)| s.id == chain_id)
            .map(|(name, _)| name.as_str());
        let metric = |name: &str| chain_metric(samples, name, chain_id, chain_name);

        // a chain missing from /status has not processed a block yet
        let status_block = match status
            .values()
            .find(|s| s.id == chain_id)
            .and_then(|s| s.block)
        {
            Some(block) if block.number > range.start_block => {
                BlockRef::new(block.number, Timestamp::new(block.timestamp))
            }
            _ => config.start_block(),
        };

        let sync_number = metric(SYNC_BLOCK_METRIC)
            .map(|v| v as u64)
            .unwrap_or(status_block.number);
        let sync_block = if sync_number == status_block.number {
            status_block
        } else {
            self.block_ref(chain_id, sync_number, false).await?
        };

        let backfill_end_block = match (range.end_block, metric(HISTORICAL_TOTAL_BLOCKS_METRIC)) {
            (Some(_), _) => config.end_block().unwrap_or(sync_block),
            (None, Some(total)) if total >= 1.0 => {
                let number = range.start_block + total as u64 - 1;
                self.block_ref(chain_id, number, true).await?
            }
            _ => sync_block,
        };

        let metadata = ChainMetadata {
            chain_id,
            config,
            status_block,
            sync_block,
            backfill_end_block,
            is_sync_complete: metric(SYNC_IS_COMPLETE_METRIC) == Some(1.0),
            is_sync_realtime: metric(SYNC_IS_REALTIME_METRIC) == Some(1.0),
        };
        debug!("chain {chain_id} metadata: {metadata:?}");
        Ok(metadata)
    }
}

#[async_trait::async_trait]
impl ChainMetadataSource for PonderMetadataSource {
    fn chain_ids(&self) -> Vec<u64> {
        self.config.chains.keys().copied().collect()
    }

    async fn get_chain_metadata(&self, chain_id: u64) -> IndexResult<ChainMetadata> {
        let (status, samples) = futures::try_join!(self.fetch_status(), self.fetch_metrics())?;
        self.build_metadata(chain_id, &status, &samples).await
    }

    #[instrument(skip_all)]
    async fn get_all_chain_metadata(&self) -> IndexResult<Vec<ChainMetadata>> {
        let (status, samples) = futures::try_join!(self.fetch_status(), self.fetch_metrics())?;
        futures::future::try_join_all(
            self.config
                .chains
                .keys()
                .map(|chain_id| self.build_metadata(*chain_id, &status, &samples)),
        )
        .await
    }
}

/// Value of a metric for a chain. Samples are labelled by chain name or id.
fn chain_metric(
    samples: &[Sample],
    name: &str,
    chain_id: u64,
    chain_name: Option<&str>,
) -> Option<f64> {
    let id = chain_id.to_string();
    samples
        .iter()
        .filter(|s| s.name == name)
        .find(|s| {
            let label = s.label("chain").or_else(|| s.label("network"));
            label == Some(id.as_str()) || (label.is_some() && label == chain_name)
        })
        .map(|s| s.value)
}
