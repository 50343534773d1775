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

//! Background task keeping the indexing status snapshot current.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use ensnode_index::ChainMetadataSource;
use ensnode_task::Task;
use ensnode_types::{ChainMetadata, OverallIndexingStatus, Timestamp};
use ensnode_utils::{
    log::LogOnError,
    retry::{self, RetryOpts},
};
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, Level};

use crate::{
    chain_indexing_status, metrics::StatusMetrics, overall_indexing_status,
    validate_overall_status, IndexingStatusError, IndexingStatusHandle,
};

/// Settings for the status refresher
#[derive(Clone, Copy, Debug)]
pub struct RefresherSettings {
    /// Time between refreshes
    pub poll_interval: Duration,
    /// Attempts per metadata fetch
    pub max_attempts: u64,
    /// Wait between fetch attempts
    pub retry_interval: Duration,
}

impl Default for RefresherSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            max_attempts: 3,
            retry_interval: Duration::from_secs(1),
        }
    }
}

/// Derive the overall status from every chain's metadata at `now`.
pub fn indexing_status_from_metadata(
    metadata: &[ChainMetadata],
    now: Timestamp,
) -> Result<OverallIndexingStatus, IndexingStatusError> {
    let chains = metadata
        .iter()
        .map(|m| Ok((m.chain_id, chain_indexing_status(m, now)?)))
        .collect::<Result<BTreeMap<_, _>, IndexingStatusError>>()?;
    let status = overall_indexing_status(chains)?;
    validate_overall_status(&status)?;
    Ok(status)
}

/// Periodically refreshes the published indexing status.
///
/// A failed refresh leaves the previous snapshot in place.
pub struct StatusRefresherTask<S> {
    source: Arc<S>,
    handle: IndexingStatusHandle,
    settings: RefresherSettings,
}

impl<S> StatusRefresherTask<S>
where
    S: ChainMetadataSource + 'static,
{
    /// Create a new refresher publishing to `handle`
    pub fn new(source: Arc<S>, handle: IndexingStatusHandle, settings: RefresherSettings) -> Self {
        Self {
            source,
            handle,
            settings,
        }
    }

    /// Run a single refresh, returns true if a new snapshot was published
    pub async fn refresh(&self) -> bool {
        let metadata = retry::with_retries(
            "fetch chain metadata",
            || self.source.get_all_chain_metadata(),
            RetryOpts::fixed(self.settings.max_attempts, self.settings.retry_interval),
        )
        .await
        .log_on_error_level(
            Level::WARN,
            "Failed to fetch chain metadata, keeping previous indexing status",
        );
        let Ok(metadata) = metadata else {
            StatusMetrics::increment_refresh_failures("fetch");
            return false;
        };

        let now = Timestamp::now();
        match indexing_status_from_metadata(&metadata, now)
            .log_on_error("Indexing status invariant violated, keeping previous indexing status")
        {
            Ok(status) => {
                debug!("Indexing status: {}", status.kind());
                StatusMetrics::set_overall_status(&status);
                self.handle.publish(status, now);
                true
            }
            Err(_) => {
                StatusMetrics::increment_refresh_failures("invariant");
                false
            }
        }
    }
}

#[async_trait]
impl<S> Task for StatusRefresherTask<S>
where
    S: ChainMetadataSource + 'static,
{
    fn name(&self) -> &'static str {
        "indexing status refresher"
    }

    async fn run(self: Box<Self>, shutdown_token: CancellationToken) -> anyhow::Result<()> {
        info!(
            "Starting indexing status refresher, polling every {:?}",
            self.settings.poll_interval
        );
        let mut interval = time::interval(self.settings.poll_interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown_token.cancelled() => {
                    info!("Indexing status refresher shutting down");
                    return Ok(());
                }
                _ = interval.tick() => {
                    self.refresh().await;
                }
            }
        }
    }
}
