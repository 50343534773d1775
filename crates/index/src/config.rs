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

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Block range a chain is indexed over
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainIndexingRange {
    /// First indexed block
    pub start_block: u64,
    /// Last indexed block, indexing follows the head when unset
    #[serde(default)]
    pub end_block: Option<u64>,
}

/// What the indexer indexes
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexingConfig {
    /// Indexed chains
    pub chains: BTreeMap<u64, ChainIndexingRange>,
    /// Chains whose resolver records are fully materialized
    #[serde(default)]
    pub records_indexed_chains: BTreeSet<u64>,
}

impl IndexingConfig {
    /// Parse from JSON
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// True if the chain is indexed
    pub fn is_indexed(&self, chain_id: u64) -> bool {
        self.chains.contains_key(&chain_id)
    }

    /// True if the chain's resolver records are indexed
    pub fn is_records_indexed(&self, chain_id: u64) -> bool {
        self.records_indexed_chains.contains(&chain_id)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for (chain_id, range) in &self.chains {
            if let Some(end) = range.end_block {
                anyhow::ensure!(
                    end >= range.start_block,
                    "chain {chain_id}: end block {end} is before start block {}",
                    range.start_block
                );
            }
        }
        for chain_id in &self.records_indexed_chains {
            anyhow::ensure!(
                self.chains.contains_key(chain_id),
                "chain {chain_id} has indexed records but is not indexed"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let config = IndexingConfig::from_json(
            r#"{
                "chains": {
                    "1": { "startBlock": 3327417 },
                    "8453": { "startBlock": 17571480, "endBlock": 20000000 }
                },
                "recordsIndexedChains": [1]
            }"#,
        )
        .unwrap();
        assert_eq!(config.chains[&1].end_block, None);
        assert_eq!(config.chains[&8453].end_block, Some(20000000));
        assert!(config.is_indexed(8453));
        assert!(config.is_records_indexed(1));
        assert!(!config.is_records_indexed(8453));
    }

    #[test]
    fn test_rejects_inverted_range() {
        assert!(IndexingConfig::from_json(
            r#"{ "chains": { "1": { "startBlock": 10, "endBlock": 5 } } }"#
        )
        .is_err());
    }

    #[test]
    fn test_rejects_records_on_unindexed_chain() {
        assert!(IndexingConfig::from_json(
            r#"{ "chains": { "1": { "startBlock": 10 } }, "recordsIndexedChains": [10] }"#
        )
        .is_err());
    }
}
