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

use alloy_primitives::Address;
use ensnode_resolution::{
    ForwardResolver, PrimaryNameOutcome, ResolveOptions, ResolveRecordsOutcome,
};
use ensnode_status::IndexingStatusHandle;
use ensnode_types::{CoinType, OverallIndexingStatus, ResolverRecordsSelection, ETH_COIN_TYPE};

use super::{EnsResult, EnsRpcError};

/// Implements the `ens_` namespace
pub struct EnsApi {
    resolver: ForwardResolver,
    status: IndexingStatusHandle,
}

impl EnsApi {
    /// Create a new API over a resolver and the published indexing status
    pub fn new(resolver: ForwardResolver, status: IndexingStatusHandle) -> Self {
        Self { resolver, status }
    }

    pub(crate) async fn resolve_records(
        &self,
        name: &str,
        selection: &ResolverRecordsSelection,
        accelerate: bool,
    ) -> EnsResult<ResolveRecordsOutcome> {
        let options = ResolveOptions {
            chain_id: None,
            accelerate,
        };
        Ok(self
            .resolver
            .resolve_records(name, selection, options)
            .await?)
    }

    pub(crate) async fn resolve_primary_name(
        &self,
        address: Address,
        coin_type: Option<CoinType>,
        accelerate: bool,
    ) -> EnsResult<PrimaryNameOutcome> {
        let options = ResolveOptions {
            chain_id: None,
            accelerate,
        };
        Ok(self
            .resolver
            .resolve_primary_name(address, coin_type.unwrap_or(ETH_COIN_TYPE), options)
            .await?)
    }

    pub(crate) fn indexing_status(&self) -> EnsResult<OverallIndexingStatus> {
        self.status
            .snapshot()
            .map(|snapshot| snapshot.status.clone())
            .ok_or(EnsRpcError::IndexingStatusUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::{BTreeMap, BTreeSet},
        sync::Arc,
    };

    use alloy_primitives::{address, Address, B256, U256};
    use ensnode_index::{
        ChainIndexingRange, IndexingConfig, MockIndexedRecordsStore,
        MockNodeResolverRelationStore,
    };
    use ensnode_provider::{EnsProvider, FindResolverOut, MockEnsProvider};
    use ensnode_resolution::{AccelerationGate, AccelerationSettings};
    use ensnode_types::{
        namespace::RegistrySpec, BlockRef, ChainIndexingStatus, IndefiniteIndexingConfig,
        NamespaceSpec, ResolverRecordsResponse, Timestamp,
    };
    use jsonrpsee::types::{error::INVALID_PARAMS_CODE, ErrorObjectOwned};

    use super::*;
    use crate::ens::{error::INDEXING_STATUS_UNAVAILABLE_CODE, EnsApiServer};

    fn namespace() -> Arc<NamespaceSpec> {
        Arc::new(NamespaceSpec {
            name: "test".to_string(),
            root_chain_id: 1,
            universal_resolver_address: address!("ce01f8eee7E479C928F8919abD53E553a36CeF67"),
            registries: vec![RegistrySpec {
                chain_id: 1,
                address: address!("00000000000C2E074eC69A0dFb2997BA6C7d2e1e"),
            }],
            offchain_lookup_resolvers: vec![],
            static_resolvers: vec![],
        })
    }

    fn api(provider: MockEnsProvider, status: IndexingStatusHandle) -> EnsApi {
        let indexing = IndexingConfig {
            chains: BTreeMap::from([(
                1,
                ChainIndexingRange {
                    start_block: 1,
                    end_block: None,
                },
            )]),
            records_indexed_chains: BTreeSet::new(),
        };
        let gate = AccelerationGate::new(
            AccelerationSettings::default(),
            Arc::new(indexing),
            status.clone(),
        );
        let providers = [(1, Arc::new(provider) as Arc<dyn EnsProvider>)]
            .into_iter()
            .collect();
        let resolver = ForwardResolver::new(
            namespace(),
            Arc::new(providers),
            Arc::new(MockNodeResolverRelationStore::new()),
            Arc::new(MockIndexedRecordsStore::new()),
            gate,
        );
        EnsApi::new(resolver, status)
    }

    fn following() -> OverallIndexingStatus {
        let chain = ChainIndexingStatus::Following {
            config: IndefiniteIndexingConfig {
                start_block: BlockRef::new(1, Timestamp::new(10)),
            },
            latest_indexed_block: BlockRef::new(10, Timestamp::new(100)),
            latest_known_block: BlockRef::new(11, Timestamp::new(112)),
            approx_realtime_distance: 12,
        };
        OverallIndexingStatus::Following {
            chains: BTreeMap::from([(1, chain)]),
            omnichain_indexing_cursor: Timestamp::new(100),
            overall_approx_realtime_distance: 12,
        }
    }

    #[tokio::test]
    async fn test_indexing_status_unavailable() {
        let api = api(MockEnsProvider::new(), IndexingStatusHandle::new());
        let err = EnsApiServer::indexing_status(&api).await.unwrap_err();
        assert_eq!(err.code(), INDEXING_STATUS_UNAVAILABLE_CODE);
    }

    #[tokio::test]
    async fn test_indexing_status() {
        let handle = IndexingStatusHandle::with_status(following(), Timestamp::new(112));
        let api = api(MockEnsProvider::new(), handle);
        let status = EnsApiServer::indexing_status(&api).await.unwrap();
        assert_eq!(status, following());

        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["overallStatus"], "following");
        assert_eq!(value["overallApproxRealtimeDistance"], 12);
    }

    #[tokio::test]
    async fn test_invalid_params() {
        let api = api(MockEnsProvider::new(), IndexingStatusHandle::new());

        let err: ErrorObjectOwned = EnsApiServer::resolve_records(
            &api,
            "Vitalik.eth".to_string(),
            ResolverRecordsSelection::default().with_name(),
            None,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), INVALID_PARAMS_CODE);

        let err = EnsApiServer::resolve_records(
            &api,
            "vitalik.eth".to_string(),
            ResolverRecordsSelection::default(),
            None,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), INVALID_PARAMS_CODE);

        // bitcoin has no primary names
        let err = EnsApiServer::resolve_primary_name(&api, Address::ZERO, Some(0), None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), INVALID_PARAMS_CODE);
    }

    #[tokio::test]
    async fn test_resolve_without_resolver() {
        let mut provider = MockEnsProvider::new();
        provider.expect_find_resolver().returning(|_, _| {
            Ok(FindResolverOut {
                resolver: Address::ZERO,
                node: B256::ZERO,
                offset: U256::ZERO,
            })
        });
        let api = api(provider, IndexingStatusHandle::new());
        let selection = ResolverRecordsSelection::default()
            .with_address(60)
            .with_text("avatar");

        let outcome = EnsApiServer::resolve_records(
            &api,
            "nobody.eth".to_string(),
            selection.clone(),
            Some(true),
        )
        .await
        .unwrap();
        assert_eq!(outcome.records, ResolverRecordsResponse::empty(&selection));
        assert!(outcome.acceleration_requested);
        // status is unavailable so nothing could be accelerated
        assert!(!outcome.acceleration_attempted);

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "records": {"addresses": {"60": null}, "texts": {"avatar": null}},
                "accelerationRequested": true,
                "accelerationAttempted": false,
            })
        );
    }
}
