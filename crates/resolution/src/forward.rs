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

//! Forward resolution orchestrator.

use std::{collections::HashSet, sync::Arc};

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use ensnode_contracts::resolver::{
    encode_extended_call, IExtendedResolver, EXTENDED_RESOLVER_INTERFACE_ID,
};
use ensnode_index::{IndexedRecordsStore, NodeResolverRelationStore};
use ensnode_provider::{EnsProvider, ProviderError};
use ensnode_types::{
    name::{dns_encode, is_normalized_name},
    namehash, FindResolverResult, NamespaceSpec, ResolverRecordsResponse,
    ResolverRecordsSelection,
};
use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    discovery::{ChainProviders, ResolverDiscovery},
    indexed::format_indexed_records,
    interpreter::{record_calls, set_record, RecordCall},
    metrics::{ResolutionMetrics, ResolutionPath},
    AccelerationGate, ResolutionError, ResolutionResult,
};

/// Options of a single resolution
#[derive(Clone, Copy, Debug, Default)]
pub struct ResolveOptions {
    /// Chain to resolve on, the namespace root chain if unset
    pub chain_id: Option<u64>,
    /// Use indexed data where it is currently trustworthy
    pub accelerate: bool,
}

/// Resolved records
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRecordsOutcome {
    /// Records shaped like the selection
    pub records: ResolverRecordsResponse,
    /// Acceleration was requested by the caller
    pub acceleration_requested: bool,
    /// An accelerated path was used for at least one step
    pub acceleration_attempted: bool,
}

/// Resolves records of names, accelerated by indexed data when possible
#[derive(Clone)]
pub struct ForwardResolver {
    namespace: Arc<NamespaceSpec>,
    providers: Arc<ChainProviders>,
    discovery: ResolverDiscovery,
    records: Arc<dyn IndexedRecordsStore>,
    gate: AccelerationGate,
}

impl ForwardResolver {
    /// Create a new resolver
    pub fn new(
        namespace: Arc<NamespaceSpec>,
        providers: Arc<ChainProviders>,
        relations: Arc<dyn NodeResolverRelationStore>,
        records: Arc<dyn IndexedRecordsStore>,
        gate: AccelerationGate,
    ) -> Self {
        let discovery = ResolverDiscovery::new(namespace.clone(), providers.clone(), relations);
        Self {
            namespace,
            providers,
            discovery,
            records,
            gate,
        }
    }

    /// Namespace resolution is anchored on
    pub fn namespace(&self) -> &NamespaceSpec {
        &self.namespace
    }

    /// Resolve the selected records of `name`.
    ///
    /// A name without a resolver resolves every selected record to null.
    #[instrument(skip(self, selection))]
    pub async fn resolve_records(
        &self,
        name: &str,
        selection: &ResolverRecordsSelection,
        options: ResolveOptions,
    ) -> ResolutionResult<ResolveRecordsOutcome> {
        if !is_normalized_name(name) {
            return Err(ResolutionError::UnnormalizedName(name.to_string()));
        }
        let calls = record_calls(selection);
        if calls.is_empty() {
            return Err(ResolutionError::EmptySelection);
        }
        let _timer = ResolutionMetrics::time("records");

        let mut chain_id = options.chain_id.unwrap_or(self.namespace.root_chain_id);
        let mut deferred_from = HashSet::new();
        let mut attempted = false;
        let outcome = |records, attempted| ResolveRecordsOutcome {
            records,
            acceleration_requested: options.accelerate,
            acceleration_attempted: attempted,
        };

        loop {
            let allowed = options.accelerate && self.gate.is_acceleration_available(chain_id);
            attempted |= allowed;
            let found = self
                .discovery
                .find_resolver(chain_id, name, options.accelerate, allowed)
                .await?;
            let FindResolverResult::Found {
                active_resolver,
                requires_wildcard_support,
                ..
            } = found
            else {
                ResolutionMetrics::increment_resolutions(ResolutionPath::NoResolver, allowed);
                return Ok(outcome(ResolverRecordsResponse::empty(selection), attempted));
            };

            if options.accelerate {
                if let Some(target) = self.namespace.deferral_target(chain_id, active_resolver) {
                    if self.gate.is_acceleration_available(target) {
                        if !deferred_from.insert((chain_id, active_resolver)) {
                            return Err(ResolutionError::DeferralCycle {
                                chain_id,
                                resolver: active_resolver,
                            });
                        }
                        debug!("resolver {active_resolver} on chain {chain_id} defers to chain {target}");
                        ResolutionMetrics::increment_deferrals(chain_id, target);
                        attempted = true;
                        chain_id = target;
                        continue;
                    }
                }

                // wildcard matches go live, where ENSIP-10 support is checked
                if !requires_wildcard_support
                    && self.namespace.is_static_resolver(chain_id, active_resolver)
                    && self.gate.are_records_indexed(chain_id)
                {
                    let records = self
                        .records
                        .get_indexed_resolver_records(chain_id, active_resolver, namehash(name))
                        .await?;
                    ResolutionMetrics::increment_resolutions(ResolutionPath::IndexedRecords, allowed);
                    return Ok(outcome(
                        format_indexed_records(selection, records.as_ref()),
                        true,
                    ));
                }
            }

            let records = self
                .resolve_live(
                    chain_id,
                    name,
                    active_resolver,
                    requires_wildcard_support,
                    selection,
                    &calls,
                )
                .await?;
            ResolutionMetrics::increment_resolutions(ResolutionPath::Live, allowed);
            return Ok(outcome(records, attempted));
        }
    }

    async fn resolve_live(
        &self,
        chain_id: u64,
        name: &str,
        resolver: Address,
        requires_wildcard_support: bool,
        selection: &ResolverRecordsSelection,
        calls: &[RecordCall],
    ) -> ResolutionResult<ResolverRecordsResponse> {
        let provider = self
            .providers
            .get(&chain_id)
            .ok_or(ResolutionError::UnsupportedChain(chain_id))?;

        let is_extended = provider
            .supports_interface(resolver, EXTENDED_RESOLVER_INTERFACE_ID)
            .await?;
        if requires_wildcard_support && !is_extended {
            return Err(ResolutionError::WildcardNotSupported {
                name: name.to_string(),
                resolver,
            });
        }

        let node = namehash(name);
        let dns_encoded_name = dns_encode(name);
        let values = try_join_all(calls.iter().map(|call| {
            let dns_encoded_name = &dns_encoded_name;
            async move {
                let data = call.encode(node);
                let data = if is_extended {
                    encode_extended_call(dns_encoded_name.clone(), data)
                } else {
                    data
                };
                let raw = execute_call(provider.as_ref(), resolver, data, is_extended).await?;
                if raw.is_none() {
                    ResolutionMetrics::increment_record_call_reverts(chain_id);
                }
                call.interpret(raw.as_ref())
            }
        }))
        .await?;

        let mut response = ResolverRecordsResponse::empty(selection);
        for (call, value) in calls.iter().zip(values) {
            set_record(&mut response, call, value);
        }
        Ok(response)
    }
}

/// Execute a record call, unwrapping the `resolve(bytes,bytes)` envelope
async fn execute_call(
    provider: &dyn EnsProvider,
    resolver: Address,
    data: Bytes,
    is_extended: bool,
) -> ResolutionResult<Option<Bytes>> {
    let Some(ret) = provider.resolver_call(resolver, data).await? else {
        return Ok(None);
    };
    if !is_extended || ret.is_empty() {
        return Ok(Some(ret));
    }
    let inner = IExtendedResolver::resolveCall::abi_decode_returns(&ret)
        .map_err(ProviderError::from)?;
    Ok(Some(inner))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use alloy_primitives::{address, B256, U256};
    use alloy_sol_types::SolValue;
    use ensnode_contracts::resolver::{selector, IAddressResolver, INameResolver, ITextResolver};
    use ensnode_index::{
        ChainIndexingRange, IndexingConfig, MockIndexedRecordsStore,
        MockNodeResolverRelationStore,
    };
    use ensnode_provider::{FindResolverOut, MockEnsProvider};
    use ensnode_status::IndexingStatusHandle;
    use ensnode_types::{
        namespace::{OffchainLookupResolverSpec, RegistrySpec, StaticResolverSpec},
        BlockRef, ChainIndexingStatus, IndefiniteIndexingConfig, IndexedAddressRecord,
        IndexedResolverRecords, IndexedTextRecord, NodeResolverRelation, OverallIndexingStatus,
        Timestamp,
    };

    use super::*;
    use crate::AccelerationSettings;

    pub(crate) const PUBLIC_RESOLVER: Address =
        address!("231b0Ee14048e9dCcD1d247744d114a4EB5E8E63");
    pub(crate) const OFFCHAIN_RESOLVER: Address =
        address!("de9049636F4a1dfE0a64d1bFe3155C0A14C54F31");
    pub(crate) const BASE_RESOLVER: Address = address!("C6d566A56A1aFf6508b41f6c90ff131615583BCD");
    pub(crate) const VITALIK: Address = address!("d8da6bf26964af9d7eed9e03e53415d37aa96045");

    pub(crate) fn namespace() -> Arc<NamespaceSpec> {
        Arc::new(NamespaceSpec {
            name: "test".to_string(),
            root_chain_id: 1,
            universal_resolver_address: address!("ce01f8eee7E479C928F8919abD53E553a36CeF67"),
            registries: vec![
                RegistrySpec {
                    chain_id: 1,
                    address: address!("00000000000C2E074eC69A0dFb2997BA6C7d2e1e"),
                },
                RegistrySpec {
                    chain_id: 8453,
                    address: address!("b94704422c2a1e396835a571837aa5ae53285a95"),
                },
            ],
            offchain_lookup_resolvers: vec![OffchainLookupResolverSpec {
                chain_id: 1,
                address: OFFCHAIN_RESOLVER,
                defers_to_chain_id: 8453,
            }],
            static_resolvers: vec![
                StaticResolverSpec {
                    chain_id: 1,
                    address: PUBLIC_RESOLVER,
                },
                StaticResolverSpec {
                    chain_id: 8453,
                    address: BASE_RESOLVER,
                },
            ],
        })
    }

    fn following() -> ChainIndexingStatus {
        ChainIndexingStatus::Following {
            config: IndefiniteIndexingConfig {
                start_block: BlockRef::new(1, Timestamp::new(10)),
            },
            latest_indexed_block: BlockRef::new(100, Timestamp::new(1000)),
            latest_known_block: BlockRef::new(100, Timestamp::new(1000)),
            approx_realtime_distance: 2,
        }
    }

    /// Gate with chains 1 and 8453 following and records indexed
    pub(crate) fn following_gate() -> AccelerationGate {
        let range = ChainIndexingRange {
            start_block: 1,
            end_block: None,
        };
        let status = OverallIndexingStatus::Following {
            chains: BTreeMap::from([(1, following()), (8453, following())]),
            omnichain_indexing_cursor: Timestamp::new(1000),
            overall_approx_realtime_distance: 2,
        };
        AccelerationGate::new(
            AccelerationSettings::default(),
            Arc::new(IndexingConfig {
                chains: BTreeMap::from([(1, range), (8453, range)]),
                records_indexed_chains: BTreeSet::from([1, 8453]),
            }),
            IndexingStatusHandle::with_status(status, Timestamp::now()),
        )
    }

    pub(crate) fn resolver(
        providers: Vec<(u64, MockEnsProvider)>,
        relations: MockNodeResolverRelationStore,
        records: MockIndexedRecordsStore,
    ) -> ForwardResolver {
        let providers = providers
            .into_iter()
            .map(|(chain_id, p)| (chain_id, Arc::new(p) as Arc<dyn EnsProvider>))
            .collect();
        ForwardResolver::new(
            namespace(),
            Arc::new(providers),
            Arc::new(relations),
            Arc::new(records),
            following_gate(),
        )
    }

    /// Answers of a plain (non extended) resolver holding vitalik.eth records
    pub(crate) fn answer(data: &[u8]) -> Option<Bytes> {
        let sel = selector(data)?.0;
        if sel == IAddressResolver::addrCall::SELECTOR {
            let call = IAddressResolver::addrCall::abi_decode(data).ok()?;
            let value = if call.coinType == U256::from(60) {
                Bytes::copy_from_slice(VITALIK.as_slice())
            } else {
                Bytes::new()
            };
            Some(value.abi_encode().into())
        } else if sel == ITextResolver::textCall::SELECTOR {
            let call = ITextResolver::textCall::abi_decode(data).ok()?;
            // the resolver reverts for unknown keys
            (call.key == "url").then(|| "https://vitalik.ca".to_string().abi_encode().into())
        } else if sel == INameResolver::nameCall::SELECTOR {
            Some("vitalik.eth".to_string().abi_encode().into())
        } else {
            None
        }
    }

    pub(crate) fn vitalik_records() -> IndexedResolverRecords {
        IndexedResolverRecords {
            name: Some("vitalik.eth".to_string()),
            address_records: vec![IndexedAddressRecord {
                coin_type: 60,
                address: "0xd8da6bf26964af9d7eed9e03e53415d37aa96045".to_string(),
            }],
            text_records: vec![IndexedTextRecord {
                key: "url".to_string(),
                value: "https://vitalik.ca".to_string(),
            }],
        }
    }

    fn selection() -> ResolverRecordsSelection {
        ResolverRecordsSelection::default()
            .with_address(60)
            .with_address(0)
            .with_text("url")
            .with_text("com.twitter")
    }

    fn live_provider(resolver: Address, offset: u64, extended: bool) -> MockEnsProvider {
        let mut provider = MockEnsProvider::new();
        provider.expect_find_resolver().returning(move |_, _| {
            Ok(FindResolverOut {
                resolver,
                node: B256::ZERO,
                offset: U256::from(offset),
            })
        });
        provider
            .expect_supports_interface()
            .returning(move |_, _| Ok(extended));
        provider
    }

    #[tokio::test]
    async fn test_empty_selection_rejected_before_any_call() {
        let resolver = resolver(
            vec![(1, MockEnsProvider::new())],
            MockNodeResolverRelationStore::new(),
            MockIndexedRecordsStore::new(),
        );
        let err = resolver
            .resolve_records(
                "vitalik.eth",
                &ResolverRecordsSelection::default(),
                ResolveOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ResolutionError::EmptySelection));
    }

    #[tokio::test]
    async fn test_unnormalized_name_rejected() {
        let resolver = resolver(
            vec![],
            MockNodeResolverRelationStore::new(),
            MockIndexedRecordsStore::new(),
        );
        let err = resolver
            .resolve_records("Vitalik.eth", &selection(), ResolveOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_caller_error());
    }

    #[tokio::test]
    async fn test_no_resolver_is_empty_response() {
        let mut provider = MockEnsProvider::new();
        provider.expect_find_resolver().returning(|_, _| {
            Ok(FindResolverOut {
                resolver: Address::ZERO,
                node: B256::ZERO,
                offset: U256::ZERO,
            })
        });
        let resolver = resolver(
            vec![(1, provider)],
            MockNodeResolverRelationStore::new(),
            MockIndexedRecordsStore::new(),
        );
        let outcome = resolver
            .resolve_records("nobody.eth", &selection(), ResolveOptions::default())
            .await
            .unwrap();
        assert_eq!(outcome.records, ResolverRecordsResponse::empty(&selection()));
        assert!(!outcome.acceleration_requested);
        assert!(!outcome.acceleration_attempted);
    }

    #[tokio::test]
    async fn test_live_resolution() {
        let mut provider = live_provider(PUBLIC_RESOLVER, 0, false);
        provider
            .expect_resolver_call()
            .times(4)
            .returning(|_, data| Ok(answer(&data)));
        let resolver = resolver(
            vec![(1, provider)],
            MockNodeResolverRelationStore::new(),
            MockIndexedRecordsStore::new(),
        );

        let outcome = resolver
            .resolve_records("vitalik.eth", &selection(), ResolveOptions::default())
            .await
            .unwrap();
        let records = outcome.records;
        assert_eq!(
            records.address(60),
            Some("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045")
        );
        // "0x" is null
        assert_eq!(records.addresses.as_ref().unwrap().get(&0), Some(&None));
        assert_eq!(records.text("url"), Some("https://vitalik.ca"));
        // reverted call
        assert_eq!(
            records.texts.as_ref().unwrap().get("com.twitter"),
            Some(&None)
        );
    }

    #[tokio::test]
    async fn test_extended_resolver_calls_are_wrapped() {
        let mut provider = live_provider(BASE_RESOLVER, 4, true);
        provider.expect_resolver_call().returning(|_, data| {
            let call = IExtendedResolver::resolveCall::abi_decode(&data).unwrap();
            assert_eq!(call.name, dns_encode("sub.vitalik.eth"));
            Ok(answer(&call.data).map(|inner| Bytes::from(inner.abi_encode())))
        });
        let resolver = resolver(
            vec![(1, provider)],
            MockNodeResolverRelationStore::new(),
            MockIndexedRecordsStore::new(),
        );

        let outcome = resolver
            .resolve_records(
                "sub.vitalik.eth",
                &ResolverRecordsSelection::default().with_text("url"),
                ResolveOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(outcome.records.text("url"), Some("https://vitalik.ca"));
    }

    #[tokio::test]
    async fn test_wildcard_requires_extended_resolver() {
        let provider = live_provider(PUBLIC_RESOLVER, 4, false);
        let resolver = resolver(
            vec![(1, provider)],
            MockNodeResolverRelationStore::new(),
            MockIndexedRecordsStore::new(),
        );

        let err = resolver
            .resolve_records("sub.vitalik.eth", &selection(), ResolveOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ResolutionError::WildcardNotSupported { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let mut provider = live_provider(PUBLIC_RESOLVER, 0, false);
        provider.expect_resolver_call().returning(|_, _| {
            Err(ProviderError::Other(anyhow::anyhow!("connection refused")))
        });
        let resolver = resolver(
            vec![(1, provider)],
            MockNodeResolverRelationStore::new(),
            MockIndexedRecordsStore::new(),
        );

        let err = resolver
            .resolve_records("vitalik.eth", &selection(), ResolveOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ResolutionError::Provider(_)));
    }

    #[tokio::test]
    async fn test_acceleration_transparency() {
        let selection = ResolverRecordsSelection::default()
            .with_name()
            .with_address(60)
            .with_text("url");

        let mut provider = live_provider(PUBLIC_RESOLVER, 0, false);
        provider
            .expect_resolver_call()
            .returning(|_, data| Ok(answer(&data)));
        let live = resolver(
            vec![(1, provider)],
            MockNodeResolverRelationStore::new(),
            MockIndexedRecordsStore::new(),
        )
        .resolve_records("vitalik.eth", &selection, ResolveOptions::default())
        .await
        .unwrap();

        let mut relations = MockNodeResolverRelationStore::new();
        relations
            .expect_find_node_resolver_relations()
            .returning(|_, _| {
                Ok(vec![NodeResolverRelation {
                    node: namehash("vitalik.eth"),
                    resolver: PUBLIC_RESOLVER,
                }])
            });
        let mut records = MockIndexedRecordsStore::new();
        records
            .expect_get_indexed_resolver_records()
            .withf(|chain_id, resolver, node| {
                *chain_id == 1 && *resolver == PUBLIC_RESOLVER && *node == namehash("vitalik.eth")
            })
            .returning(|_, _, _| Ok(Some(vitalik_records())));
        let accelerated = resolver(vec![(1, MockEnsProvider::new())], relations, records)
            .resolve_records(
                "vitalik.eth",
                &selection,
                ResolveOptions {
                    chain_id: None,
                    accelerate: true,
                },
            )
            .await
            .unwrap();

        assert_eq!(live.records, accelerated.records);
        assert!(!live.acceleration_attempted);
        assert!(accelerated.acceleration_requested);
        assert!(accelerated.acceleration_attempted);
    }

    #[tokio::test]
    async fn test_offchain_lookup_deferral() {
        let mut relations = MockNodeResolverRelationStore::new();
        relations
            .expect_find_node_resolver_relations()
            .returning(|chain_id, _| {
                let (node, resolver) = match chain_id {
                    1 => (namehash("base.eth"), OFFCHAIN_RESOLVER),
                    _ => (namehash("jesse.base.eth"), BASE_RESOLVER),
                };
                Ok(vec![NodeResolverRelation { node, resolver }])
            });
        let mut records = MockIndexedRecordsStore::new();
        records
            .expect_get_indexed_resolver_records()
            .withf(|chain_id, resolver, _| *chain_id == 8453 && *resolver == BASE_RESOLVER)
            .times(1)
            .returning(|_, _, _| {
                Ok(Some(IndexedResolverRecords {
                    text_records: vec![IndexedTextRecord {
                        key: "url".to_string(),
                        value: "https://base.org".to_string(),
                    }],
                    ..Default::default()
                }))
            });

        let outcome = resolver(vec![], relations, records)
            .resolve_records(
                "jesse.base.eth",
                &ResolverRecordsSelection::default().with_text("url"),
                ResolveOptions {
                    chain_id: None,
                    accelerate: true,
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome.records.text("url"), Some("https://base.org"));
        assert!(outcome.acceleration_attempted);
    }

    #[tokio::test]
    async fn test_static_resolver_wildcard_matches_live() {
        let selection = ResolverRecordsSelection::default().with_text("url");

        let live = resolver(
            vec![(1, live_provider(PUBLIC_RESOLVER, 4, false))],
            MockNodeResolverRelationStore::new(),
            MockIndexedRecordsStore::new(),
        )
        .resolve_records("sub.vitalik.eth", &selection, ResolveOptions::default())
        .await
        .unwrap_err();
        assert!(matches!(live, ResolutionError::WildcardNotSupported { .. }));

        // only vitalik.eth has a resolver in the index
        let mut relations = MockNodeResolverRelationStore::new();
        relations
            .expect_find_node_resolver_relations()
            .returning(|_, _| {
                Ok(vec![NodeResolverRelation {
                    node: namehash("vitalik.eth"),
                    resolver: PUBLIC_RESOLVER,
                }])
            });
        let mut records = MockIndexedRecordsStore::new();
        records.expect_get_indexed_resolver_records().never();
        let mut provider = MockEnsProvider::new();
        provider
            .expect_supports_interface()
            .returning(|_, _| Ok(false));
        let accelerated = resolver(vec![(1, provider)], relations, records)
            .resolve_records(
                "sub.vitalik.eth",
                &selection,
                ResolveOptions {
                    chain_id: None,
                    accelerate: true,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            accelerated,
            ResolutionError::WildcardNotSupported { resolver, .. } if resolver == PUBLIC_RESOLVER
        ));
    }

    #[tokio::test]
    async fn test_deferral_cycle_detected() {
        let mut namespace = (*namespace()).clone();
        namespace
            .offchain_lookup_resolvers
            .push(OffchainLookupResolverSpec {
                chain_id: 8453,
                address: BASE_RESOLVER,
                defers_to_chain_id: 1,
            });
        let mut relations = MockNodeResolverRelationStore::new();
        relations
            .expect_find_node_resolver_relations()
            .returning(|chain_id, _| {
                let (node, resolver) = match chain_id {
                    1 => (namehash("base.eth"), OFFCHAIN_RESOLVER),
                    _ => (namehash("jesse.base.eth"), BASE_RESOLVER),
                };
                Ok(vec![NodeResolverRelation { node, resolver }])
            });
        let resolver = ForwardResolver::new(
            Arc::new(namespace),
            Arc::new(ChainProviders::new()),
            Arc::new(relations),
            Arc::new(MockIndexedRecordsStore::new()),
            following_gate(),
        );

        let err = resolver
            .resolve_records(
                "jesse.base.eth",
                &ResolverRecordsSelection::default().with_text("url"),
                ResolveOptions {
                    chain_id: None,
                    accelerate: true,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::DeferralCycle { chain_id: 1, resolver } if resolver == OFFCHAIN_RESOLVER
        ));
    }
}
