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

//! Primary name resolution (ENSIP-19).

use alloy_primitives::{hex, Address};
use ensnode_types::{
    is_evm_coin_type, CoinType, ResolverRecordsSelection, DEFAULT_EVM_COIN_TYPE, ETH_COIN_TYPE,
};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{metrics::ResolutionMetrics, ForwardResolver, ResolutionError, ResolutionResult, ResolveOptions};

/// Resolved primary name
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryNameOutcome {
    /// Primary name, if set and verified
    pub name: Option<String>,
    /// Acceleration was requested by the caller
    pub acceleration_requested: bool,
    /// An accelerated path was used for at least one step
    pub acceleration_attempted: bool,
}

/// Reverse names to try for an address, most specific first.
///
/// Ethereum uses `addr.reverse`. Other EVM chains use their coin type and fall
/// back to `default.reverse`.
pub fn reverse_names(address: Address, coin_type: CoinType) -> Vec<String> {
    let label = hex::encode(address);
    if coin_type == ETH_COIN_TYPE {
        return vec![format!("{label}.addr.reverse")];
    }
    let mut names = Vec::with_capacity(2);
    if coin_type != DEFAULT_EVM_COIN_TYPE {
        names.push(format!("{label}.{coin_type:x}.reverse"));
    }
    names.push(format!("{label}.default.reverse"));
    names
}

impl ForwardResolver {
    /// Resolve the primary name of `address` for `coin_type`.
    ///
    /// The name must forward resolve back to `address` for the same coin type.
    #[instrument(skip(self))]
    pub async fn resolve_primary_name(
        &self,
        address: Address,
        coin_type: CoinType,
        options: ResolveOptions,
    ) -> ResolutionResult<PrimaryNameOutcome> {
        if !is_evm_coin_type(coin_type) {
            return Err(ResolutionError::UnsupportedCoinType(coin_type));
        }
        let _timer = ResolutionMetrics::time("primary_name");
        // reverse records live on the root chain
        let options = ResolveOptions {
            chain_id: None,
            ..options
        };
        let mut outcome = PrimaryNameOutcome {
            name: None,
            acceleration_requested: options.accelerate,
            acceleration_attempted: false,
        };

        let name_selection = ResolverRecordsSelection::default().with_name();
        let mut candidate = None;
        for reverse_name in reverse_names(address, coin_type) {
            let reverse = self
                .resolve_records(&reverse_name, &name_selection, options)
                .await?;
            outcome.acceleration_attempted |= reverse.acceleration_attempted;
            if let Some(name) = reverse.records.name() {
                debug!("{reverse_name} names {name}");
                candidate = Some(name.to_string());
                break;
            }
        }
        let Some(name) = candidate else {
            return Ok(outcome);
        };

        let forward = self
            .resolve_records(
                &name,
                &ResolverRecordsSelection::default().with_address(coin_type),
                options,
            )
            .await?;
        outcome.acceleration_attempted |= forward.acceleration_attempted;
        if forward.records.address(coin_type) == Some(address.to_checksum(None).as_str()) {
            outcome.name = Some(name);
        } else {
            debug!("{name} does not resolve back to {address}");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Bytes, B256, U256};
    use alloy_sol_types::{SolCall, SolValue};
    use ensnode_contracts::resolver::{selector, IAddressResolver, INameResolver};
    use ensnode_index::{MockIndexedRecordsStore, MockNodeResolverRelationStore};
    use ensnode_provider::{FindResolverOut, MockEnsProvider};
    use ensnode_types::evm_chain_id_to_coin_type;

    use super::*;
    use crate::forward::tests::{resolver, PUBLIC_RESOLVER, VITALIK};

    #[test]
    fn test_reverse_names() {
        assert_eq!(
            reverse_names(VITALIK, 60),
            vec!["d8da6bf26964af9d7eed9e03e53415d37aa96045.addr.reverse"]
        );
        assert_eq!(
            reverse_names(VITALIK, evm_chain_id_to_coin_type(8453)),
            vec![
                "d8da6bf26964af9d7eed9e03e53415d37aa96045.80002105.reverse",
                "d8da6bf26964af9d7eed9e03e53415d37aa96045.default.reverse",
            ]
        );
        assert_eq!(
            reverse_names(VITALIK, DEFAULT_EVM_COIN_TYPE),
            vec!["d8da6bf26964af9d7eed9e03e53415d37aa96045.default.reverse"]
        );
    }

    fn provider(primary_name: &'static str, forward_address: Address) -> MockEnsProvider {
        let mut provider = MockEnsProvider::new();
        provider.expect_find_resolver().returning(|_, _| {
            Ok(FindResolverOut {
                resolver: PUBLIC_RESOLVER,
                node: B256::ZERO,
                offset: U256::ZERO,
            })
        });
        provider
            .expect_supports_interface()
            .returning(|_, _| Ok(false));
        provider.expect_resolver_call().returning(move |_, data| {
            let sel = selector(&data).map(|s| s.0);
            Ok(if sel == Some(INameResolver::nameCall::SELECTOR) {
                Some(primary_name.to_string().abi_encode().into())
            } else if sel == Some(IAddressResolver::addrCall::SELECTOR) {
                Some(Bytes::copy_from_slice(forward_address.as_slice()).abi_encode().into())
            } else {
                None
            })
        });
        provider
    }

    #[tokio::test]
    async fn test_verified_primary_name() {
        let resolver = resolver(
            vec![(1, provider("vitalik.eth", VITALIK))],
            MockNodeResolverRelationStore::new(),
            MockIndexedRecordsStore::new(),
        );
        let outcome = resolver
            .resolve_primary_name(VITALIK, 60, ResolveOptions::default())
            .await
            .unwrap();
        assert_eq!(outcome.name.as_deref(), Some("vitalik.eth"));
    }

    #[tokio::test]
    async fn test_unverified_primary_name() {
        let resolver = resolver(
            vec![(1, provider("vitalik.eth", Address::repeat_byte(1)))],
            MockNodeResolverRelationStore::new(),
            MockIndexedRecordsStore::new(),
        );
        let outcome = resolver
            .resolve_primary_name(VITALIK, 60, ResolveOptions::default())
            .await
            .unwrap();
        assert_eq!(outcome.name, None);
    }

    #[tokio::test]
    async fn test_unnormalized_primary_name_is_absent() {
        let resolver = resolver(
            vec![(1, provider("Vitalik.eth", VITALIK))],
            MockNodeResolverRelationStore::new(),
            MockIndexedRecordsStore::new(),
        );
        let outcome = resolver
            .resolve_primary_name(VITALIK, 60, ResolveOptions::default())
            .await
            .unwrap();
        assert_eq!(outcome.name, None);
    }

    #[tokio::test]
    async fn test_non_evm_coin_type() {
        let resolver = resolver(
            vec![],
            MockNodeResolverRelationStore::new(),
            MockIndexedRecordsStore::new(),
        );
        let err = resolver
            .resolve_primary_name(VITALIK, 0, ResolveOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ResolutionError::UnsupportedCoinType(0)));
    }
}
