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

//! ENS contract calls over an [`EvmProvider`], with EIP-3668 off-chain lookups.

use alloy_primitives::{Address, Bytes, FixedBytes, B256};
use alloy_sol_types::{SolCall, SolError};
use ensnode_contracts::{
    ccip_read::{encode_callback, OffchainLookup},
    registry::ENSRegistry,
    resolver::IERC165,
    universal_resolver::UniversalResolver,
};
use tracing::{debug, warn};

use crate::{
    CcipGateway, EnsProvider, EvmCall, EvmProvider, FindResolverOut, ProviderError, ProviderResult,
};

/// Maximum number of off-chain lookups followed for a single resolver call
pub const MAX_CCIP_LOOKUPS: usize = 4;

/// [`EnsProvider`] implementation over any [`EvmProvider`]
#[derive(Clone)]
pub struct EvmEnsProvider<P, G> {
    evm: P,
    gateway: G,
}

impl<P, G> EvmEnsProvider<P, G> {
    /// Create a new provider
    pub fn new(evm: P, gateway: G) -> Self {
        Self { evm, gateway }
    }
}

#[async_trait::async_trait]
impl<P, G> EnsProvider for EvmEnsProvider<P, G>
where
    P: EvmProvider,
    G: CcipGateway,
{
    async fn find_resolver(
        &self,
        universal_resolver: Address,
        dns_encoded_name: Bytes,
    ) -> ProviderResult<FindResolverOut> {
        let call = UniversalResolver::findResolverCall {
            name: dns_encoded_name,
        };
        let data = self
            .evm
            .call(EvmCall::new(universal_resolver, call.abi_encode()), None)
            .await?;
        let ret = UniversalResolver::findResolverCall::abi_decode_returns(&data)?;
        Ok(FindResolverOut {
            resolver: ret.resolver,
            node: ret.node,
            offset: ret.offset,
        })
    }

    async fn registry_resolver(&self, registry: Address, node: B256) -> ProviderResult<Address> {
        let call = ENSRegistry::resolverCall { node };
        let data = self
            .evm
            .call(EvmCall::new(registry, call.abi_encode()), None)
            .await?;
        Ok(ENSRegistry::resolverCall::abi_decode_returns(&data)?)
    }

    async fn supports_interface(
        &self,
        contract: Address,
        interface_id: FixedBytes<4>,
    ) -> ProviderResult<bool> {
        let call = IERC165::supportsInterfaceCall {
            interfaceID: interface_id,
        };
        match self
            .evm
            .call(EvmCall::new(contract, call.abi_encode()), None)
            .await
        {
            Ok(data) => Ok(IERC165::supportsInterfaceCall::abi_decode_returns(&data).unwrap_or(false)),
            Err(ProviderError::Revert(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn resolver_call(&self, resolver: Address, data: Bytes) -> ProviderResult<Option<Bytes>> {
        let mut call = EvmCall::new(resolver, data);
        let mut lookups = 0;
        loop {
            let revert = match self.evm.call(call.clone(), None).await {
                Ok(ret) => return Ok(Some(ret)),
                Err(ProviderError::Revert(revert)) => revert,
                Err(e) => return Err(e),
            };

            let Ok(lookup) = OffchainLookup::abi_decode(&revert) else {
                debug!("resolver {resolver} reverted");
                return Ok(None);
            };
            if lookup.sender != resolver {
                warn!(
                    "offchain lookup sender {} does not match resolver {resolver}",
                    lookup.sender
                );
                return Ok(None);
            }
            if lookups == MAX_CCIP_LOOKUPS {
                warn!("resolver {resolver} exceeded {MAX_CCIP_LOOKUPS} offchain lookups");
                return Ok(None);
            }
            lookups += 1;

            let Some(response) = self
                .gateway
                .fetch(lookup.sender, lookup.urls, lookup.callData)
                .await?
            else {
                debug!("every gateway failed for resolver {resolver}");
                return Ok(None);
            };
            call = EvmCall::new(
                lookup.sender,
                encode_callback(lookup.callbackFunction, response, lookup.extraData),
            );
        }
    }
}
