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
use ensnode_resolution::{PrimaryNameOutcome, ResolveRecordsOutcome};
use ensnode_types::{CoinType, OverallIndexingStatus, ResolverRecordsSelection};
use jsonrpsee::core::RpcResult;

use super::{api::EnsApi, EnsApiServer};
use crate::utils;

#[async_trait::async_trait]
impl EnsApiServer for EnsApi {
    async fn resolve_records(
        &self,
        name: String,
        selection: ResolverRecordsSelection,
        accelerate: Option<bool>,
    ) -> RpcResult<ResolveRecordsOutcome> {
        utils::safe_call_rpc_handler(
            "ens_resolveRecords",
            EnsApi::resolve_records(self, &name, &selection, accelerate.unwrap_or(false)),
        )
        .await
    }

    async fn resolve_primary_name(
        &self,
        address: Address,
        coin_type: Option<CoinType>,
        accelerate: Option<bool>,
    ) -> RpcResult<PrimaryNameOutcome> {
        utils::safe_call_rpc_handler(
            "ens_resolvePrimaryName",
            EnsApi::resolve_primary_name(self, address, coin_type, accelerate.unwrap_or(false)),
        )
        .await
    }

    async fn indexing_status(&self) -> RpcResult<OverallIndexingStatus> {
        Ok(EnsApi::indexing_status(self)?)
    }
}
