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

mod api;
pub use api::EnsApi;

mod error;
pub(crate) use error::{EnsResult, EnsRpcError};

mod server;

use alloy_primitives::Address;
use ensnode_resolution::{PrimaryNameOutcome, ResolveRecordsOutcome};
use ensnode_types::{CoinType, OverallIndexingStatus, ResolverRecordsSelection};
use jsonrpsee::{core::RpcResult, proc_macros::rpc};

/// ENS resolution and indexing status API
#[rpc(server, namespace = "ens")]
pub trait EnsApi {
    /// Resolves the selected records of a normalized name.
    ///
    /// Every selected record is present in the response, `null` when unset.
    #[method(name = "resolveRecords")]
    async fn resolve_records(
        &self,
        name: String,
        selection: ResolverRecordsSelection,
        accelerate: Option<bool>,
    ) -> RpcResult<ResolveRecordsOutcome>;

    /// Resolves the verified primary name of an address, coin type 60 when unset.
    #[method(name = "resolvePrimaryName")]
    async fn resolve_primary_name(
        &self,
        address: Address,
        #[argument(rename = "coinType")] coin_type: Option<CoinType>,
        accelerate: Option<bool>,
    ) -> RpcResult<PrimaryNameOutcome>;

    /// Returns the latest overall indexing status with per chain detail.
    #[method(name = "indexingStatus")]
    async fn indexing_status(&self) -> RpcResult<OverallIndexingStatus>;
}
