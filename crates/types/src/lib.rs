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

#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

//! ENSNode common types

mod coin_type;
pub use coin_type::{
    coin_type_to_evm_chain_id, evm_chain_id_to_coin_type, is_evm_coin_type, CoinType,
    DEFAULT_EVM_COIN_TYPE, ETH_COIN_TYPE,
};

pub mod indexing_status;
pub use indexing_status::{
    BlockRef, ChainIndexingConfig, ChainIndexingStatus, ChainMetadata, DefiniteIndexingConfig,
    IndefiniteIndexingConfig, IndexingStatusKind, OverallIndexingStatus,
};

pub mod name;
pub use name::{namehash, LabelHash, Node, ROOT_NODE};

pub mod namespace;
pub use namespace::NamespaceSpec;

mod records;
pub use records::{
    IndexedAddressRecord, IndexedResolverRecords, IndexedTextRecord, NodeResolverRelation,
    ResolverRecordsResponse, ResolverRecordsSelection,
};

mod resolver;
pub use resolver::FindResolverResult;

mod timestamp;
pub use timestamp::Timestamp;
