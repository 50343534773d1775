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

//! Read side of the ENSNode indexing pipeline.
//!
//! The indexer materializes node to resolver relations and resolver records
//! per chain, and reports its sync progress. This crate exposes those as
//! traits with a Postgres backed store, a Ponder backed metadata source and an
//! in-memory store.

mod config;
pub use config::{ChainIndexingRange, IndexingConfig};

mod error;
pub use error::{IndexError, IndexResult};

mod memory;
pub use memory::InMemoryIndexStore;

mod ponder;
pub use ponder::PonderMetadataSource;

mod postgres;
pub use postgres::PostgresIndexStore;

mod prometheus;

mod traits;
#[cfg(feature = "test-utils")]
pub use traits::{MockChainMetadataSource, MockIndexedRecordsStore, MockNodeResolverRelationStore};
pub use traits::{ChainMetadataSource, IndexedRecordsStore, NodeResolverRelationStore};
