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

//! Chain indexing status state machine.
//!
//! Classifies each chain's sync metadata into a [`ChainIndexingStatus`],
//! aggregates them into an [`OverallIndexingStatus`] and publishes the result
//! for the acceleration gate.
//!
//! [`ChainIndexingStatus`]: ensnode_types::ChainIndexingStatus
//! [`OverallIndexingStatus`]: ensnode_types::OverallIndexingStatus

mod aggregator;
pub use aggregator::{overall_indexing_status, validate_chain_status, validate_overall_status};

mod classifier;
pub use classifier::chain_indexing_status;

mod error;
pub use error::IndexingStatusError;

mod metrics;

mod refresher;
pub use refresher::{indexing_status_from_metadata, RefresherSettings, StatusRefresherTask};

mod snapshot;
pub use snapshot::{IndexingStatusHandle, StatusSnapshot};
