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

//! ENS protocol resolution engine.
//!
//! Discovers the active resolver of a name, then answers record selections
//! either from indexed data, when the acceleration gate trusts it, or by
//! executing resolver calls on chain.

mod discovery;
pub use discovery::{ChainProviders, ResolverDiscovery};

mod error;
pub use error::{ResolutionError, ResolutionResult};

mod forward;
pub use forward::{ForwardResolver, ResolveOptions, ResolveRecordsOutcome};

mod gate;
pub use gate::{AccelerationGate, AccelerationSettings};

mod indexed;
pub use indexed::format_indexed_records;

mod interpreter;
pub use interpreter::{record_calls, RecordCall};

mod metrics;

mod reverse;
pub use reverse::{reverse_names, PrimaryNameOutcome};
