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
use serde::{Deserialize, Serialize};

/// Outcome of resolver discovery for a name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum FindResolverResult {
    /// No ancestor of the name has a resolver configured
    NotFound,
    /// A resolver was found
    #[serde(rename_all = "camelCase")]
    Found {
        /// Most specific ancestor (possibly the name itself) with a resolver
        active_name: String,
        /// The resolver configured on `active_name`
        active_resolver: Address,
        /// True iff `active_name` is a proper ancestor of the queried name
        requires_wildcard_support: bool,
    },
}

impl FindResolverResult {
    /// The active resolver, if any
    pub fn active_resolver(&self) -> Option<Address> {
        match self {
            Self::NotFound => None,
            Self::Found {
                active_resolver, ..
            } => Some(*active_resolver),
        }
    }

    /// The name the active resolver was found on, if any
    pub fn active_name(&self) -> Option<&str> {
        match self {
            Self::NotFound => None,
            Self::Found { active_name, .. } => Some(active_name),
        }
    }
}
