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

//! Resolver record selections and responses.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{CoinType, Node};

/// The set of records a caller wants resolved for a name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverRecordsSelection {
    /// Resolve the `name` record
    #[serde(default)]
    pub name: bool,
    /// Coin types of the address records to resolve
    #[serde(default)]
    pub addresses: Vec<CoinType>,
    /// Keys of the text records to resolve
    #[serde(default)]
    pub texts: Vec<String>,
}

impl ResolverRecordsSelection {
    /// Select the `name` record
    pub fn with_name(mut self) -> Self {
        self.name = true;
        self
    }

    /// Select an address record
    pub fn with_address(mut self, coin_type: CoinType) -> Self {
        self.addresses.push(coin_type);
        self
    }

    /// Select a text record
    pub fn with_text(mut self, key: impl Into<String>) -> Self {
        self.texts.push(key.into());
        self
    }

    /// True if nothing is selected
    pub fn is_empty(&self) -> bool {
        !self.name && self.addresses.is_empty() && self.texts.is_empty()
    }
}

/// Resolved records, shaped like the [`ResolverRecordsSelection`] that produced them.
///
/// A field is present iff it was selected. Selected records that are absent
/// resolve to `null`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverRecordsResponse {
    /// The `name` record
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub name: Option<Option<String>>,
    /// Address records by coin type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addresses: Option<BTreeMap<CoinType, Option<String>>>,
    /// Text records by key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texts: Option<BTreeMap<String, Option<String>>>,
}

impl ResolverRecordsResponse {
    /// A response with every selected record set to `null`.
    pub fn empty(selection: &ResolverRecordsSelection) -> Self {
        Self {
            name: selection.name.then_some(None),
            addresses: (!selection.addresses.is_empty())
                .then(|| selection.addresses.iter().map(|c| (*c, None)).collect()),
            texts: (!selection.texts.is_empty())
                .then(|| selection.texts.iter().map(|k| (k.clone(), None)).collect()),
        }
    }

    /// Set the `name` record
    pub fn set_name(&mut self, value: Option<String>) {
        self.name = Some(value);
    }

    /// Set an address record
    pub fn set_address(&mut self, coin_type: CoinType, value: Option<String>) {
        self.addresses
            .get_or_insert_with(BTreeMap::new)
            .insert(coin_type, value);
    }

    /// Set a text record
    pub fn set_text(&mut self, key: String, value: Option<String>) {
        self.texts.get_or_insert_with(BTreeMap::new).insert(key, value);
    }

    /// Resolved `name` record, if selected and present
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().and_then(|n| n.as_deref())
    }

    /// Resolved address record, if selected and present
    pub fn address(&self, coin_type: CoinType) -> Option<&str> {
        self.addresses
            .as_ref()
            .and_then(|a| a.get(&coin_type))
            .and_then(|a| a.as_deref())
    }

    /// Resolved text record, if selected and present
    pub fn text(&self, key: &str) -> Option<&str> {
        self.texts
            .as_ref()
            .and_then(|t| t.get(key))
            .and_then(|t| t.as_deref())
    }
}

/// A node's configured resolver on a chain, as materialized by the indexer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeResolverRelation {
    /// The node
    pub node: Node,
    /// Resolver configured for the node
    pub resolver: Address,
}

/// An indexed address record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedAddressRecord {
    /// Coin type
    pub coin_type: CoinType,
    /// Raw record value as hex
    pub address: String,
}

/// An indexed text record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedTextRecord {
    /// Key
    pub key: String,
    /// Raw value
    pub value: String,
}

/// The record set the indexer materialized for a (resolver, node) pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedResolverRecords {
    /// Raw `name` record
    pub name: Option<String>,
    /// Address records
    pub address_records: Vec<IndexedAddressRecord>,
    /// Text records
    pub text_records: Vec<IndexedTextRecord>,
}
