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

//! Formatting of indexed resolver records.

use alloy_primitives::hex;
use ensnode_types::{IndexedResolverRecords, ResolverRecordsResponse, ResolverRecordsSelection};

use crate::interpreter::{
    format_address, record_calls, sanitize_name, sanitize_text, set_record, RecordCall,
};

/// Shape indexed records like `selection`, applying the same normalization as
/// live resolution. `None` records resolve every selected field to null.
pub fn format_indexed_records(
    selection: &ResolverRecordsSelection,
    records: Option<&IndexedResolverRecords>,
) -> ResolverRecordsResponse {
    let mut response = ResolverRecordsResponse::empty(selection);
    let Some(records) = records else {
        return response;
    };

    for call in record_calls(selection) {
        let value = match &call {
            RecordCall::Name => records.name.clone().and_then(sanitize_name),
            RecordCall::Address(coin_type) => records
                .address_records
                .iter()
                .find(|r| r.coin_type == *coin_type)
                .and_then(|r| hex::decode(&r.address).ok())
                .and_then(|raw| format_address(*coin_type, &raw)),
            RecordCall::Text(key) => records
                .text_records
                .iter()
                .find(|r| &r.key == key)
                .and_then(|r| sanitize_text(r.value.clone())),
        };
        set_record(&mut response, &call, value);
    }
    response
}
