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

//! Record calls and result interpretation.

use alloy_primitives::{hex, Address, Bytes, U256};
use alloy_sol_types::SolCall;
use ensnode_contracts::resolver::{IAddressResolver, INameResolver, ITextResolver};
use ensnode_types::{
    is_evm_coin_type, name::is_normalized_name, CoinType, Node, ResolverRecordsResponse,
    ResolverRecordsSelection,
};
use tracing::warn;

use crate::{ResolutionError, ResolutionResult};

/// A single resolver profile call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordCall {
    /// `name(node)`
    Name,
    /// `addr(node, coinType)`
    Address(CoinType),
    /// `text(node, key)`
    Text(String),
}

/// Calls implied by a selection, in selection order.
///
/// Duplicates are kept.
pub fn record_calls(selection: &ResolverRecordsSelection) -> Vec<RecordCall> {
    let name = selection.name.then_some(RecordCall::Name);
    name.into_iter()
        .chain(selection.addresses.iter().map(|c| RecordCall::Address(*c)))
        .chain(selection.texts.iter().map(|k| RecordCall::Text(k.clone())))
        .collect()
}

impl RecordCall {
    /// ABI encoded call for `node`
    pub fn encode(&self, node: Node) -> Bytes {
        match self {
            Self::Name => INameResolver::nameCall { node }.abi_encode(),
            Self::Address(coin_type) => IAddressResolver::addrCall {
                node,
                coinType: U256::from(*coin_type),
            }
            .abi_encode(),
            Self::Text(key) => ITextResolver::textCall {
                node,
                key: key.clone(),
            }
            .abi_encode(),
        }
        .into()
    }

    /// Interpret the raw return data of this call.
    ///
    /// `None` raw data means the call reverted. Empty return data is treated
    /// the same way. Undecodable return data is an error.
    pub fn interpret(&self, raw: Option<&Bytes>) -> ResolutionResult<Option<String>> {
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return Ok(None);
        };
        let decode_err = |e: alloy_sol_types::Error| {
            ResolutionError::Provider(ensnode_provider::ProviderError::ContractError(format!(
                "undecodable {self:?} result: {e}"
            )))
        };
        Ok(match self {
            Self::Name => {
                sanitize_name(INameResolver::nameCall::abi_decode_returns(raw).map_err(decode_err)?)
            }
            Self::Address(coin_type) => format_address(
                *coin_type,
                &IAddressResolver::addrCall::abi_decode_returns(raw).map_err(decode_err)?,
            ),
            Self::Text(_) => {
                sanitize_text(ITextResolver::textCall::abi_decode_returns(raw).map_err(decode_err)?)
            }
        })
    }
}

/// Set the interpreted value of a call on a response
pub(crate) fn set_record(
    response: &mut ResolverRecordsResponse,
    call: &RecordCall,
    value: Option<String>,
) {
    match call {
        RecordCall::Name => response.set_name(value),
        RecordCall::Address(coin_type) => response.set_address(*coin_type, value),
        RecordCall::Text(key) => response.set_text(key.clone(), value),
    }
}

/// A `name` record value, `None` if it is not a normalized name
pub(crate) fn sanitize_name(name: String) -> Option<String> {
    if name.is_empty() || !is_normalized_name(&name) {
        return None;
    }
    Some(name)
}

pub(crate) fn sanitize_text(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// An address record value.
///
/// EVM addresses are checksummed, the zero address is absent. Other coin
/// types are returned as hex of their raw bytes.
pub(crate) fn format_address(coin_type: CoinType, raw: &[u8]) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    if !is_evm_coin_type(coin_type) {
        return Some(hex::encode_prefixed(raw));
    }
    if raw.len() != 20 {
        warn!("malformed address record for coin type {coin_type}: {} bytes", raw.len());
        return None;
    }
    let address = Address::from_slice(raw);
    (!address.is_zero()).then(|| address.to_checksum(None))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, B256};
    use alloy_sol_types::SolValue;

    use super::*;

    #[test]
    fn test_record_calls_order() {
        let selection = ResolverRecordsSelection::default()
            .with_text("avatar")
            .with_address(60)
            .with_name()
            .with_text("avatar");
        assert_eq!(
            record_calls(&selection),
            vec![
                RecordCall::Name,
                RecordCall::Address(60),
                RecordCall::Text("avatar".to_string()),
                RecordCall::Text("avatar".to_string()),
            ]
        );
        assert!(record_calls(&ResolverRecordsSelection::default()).is_empty());
    }

    #[test]
    fn test_encode() {
        let data = RecordCall::Text("url".to_string()).encode(B256::ZERO);
        assert_eq!(&data[..4], ITextResolver::textCall::SELECTOR.as_slice());
        let data = RecordCall::Address(60).encode(B256::ZERO);
        assert_eq!(&data[..4], IAddressResolver::addrCall::SELECTOR.as_slice());
    }

    #[test]
    fn test_empty_address_is_null() {
        // addr returning "0x"
        let raw: Bytes = Bytes::new().abi_encode().into();
        assert_eq!(RecordCall::Address(60).interpret(Some(&raw)).unwrap(), None);
    }

    #[test]
    fn test_address_checksummed() {
        let vitalik = address!("d8da6bf26964af9d7eed9e03e53415d37aa96045");
        let raw: Bytes = Bytes::copy_from_slice(vitalik.as_slice()).abi_encode().into();
        assert_eq!(
            RecordCall::Address(60).interpret(Some(&raw)).unwrap().as_deref(),
            Some("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045")
        );
    }

    #[test]
    fn test_zero_and_malformed_address() {
        assert_eq!(format_address(60, Address::ZERO.as_slice()), None);
        assert_eq!(format_address(60, &[1, 2, 3]), None);
        // bitcoin script bytes are passed through
        assert_eq!(format_address(0, &[0x76, 0xa9]).as_deref(), Some("0x76a9"));
    }

    #[test]
    fn test_revert_is_null() {
        assert_eq!(RecordCall::Name.interpret(None).unwrap(), None);
        assert_eq!(RecordCall::Name.interpret(Some(&Bytes::new())).unwrap(), None);
    }

    #[test]
    fn test_name_sanitized() {
        let raw: Bytes = "vitalik.eth".to_string().abi_encode().into();
        assert_eq!(
            RecordCall::Name.interpret(Some(&raw)).unwrap().as_deref(),
            Some("vitalik.eth")
        );
        let raw: Bytes = "Vitalik.eth".to_string().abi_encode().into();
        assert_eq!(RecordCall::Name.interpret(Some(&raw)).unwrap(), None);
    }

    #[test]
    fn test_text() {
        let raw: Bytes = String::new().abi_encode().into();
        assert_eq!(
            RecordCall::Text("url".to_string()).interpret(Some(&raw)).unwrap(),
            None
        );
        let raw: Bytes = " https://ens.domains ".to_string().abi_encode().into();
        assert_eq!(
            RecordCall::Text("url".to_string())
                .interpret(Some(&raw))
                .unwrap()
                .as_deref(),
            Some(" https://ens.domains ")
        );
    }

    #[test]
    fn test_undecodable_is_error() {
        let raw = Bytes::from_static(&[1, 2, 3]);
        assert!(RecordCall::Text("url".to_string())
            .interpret(Some(&raw))
            .is_err());
    }
}
