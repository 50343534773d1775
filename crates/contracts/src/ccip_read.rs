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

use alloy_primitives::{Bytes, FixedBytes};
use alloy_sol_macro::sol;
use alloy_sol_types::SolValue;

sol! {
    /// EIP-3668 off-chain lookup revert
    #[derive(Debug, PartialEq, Eq)]
    error OffchainLookup(
        address sender,
        string[] urls,
        bytes callData,
        bytes4 callbackFunction,
        bytes extraData
    );
}

/// Encode the callback an `OffchainLookup` asks for, `callbackFunction(response, extraData)`
pub fn encode_callback(callback: FixedBytes<4>, response: Bytes, extra_data: Bytes) -> Bytes {
    let mut data = callback.to_vec();
    data.extend((response, extra_data).abi_encode_params());
    data.into()
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, bytes};
    use alloy_sol_types::SolError;

    use super::*;

    #[test]
    fn test_offchain_lookup_roundtrip_selector() {
        let lookup = OffchainLookup {
            sender: address!("de9049636F4a1dfE0a64d1bFe3155C0A14C54F31"),
            urls: vec!["https://gateway.example/{sender}/{data}.json".to_string()],
            callData: bytes!("deadbeef"),
            callbackFunction: FixedBytes([1, 2, 3, 4]),
            extraData: bytes!("cafe"),
        };
        let encoded = lookup.abi_encode();
        assert_eq!(&encoded[..4], OffchainLookup::SELECTOR.as_slice());
        assert_eq!(OffchainLookup::abi_decode(&encoded).unwrap(), lookup);
    }

    #[test]
    fn test_encode_callback() {
        let data = encode_callback(FixedBytes([1, 2, 3, 4]), bytes!("aa"), bytes!("bb"));
        assert_eq!(&data[..4], &[1, 2, 3, 4]);
        let (response, extra) =
            <(Bytes, Bytes)>::abi_decode_params(&data[4..]).unwrap();
        assert_eq!(response, bytes!("aa"));
        assert_eq!(extra, bytes!("bb"));
    }
}
