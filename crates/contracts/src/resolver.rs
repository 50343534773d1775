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
use alloy_sol_types::SolCall;

sol! {
    interface IAddressResolver {
        function addr(bytes32 node, uint256 coinType) external view returns (bytes memory);
    }

    interface ITextResolver {
        function text(bytes32 node, string calldata key) external view returns (string memory);
    }

    interface INameResolver {
        function name(bytes32 node) external view returns (string memory);
    }

    interface IExtendedResolver {
        function resolve(bytes memory name, bytes memory data) external view returns (bytes memory);
    }

    interface IERC165 {
        function supportsInterface(bytes4 interfaceID) external view returns (bool);
    }
}

/// ENSIP-10 interface id of `IExtendedResolver`
pub const EXTENDED_RESOLVER_INTERFACE_ID: FixedBytes<4> = FixedBytes([0x90, 0x61, 0xb9, 0x23]);

/// Wrap a resolver profile call in the ENSIP-10 `resolve(bytes,bytes)` envelope
pub fn encode_extended_call(dns_encoded_name: Bytes, call_data: Bytes) -> Bytes {
    IExtendedResolver::resolveCall {
        name: dns_encoded_name,
        data: call_data,
    }
    .abi_encode()
    .into()
}

/// Selector of a raw calldata payload, if it is long enough to carry one
pub fn selector(call_data: &[u8]) -> Option<FixedBytes<4>> {
    call_data.get(..4).map(FixedBytes::from_slice)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{hex, B256, U256};

    use super::*;

    #[test]
    fn test_extended_resolver_interface_id() {
        assert_eq!(
            EXTENDED_RESOLVER_INTERFACE_ID,
            FixedBytes(IExtendedResolver::resolveCall::SELECTOR)
        );
    }

    #[test]
    fn test_encode_extended_call() {
        let inner: Bytes = IAddressResolver::addrCall {
            node: B256::ZERO,
            coinType: U256::from(60),
        }
        .abi_encode()
        .into();
        let wrapped = encode_extended_call(Bytes::from_static(b"\x03eth\x00"), inner.clone());
        assert_eq!(&wrapped[..4], hex!("9061b923").as_slice());
        let decoded = IExtendedResolver::resolveCall::abi_decode(&wrapped).unwrap();
        assert_eq!(decoded.data, inner);
        assert_eq!(
            selector(&inner),
            Some(FixedBytes(IAddressResolver::addrCall::SELECTOR))
        );
    }
}
