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

//! SLIP-44 / ENSIP-9 coin types and the ENSIP-11 EVM chain mapping.

/// Coin type of an address record (ENSIP-9).
pub type CoinType = u64;

/// Coin type of Ethereum mainnet addresses.
pub const ETH_COIN_TYPE: CoinType = 60;

/// ENSIP-11 coin type covering every EVM chain (chain id 0).
pub const DEFAULT_EVM_COIN_TYPE: CoinType = 0x8000_0000;

/// Map an EVM chain id to its ENSIP-11 coin type.
///
/// Ethereum mainnet keeps its SLIP-44 coin type.
pub fn evm_chain_id_to_coin_type(chain_id: u64) -> CoinType {
    if chain_id == 1 {
        ETH_COIN_TYPE
    } else {
        DEFAULT_EVM_COIN_TYPE | (chain_id & 0x7fff_ffff)
    }
}

/// Map a coin type back to an EVM chain id. Returns `None` for non EVM coin types.
///
/// The default EVM coin type maps to chain id 0.
pub fn coin_type_to_evm_chain_id(coin_type: CoinType) -> Option<u64> {
    if coin_type == ETH_COIN_TYPE {
        return Some(1);
    }
    if coin_type & DEFAULT_EVM_COIN_TYPE != 0 && coin_type < 0x1_0000_0000 {
        return Some(coin_type & 0x7fff_ffff);
    }
    None
}

/// True if addresses of this coin type are 20 byte EVM addresses.
pub fn is_evm_coin_type(coin_type: CoinType) -> bool {
    coin_type_to_evm_chain_id(coin_type).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evm_coin_types() {
        assert_eq!(evm_chain_id_to_coin_type(1), 60);
        assert_eq!(evm_chain_id_to_coin_type(8453), 2147492101);
        assert_eq!(coin_type_to_evm_chain_id(2147492101), Some(8453));
        assert_eq!(coin_type_to_evm_chain_id(60), Some(1));
        assert_eq!(coin_type_to_evm_chain_id(DEFAULT_EVM_COIN_TYPE), Some(0));
    }

    #[test]
    fn test_non_evm_coin_types() {
        // bitcoin
        assert_eq!(coin_type_to_evm_chain_id(0), None);
        assert!(!is_evm_coin_type(0));
        assert!(!is_evm_coin_type(0x1_8000_0000));
    }
}
