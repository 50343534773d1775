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

use alloy_sol_macro::sol;

sol! {
    interface UniversalResolver {
        /// `offset` is the byte offset into `name` of the ancestor the resolver was found on
        function findResolver(bytes calldata name)
            external
            view
            returns (address resolver, bytes32 node, uint256 offset);
    }
}
