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

use alloy_primitives::Bytes;
use alloy_transport::TransportError;

/// Result of a provider method call
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Error enumeration for the provider traits
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// RPC error
    #[error(transparent)]
    RPC(TransportError),
    /// Contract error, e.g. undecodable return data
    #[error("Contract Error: {0}")]
    ContractError(String),
    /// The call reverted, with the revert data if the node returned any
    #[error("execution reverted: {0}")]
    Revert(Bytes),
    /// Internal errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProviderError {
    /// True if the error is a contract revert
    pub fn is_revert(&self) -> bool {
        matches!(self, Self::Revert(_))
    }

    /// Revert data, if the error is a revert
    pub fn revert_data(&self) -> Option<&Bytes> {
        match self {
            Self::Revert(data) => Some(data),
            _ => None,
        }
    }
}

impl From<TransportError> for ProviderError {
    fn from(err: TransportError) -> Self {
        if let Some(payload) = err.as_error_resp() {
            if let Some(data) = payload.as_revert_data() {
                return Self::Revert(data);
            }
            // nodes that omit revert data still report the revert in the message
            if payload.message.to_lowercase().contains("revert") {
                return Self::Revert(Bytes::new());
            }
        }
        Self::RPC(err)
    }
}

impl From<alloy_sol_types::Error> for ProviderError {
    fn from(err: alloy_sol_types::Error) -> Self {
        Self::ContractError(err.to_string())
    }
}
