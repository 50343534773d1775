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
use ensnode_index::IndexError;
use ensnode_provider::ProviderError;
use ensnode_types::CoinType;

/// Result of a resolution
pub type ResolutionResult<T> = Result<T, ResolutionError>;

/// Resolution errors.
///
/// Absence (no resolver, a reverted record call) is never an error.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// The name is not normalized
    #[error("name is not normalized: {0}")]
    UnnormalizedName(String),
    /// The record selection selects nothing
    #[error("record selection is empty")]
    EmptySelection,
    /// No registry or provider is configured for the chain
    #[error("unsupported chain {0}")]
    UnsupportedChain(u64),
    /// Primary names are only defined for EVM coin types
    #[error("unsupported coin type {0} for primary name resolution")]
    UnsupportedCoinType(CoinType),
    /// The resolver was found on an ancestor but does not implement ENSIP-10
    #[error("resolver {resolver} for {name} does not support wildcard resolution")]
    WildcardNotSupported {
        /// name being resolved
        name: String,
        /// active resolver
        resolver: Address,
    },
    /// Deferral between known resolvers returned to a chain and resolver already visited
    #[error("offchain lookup deferral cycle at resolver {resolver} on chain {chain_id}")]
    DeferralCycle {
        /// chain id
        chain_id: u64,
        /// resolver
        resolver: Address,
    },
    /// Protocol data is inconsistent
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    /// Chain RPC error
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// Index read error
    #[error(transparent)]
    Index(IndexError),
}

impl From<IndexError> for ResolutionError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::InvariantViolation(msg) => Self::InvariantViolation(msg),
            other => Self::Index(other),
        }
    }
}

impl ResolutionError {
    /// True if the caller supplied invalid input
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::UnnormalizedName(_)
                | Self::EmptySelection
                | Self::UnsupportedChain(_)
                | Self::UnsupportedCoinType(_)
        )
    }

    /// True for transient infrastructure failures
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Provider(ProviderError::RPC(_)) => true,
            Self::Index(e) => e.is_transient(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy() {
        assert!(ResolutionError::EmptySelection.is_caller_error());
        assert!(!ResolutionError::EmptySelection.is_retryable());

        let err = ResolutionError::from(IndexError::InvariantViolation("zero resolver".into()));
        assert!(matches!(err, ResolutionError::InvariantViolation(_)));
        assert!(!err.is_retryable());

        let err = ResolutionError::from(IndexError::Other(anyhow::anyhow!("connection reset")));
        assert!(err.is_retryable());
        assert!(!err.is_caller_error());
    }
}
