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

use ensnode_provider::ProviderError;

/// Result of an index read
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors reading from the indexing pipeline
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Database error
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    /// HTTP error talking to the indexer
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// Chain RPC error
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// Indexed data breaks a protocol assumption
    #[error("index invariant violation: {0}")]
    InvariantViolation(String),
    /// Internal errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IndexError {
    /// True for infrastructure errors that may succeed on retry
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::InvariantViolation(_))
    }
}
