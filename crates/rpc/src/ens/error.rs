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

use ensnode_resolution::ResolutionError;
use jsonrpsee::types::{
    error::{INTERNAL_ERROR_CODE, INVALID_PARAMS_CODE},
    ErrorObjectOwned,
};
use serde::Serialize;

use crate::error::{rpc_err, rpc_err_with_data};

/// No indexing status has been computed yet. Callers must not cache it.
pub(crate) const INDEXING_STATUS_UNAVAILABLE_CODE: i32 = -32010;
const UPSTREAM_UNAVAILABLE_CODE: i32 = -32011;
const RESOLUTION_FAILED_CODE: i32 = -32012;

pub(crate) type EnsResult<T> = Result<T, EnsRpcError>;

/// Error returned by the `ens_` namespace
#[derive(Debug, thiserror::Error)]
pub(crate) enum EnsRpcError {
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
    /// The request parameters are invalid
    #[error("{0}")]
    InvalidParams(String),
    /// The resolver cannot answer the name
    #[error("{0}")]
    ResolutionFailed(String),
    /// A chain RPC or the index could not be reached
    #[error("{0}")]
    UpstreamUnavailable(String),
    /// No indexing status was published yet
    #[error("indexing status is unavailable")]
    IndexingStatusUnavailable,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetryableData {
    retryable: bool,
}

impl From<ResolutionError> for EnsRpcError {
    fn from(error: ResolutionError) -> Self {
        if error.is_caller_error() {
            return Self::InvalidParams(error.to_string());
        }
        if error.is_retryable() {
            return Self::UpstreamUnavailable(error.to_string());
        }
        match error {
            ResolutionError::WildcardNotSupported { .. } => {
                Self::ResolutionFailed(error.to_string())
            }
            other => Self::Internal(other.into()),
        }
    }
}

impl From<EnsRpcError> for ErrorObjectOwned {
    fn from(error: EnsRpcError) -> Self {
        let msg = error.to_string();

        match error {
            EnsRpcError::Internal(_) => rpc_err(INTERNAL_ERROR_CODE, msg),
            EnsRpcError::InvalidParams(_) => rpc_err(INVALID_PARAMS_CODE, msg),
            EnsRpcError::ResolutionFailed(_) => rpc_err(RESOLUTION_FAILED_CODE, msg),
            EnsRpcError::UpstreamUnavailable(_) => rpc_err_with_data(
                UPSTREAM_UNAVAILABLE_CODE,
                msg,
                RetryableData { retryable: true },
            ),
            EnsRpcError::IndexingStatusUnavailable => {
                rpc_err(INDEXING_STATUS_UNAVAILABLE_CODE, msg)
            }
        }
    }
}
