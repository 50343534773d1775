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

use std::panic::AssertUnwindSafe;

use futures::{Future, FutureExt};
use jsonrpsee::{
    core::RpcResult,
    types::{error::INTERNAL_ERROR_CODE, ErrorObjectOwned},
};

use crate::error::rpc_err;

pub(crate) async fn safe_call_rpc_handler<F, R, E>(rpc_name: &'static str, f: F) -> RpcResult<R>
where
    F: Future<Output = Result<R, E>> + Send,
    E: Into<ErrorObjectOwned>,
{
    let f = AssertUnwindSafe(f);
    match f.catch_unwind().await {
        Ok(r) => r.map_err(Into::into),
        Err(_) => {
            metrics::counter!("rpc_panic_count", "rpc_name" => rpc_name).increment(1);
            tracing::error!("PANIC in RPC handler: {}", rpc_name);
            Err(rpc_err(INTERNAL_ERROR_CODE, "internal error: panic, see logs"))
        }
    }
}

#[cfg(test)]
mod tests {
    use jsonrpsee::types::error::INVALID_PARAMS_CODE;

    use super::*;

    #[tokio::test]
    async fn test_passes_through_result() {
        let ok = safe_call_rpc_handler("ok", async { Ok::<_, ErrorObjectOwned>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = safe_call_rpc_handler("err", async {
            Err::<(), _>(rpc_err(INVALID_PARAMS_CODE, "bad"))
        })
        .await
        .unwrap_err();
        assert_eq!(err.code(), INVALID_PARAMS_CODE);
    }

    #[tokio::test]
    async fn test_catches_panic() {
        let err = safe_call_rpc_handler("panics", async {
            if true {
                panic!("boom");
            }
            Ok::<(), ErrorObjectOwned>(())
        })
        .await
        .unwrap_err();
        assert_eq!(err.code(), INTERNAL_ERROR_CODE);
    }
}
