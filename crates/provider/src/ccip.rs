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

//! EIP-3668 gateway client over HTTP

use std::time::Duration;

use alloy_primitives::{Address, Bytes};
use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::{CcipGateway, ProviderResult};

/// Gateway request built from a URL template
#[derive(Debug, PartialEq, Eq)]
enum GatewayRequest {
    Get(String),
    Post(String, serde_json::Value),
}

impl GatewayRequest {
    /// URLs containing `{data}` are fetched with GET, everything else with POST
    fn new(template: &str, sender: Address, call_data: &Bytes) -> Self {
        // EIP-3668 requires lowercase hex for both substitutions
        let sender = format!("{sender:#x}");
        let data = call_data.to_string();
        let url = template.replace("{sender}", &sender);
        if url.contains("{data}") {
            Self::Get(url.replace("{data}", &data))
        } else {
            Self::Post(url, json!({ "data": data, "sender": sender }))
        }
    }
}

#[derive(Deserialize)]
struct GatewayResponse {
    data: Bytes,
}

/// [`CcipGateway`] over reqwest
#[derive(Clone, Debug)]
pub struct HttpCcipGateway {
    client: Client,
}

impl HttpCcipGateway {
    /// Create a new gateway client with a per request timeout
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("should build gateway http client")?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl CcipGateway for HttpCcipGateway {
    async fn fetch(
        &self,
        sender: Address,
        urls: Vec<String>,
        call_data: Bytes,
    ) -> ProviderResult<Option<Bytes>> {
        for template in urls {
            let request = match GatewayRequest::new(&template, sender, &call_data) {
                GatewayRequest::Get(url) => self.client.get(url),
                GatewayRequest::Post(url, body) => self.client.post(url).json(&body),
            };
            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!("gateway {template} request failed: {e}");
                    continue;
                }
            };

            let status = response.status();
            if status.is_client_error() {
                // a 4xx is final for the whole lookup
                debug!("gateway {template} rejected lookup with {status}");
                return Ok(None);
            }
            if !status.is_success() {
                warn!("gateway {template} returned {status}");
                continue;
            }
            match response.json::<GatewayResponse>().await {
                Ok(body) => return Ok(Some(body.data)),
                Err(e) => warn!("gateway {template} returned an invalid body: {e}"),
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, bytes};

    use super::*;

    const SENDER: Address = address!("de9049636F4a1dfE0a64d1bFe3155C0A14C54F31");

    #[test]
    fn test_get_template() {
        let request = GatewayRequest::new(
            "https://gw.example/{sender}/{data}.json",
            SENDER,
            &bytes!("ABCD"),
        );
        assert_eq!(
            request,
            GatewayRequest::Get(
                "https://gw.example/0xde9049636f4a1dfe0a64d1bfe3155c0a14c54f31/0xabcd.json"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_post_template() {
        let request = GatewayRequest::new("https://gw.example/lookup", SENDER, &bytes!("abcd"));
        assert_eq!(
            request,
            GatewayRequest::Post(
                "https://gw.example/lookup".to_string(),
                json!({
                    "data": "0xabcd",
                    "sender": "0xde9049636f4a1dfe0a64d1bfe3155c0a14c54f31",
                })
            )
        );
    }

    #[tokio::test]
    async fn test_unreachable_gateways_exhaust() {
        let gateway = HttpCcipGateway::new(Duration::from_millis(200)).unwrap();
        let out = gateway
            .fetch(
                SENDER,
                vec!["http://127.0.0.1:1/{data}".to_string()],
                bytes!("00"),
            )
            .await
            .unwrap();
        assert_eq!(out, None);
    }
}
