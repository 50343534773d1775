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

//! Traits and utilities for interacting with ENSNode servers

use std::net::{IpAddr, SocketAddr};

use anyhow::Context;
use async_trait::async_trait;

/// Parse a listen address from a host and port.
///
/// The host must be an IP address, either IPv4 or IPv6.
pub fn parse_socket_addr(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let ip: IpAddr = host
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse()
        .with_context(|| format!("invalid listen host {host}"))?;
    Ok(SocketAddr::new(ip, port))
}

/// Status of a server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServerStatus {
    /// Server is serving requests.
    Serving,
    /// Server is not serving requests.
    NotServing,
}

/// A health check for a server.
#[async_trait]
pub trait HealthCheck: Send + Sync + 'static {
    /// Name of the server
    fn name(&self) -> &'static str;

    /// Check the status of the server.
    async fn status(&self) -> ServerStatus;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_socket_addr() {
        assert_eq!(
            parse_socket_addr("0.0.0.0", 3223).unwrap().to_string(),
            "0.0.0.0:3223"
        );
        assert_eq!(
            parse_socket_addr("[::1]", 3223).unwrap().to_string(),
            "[::1]:3223"
        );
        assert!(parse_socket_addr("localhost", 3223).is_err());
    }
}
