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
use clap::Args;
use ensnode_resolution::{AccelerationSettings, ResolveOptions};
use ensnode_status::IndexingStatusHandle;
use ensnode_types::{CoinType, NamespaceSpec, ResolverRecordsSelection, ETH_COIN_TYPE};
use serde::Serialize;

use super::CommonArgs;

#[derive(Debug, Args)]
pub struct ResolveCliArgs {
    /// Normalized name to resolve
    name: String,

    /// Resolve the name record
    #[arg(long = "name", name = "select_name")]
    select_name: bool,

    /// Coin types of the address records to resolve
    #[arg(long = "address", value_delimiter = ',')]
    addresses: Vec<CoinType>,

    /// Keys of the text records to resolve
    #[arg(long = "text", value_delimiter = ',')]
    texts: Vec<String>,

    /// Chain to resolve on, the namespace root chain when unset
    #[arg(long = "chain_id")]
    chain_id: Option<u64>,
}

impl ResolveCliArgs {
    fn selection(&self) -> ResolverRecordsSelection {
        ResolverRecordsSelection {
            name: self.select_name,
            addresses: self.addresses.clone(),
            texts: self.texts.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct PrimaryNameCliArgs {
    /// Address to resolve the primary name of
    address: Address,

    /// Coin type of the chain the primary name is set for
    #[arg(long = "coin_type", default_value_t = ETH_COIN_TYPE)]
    coin_type: CoinType,
}

/// One shot commands always resolve live, there is no indexing status to trust
async fn live_resolver(
    common_args: &CommonArgs,
    namespace: NamespaceSpec,
) -> anyhow::Result<ensnode_resolution::ForwardResolver> {
    let providers = super::construct_providers(common_args)?;
    super::construct_resolver(
        common_args,
        namespace,
        &providers,
        Default::default(),
        AccelerationSettings {
            enabled: false,
            ..Default::default()
        },
        IndexingStatusHandle::new(),
    )
    .await
}

pub async fn run_resolve(
    args: ResolveCliArgs,
    common_args: CommonArgs,
    namespace: NamespaceSpec,
) -> anyhow::Result<()> {
    let resolver = live_resolver(&common_args, namespace).await?;
    let options = ResolveOptions {
        chain_id: args.chain_id,
        accelerate: false,
    };
    let outcome = resolver
        .resolve_records(&args.name, &args.selection(), options)
        .await?;
    print_json(&outcome)
}

pub async fn run_primary_name(
    args: PrimaryNameCliArgs,
    common_args: CommonArgs,
    namespace: NamespaceSpec,
) -> anyhow::Result<()> {
    let resolver = live_resolver(&common_args, namespace).await?;
    let outcome = resolver
        .resolve_primary_name(args.address, args.coin_type, ResolveOptions::default())
        .await?;
    print_json(&outcome)
}

pub(super) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
