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

use clap::Args;
use ensnode_index::ChainMetadataSource;
use ensnode_status::indexing_status_from_metadata;
use ensnode_types::Timestamp;

use super::{resolve::print_json, CommonArgs};

#[derive(Debug, Args)]
pub struct StatusCliArgs {
    /// Print the raw chain metadata instead of the derived status
    #[arg(long = "metadata")]
    metadata: bool,
}

pub async fn run(args: StatusCliArgs, common_args: CommonArgs) -> anyhow::Result<()> {
    let providers = super::construct_providers(&common_args)?;
    let indexing = super::load_indexing_config(&common_args)?;
    anyhow::ensure!(
        !indexing.chains.is_empty(),
        "indexing config must list at least one chain"
    );
    let source = super::construct_metadata_source(&common_args, indexing, &providers)?;

    let metadata = source.get_all_chain_metadata().await?;
    if args.metadata {
        return print_json(&metadata);
    }
    let status = indexing_status_from_metadata(&metadata, Timestamp::now())?;
    print_json(&status)
}
