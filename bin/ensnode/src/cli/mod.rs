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

use std::{collections::HashMap, sync::Arc, time::Duration};

use anyhow::Context;
use clap::{builder::PossibleValuesParser, Args, Parser, Subcommand};
use ensnode_index::{
    IndexedRecordsStore, IndexingConfig, InMemoryIndexStore, NodeResolverRelationStore,
    PonderMetadataSource, PostgresIndexStore,
};
use ensnode_provider::{EnsProvider, EvmEnsProvider, EvmProvider, HttpCcipGateway};
use ensnode_resolution::{
    AccelerationGate, AccelerationSettings, ChainProviders, ForwardResolver,
};
use ensnode_status::IndexingStatusHandle;
use ensnode_types::NamespaceSpec;
use url::Url;

mod metrics;
mod namespace;
mod node;
mod resolve;
mod status;
mod tracing;

use node::NodeCliArgs;
use resolve::{PrimaryNameCliArgs, ResolveCliArgs};
use status::StatusCliArgs;

/// Main entry point for the CLI
///
/// Parses the CLI arguments and runs the appropriate subcommand.
pub async fn run() -> anyhow::Result<()> {
    let opt = Cli::parse();
    let _guard = tracing::configure_logging(&opt.logs)?;
    tracing::info!("Parsed CLI options: {:#?}", opt);

    let namespace = namespace::resolve_namespace(&opt.common.network, &opt.common.namespace)?;
    tracing::info!("Namespace: {:#?}", namespace);

    match opt.command {
        Command::Node(args) => {
            let metrics_addr = format!("{}:{}", opt.metrics.host, opt.metrics.port).parse()?;
            metrics::initialize(
                metrics_addr,
                &opt.metrics.tags,
                Duration::from_millis(opt.metrics.sample_interval_millis),
            )
            .context("metrics server should start")?;
            node::run(*args, opt.common, namespace).await?
        }
        Command::Resolve(args) => resolve::run_resolve(args, opt.common, namespace).await?,
        Command::PrimaryName(args) => {
            resolve::run_primary_name(args, opt.common, namespace).await?
        }
        Command::Status(args) => status::run(args, opt.common).await?,
    }

    tracing::info!("Shutdown, goodbye");
    Ok(())
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Command {
    /// Node command
    ///
    /// Runs the indexing status refresher and the RPC server.
    #[command(name = "node")]
    Node(Box<NodeCliArgs>),

    /// Resolve command
    ///
    /// Resolves the records of a name once and prints them as JSON.
    #[command(name = "resolve")]
    Resolve(ResolveCliArgs),

    /// Primary name command
    ///
    /// Resolves the primary name of an address once and prints it as JSON.
    #[command(name = "primary-name")]
    PrimaryName(PrimaryNameCliArgs),

    /// Status command
    ///
    /// Fetches the indexer's chain metadata once and prints the overall indexing status.
    #[command(name = "status")]
    Status(StatusCliArgs),
}

/// CLI common options
#[derive(Debug, Args)]
#[command(next_help_heading = "Common")]
pub struct CommonArgs {
    /// Network flag
    #[arg(
        long = "network",
        name = "network",
        env = "NETWORK",
        value_parser = PossibleValuesParser::new(namespace::HARDCODED_NAMESPACES),
        global = true
    )]
    network: Option<String>,

    /// Namespace file path
    #[arg(
        long = "namespace",
        name = "namespace",
        env = "NAMESPACE_FILE",
        global = true
    )]
    namespace: Option<String>,

    /// Chain RPC URLs
    ///
    /// Format: chainId=url,chainId=url,...
    #[arg(
        long = "chain_rpc",
        name = "chain_rpc",
        env = "CHAIN_RPC",
        value_delimiter = ',',
        value_parser = parse_chain_url,
        global = true
    )]
    chain_rpc: Vec<(u64, String)>,

    #[arg(
        long = "provider_client_timeout_seconds",
        name = "provider_client_timeout_seconds",
        env = "PROVIDER_CLIENT_TIMEOUT_SECONDS",
        default_value = "10",
        global = true
    )]
    provider_client_timeout_seconds: u64,

    /// Timeout of a single CCIP-Read gateway request
    #[arg(
        long = "ccip_gateway_timeout_seconds",
        name = "ccip_gateway_timeout_seconds",
        env = "CCIP_GATEWAY_TIMEOUT_SECONDS",
        default_value = "10",
        global = true
    )]
    ccip_gateway_timeout_seconds: u64,

    /// Indexing config file path (JSON)
    #[arg(
        long = "indexing_config_path",
        name = "indexing_config_path",
        env = "INDEXING_CONFIG_PATH",
        global = true
    )]
    indexing_config_path: Option<String>,

    /// Base URL of the indexer's status and metrics endpoints
    #[arg(
        long = "indexer_url",
        name = "indexer_url",
        env = "INDEXER_URL",
        global = true
    )]
    indexer_url: Option<Url>,

    #[arg(
        long = "indexer_timeout_seconds",
        name = "indexer_timeout_seconds",
        env = "INDEXER_TIMEOUT_SECONDS",
        default_value = "5",
        global = true
    )]
    indexer_timeout_seconds: u64,

    /// Index database URL, indexed data is never used when unset
    #[arg(
        long = "database_url",
        name = "database_url",
        env = "DATABASE_URL",
        global = true
    )]
    database_url: Option<String>,

    #[arg(
        long = "database_schema",
        name = "database_schema",
        env = "DATABASE_SCHEMA",
        default_value = "public",
        global = true
    )]
    database_schema: String,

    #[arg(
        long = "database_max_connections",
        name = "database_max_connections",
        env = "DATABASE_MAX_CONNECTIONS",
        default_value = "10",
        global = true
    )]
    database_max_connections: u32,
}

fn parse_chain_url(s: &str) -> Result<(u64, String), anyhow::Error> {
    let (chain_id, url) = s
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("invalid chainId=url: no `=` found in `{}`", s))?;
    Ok((chain_id.parse()?, url.to_string()))
}

/// CLI options for the metrics server
#[derive(Debug, Args)]
#[command(next_help_heading = "Metrics")]
pub struct MetricsArgs {
    /// Port to listen on for metrics requests
    #[arg(
        long = "metrics.port",
        name = "metrics.port",
        env = "METRICS_PORT",
        default_value = "8080",
        global = true
    )]
    port: u16,

    /// Host to listen on for metrics requests
    #[arg(
        long = "metrics.host",
        name = "metrics.host",
        env = "METRICS_HOST",
        default_value = "0.0.0.0",
        global = true
    )]
    host: String,

    /// Tags for metrics
    ///
    /// Format: key1=value1,key2=value2,...
    #[arg(
        long = "metrics.tags",
        name = "metrics.tags",
        env = "METRICS_TAGS",
        default_values_t = Vec::<String>::new(),
        value_delimiter = ',',
        global = true
    )]
    tags: Vec<String>,

    /// Sample interval for sampling process metrics
    #[arg(
        long = "metrics.sample_interval_millis",
        name = "metrics.sample_interval_millis",
        env = "METRICS_SAMPLE_INTERVAL_MILLIS",
        default_value = "1000",
        global = true
    )]
    sample_interval_millis: u64,
}

/// CLI options for logging
#[derive(Debug, Args)]
#[command(next_help_heading = "Logging")]
pub struct LogsArgs {
    /// Log file
    ///
    /// If not provided, logs will be written to stdout
    #[arg(
        long = "log.file",
        name = "log.file",
        env = "LOG_FILE",
        default_value = None,
        global = true
    )]
    file: Option<String>,

    /// Log JSON
    ///
    /// If set, logs will be written in JSON format
    #[arg(
        long = "log.json",
        name = "log.json",
        env = "LOG_JSON",
        required = false,
        num_args = 0,
        global = true
    )]
    json: bool,

    /// Roll the log file over daily
    #[arg(
        long = "log.rotate_daily",
        name = "log.rotate_daily",
        env = "LOG_ROTATE_DAILY",
        required = false,
        num_args = 0,
        global = true
    )]
    rotate_daily: bool,

    /// Default log filter, overridden by `RUST_LOG`
    #[arg(
        long = "log.level",
        name = "log.level",
        env = "LOG_LEVEL",
        default_value = "info",
        global = true
    )]
    level: String,
}

/// CLI options
#[derive(Debug, Parser)]
#[command(name = "ensnode", version)]
pub struct Cli {
    #[clap(subcommand)]
    command: Command,

    #[clap(flatten)]
    common: CommonArgs,

    #[clap(flatten)]
    metrics: MetricsArgs,

    #[clap(flatten)]
    logs: LogsArgs,
}

/// Per chain providers built from the common args
pub struct Providers {
    evm: HashMap<u64, Arc<dyn EvmProvider>>,
    ens: ChainProviders,
}

pub fn construct_providers(args: &CommonArgs) -> anyhow::Result<Providers> {
    let gateway =
        HttpCcipGateway::new(Duration::from_secs(args.ccip_gateway_timeout_seconds))?;
    let mut evm: HashMap<u64, Arc<dyn EvmProvider>> = HashMap::new();
    let mut ens: ChainProviders = HashMap::new();
    for (chain_id, url) in &args.chain_rpc {
        let provider = ensnode_provider::new_alloy_evm_provider(
            *chain_id,
            url,
            args.provider_client_timeout_seconds,
        )
        .with_context(|| format!("should build provider for chain {chain_id}"))?;
        evm.insert(*chain_id, Arc::new(provider.clone()));
        ens.insert(
            *chain_id,
            Arc::new(EvmEnsProvider::new(provider, gateway.clone())),
        );
    }
    Ok(Providers { evm, ens })
}

pub fn load_indexing_config(args: &CommonArgs) -> anyhow::Result<IndexingConfig> {
    let Some(path) = &args.indexing_config_path else {
        return Ok(IndexingConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("should read indexing config from {path}"))?;
    let config = IndexingConfig::from_json(&json)
        .with_context(|| format!("should parse indexing config from {path}"))?;
    tracing::info!("Indexing config: {:?}", config);
    Ok(config)
}

pub fn construct_metadata_source(
    args: &CommonArgs,
    config: IndexingConfig,
    providers: &Providers,
) -> anyhow::Result<PonderMetadataSource> {
    let url = args
        .indexer_url
        .clone()
        .context("must provide indexer_url")?;
    PonderMetadataSource::new(
        url,
        config,
        providers.evm.clone(),
        Duration::from_secs(args.indexer_timeout_seconds),
    )
}

pub async fn construct_resolver(
    args: &CommonArgs,
    namespace: NamespaceSpec,
    providers: &Providers,
    indexing: IndexingConfig,
    acceleration: AccelerationSettings,
    status: IndexingStatusHandle,
) -> anyhow::Result<ForwardResolver> {
    for chain_id in namespace.chain_ids() {
        if !providers.ens.contains_key(&chain_id) {
            tracing::warn!("No RPC configured for chain {chain_id}, names on it will not resolve");
        }
    }

    let relations: Arc<dyn NodeResolverRelationStore>;
    let records: Arc<dyn IndexedRecordsStore>;
    if let Some(url) = &args.database_url {
        let store = Arc::new(
            PostgresIndexStore::connect(url, &args.database_schema, args.database_max_connections)
                .await?,
        );
        relations = store.clone();
        records = store;
    } else {
        // nothing is indexed, the acceleration gate stays closed
        let store = Arc::new(InMemoryIndexStore::default());
        relations = store.clone();
        records = store;
    }
    let acceleration = AccelerationSettings {
        enabled: acceleration.enabled && args.database_url.is_some(),
        ..acceleration
    };

    let gate = AccelerationGate::new(acceleration, Arc::new(indexing), status);
    Ok(ForwardResolver::new(
        Arc::new(namespace),
        Arc::new(providers.ens.clone()),
        relations,
        records,
        gate,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chain_url() {
        assert_eq!(
            parse_chain_url("8453=https://base.example").unwrap(),
            (8453, "https://base.example".to_string())
        );
        assert!(parse_chain_url("https://base.example").is_err());
        assert!(parse_chain_url("base=https://base.example").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "ensnode",
            "--network",
            "mainnet",
            "--chain_rpc",
            "1=http://localhost:8545,8453=http://localhost:8546",
            "resolve",
            "vitalik.eth",
            "--address",
            "60",
            "--text",
            "avatar",
        ])
        .unwrap();
        assert_eq!(cli.common.chain_rpc.len(), 2);
        assert!(matches!(cli.command, Command::Resolve(_)));
    }
}
