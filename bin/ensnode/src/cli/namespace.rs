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

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use ensnode_types::NamespaceSpec;
use paste::paste;

/// Resolve the namespace from the hierarchy of
/// - ENV (`NAMESPACE_*`)
/// - file
/// - network flag
/// - defaults
pub fn resolve_namespace(
    network: &Option<String>,
    file: &Option<String>,
) -> anyhow::Result<NamespaceSpec> {
    let default =
        serde_json::to_string(&NamespaceSpec::default()).context("should serialize namespace")?;
    let mut config_builder =
        Config::builder().add_source(File::from_str(default.as_str(), FileFormat::Json));

    if let Some(network) = &network {
        config_builder = config_builder.add_source(File::from_str(
            get_hardcoded_namespace(network.to_lowercase().as_str())?,
            FileFormat::Toml,
        ));
    }
    if let Some(file) = &file {
        config_builder = config_builder.add_source(File::with_name(file.as_str()));
    }
    let c = config_builder
        .add_source(Environment::with_prefix("NAMESPACE"))
        .build()
        .context("should build namespace config")?;

    let namespace: NamespaceSpec = c
        .try_deserialize()
        .context("should deserialize namespace config")?;
    namespace.validate()?;
    Ok(namespace)
}

macro_rules! define_hardcoded_namespaces {
    ($($network:ident),+) => {
        paste! {
            $(
                const [< $network:upper _NAMESPACE >]: &str = include_str!(concat!("../../namespaces/", stringify!($network), ".toml"));
            )+

            fn get_hardcoded_namespace(network: &str) -> anyhow::Result<&'static str> {
                match network {
                    $(
                        stringify!($network) => Ok([< $network:upper _NAMESPACE >]),
                    )+
                    _ => anyhow::bail!("unknown hardcoded network: {}", network),
                }
            }

            pub const HARDCODED_NAMESPACES: &[&'static str] = &[$(stringify!($network),)+];
        }
    };
}

define_hardcoded_namespaces!(mainnet, sepolia);

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    #[test]
    fn test_hardcoded_namespaces_parse() {
        for network in HARDCODED_NAMESPACES {
            let namespace = resolve_namespace(&Some(network.to_string()), &None).unwrap();
            assert_eq!(namespace.name, *network);
            assert!(namespace.registry(namespace.root_chain_id).is_some());
        }
    }

    #[test]
    fn test_mainnet() {
        let namespace = resolve_namespace(&Some("mainnet".to_string()), &None).unwrap();
        assert_eq!(namespace.root_chain_id, 1);
        assert_eq!(
            namespace.deferral_target(1, address!("de9049636F4a1dfE0a64d1bFe3155C0A14C54F31")),
            Some(8453)
        );
        assert!(namespace.is_static_resolver(1, address!("231b0Ee14048e9dCcD1d247744d114a4EB5E8E63")));
    }

    #[test]
    fn test_unknown_network() {
        assert!(resolve_namespace(&Some("goerli".to_string()), &None).is_err());
        // the default namespace has no root chain
        assert!(resolve_namespace(&None, &None).is_err());
    }
}
