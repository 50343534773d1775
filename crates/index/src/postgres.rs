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

//! Postgres backed index store over the indexer's schema.

use alloy_primitives::Address;
use anyhow::Context;
use ensnode_types::{
    CoinType, IndexedAddressRecord, IndexedResolverRecords, IndexedTextRecord, Node,
    NodeResolverRelation,
};
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    FromRow,
};
use tracing::debug;

use crate::{IndexError, IndexResult, IndexedRecordsStore, NodeResolverRelationStore};

#[derive(FromRow)]
struct RelationRow {
    node: String,
    resolver: String,
}

#[derive(FromRow)]
struct RecordsRow {
    name: Option<String>,
}

#[derive(FromRow)]
struct AddressRecordRow {
    coin_type: i64,
    address: String,
}

#[derive(FromRow)]
struct TextRecordRow {
    key: String,
    value: String,
}

/// Index store reading the indexer's Postgres schema.
///
/// Hex values (nodes, addresses) are stored as `0x` prefixed lowercase text.
#[derive(Clone, Debug)]
pub struct PostgresIndexStore {
    pool: PgPool,
    schema: String,
}

impl PostgresIndexStore {
    /// Connect to the database
    pub async fn connect(url: &str, schema: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .context("should connect to index database")?;
        Self::new(pool, schema)
    }

    /// Create a store over an existing pool
    pub fn new(pool: PgPool, schema: &str) -> anyhow::Result<Self> {
        anyhow::ensure!(
            is_valid_identifier(schema),
            "invalid database schema name: {schema}"
        );
        Ok(Self {
            pool,
            schema: schema.to_string(),
        })
    }

    fn table(&self, name: &str) -> String {
        format!("\"{}\".{name}", self.schema)
    }
}

#[async_trait::async_trait]
impl NodeResolverRelationStore for PostgresIndexStore {
    async fn find_node_resolver_relations(
        &self,
        chain_id: u64,
        nodes: Vec<Node>,
    ) -> IndexResult<Vec<NodeResolverRelation>> {
        let nodes: Vec<String> = nodes.iter().map(|n| format!("{n:#x}")).collect();
        let rows = sqlx::query_as::<_, RelationRow>(&format!(
            "SELECT node, resolver FROM {} WHERE chain_id = $1 AND node = ANY($2)",
            self.table("node_resolver_relation")
        ))
        .bind(chain_id_param(chain_id)?)
        .bind(&nodes)
        .fetch_all(&self.pool)
        .await?;
        debug!(
            "found {} resolver relations for {} nodes on chain {chain_id}",
            rows.len(),
            nodes.len()
        );

        rows.into_iter()
            .map(|row| {
                let node: Node = parse_hex(&row.node, "node")?;
                let resolver: Address = parse_hex(&row.resolver, "resolver")?;
                if resolver.is_zero() {
                    return Err(IndexError::InvariantViolation(format!(
                        "node {node} on chain {chain_id} has a zero address resolver relation"
                    )));
                }
                Ok(NodeResolverRelation { node, resolver })
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl IndexedRecordsStore for PostgresIndexStore {
    async fn get_indexed_resolver_records(
        &self,
        chain_id: u64,
        resolver: Address,
        node: Node,
    ) -> IndexResult<Option<IndexedResolverRecords>> {
        let chain_id_param = chain_id_param(chain_id)?;
        let resolver = format!("{resolver:#x}");
        let node = format!("{node:#x}");

        let records_query = format!(
            "SELECT name FROM {} WHERE chain_id = $1 AND resolver = $2 AND node = $3",
            self.table("resolver_records")
        );
        let addresses_query = format!(
            "SELECT coin_type, address FROM {} WHERE chain_id = $1 AND resolver = $2 AND node = $3",
            self.table("resolver_address_record")
        );
        let texts_query = format!(
            "SELECT key, value FROM {} WHERE chain_id = $1 AND resolver = $2 AND node = $3",
            self.table("resolver_text_record")
        );

        let (records, addresses, texts) = futures::try_join!(
            sqlx::query_as::<_, RecordsRow>(&records_query)
                .bind(chain_id_param)
                .bind(&resolver)
                .bind(&node)
                .fetch_optional(&self.pool),
            sqlx::query_as::<_, AddressRecordRow>(&addresses_query)
                .bind(chain_id_param)
                .bind(&resolver)
                .bind(&node)
                .fetch_all(&self.pool),
            sqlx::query_as::<_, TextRecordRow>(&texts_query)
                .bind(chain_id_param)
                .bind(&resolver)
                .bind(&node)
                .fetch_all(&self.pool),
        )?;

        let Some(records) = records else {
            return Ok(None);
        };

        let address_records = addresses
            .into_iter()
            .map(|row| {
                let coin_type = CoinType::try_from(row.coin_type).map_err(|_| {
                    IndexError::InvariantViolation(format!("negative coin type {}", row.coin_type))
                })?;
                Ok(IndexedAddressRecord {
                    coin_type,
                    address: row.address,
                })
            })
            .collect::<IndexResult<Vec<_>>>()?;
        let text_records = texts
            .into_iter()
            .map(|row| IndexedTextRecord {
                key: row.key,
                value: row.value,
            })
            .collect();

        Ok(Some(IndexedResolverRecords {
            name: records.name,
            address_records,
            text_records,
        }))
    }
}

fn chain_id_param(chain_id: u64) -> IndexResult<i64> {
    i64::try_from(chain_id)
        .map_err(|_| IndexError::Other(anyhow::anyhow!("chain id {chain_id} out of range")))
}

fn parse_hex<T: std::str::FromStr>(value: &str, what: &str) -> IndexResult<T> {
    value
        .parse()
        .map_err(|_| IndexError::InvariantViolation(format!("invalid {what} in index: {value}")))
}

fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 63
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;

    use super::*;

    #[test]
    fn test_schema_names() {
        assert!(is_valid_identifier("ensindexer_0"));
        assert!(is_valid_identifier("public"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("x\"; DROP TABLE y; --"));
    }

    #[test]
    fn test_parse_hex() {
        let node: Node = parse_hex(&B256::repeat_byte(1).to_string(), "node").unwrap();
        assert_eq!(node, B256::repeat_byte(1));
        assert!(matches!(
            parse_hex::<Address>("0xnope", "resolver"),
            Err(IndexError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_chain_id_param() {
        assert_eq!(chain_id_param(8453).unwrap(), 8453);
        assert!(chain_id_param(u64::MAX).is_err());
    }
}
