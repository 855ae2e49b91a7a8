//! GraphQL Query Abstractions
//!
//! The host resolves statistics and album metadata through persisted GraphQL
//! queries. A query is addressed by its SHA-256 hash rather than by its text,
//! and the host keeps a catalog of known definitions keyed by symbolic name
//! (e.g. `getAlbum`). Two capabilities are modeled here:
//!
//! - [`QueryRegistry`] - the shared, mutable catalog of [`QueryDefinition`]s
//! - [`QueryExecutor`] - the generic execution mechanism taking a definition
//!   plus variables and returning the raw response envelope
//!
//! Response envelopes are returned untyped (`serde_json::Value`). Shape checks
//! belong to the caller, which knows which nested path it expects.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::Result;

/// GraphQL operation kind of a persisted query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryOperation {
    Query,
    Mutation,
}

/// Persisted query definition as stored in the host catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDefinition {
    /// Human-readable operation name
    pub name: String,
    /// Operation kind
    pub operation: QueryOperation,
    /// 64-character hex hash naming the query version on the backend
    pub sha256_hash: String,
    /// Cached value slot; `None` until the host fills it
    pub value: Option<serde_json::Value>,
}

impl QueryDefinition {
    /// Create a query definition with an empty cached value.
    pub fn query(name: impl Into<String>, sha256_hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operation: QueryOperation::Query,
            sha256_hash: sha256_hash.into(),
            value: None,
        }
    }
}

/// Shared catalog of query definitions keyed by symbolic name
///
/// Methods are synchronous: the catalog is an in-process lookup table, never
/// a remote store.
pub trait QueryRegistry: Send + Sync {
    /// Look up a definition by name
    fn get(&self, name: &str) -> Option<QueryDefinition>;

    /// Install or replace a definition
    fn set(&self, name: &str, definition: QueryDefinition);

    /// Check whether a definition is installed
    fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Generic GraphQL execution mechanism
///
/// # Example
///
/// ```ignore
/// use bridge_traits::graphql::{QueryExecutor, QueryRegistry};
///
/// async fn album(executor: &dyn QueryExecutor, registry: &dyn QueryRegistry) -> Result<()> {
///     let definition = registry.get("getAlbum").expect("registered");
///     let envelope = executor
///         .execute(&definition, serde_json::json!({ "uri": "spotify:album:1" }))
///         .await?;
///     println!("{}", envelope["data"]);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute a persisted query and return the response envelope
    ///
    /// # Errors
    ///
    /// Returns error on transport or authentication failure. Errors are
    /// propagated to callers unchanged.
    async fn execute(
        &self,
        definition: &QueryDefinition,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value>;
}

/// Process-local query catalog backed by a `HashMap`
#[derive(Debug, Default)]
pub struct InMemoryQueryRegistry {
    definitions: RwLock<HashMap<String, QueryDefinition>>,
}

impl InMemoryQueryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the catalog with host-provided definitions
    pub fn with_definitions(definitions: impl IntoIterator<Item = QueryDefinition>) -> Self {
        let map = definitions
            .into_iter()
            .map(|definition| (definition.name.clone(), definition))
            .collect();

        Self {
            definitions: RwLock::new(map),
        }
    }

    pub fn len(&self) -> usize {
        self.definitions
            .read()
            .map(|definitions| definitions.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl QueryRegistry for InMemoryQueryRegistry {
    fn get(&self, name: &str) -> Option<QueryDefinition> {
        // A poisoned lock still holds a consistent map: writers only insert.
        let definitions = self
            .definitions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        definitions.get(name).cloned()
    }

    fn set(&self, name: &str, definition: QueryDefinition) {
        let mut definitions = self
            .definitions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        definitions.insert(name.to_string(), definition);
    }
}
