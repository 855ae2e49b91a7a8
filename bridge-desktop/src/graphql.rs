//! Persisted GraphQL query executor
//!
//! Desktop hosts have no in-process GraphQL client, so queries are sent to
//! the partner pathfinder endpoint as persisted queries: the request carries
//! the operation name, the variables and the definition's SHA-256 hash, never
//! the query text.
//!
//! ## Request body
//!
//! ```json
//! {
//!     "operationName": "userTopContent",
//!     "variables": { ... },
//!     "extensions": { "persistedQuery": { "version": 1, "sha256Hash": "..." } }
//! }
//! ```

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    graphql::{QueryDefinition, QueryExecutor},
    http::{HttpClient, HttpRequest},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Pathfinder persisted-query endpoint
pub const PATHFINDER_ENDPOINT: &str = "https://api-partner.spotify.com/pathfinder/v1/query";

/// Persisted query protocol version
const PERSISTED_QUERY_VERSION: u8 = 1;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedQueryRequest<'a> {
    operation_name: &'a str,
    variables: serde_json::Value,
    extensions: Extensions<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Extensions<'a> {
    persisted_query: PersistedQuery<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedQuery<'a> {
    version: u8,
    sha256_hash: &'a str,
}

/// Subset of the envelope inspected before handing it back
///
/// Error entries stay untyped: `"errors": null` and entries without a
/// `message` must not fail a response.
#[derive(Debug, Deserialize)]
struct EnvelopeSummary {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Option<Vec<serde_json::Value>>,
}

impl EnvelopeSummary {
    fn error_messages(&self) -> Vec<&str> {
        self.errors
            .iter()
            .flatten()
            .map(|entry| {
                entry
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("unknown error")
            })
            .collect()
    }
}

/// `QueryExecutor` posting persisted queries over an [`HttpClient`]
pub struct PathfinderQueryExecutor {
    http_client: Arc<dyn HttpClient>,
    endpoint: String,
    access_token: String,
}

impl PathfinderQueryExecutor {
    /// Create an executor against the default pathfinder endpoint
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `access_token` - Web player access token
    pub fn new(http_client: Arc<dyn HttpClient>, access_token: impl Into<String>) -> Self {
        Self::with_endpoint(http_client, PATHFINDER_ENDPOINT, access_token)
    }

    pub fn with_endpoint(
        http_client: Arc<dyn HttpClient>,
        endpoint: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
            access_token: access_token.into(),
        }
    }

    fn build_request(
        &self,
        definition: &QueryDefinition,
        variables: serde_json::Value,
    ) -> Result<HttpRequest> {
        let body = PersistedQueryRequest {
            operation_name: &definition.name,
            variables,
            extensions: Extensions {
                persisted_query: PersistedQuery {
                    version: PERSISTED_QUERY_VERSION,
                    sha256_hash: &definition.sha256_hash,
                },
            },
        };

        HttpRequest::post(self.endpoint.as_str())
            .bearer_token(self.access_token.as_str())
            .accept_json()
            .json(&body)
    }
}

#[async_trait]
impl QueryExecutor for PathfinderQueryExecutor {
    #[instrument(skip(self, definition, variables), fields(operation = %definition.name))]
    async fn execute(
        &self,
        definition: &QueryDefinition,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let request = self.build_request(definition, variables)?;
        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            warn!(status = response.status, "Persisted query rejected");
            return Err(BridgeError::OperationFailed(format!(
                "GraphQL request {} failed with HTTP {}",
                definition.name, response.status
            )));
        }

        let envelope: serde_json::Value = response.json()?;
        let summary: EnvelopeSummary = serde_json::from_value(envelope.clone()).map_err(|e| {
            BridgeError::OperationFailed(format!("Malformed GraphQL envelope: {}", e))
        })?;
        let messages = summary.error_messages();

        if summary.data.is_none() && !messages.is_empty() {
            return Err(BridgeError::OperationFailed(format!(
                "GraphQL request {} failed: {}",
                definition.name,
                messages.join("; ")
            )));
        }

        debug!(errors = messages.len(), "Persisted query completed");
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::http::{HttpMethod, HttpResponse};
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
        }
    }

    const HASH: &str = "feedfacefeedfacefeedfacefeedfacefeedfacefeedfacefeedfacefeedface";

    fn response(status: u16, body: serde_json::Value) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    #[tokio::test]
    async fn test_execute_posts_persisted_query() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|request| {
                let body: serde_json::Value =
                    serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
                request.method == HttpMethod::Post
                    && request.url == PATHFINDER_ENDPOINT
                    && request.headers.get("Authorization") == Some(&"Bearer token".to_string())
                    && body["operationName"] == "getAlbum"
                    && body["variables"]["uri"] == "spotify:album:1"
                    && body["extensions"]["persistedQuery"]["version"] == 1
                    && body["extensions"]["persistedQuery"]["sha256Hash"] == HASH
            })
            .times(1)
            .returning(|_| {
                Ok(response(
                    200,
                    serde_json::json!({ "data": { "albumUnion": { "name": "A" } } }),
                ))
            });

        let executor = PathfinderQueryExecutor::new(Arc::new(http), "token");
        let envelope = executor
            .execute(
                &QueryDefinition::query("getAlbum", HASH),
                serde_json::json!({ "uri": "spotify:album:1" }),
            )
            .await
            .unwrap();

        assert_eq!(envelope["data"]["albumUnion"]["name"], "A");
    }

    #[tokio::test]
    async fn test_execute_maps_http_failure() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .returning(|_| Ok(response(401, serde_json::json!({}))));

        let executor = PathfinderQueryExecutor::new(Arc::new(http), "expired");
        let result = executor
            .execute(&QueryDefinition::query("getAlbum", HASH), serde_json::json!({}))
            .await;

        match result {
            Err(BridgeError::OperationFailed(msg)) => assert!(msg.contains("HTTP 401")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execute_surfaces_graphql_errors_without_data() {
        let mut http = MockHttpClient::new();
        http.expect_execute().returning(|_| {
            Ok(response(
                200,
                serde_json::json!({ "errors": [{ "message": "PersistedQueryNotFound" }] }),
            ))
        });

        let executor = PathfinderQueryExecutor::new(Arc::new(http), "token");
        let result = executor
            .execute(
                &QueryDefinition::query("userTopContent", HASH),
                serde_json::json!({}),
            )
            .await;

        match result {
            Err(BridgeError::OperationFailed(msg)) => {
                assert!(msg.contains("PersistedQueryNotFound"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execute_keeps_partial_data_with_errors() {
        let mut http = MockHttpClient::new();
        http.expect_execute().returning(|_| {
            Ok(response(
                200,
                serde_json::json!({
                    "data": { "me": null },
                    "errors": [{ "message": "partial" }]
                }),
            ))
        });

        let executor = PathfinderQueryExecutor::new(Arc::new(http), "token");
        let envelope = executor
            .execute(
                &QueryDefinition::query("userTopContent", HASH),
                serde_json::json!({}),
            )
            .await
            .unwrap();

        assert!(envelope["data"]["me"].is_null());
    }

    #[tokio::test]
    async fn test_execute_tolerates_null_or_messageless_errors() {
        for errors in [serde_json::Value::Null, serde_json::json!([{ "path": ["me"] }])] {
            let mut http = MockHttpClient::new();
            let body = serde_json::json!({ "data": { "me": { "profile": {} } }, "errors": errors });
            http.expect_execute()
                .returning(move |_| Ok(response(200, body.clone())));

            let executor = PathfinderQueryExecutor::new(Arc::new(http), "token");
            let envelope = executor
                .execute(
                    &QueryDefinition::query("userTopContent", HASH),
                    serde_json::json!({}),
                )
                .await
                .unwrap();

            assert!(envelope["data"]["me"]["profile"].is_object());
        }
    }

    #[tokio::test]
    async fn test_execute_reports_messageless_errors_without_data() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .returning(|_| Ok(response(200, serde_json::json!({ "errors": [{}] }))));

        let executor = PathfinderQueryExecutor::new(Arc::new(http), "token");
        let result = executor
            .execute(&QueryDefinition::query("getAlbum", HASH), serde_json::json!({}))
            .await;

        match result {
            Err(BridgeError::OperationFailed(msg)) => assert!(msg.contains("unknown error")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
