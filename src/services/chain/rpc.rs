//! Node RPC client: JSON-RPC 2.0 over HTTP with retry and timeout
//!
//! This module owns the wire conversation with the remote node. It exposes
//! the [`ChainQuery`] trait as the seam between transport and the
//! read-through cache layer, so the latter can be tested against a mock
//! node.

use async_trait::async_trait;
use backoff::{backoff::Backoff, ExponentialBackoff};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, instrument, warn};

use crate::config::ChainConfig;
use crate::core::error::StakingError;
use crate::core::result::StakingResult;
use crate::core::types::{AccountAddress, DomainId, OperatorId};

/// RPC method for operator-by-id queries
const METHOD_OPERATOR: &str = "staking_operator";
/// RPC method for balance-by-address queries
const METHOD_BALANCE: &str = "balances_account";
/// RPC method for domain-staking-summary queries
const METHOD_DOMAIN_SUMMARY: &str = "staking_domainStakingSummary";
/// RPC method for node liveness probes
const METHOD_HEALTH: &str = "system_health";

/// Raw node queries for the three entity kinds the portal reads
///
/// Implementations return node-native encoded values; decoding into records
/// happens downstream in [`super::types`]. This is the seam mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainQuery: Send + Sync {
    /// Fetch the raw operator record for an id
    async fn operator(&self, id: OperatorId) -> StakingResult<Value>;

    /// Fetch the raw balance record for an address
    async fn balance(&self, address: &AccountAddress) -> StakingResult<Value>;

    /// Fetch the raw staking summary for a domain
    async fn domain_summary(&self, id: DomainId) -> StakingResult<Value>;
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// JSON-RPC client for a single configured node endpoint
#[derive(Debug)]
pub struct NodeRpcClient {
    /// Underlying HTTP client, configured with the request timeout
    http: reqwest::Client,
    /// Node endpoint
    endpoint: Url,
    /// Client configuration
    config: ChainConfig,
    /// Monotonic request id
    next_id: AtomicU64,
}

impl NodeRpcClient {
    /// Create a new client for the configured endpoint
    pub fn new(config: &ChainConfig) -> StakingResult<Self> {
        config.validate()?;
        let endpoint = Url::parse(&config.rpc_url)?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| StakingError::config(format!("Failed to build HTTP client: {}", e)))?;

        debug!("🔗 Node RPC client created for: {}", endpoint);

        Ok(Self {
            http,
            endpoint,
            config: config.clone(),
            next_id: AtomicU64::new(1),
        })
    }

    /// The endpoint this client talks to
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Issue a single JSON-RPC call, without retries
    async fn call_once(&self, method: &str, params: &Value) -> StakingResult<Value> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params: params.clone(),
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let response = response.error_for_status()?;
        let body: JsonRpcResponse = response.json().await?;

        if let Some(error) = body.error {
            return Err(StakingError::network_at(
                format!("Node returned RPC error {}: {}", error.code, error.message),
                self.endpoint.as_str().to_string(),
                0,
            ));
        }

        body.result.ok_or_else(|| {
            StakingError::decode(format!("RPC response for {} carried no result", method))
        })
    }

    /// Execute an RPC call with bounded retries and exponential backoff
    ///
    /// A timeout counts as a remote failure like any other; the caller's
    /// stale-fallback policy takes over once this returns an error.
    #[instrument(skip(self, params))]
    async fn call(&self, method: &str, params: Value) -> StakingResult<Value> {
        let mut backoff = ExponentialBackoff::default();
        backoff.max_elapsed_time =
            Some(self.config.request_timeout() * (self.config.max_retries + 1));

        let mut attempts: u32 = 0;
        loop {
            match self.call_once(method, &params).await {
                Ok(result) => {
                    debug!("✅ RPC {} succeeded", method);
                    return Ok(result);
                }
                Err(error) if error.is_retryable() && attempts < self.config.max_retries => {
                    attempts += 1;
                    warn!("⚠️  RPC {} failed (attempt {}): {}", method, attempts, error);
                    match backoff.next_backoff() {
                        Some(delay) => tokio::time::sleep(delay).await,
                        None => {
                            metrics::counter!("staking_rpc_failures_total").increment(1);
                            return Err(error);
                        }
                    }
                }
                Err(error) => {
                    metrics::counter!("staking_rpc_failures_total").increment(1);
                    return Err(StakingError::network_at(
                        format!("RPC {} failed: {}", method, error),
                        self.endpoint.as_str().to_string(),
                        attempts,
                    )
                    .with_source(error));
                }
            }
        }
    }

    /// Probe node liveness
    pub async fn health_check(&self) -> StakingResult<Value> {
        self.call(METHOD_HEALTH, json!([])).await
    }
}

#[async_trait]
impl ChainQuery for NodeRpcClient {
    #[instrument(skip(self))]
    async fn operator(&self, id: OperatorId) -> StakingResult<Value> {
        self.call(METHOD_OPERATOR, json!([id.into_inner()])).await
    }

    #[instrument(skip(self))]
    async fn balance(&self, address: &AccountAddress) -> StakingResult<Value> {
        self.call(METHOD_BALANCE, json!([address.as_str()])).await
    }

    #[instrument(skip(self))]
    async fn domain_summary(&self, id: DomainId) -> StakingResult<Value> {
        self.call(METHOD_DOMAIN_SUMMARY, json!([id.into_inner()]))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ChainConfig {
        ChainConfig {
            rpc_url: server.uri(),
            request_timeout_ms: 2_000,
            max_retries: 0,
        }
    }

    #[tokio::test]
    async fn test_operator_query_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_partial_json(json!({"method": "staking_operator"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {"currentTotalStake": "1000", "currentTotalShares": "500"}
            })))
            .mount(&server)
            .await;

        let client = NodeRpcClient::new(&config_for(&server)).unwrap();
        let raw = client.operator(OperatorId(1)).await.unwrap();
        assert_eq!(raw["currentTotalStake"], json!("1000"));
    }

    #[tokio::test]
    async fn test_rpc_error_object_becomes_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32601, "message": "Method not found"}
            })))
            .mount(&server)
            .await;

        let client = NodeRpcClient::new(&config_for(&server)).unwrap();
        let result = client.domain_summary(DomainId(0)).await;
        assert!(matches!(result, Err(StakingError::Network { .. })));
    }

    #[tokio::test]
    async fn test_http_failure_becomes_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = NodeRpcClient::new(&config_for(&server)).unwrap();
        let address =
            AccountAddress::new_unchecked("sucQo7ot2qpn3GqitsqCZCMTu1Jmh2T9Rg9nAWxgPCGDNEo4X".into());
        let result = client.balance(&address).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let server = MockServer::start().await;
        // First call 500s, mock is consumed, then the fallback mock answers.
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 2,
                "result": 7
            })))
            .mount(&server)
            .await;

        let config = ChainConfig {
            max_retries: 2,
            ..config_for(&server)
        };
        let client = NodeRpcClient::new(&config).unwrap();
        let raw = client.domain_summary(DomainId(3)).await.unwrap();
        assert_eq!(raw, json!(7));
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let config = ChainConfig::for_endpoint("not a url");
        assert!(NodeRpcClient::new(&config).is_err());
    }
}
