//! # Order submission
//!
//! Pass-through to the order macro endpoint. The payload may be a new order or
//! a status update. Telling them apart is the endpoint's job, so the gateway
//! never looks inside.
//!
//! The endpoint answers with a plain confirmation string on success. That text
//! goes back to the client as-is inside `{ "message": ... }`.
use std::sync::Arc;

use anyhow::{Error, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{
    config::Feature,
    error::{GatewayError, Outcome},
};

pub const UPSTREAM_FAILURE: &str = "Failed to communicate with the ordering service";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub text: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Delivers a payload upstream. `Err` means delivery itself failed, i.e. no
/// reply was obtained.
#[async_trait]
pub trait OrderUpstream: Send + Sync {
    async fn forward(&self, payload: &Value) -> Result<UpstreamReply, Error>;
}

pub struct HttpOrderUpstream {
    client: Client,
    endpoint: Feature<String>,
}

impl HttpOrderUpstream {
    pub fn new(client: Client, endpoint: Feature<String>) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl OrderUpstream for HttpOrderUpstream {
    async fn forward(&self, payload: &Value) -> Result<UpstreamReply, Error> {
        let endpoint = match &self.endpoint {
            Feature::Configured(endpoint) => endpoint,
            Feature::Disabled(reason) => return Err(anyhow!("order endpoint disabled: {reason}")),
        };

        let response = self.client.post(endpoint).json(payload).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok(UpstreamReply { status, text })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct OrderAccepted {
    pub message: String,
}

pub struct OrderGateway {
    upstream: Arc<dyn OrderUpstream>,
}

impl OrderGateway {
    pub fn new(upstream: Arc<dyn OrderUpstream>) -> Self {
        Self { upstream }
    }

    pub async fn submit(&self, payload: &Value) -> Outcome<OrderAccepted> {
        let reply = self.upstream.forward(payload).await.map_err(|e| {
            error!("Order submission failed: {e:#}");
            GatewayError::internal()
        })?;

        if !reply.is_success() {
            warn!(
                status = reply.status,
                text = %reply.text,
                "Ordering service rejected submission"
            );
            return Err(GatewayError::BadGateway(UPSTREAM_FAILURE.to_string()));
        }

        info!("Order forwarded, upstream status {}", reply.status);

        Ok(OrderAccepted {
            message: reply.text,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    struct Scripted {
        reply: Option<UpstreamReply>,
        seen: Mutex<Vec<Value>>,
    }

    impl Scripted {
        fn new(reply: Option<UpstreamReply>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl OrderUpstream for Scripted {
        async fn forward(&self, payload: &Value) -> Result<UpstreamReply, Error> {
            self.seen.lock().unwrap().push(payload.clone());
            self.reply.clone().ok_or_else(|| anyhow!("connection reset"))
        }
    }

    fn reply(status: u16, text: &str) -> Option<UpstreamReply> {
        Some(UpstreamReply {
            status,
            text: text.to_string(),
        })
    }

    #[tokio::test]
    async fn test_success_returns_raw_text() {
        let upstream = Scripted::new(reply(200, "Order placed: #42"));
        let gateway = OrderGateway::new(upstream.clone());

        let payload = json!({ "action": "create", "items": [{ "id": 3, "qty": 2 }] });
        let outcome = gateway.submit(&payload).await;

        assert_eq!(
            outcome,
            Ok(OrderAccepted {
                message: "Order placed: #42".to_string()
            })
        );
        assert_eq!(*upstream.seen.lock().unwrap(), vec![payload]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_bad_gateway() {
        for status in [400, 404, 500, 503] {
            let gateway = OrderGateway::new(Scripted::new(reply(status, "Script error: row 7")));

            let outcome = gateway.submit(&json!({})).await;

            assert_eq!(
                outcome,
                Err(GatewayError::BadGateway(UPSTREAM_FAILURE.to_string()))
            );
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_internal() {
        let gateway = OrderGateway::new(Scripted::new(None));

        let outcome = gateway.submit(&json!({ "status": "delivered" })).await;

        assert_eq!(outcome, Err(GatewayError::internal()));
    }

    #[tokio::test]
    async fn test_single_attempt_per_call() {
        let upstream = Scripted::new(None);
        let gateway = OrderGateway::new(upstream.clone());

        let _ = gateway.submit(&json!({})).await;

        assert_eq!(upstream.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_endpoint_is_internal() {
        let upstream = HttpOrderUpstream::new(
            Client::new(),
            Feature::Disabled("ORDER_ENDPOINT_URL not set".to_string()),
        );
        let gateway = OrderGateway::new(Arc::new(upstream));

        assert_eq!(
            gateway.submit(&json!({})).await,
            Err(GatewayError::internal())
        );
    }
}
