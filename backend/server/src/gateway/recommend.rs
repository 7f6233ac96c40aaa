//! # Recommendations
//!
//! Wraps the recommendation generator. An empty list is a normal answer, not a
//! failure. Only a missing container or an error becomes a 500.
use std::sync::Arc;

use anyhow::{Error, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::{
    config::Feature,
    error::{GatewayError, Outcome},
};

pub const GENERATION_FAILURE: &str = "Failed to generate recommendations";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Recommendations {
    pub recommendations: Vec<Value>,
}

/// `Ok(None)` means the generator ran but produced no container at all.
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn generate(&self, user_id: Option<&str>) -> Result<Option<Recommendations>, Error>;
}

pub struct RemoteRecommender {
    client: Client,
    endpoint: Feature<String>,
}

impl RemoteRecommender {
    pub fn new(client: Client, endpoint: Feature<String>) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl Recommender for RemoteRecommender {
    async fn generate(&self, user_id: Option<&str>) -> Result<Option<Recommendations>, Error> {
        let endpoint = match &self.endpoint {
            Feature::Configured(endpoint) => endpoint,
            Feature::Disabled(reason) => return Err(anyhow!("recommender disabled: {reason}")),
        };

        let recommendations: Option<Recommendations> = self
            .client
            .post(endpoint)
            .json(&json!({ "userId": user_id }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(recommendations)
    }
}

pub struct RecommendationGateway {
    recommender: Arc<dyn Recommender>,
}

impl RecommendationGateway {
    pub fn new(recommender: Arc<dyn Recommender>) -> Self {
        Self { recommender }
    }

    pub async fn recommend(&self, user_id: Option<&str>) -> Outcome<Recommendations> {
        match self.recommender.generate(user_id).await {
            Ok(Some(recommendations)) => {
                info!("Generated {} recommendations", recommendations.recommendations.len());
                Ok(recommendations)
            }
            Ok(None) => {
                error!("Recommender returned no result container");
                Err(GatewayError::Internal(GENERATION_FAILURE.to_string()))
            }
            Err(e) => {
                error!("Recommendation generation failed: {e:#}");
                Err(GatewayError::Internal(GENERATION_FAILURE.to_string()))
            }
        }
    }
}
