//! # User lookup
//!
//! Phone number to account email, backed by the order store's `users` table.
//!
//! - Phone must be at least 10 ASCII digits, nothing else
//! - Stored phone is matched exactly, no normalisation of country codes or leading zeroes
//! - Only the email leaves this module, never the full record
//!
//! A record that exists without an email is reported as "not found". Callers
//! cannot tell a broken row apart from a missing one.
use std::sync::{Arc, LazyLock};

use anyhow::{Error, anyhow};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::{
    config::{Feature, StoreConfig},
    error::{GatewayError, Outcome},
};

pub const INVALID_PHONE: &str = "Phone number must contain at least 10 digits";
pub const USER_NOT_FOUND: &str = "No account found for this phone number";

static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10,}$").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRecord {
    pub email: Option<String>,
}

impl UserRecord {
    /// Reads a stored document. Non-string emails are treated as absent.
    pub fn from_document(document: &Value) -> Self {
        Self {
            email: document
                .get("email")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    pub fn usable_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|email| !email.trim().is_empty())
    }
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_phone(&self, phone: &str) -> Result<Vec<UserRecord>, Error>;
}

pub struct RestUserDirectory {
    client: Client,
    store: Feature<StoreConfig>,
}

impl RestUserDirectory {
    pub fn new(client: Client, store: Feature<StoreConfig>) -> Self {
        Self { client, store }
    }
}

#[async_trait]
impl UserDirectory for RestUserDirectory {
    async fn find_by_phone(&self, phone: &str) -> Result<Vec<UserRecord>, Error> {
        let store = match &self.store {
            Feature::Configured(store) => store,
            Feature::Disabled(reason) => return Err(anyhow!("user store disabled: {reason}")),
        };

        let url = format!("{}/rest/v1/users", store.url.trim_end_matches('/'));
        let documents: Vec<Value> = self
            .client
            .get(url)
            .query(&[
                ("phone", format!("eq.{phone}")),
                ("select", "email".to_string()),
                ("limit", "1".to_string()),
            ])
            .header("apikey", &store.key)
            .bearer_auth(&store.key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(documents.iter().map(UserRecord::from_document).collect())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UserEmail {
    pub email: String,
}

pub struct UserLookupGateway {
    directory: Arc<dyn UserDirectory>,
}

impl UserLookupGateway {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    pub async fn lookup(&self, phone: &str) -> Outcome<UserEmail> {
        if !PHONE.is_match(phone) {
            return Err(GatewayError::InvalidInput(INVALID_PHONE.to_string()));
        }

        let records = self.directory.find_by_phone(phone).await.map_err(|e| {
            error!("User lookup failed: {e:#}");
            GatewayError::internal()
        })?;

        match records.first().and_then(UserRecord::usable_email) {
            Some(email) => Ok(UserEmail {
                email: email.to_string(),
            }),
            None => {
                info!("No usable user record, {} matched", records.len());
                Err(GatewayError::NotFound(USER_NOT_FOUND.to_string()))
            }
        }
    }
}
