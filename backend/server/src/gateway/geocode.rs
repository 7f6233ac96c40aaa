//! # Geocoding
//!
//! Six digit pincode to coordinates.
//!
//! Resolvers report failures as a [`ResolveError`] carrying a [`ResolveErrorKind`].
//! The kind alone decides the status code:
//!
//! | Kind | Status |
//! |---|---|
//! | `ServerConfig` | 500 |
//! | `Unreachable` | 500 |
//! | `NotFound` | 404 |
//! | `Other` | 400 |
//!
//! Resolvers that only produce free text can go through
//! [`ResolveErrorKind::from_message`].
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::{
    config::{Feature, GeocodeConfig},
    error::{GatewayError, Outcome},
};

pub const INVALID_PIN_CODE: &str = "Pincode must be exactly 6 digits";
pub const RESOLVE_FAILURE: &str = "Failed to resolve location";

static PIN_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{6}$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveErrorKind {
    ServerConfig,
    Unreachable,
    NotFound,
    Other,
}

impl ResolveErrorKind {
    /// Compatibility shim for resolvers that return only a message.
    ///
    /// "No location found" is checked first, so a not-found message that also
    /// mentions fetching stays a 404.
    pub fn from_message(message: &str) -> Self {
        let message = message.to_lowercase();

        if message.contains("no location found") {
            ResolveErrorKind::NotFound
        } else if message.contains("server configuration") {
            ResolveErrorKind::ServerConfig
        } else if message.contains("fetch") {
            ResolveErrorKind::Unreachable
        } else {
            ResolveErrorKind::Other
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    pub message: String,
}

impl ResolveError {
    pub fn new(kind: ResolveErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();

        Self {
            kind: ResolveErrorKind::from_message(&message),
            message,
        }
    }
}

impl From<ResolveError> for GatewayError {
    fn from(err: ResolveError) -> Self {
        match err.kind {
            ResolveErrorKind::ServerConfig | ResolveErrorKind::Unreachable => {
                error!("Pincode resolution failed: {}", err.message);
                GatewayError::Internal(RESOLVE_FAILURE.to_string())
            }
            ResolveErrorKind::NotFound => GatewayError::NotFound(err.message),
            ResolveErrorKind::Other => GatewayError::InvalidInput(err.message),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub pin_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

#[async_trait]
pub trait PincodeResolver: Send + Sync {
    async fn resolve(&self, pin_code: &str) -> Result<Location, ResolveError>;
}

/// Nominatim search result. Coordinates arrive as strings.
#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: String,
}

pub struct NominatimResolver {
    client: Client,
    config: GeocodeConfig,
}

impl NominatimResolver {
    pub fn new(client: Client, config: GeocodeConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl PincodeResolver for NominatimResolver {
    async fn resolve(&self, pin_code: &str) -> Result<Location, ResolveError> {
        let base_url = match &self.config.base_url {
            Feature::Configured(base_url) => base_url,
            Feature::Disabled(reason) => {
                return Err(ResolveError::new(
                    ResolveErrorKind::ServerConfig,
                    format!("Geocoding unavailable due to server configuration: {reason}"),
                ));
            }
        };

        let unreachable = |e: reqwest::Error| {
            ResolveError::new(
                ResolveErrorKind::Unreachable,
                format!("Failed to fetch location: {e}"),
            )
        };

        let places: Vec<Place> = self
            .client
            .get(format!("{}/search", base_url.trim_end_matches('/')))
            .query(&[
                ("postalcode", pin_code),
                ("country", self.config.country.as_str()),
                ("format", "json"),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(unreachable)?
            .error_for_status()
            .map_err(unreachable)?
            .json()
            .await
            .map_err(unreachable)?;

        let Some(place) = places.into_iter().next() else {
            return Err(ResolveError::new(
                ResolveErrorKind::NotFound,
                format!("No location found for pincode {pin_code}"),
            ));
        };

        let coordinate = |value: &str| {
            value.parse::<f64>().map_err(|e| {
                ResolveError::new(
                    ResolveErrorKind::Unreachable,
                    format!("Failed to fetch usable coordinates: {e}"),
                )
            })
        };

        Ok(Location {
            pin_code: pin_code.to_string(),
            latitude: coordinate(&place.lat)?,
            longitude: coordinate(&place.lon)?,
            display_name: place.display_name,
        })
    }
}

pub struct GeocodeGateway {
    resolver: Arc<dyn PincodeResolver>,
}

impl GeocodeGateway {
    pub fn new(resolver: Arc<dyn PincodeResolver>) -> Self {
        Self { resolver }
    }

    pub async fn resolve(&self, pin_code: &str) -> Outcome<Location> {
        if !PIN_CODE.is_match(pin_code) {
            return Err(GatewayError::InvalidInput(INVALID_PIN_CODE.to_string()));
        }

        let location = self.resolver.resolve(pin_code).await?;
        info!("Resolved pincode {pin_code} to {}", location.display_name);

        Ok(location)
    }
}
