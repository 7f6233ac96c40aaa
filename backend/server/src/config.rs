use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use tracing::{info, warn};

/// Optional configuration. Missing settings disable the dependent feature
/// instead of failing startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feature<T> {
    Configured(T),
    Disabled(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub url: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub endpoint: String,
    pub project_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeConfig {
    pub base_url: Feature<String>,
    pub country: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upstream_timeout: Duration,
    pub order_endpoint: Feature<String>,
    pub order_store: Feature<StoreConfig>,
    pub storage: Feature<StorageConfig>,
    pub geocode: GeocodeConfig,
    pub recommender: Feature<String>,
}

type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

impl Config {
    pub fn load() -> Self {
        Self::load_from(&|key: &str| env::var(key).ok(), &read_secret)
    }

    /// Builds the config from arbitrary variable and secret sources.
    pub fn load_from(vars: Lookup, secrets: Lookup) -> Self {
        let order_store = match (optional(vars, "ORDER_STORE_URL"), secrets("ORDER_STORE_KEY")) {
            (Feature::Configured(url), Some(key)) => Feature::Configured(StoreConfig { url, key }),
            (Feature::Configured(_), None) => {
                Feature::Disabled("ORDER_STORE_KEY secret not found".to_string())
            }
            (Feature::Disabled(reason), _) => Feature::Disabled(reason),
        };

        let storage = match (
            optional(vars, "STORAGE_ENDPOINT_URL"),
            optional(vars, "STORAGE_PROJECT_ID"),
        ) {
            (Feature::Configured(endpoint), Feature::Configured(project_id)) => {
                Feature::Configured(StorageConfig {
                    endpoint,
                    project_id,
                })
            }
            (Feature::Disabled(reason), _) | (_, Feature::Disabled(reason)) => {
                Feature::Disabled(reason)
            }
        };

        Self {
            port: try_load(vars, "RUST_PORT", "1111"),
            upstream_timeout: Duration::from_secs(try_load(vars, "UPSTREAM_TIMEOUT_SECS", "10")),
            order_endpoint: optional(vars, "ORDER_ENDPOINT_URL"),
            order_store,
            storage,
            geocode: GeocodeConfig {
                base_url: Feature::Configured(try_load(
                    vars,
                    "GEOCODE_URL",
                    "https://nominatim.openstreetmap.org",
                )),
                country: try_load(vars, "GEOCODE_COUNTRY", "India"),
            },
            recommender: optional(vars, "RECOMMENDER_URL"),
        }
    }

    /// Logs every disabled feature once at startup.
    pub fn report(&self) {
        let features = [
            ("order submission", disabled_reason(&self.order_endpoint)),
            ("user lookup", disabled_reason(&self.order_store)),
            ("file storage", disabled_reason(&self.storage)),
            ("geocoding", disabled_reason(&self.geocode.base_url)),
            ("recommendations", disabled_reason(&self.recommender)),
        ];

        for (name, reason) in features {
            match reason {
                Some(reason) => warn!("Feature {name} disabled: {reason}"),
                None => info!("Feature {name} enabled"),
            }
        }
    }
}

fn disabled_reason<T>(feature: &Feature<T>) -> Option<&str> {
    match feature {
        Feature::Configured(_) => None,
        Feature::Disabled(reason) => Some(reason.as_str()),
    }
}

fn var(vars: Lookup, key: &str) -> Result<String, ()> {
    vars(key).filter(|value| !value.trim().is_empty()).ok_or_else(|| {
        warn!("Environment variable {key} not found");
    })
}

fn optional(vars: Lookup, key: &str) -> Feature<String> {
    var(vars, key)
        .map(Feature::Configured)
        .unwrap_or_else(|_| Feature::Disabled(format!("{key} not set")))
}

fn try_load<T: FromStr>(vars: Lookup, key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(vars, key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .ok()
        .filter(|s| !s.is_empty())
}
