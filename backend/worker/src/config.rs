use std::env;

use tracing::info;
use url::Url;

pub const DEFAULT_APP_NAME: &str = "Platter";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub app_name: String,
    pub install_location: Url,
}

impl WorkerConfig {
    pub fn new(install_location: Url) -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            install_location,
        }
    }

    /// Reads `APP_NAME`, falling back to the default display name.
    pub fn load(install_location: Url) -> Self {
        Self::load_from(install_location, &|key: &str| env::var(key).ok())
    }

    pub fn load_from(install_location: Url, vars: &dyn Fn(&str) -> Option<String>) -> Self {
        let config = Self::new(install_location);

        match vars("APP_NAME") {
            Some(name) if !name.trim().is_empty() => config.with_app_name(name.trim()),
            _ => {
                info!("APP_NAME not set, using default: {DEFAULT_APP_NAME}");
                config
            }
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }
}
