//! # Background Worker
//!
//! Event handlers that run outside any page: push messages and notification
//! clicks. They can fire while every app window is closed.
//!
//!
//!
//! ## Model
//!
//! - Each event is planned by a pure function (`plan_click`, `plan_push`) into an [`Effect`]
//! - Effects run against an injected [`Host`], which owns windows and notifications
//! - Nothing survives between events, so concurrent events need no locking
//! - Work that must finish before teardown is handed back as a [`Lifetime`]
//!
//!
//!
//! ## Failures
//!
//! Handlers do not catch or retry. A failed enumeration, focus, open or display
//! ends the [`Lifetime`] with a [`HostError`]. [`Lifetime::settle`] logs it,
//! because there is no page to show it on.
//!
//!
//!
//! ## Two notification paths
//!
//! Order updates are usually announced by the open page itself. The push path
//! here is kept working independently of that, and neither replaces the other.
use std::sync::Arc;

use tracing::{debug, info};
use url::Url;

pub mod click;
pub mod config;
pub mod effect;
pub mod host;
pub mod lifetime;
pub mod push;

pub use click::NotificationClick;
pub use config::WorkerConfig;
pub use effect::Effect;
pub use host::{ClientId, Host, HostError, NotificationId, Permission, WindowClient};
pub use lifetime::Lifetime;
pub use push::PushMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    Push(PushMessage),
    NotificationClick(NotificationClick),
}

pub struct ServiceWorker {
    host: Arc<dyn Host>,
    config: WorkerConfig,
    root: Url,
}

impl ServiceWorker {
    pub fn new(host: Arc<dyn Host>, config: WorkerConfig) -> Self {
        let root = click::canonical_root(&config.install_location);
        info!("Worker installed at {}, root view {root}", config.install_location);

        Self { host, config, root }
    }

    /// Installs with settings read from the environment.
    pub fn install(host: Arc<dyn Host>, install_location: Url) -> Self {
        Self::new(host, WorkerConfig::load(install_location))
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Handles one event. `None` means the event finished synchronously.
    pub fn dispatch(&self, event: WorkerEvent) -> Option<Lifetime> {
        let lifetime = match event {
            WorkerEvent::Push(message) => push::handle_push(self.host.clone(), &self.config, message),
            WorkerEvent::NotificationClick(click) => Some(click::handle_click(
                self.host.clone(),
                self.root.clone(),
                click,
            )),
        };

        if let Some(lifetime) = &lifetime {
            debug!("Extended lifetime for {} event", lifetime.label());
        }

        lifetime
    }
}
