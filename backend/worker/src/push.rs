//! # Push messages
//!
//! The order flow normally raises notifications straight from an open page.
//! This handler covers pushes that arrive while no page is around, and it has
//! to stand on its own either way.
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::{
    config::WorkerConfig,
    effect::{Effect, apply},
    host::{Host, Permission},
    lifetime::Lifetime,
};

pub const DEFAULT_BODY: &str = "You have a new notification.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushMessage {
    pub data: Option<Vec<u8>>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct NotificationPayload {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl NotificationPayload {
    /// Unreadable JSON reads as empty. Each field is taken on its own, and a
    /// missing, non-string or blank field is absent.
    pub fn parse(data: Option<&[u8]>) -> Self {
        let Some(document) = data.and_then(|bytes| {
            serde_json::from_slice::<Value>(bytes)
                .map_err(|e| debug!("Ignoring unreadable push payload: {e}"))
                .ok()
        }) else {
            return Self::default();
        };

        Self {
            title: text_field(&document, "title"),
            body: text_field(&document, "body"),
        }
    }
}

fn text_field(document: &Value, key: &str) -> Option<String> {
    document
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

pub fn plan_push(
    config: &WorkerConfig,
    supported: bool,
    permission: Permission,
    data: Option<&[u8]>,
) -> Effect {
    if !supported || permission != Permission::Granted {
        return Effect::NoOp;
    }

    let payload = NotificationPayload::parse(data);

    Effect::ShowNotification {
        title: payload.title.unwrap_or_else(|| config.app_name.clone()),
        body: payload.body.unwrap_or_else(|| DEFAULT_BODY.to_string()),
    }
}

/// Returns `None` when nothing will be shown, in which case the lifetime is
/// not extended at all.
pub fn handle_push(host: Arc<dyn Host>, config: &WorkerConfig, message: PushMessage) -> Option<Lifetime> {
    let effect = plan_push(
        config,
        host.notifications_supported(),
        host.notification_permission(),
        message.data.as_deref(),
    );

    if effect == Effect::NoOp {
        info!("Push received without notification permission, ignoring");
        return None;
    }

    Some(Lifetime::extend("push", async move {
        apply(host.as_ref(), effect).await
    }))
}
