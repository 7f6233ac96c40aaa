use tracing::debug;
use url::Url;

use crate::host::{ClientId, Host, HostError, NotificationId};

/// Everything a background handler can ask of the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CloseNotification(NotificationId),
    FocusWindow(ClientId),
    OpenWindow(Url),
    ShowNotification { title: String, body: String },
    NoOp,
}

impl Effect {
    /// The host answers these without suspending the handler.
    pub fn is_immediate(&self) -> bool {
        matches!(self, Effect::CloseNotification(_) | Effect::NoOp)
    }
}

/// Runs an immediate effect in place. Any other effect is handed back so the
/// caller can await it with [`apply`].
pub fn apply_now(host: &dyn Host, effect: Effect) -> Option<Effect> {
    match effect {
        Effect::CloseNotification(notification) => {
            debug!("Closing notification {}", notification.0);
            host.close_notification(&notification);
            None
        }
        Effect::NoOp => None,
        pending => Some(pending),
    }
}

/// Carries out one effect against the host.
pub async fn apply(host: &dyn Host, effect: Effect) -> Result<(), HostError> {
    debug!("Applying {effect:?}");

    let Some(effect) = apply_now(host, effect) else {
        return Ok(());
    };

    match effect {
        Effect::FocusWindow(client) => host.focus(&client).await?,
        Effect::OpenWindow(url) => host.open_window(&url).await?,
        Effect::ShowNotification { title, body } => host.show_notification(&title, &body).await?,
        Effect::CloseNotification(_) | Effect::NoOp => {}
    }

    Ok(())
}
