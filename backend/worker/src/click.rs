//! # Notification clicks
//!
//! A click should leave exactly one app window focused.
//!
//! 1. Close the clicked notification, right away and only once
//! 2. Enumerate every window, uncontrolled ones included
//! 3. Focus the first focusable window sitting exactly on the root URL
//! 4. Otherwise open a new window at the root URL, if the host allows it
//!
//! Duplicates are left alone. Only the first match, in host order, is focused.
use std::sync::Arc;

use tracing::info;
use url::Url;

use crate::{
    effect::{Effect, apply, apply_now},
    host::{Host, NotificationId, WindowClient},
    lifetime::Lifetime,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationClick {
    pub notification: NotificationId,
}

/// Root view of the app, derived from where the worker is installed.
pub fn canonical_root(install_location: &Url) -> Url {
    let mut root = install_location.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);

    root
}

/// The clicked notification goes away before anything else happens.
pub fn plan_dismiss(event: &NotificationClick) -> Effect {
    Effect::CloseNotification(event.notification.clone())
}

/// Decides what to do with the windows that are open right now.
pub fn plan_click(root: &Url, windows: &[WindowClient], can_open_windows: bool) -> Effect {
    let existing = windows
        .iter()
        .find(|window| window.url == root.as_str() && window.focusable);

    match existing {
        Some(window) => Effect::FocusWindow(window.id.clone()),
        None if can_open_windows => Effect::OpenWindow(root.clone()),
        None => Effect::NoOp,
    }
}

pub fn handle_click(host: Arc<dyn Host>, root: Url, event: NotificationClick) -> Lifetime {
    apply_now(host.as_ref(), plan_dismiss(&event));

    Lifetime::extend("notificationclick", async move {
        let windows = host.match_all_windows(true).await?;
        let effect = plan_click(&root, &windows, host.can_open_windows());

        info!(
            "Notification {} clicked, {} windows open, {effect:?}",
            event.notification.0,
            windows.len()
        );

        apply(host.as_ref(), effect).await
    })
}
