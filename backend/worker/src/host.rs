use async_trait::async_trait;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationId(pub String);

/// An open browser context, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClient {
    pub id: ClientId,
    pub url: String,
    pub focusable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    Default,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Failed to enumerate windows: {0}")]
    Enumeration(String),

    #[error("Failed to focus window: {0}")]
    Focus(String),

    #[error("Failed to open window: {0}")]
    Open(String),

    #[error("Failed to display notification: {0}")]
    Display(String),

    #[error("Background context terminated")]
    Terminated,

    #[error("Handler panicked: {0}")]
    Panicked(String),
}

/// Capabilities the host runtime lends to the background handlers.
///
/// Synchronous methods mirror host APIs that answer immediately.
#[async_trait]
pub trait Host: Send + Sync {
    fn close_notification(&self, notification: &NotificationId);

    async fn match_all_windows(&self, include_uncontrolled: bool) -> Result<Vec<WindowClient>, HostError>;

    async fn focus(&self, client: &ClientId) -> Result<(), HostError>;

    fn can_open_windows(&self) -> bool;

    async fn open_window(&self, url: &Url) -> Result<(), HostError>;

    fn notifications_supported(&self) -> bool;

    fn notification_permission(&self) -> Permission;

    async fn show_notification(&self, title: &str, body: &str) -> Result<(), HostError>;
}
