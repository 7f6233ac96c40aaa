use axum::body::Bytes;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::GatewayError;

/// Request bodies that are validated here. Unreadable JSON is the client's fault.
pub fn parse_body<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, GatewayError> {
    serde_json::from_slice(bytes).map_err(|_| GatewayError::invalid_payload())
}

/// Request bodies that are relayed upstream. Failing to read one means the
/// relay did not happen, so it surfaces as a generic 500.
pub fn parse_relayed_body<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, GatewayError> {
    serde_json::from_slice(bytes).map_err(|e| {
        warn!("Failed to read relayed request body: {e}");
        GatewayError::internal()
    })
}

/// Like [`parse_relayed_body`], but a blank body yields `T::default()`.
pub fn parse_optional_body<T: DeserializeOwned + Default>(bytes: &Bytes) -> Result<T, GatewayError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    parse_relayed_body(bytes)
}
