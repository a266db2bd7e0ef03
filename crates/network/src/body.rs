use crate::error::ClientError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;

/// # Errors
/// Returns [`ClientError::Encode`] if the value cannot be represented as JSON.
#[inline]
pub fn encode_body<T: Serialize>(value: &T) -> Result<String, ClientError> {
    serde_json::to_string(value).map_err(ClientError::Encode)
}

/// # Errors
/// Returns [`ClientError::Decode`] if the body is not valid JSON for `T`.
#[inline]
pub fn decode_body<T: DeserializeOwned>(url: &str, body: &[u8]) -> Result<T, ClientError> {
    trace!("decoding {} byte response from {url}", body.len());
    serde_json::from_slice(body).map_err(|source| ClientError::Decode { url: url.to_string(), source })
}
