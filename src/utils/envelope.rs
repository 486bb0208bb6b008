use base64::engine::general_purpose::STANDARD as BASE64_STD;
use base64::Engine as _;
use serde_json::Value;
use thiserror::Error;

/// Report id used when the message carries no `data` field.
pub const DEFAULT_REPORT_ID: &str = "World";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("no Pub/Sub message received")]
    NoMessage,
    #[error("invalid Pub/Sub message format")]
    InvalidFormat,
}

/// Extracts the report identifier from a Pub/Sub push envelope body.
///
/// The envelope must be a JSON object with a `message` field. When
/// `message.data` is present it holds the base64-encoded identifier,
/// which is decoded and stripped of surrounding whitespace; otherwise
/// the identifier defaults to [`DEFAULT_REPORT_ID`].
pub fn decode_report_id(body: &[u8]) -> Result<String, EnvelopeError> {
    let envelope: Value =
        serde_json::from_slice(body).map_err(|_| EnvelopeError::NoMessage)?;
    if envelope.is_null() {
        return Err(EnvelopeError::NoMessage);
    }

    let message = envelope
        .as_object()
        .and_then(|obj| obj.get("message"))
        .ok_or(EnvelopeError::InvalidFormat)?;

    // A message without a data field is still a valid envelope.
    let Some(data) = message.get("data") else {
        return Ok(DEFAULT_REPORT_ID.to_string());
    };

    let encoded = data.as_str().ok_or(EnvelopeError::InvalidFormat)?;
    let decoded = BASE64_STD
        .decode(encoded)
        .map_err(|_| EnvelopeError::InvalidFormat)?;
    let report_id =
        String::from_utf8(decoded).map_err(|_| EnvelopeError::InvalidFormat)?;

    Ok(report_id.trim().to_string())
}
