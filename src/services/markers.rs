// Theme Update Markers
// Wire codec for the `[[THEME_UPDATE::<base64 json>]]` tokens embedded in assistant text

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD as BASE64};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use thiserror::Error;

use crate::models::ThemeUpdateMarkerPayload;

pub const THEME_UPDATE_MARKER_PREFIX: &str = "[[THEME_UPDATE::";
pub const THEME_UPDATE_MARKER_SUFFIX: &str = "]]";
pub const THEME_UPDATE_MARKER_PATTERN: &str = r"\[\[THEME_UPDATE::([A-Za-z0-9+/=]+)\]\]";

// Markers come from other implementations that may drop the trailing `=`.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors that can occur while encoding a marker payload
#[derive(Error, Debug)]
pub enum MarkerError {
    #[error("Failed to serialize theme update payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Serialize to JSON, then standard padded base64.
pub fn encode_theme_update_marker_payload(
    payload: &ThemeUpdateMarkerPayload,
) -> Result<String, MarkerError> {
    let json = serde_json::to_vec(payload)?;
    Ok(BASE64.encode(json))
}

/// Inverse of [`encode_theme_update_marker_payload`]. Any failure (bad base64,
/// bad UTF-8, bad JSON, wrong shape) is `None`.
pub fn decode_theme_update_marker_payload(encoded: &str) -> Option<ThemeUpdateMarkerPayload> {
    let bytes = match LENIENT_BASE64.decode(encoded) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::debug!("Dropping theme update marker with invalid base64: {e}");
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(payload) => Some(payload),
        Err(e) => {
            log::debug!("Dropping theme update marker with invalid payload: {e}");
            None
        }
    }
}

/// The full framed marker, ready to be appended to a text stream.
pub fn theme_update_marker(payload: &ThemeUpdateMarkerPayload) -> Result<String, MarkerError> {
    let encoded = encode_theme_update_marker_payload(payload)?;
    Ok(format!(
        "{THEME_UPDATE_MARKER_PREFIX}{encoded}{THEME_UPDATE_MARKER_SUFFIX}"
    ))
}
