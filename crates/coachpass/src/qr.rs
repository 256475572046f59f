//! QR encoding and decoding of assignment payloads.
//!
//! Encoding serializes the payload to canonical JSON and renders it as a
//! two-tone QR image at a fixed module size with a quiet-zone margin.
//! Decoding parses scanned text back into a payload; malformed input is a
//! typed error, never a panic, so a scanning session can keep going.

use std::path::Path;

use image::{GrayImage, Luma};
use qrcode::QrCode;
use tracing::debug;

use crate::config::QrConfig;
use crate::error::{Error, Result};
use crate::record::AssignmentPayload;

/// Serialize a payload to its canonical JSON text.
///
/// Field order and casing follow the wire contract exactly; this text is
/// what ends up inside the QR code.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(payload: &AssignmentPayload) -> Result<String> {
    Ok(serde_json::to_string(payload)?)
}

/// Render a payload as a two-tone QR image.
///
/// # Errors
///
/// Returns an error if the payload cannot be serialized or is too large to
/// fit in a QR code.
pub fn encode_to_image(payload: &AssignmentPayload, options: &QrConfig) -> Result<GrayImage> {
    let text = encode(payload)?;
    let code = QrCode::new(text.as_bytes())?;

    let image = code
        .render::<Luma<u8>>()
        .dark_color(Luma([0u8]))
        .light_color(Luma([255u8]))
        .quiet_zone(options.quiet_zone)
        .module_dimensions(options.module_size, options.module_size)
        .build();

    debug!(
        "Rendered QR code: {}x{} pixels, {} byte payload",
        image.width(),
        image.height(),
        text.len()
    );
    Ok(image)
}

/// Render a payload as a QR image and write it to `path` (format inferred
/// from the extension, typically PNG).
///
/// # Errors
///
/// Returns an error if encoding fails or the image cannot be written.
pub fn encode_to_file(
    payload: &AssignmentPayload,
    path: impl AsRef<Path>,
    options: &QrConfig,
) -> Result<()> {
    let image = encode_to_image(payload, options)?;
    image.save(path.as_ref())?;
    Ok(())
}

/// Parse scanned text into an assignment payload.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the text is not valid JSON or is missing a
/// required field.
pub fn decode(text: &str) -> Result<AssignmentPayload> {
    serde_json::from_str(text).map_err(|e| Error::decode(format!("invalid assignment payload: {e}")))
}
