//! Best-effort viewport capture for click and submit steps.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use super::types::VisualCapture;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture backend failed: {0}")]
    Backend(String),
    #[error("capture timed out after {0:?}")]
    TimedOut(Duration),
    #[error("captured bytes are not a decodable image: {0}")]
    Undecodable(#[from] image::ImageError),
}

/// Source of viewport images (a browser tab, a headless page, a test fake).
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Raw encoded image bytes (PNG or any format `image` can decode).
    async fn capture_viewport(&self) -> Result<Vec<u8>, CaptureError>;
}

/// Result of trying to attach an image to a step.
#[derive(Debug)]
pub enum CaptureOutcome {
    Captured(VisualCapture),
    /// Capture was attempted but failed or timed out; the step is kept.
    Degraded(CaptureError),
    /// Capture was not attempted: disabled, not applicable, or no backend.
    Unavailable,
}

impl CaptureOutcome {
    pub fn into_capture(self) -> Option<VisualCapture> {
        match self {
            CaptureOutcome::Captured(capture) => Some(capture),
            CaptureOutcome::Degraded(_) | CaptureOutcome::Unavailable => None,
        }
    }
}

/// Run the backend under `timeout` and encode whatever it returns.
pub async fn capture_viewport(backend: &dyn CaptureBackend, timeout: Duration) -> CaptureOutcome {
    let raw = match tokio::time::timeout(timeout, backend.capture_viewport()).await {
        Ok(Ok(raw)) => raw,
        Ok(Err(err)) => return CaptureOutcome::Degraded(err),
        Err(_) => return CaptureOutcome::Degraded(CaptureError::TimedOut(timeout)),
    };
    match encode_capture(&raw) {
        Ok(capture) => CaptureOutcome::Captured(capture),
        Err(err) => CaptureOutcome::Degraded(err),
    }
}

/// Decode the backend's bytes and store them as WebP when that is smaller,
/// PNG otherwise.
pub fn encode_capture(raw: &[u8]) -> Result<VisualCapture, CaptureError> {
    let img = image::load_from_memory(raw)?;

    let mut png = std::io::Cursor::new(Vec::new());
    img.write_to(&mut png, image::ImageFormat::Png)?;
    let png = png.into_inner();

    let mut webp = std::io::Cursor::new(Vec::new());
    if img.write_to(&mut webp, image::ImageFormat::WebP).is_ok() {
        let webp = webp.into_inner();
        if webp.len() < png.len() {
            return Ok(VisualCapture::from_bytes("image/webp", &webp));
        }
    }
    Ok(VisualCapture::from_bytes("image/png", &png))
}
