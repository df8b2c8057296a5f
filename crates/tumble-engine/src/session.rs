//! Viewport session: the camera + GPU context pair bound to one window
//! activation.

use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::camera::Camera;
use crate::device::{Gpu, GpuInit};

/// Message shown to the user when the GPU rendering context cannot be built.
///
/// The wording is fixed; diagnostics carry the underlying cause separately.
pub const RENDER_CONTEXT_UNAVAILABLE: &str =
    "Failed to create a GPU rendering context. This can happen when hardware \
     acceleration is disabled or no compatible graphics adapter is available.";

/// GPU context construction failure.
///
/// Displays as the fixed [`RENDER_CONTEXT_UNAVAILABLE`] message regardless of
/// the underlying cause, which is kept separately for logs.
#[derive(Debug, Clone)]
pub struct RenderContextError {
    cause: String,
}

impl RenderContextError {
    fn new(cause: &anyhow::Error) -> Self {
        // `{:#}` flattens the context chain into one line.
        Self {
            cause: format!("{cause:#}"),
        }
    }

    /// Underlying cause chain, for diagnostics.
    pub fn cause(&self) -> &str {
        &self.cause
    }
}

impl std::fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(RENDER_CONTEXT_UNAVAILABLE)
    }
}

impl std::error::Error for RenderContextError {}

/// The camera + GPU context pair bound to one window activation.
///
/// Constructed once per activation by the window runtime. The render driver
/// borrows the halves per call and never owns them, keeping ownership a
/// strict tree.
pub struct ViewportSession<'w> {
    pub camera: Camera,
    pub gpu: Gpu<'w>,
}

impl<'w> ViewportSession<'w> {
    /// Builds the session against a live window.
    ///
    /// The camera derives its aspect from the window's current inner size and
    /// the GPU surface is configured to the same dimensions. On failure no
    /// session exists; callers surface the error and do not retry.
    pub async fn initialize(
        window: &'w Window,
        init: GpuInit,
    ) -> Result<Self, RenderContextError> {
        let size = window.inner_size();

        let gpu = match Gpu::new(window, init).await {
            Ok(gpu) => gpu,
            Err(e) => return Err(RenderContextError::new(&e)),
        };

        let camera = Camera::perspective(size.width as f32, size.height as f32);

        Ok(Self { camera, gpu })
    }

    /// Applies new viewport dimensions to both halves at once.
    ///
    /// The camera recomputes its aspect/projection; the surface reconfigures
    /// to the same size (renderer targets follow lazily on the next frame).
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.camera.set_viewport(size.width as f32, size.height as f32);
        self.gpu.resize(size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_displays_the_fixed_message() {
        let err = RenderContextError::new(&anyhow::anyhow!("no adapter"));
        assert_eq!(err.to_string(), RENDER_CONTEXT_UNAVAILABLE);
    }

    #[test]
    fn error_keeps_the_cause_for_logs() {
        let inner = anyhow::anyhow!("no adapter").context("request failed");
        let err = RenderContextError::new(&inner);
        assert_eq!(err.cause(), "request failed: no adapter");
        // The user-facing text never leaks the cause.
        assert!(!err.to_string().contains("adapter request"));
    }

    #[test]
    fn failed_session_surfaces_the_fixed_message() {
        use crate::banner::ErrorBanner;
        use std::time::Instant;

        // The runtime reports a failed session on two channels: an error log
        // line rendering the error itself, and the banner. Both carry the
        // fixed message; only the cause line differs per failure.
        let err = RenderContextError::new(&anyhow::anyhow!("no adapter"));
        assert_eq!(format!("{err}"), RENDER_CONTEXT_UNAVAILABLE);

        let mut banner = ErrorBanner::new();
        banner.show(err.to_string(), Instant::now());
        assert_eq!(banner.message(), Some(RENDER_CONTEXT_UNAVAILABLE));
    }
}
