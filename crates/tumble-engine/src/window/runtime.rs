use anyhow::{Context, Result};
use ouroboros::self_referencing;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::banner::ErrorBanner;
use crate::device::GpuInit;
use crate::driver::{FrameOutcome, RenderDriver};
use crate::session::ViewportSession;
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tumble".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the viewer window and drives the render loop until exit.
    pub fn run(config: RuntimeConfig, gpu_init: GpuInit) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = ViewerState::new(config, gpu_init);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,

    window: Window,

    // None when GPU context creation failed; the window stays open so the
    // error state remains visible and dismissible.
    #[borrows(window)]
    #[covariant]
    session: Option<ViewportSession<'this>>,
}

struct ViewerState {
    config: RuntimeConfig,
    gpu_init: GpuInit,

    entry: Option<WindowEntry>,
    driver: RenderDriver,
    banner: ErrorBanner,
}

impl ViewerState {
    fn new(config: RuntimeConfig, gpu_init: GpuInit) -> Self {
        Self {
            config,
            gpu_init,
            entry: None,
            driver: RenderDriver::new(),
            banner: ErrorBanner::new(),
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let mut init_error = None;

        let entry = WindowEntryBuilder {
            clock: FrameClock::default(),
            window,
            session_builder: |w| {
                match pollster::block_on(ViewportSession::initialize(w, gpu_init)) {
                    Ok(session) => Some(session),
                    Err(e) => {
                        init_error = Some(e);
                        None
                    }
                }
            },
        }
        .build();

        self.entry = Some(entry);

        match init_error {
            None => self.driver.activate(),
            Some(e) => {
                // The fixed user-facing message goes to the log as well as
                // the banner; the cause line carries the diagnostics.
                log::error!("{e}");
                log::error!("viewport session unavailable: {}", e.cause());
                self.banner.show(e.to_string(), Instant::now());
            }
        }

        Ok(())
    }

    fn destroy_window_entry(&mut self) {
        self.driver.teardown();
        self.entry = None;
    }

    fn has_session(&self) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|entry| entry.with_session(|s| s.is_some()))
    }
}

impl ApplicationHandler for ViewerState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("failed to create window: {e:#}");
            event_loop.exit();
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        // Mobile-style lifecycle: the surface is invalid after this point, so
        // the session and everything built on it go away. `resumed` starts a
        // fresh session with a fresh scene. Renderer resources release before
        // the entry drops the device they were created from.
        self.driver.teardown();
        if self.entry.take().is_some() {
            log::info!("suspended; render session torn down");
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.banner.poll(Instant::now()) {
            log::debug!("error banner auto-hidden");
        }

        if self.has_session() {
            event_loop.set_control_flow(ControlFlow::Wait);

            // Continuous redraw while the scene animates.
            if let Some(entry) = self.entry.as_ref() {
                entry.with_window(|w| w.request_redraw());
            }
        } else if let Some(deadline) = self.banner.deadline() {
            // No frames are being driven; wake when the banner expires.
            event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
        } else {
            event_loop.set_control_flow(ControlFlow::Wait);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.destroy_window_entry();
                event_loop.exit();
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                // Dimensions are read when the throttle fires, not now, so a
                // rapid stream collapses into one application of the final
                // size.
                if self.driver.notify_resize(Instant::now()) {
                    log::trace!("resize throttle armed");
                }
            }

            WindowEvent::KeyboardInput { event: key, .. } => {
                if key.state == ElementState::Pressed
                    && key.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    self.banner.dismiss();
                }
            }

            WindowEvent::RedrawRequested => {
                // Split borrows to avoid `self` capture inside `ouroboros` closures.
                let driver = &mut self.driver;
                let mut outcome = FrameOutcome::Skipped;

                entry.with_mut(|fields| {
                    let Some(session) = fields.session.as_mut() else {
                        return;
                    };

                    let ft = fields.clock.tick();
                    driver.advance();

                    if driver.poll_resize(ft.now) {
                        let size = fields.window.inner_size();
                        session.resize(size);
                        log::debug!("viewport resized to {}x{}", size.width, size.height);
                    }

                    outcome =
                        driver.render_frame(fields.window, &session.camera, &mut session.gpu);
                });

                if outcome == FrameOutcome::Fatal {
                    log::error!("render device lost; shutting down");
                    self.destroy_window_entry();
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Runs on every exit path; teardown is idempotent.
        self.driver.teardown();
        self.entry = None;
    }
}
