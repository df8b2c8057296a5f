//! Render driver: scene lifecycle, animation loop, and resize throttling.

use std::time::Instant;

use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::camera::Camera;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::render::{CubeRenderer, RenderCtx, RenderTarget};
use crate::scene::{Scene, ROTATION_STEP};
use crate::time::ResizeThrottle;

/// Driver lifecycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DriverState {
    /// No session yet; every operation defers.
    Inactive,
    /// Scene built; animation ticks and resize notifications flow.
    Active,
    /// Resources released; terminal until a new session re-activates.
    TornDown,
}

/// Result of driving one frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Rendered,
    /// Transient condition (driver not active, zero-size viewport, surface
    /// reconfigured); the frame is dropped and the loop continues.
    Skipped,
    /// Unrecoverable device loss; the runtime should exit.
    Fatal,
}

/// Owns the ephemeral scene and the render-loop bookkeeping.
///
/// The driver holds no camera or GPU references; it borrows them per call
/// from the session. Every operation is guarded on [`DriverState::Active`],
/// which is what makes teardown race-free: a tick or resize callback landing
/// after teardown observes the guard and mutates nothing.
pub struct RenderDriver {
    state: DriverState,
    scene: Option<Scene>,
    renderer: CubeRenderer,
    throttle: ResizeThrottle,
}

impl RenderDriver {
    pub fn new() -> Self {
        Self {
            state: DriverState::Inactive,
            scene: None,
            renderer: CubeRenderer::new(),
            throttle: ResizeThrottle::default(),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == DriverState::Active
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Activates the driver for a fresh session.
    ///
    /// Valid from `Inactive` and from `TornDown` (a new session re-enters the
    /// loop). Builds a brand-new scene either way, so rotation restarts from
    /// zero; nothing persists across rebuilds. Re-activating while `Active`
    /// is a no-op.
    pub fn activate(&mut self) {
        if self.state == DriverState::Active {
            return;
        }
        self.scene = Some(Scene::cube_demo());
        self.state = DriverState::Active;
        log::debug!("render driver active: scene with 1 mesh, 1 light");
    }

    /// Advances the animation one tick: +0.01 rad around X and Y.
    pub fn advance(&mut self) {
        if self.state != DriverState::Active {
            return;
        }
        if let Some(scene) = self.scene.as_mut() {
            scene.rotate_meshes(ROTATION_STEP, ROTATION_STEP);
        }
    }

    /// Records a resize notification observed at `now`.
    ///
    /// Returns whether the notification armed the throttle; notifications
    /// arriving while a deadline is pending (or outside `Active`) are
    /// dropped.
    pub fn notify_resize(&mut self, now: Instant) -> bool {
        if self.state != DriverState::Active {
            return false;
        }
        self.throttle.notify(now)
    }

    /// Polls the resize throttle at `now`.
    ///
    /// True means the caller must apply the dimensions current at this
    /// moment to the session; the throttle re-arms only on a later
    /// notification.
    pub fn poll_resize(&mut self, now: Instant) -> bool {
        if self.state != DriverState::Active {
            return false;
        }
        self.throttle.fire(now)
    }

    /// Renders one frame of the scene through `camera` into the surface.
    pub fn render_frame(
        &mut self,
        window: &Window,
        camera: &Camera,
        gpu: &mut Gpu<'_>,
    ) -> FrameOutcome {
        if self.state != DriverState::Active {
            return FrameOutcome::Skipped;
        }
        let Some(scene) = self.scene.as_ref() else {
            return FrameOutcome::Skipped;
        };

        // While minimized the viewport reports 0x0 and the surface keeps its
        // previous configuration (reconfigure is deferred), so render targets
        // sized from the viewport would no longer match the surface.
        if !drawable(gpu.size()) {
            return FrameOutcome::Skipped;
        }

        let mut frame = match gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => FrameOutcome::Fatal,
                    _ => FrameOutcome::Skipped,
                };
            }
        };

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let ctx = RenderCtx::new(
                gpu.device(),
                gpu.queue(),
                gpu.surface_format(),
                gpu.sample_count(),
                gpu.size(),
            );
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            self.renderer.render(&ctx, &mut target, scene, camera);
        }

        window.pre_present_notify();
        gpu.submit(frame);

        FrameOutcome::Rendered
    }

    /// Releases everything the driver owns.
    ///
    /// Idempotent and safe on every exit path: the scene drops, the
    /// renderer's GPU resources drop, and a pending resize deadline is
    /// cancelled so it cannot fire into a rebuilt session.
    pub fn teardown(&mut self) {
        if self.state == DriverState::TornDown {
            return;
        }
        let was_active = self.state == DriverState::Active;

        self.throttle.cancel();
        self.scene = None;
        self.renderer.release();
        self.state = DriverState::TornDown;

        if was_active {
            log::debug!("render driver torn down");
        }
    }
}

impl Default for RenderDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a viewport of `size` has any drawable area.
fn drawable(size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::RESIZE_THROTTLE_DELAY;
    use std::time::Duration;

    fn active_driver() -> (RenderDriver, Instant) {
        let mut driver = RenderDriver::new();
        driver.activate();
        (driver, Instant::now())
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn starts_inactive_without_scene() {
        let driver = RenderDriver::new();
        assert_eq!(driver.state(), DriverState::Inactive);
        assert!(driver.scene().is_none());
    }

    #[test]
    fn activate_builds_the_demo_scene() {
        let (driver, _) = active_driver();
        assert!(driver.is_active());

        let scene = driver.scene().unwrap();
        assert_eq!(scene.meshes().len(), 1);
        assert_eq!(scene.lights().len(), 1);
    }

    #[test]
    fn teardown_is_idempotent_and_releases() {
        let (mut driver, t0) = active_driver();
        driver.notify_resize(t0);

        driver.teardown();
        assert_eq!(driver.state(), DriverState::TornDown);
        assert!(driver.scene().is_none());

        driver.teardown();
        assert_eq!(driver.state(), DriverState::TornDown);
    }

    #[test]
    fn reactivation_starts_a_fresh_scene() {
        let (mut driver, _) = active_driver();
        driver.advance();
        driver.teardown();

        driver.activate();
        assert!(driver.is_active());
        let rot = driver.scene().unwrap().meshes()[0].rotation();
        assert_eq!(rot, glam::Vec3::ZERO);
    }

    // ── animation ─────────────────────────────────────────────────────────

    #[test]
    fn advance_steps_rotation_by_fixed_increment() {
        let (mut driver, _) = active_driver();
        driver.advance();

        let rot = driver.scene().unwrap().meshes()[0].rotation();
        assert_eq!(rot.x, ROTATION_STEP);
        assert_eq!(rot.y, ROTATION_STEP);
        assert_eq!(rot.z, 0.0);
    }

    #[test]
    fn advance_defers_until_activation() {
        let mut driver = RenderDriver::new();
        driver.advance();
        assert!(driver.scene().is_none());
    }

    // ── resize throttling ─────────────────────────────────────────────────

    #[test]
    fn no_notifications_no_adjustment() {
        let (mut driver, t0) = active_driver();
        assert!(!driver.poll_resize(t0 + RESIZE_THROTTLE_DELAY * 10));
    }

    #[test]
    fn single_notification_applies_once_after_delay() {
        let (mut driver, t0) = active_driver();
        assert!(driver.notify_resize(t0));

        assert!(!driver.poll_resize(t0 + RESIZE_THROTTLE_DELAY - Duration::from_millis(1)));
        assert!(driver.poll_resize(t0 + RESIZE_THROTTLE_DELAY));
        assert!(!driver.poll_resize(t0 + RESIZE_THROTTLE_DELAY * 2));
    }

    #[test]
    fn fifty_notifications_apply_once() {
        let (mut driver, t0) = active_driver();

        let mut armed = 0;
        for i in 0..50u32 {
            if driver.notify_resize(t0 + Duration::from_millis(i as u64)) {
                armed += 1;
            }
        }
        assert_eq!(armed, 1);

        let mut applied = 0;
        for i in 0..1000u32 {
            if driver.poll_resize(t0 + Duration::from_millis(i as u64)) {
                applied += 1;
            }
        }
        assert_eq!(applied, 1);
    }

    #[test]
    fn notifications_ignored_before_activation() {
        let mut driver = RenderDriver::new();
        let t0 = Instant::now();
        assert!(!driver.notify_resize(t0));
        assert!(!driver.poll_resize(t0 + RESIZE_THROTTLE_DELAY));
    }

    #[test]
    fn minimized_viewport_is_not_drawable() {
        // Minimize delivers a 0x0 resize; once the throttle applies it the
        // camera keeps its previous aspect and the frame path must refuse to
        // draw until a usable size arrives, because the surface still holds
        // its old configuration.
        let (mut driver, t0) = active_driver();
        let mut camera = Camera::perspective(800.0, 600.0);

        driver.notify_resize(t0);
        if driver.poll_resize(t0 + RESIZE_THROTTLE_DELAY) {
            camera.set_viewport(0.0, 0.0);
        }

        assert_eq!(camera.aspect(), 800.0 / 600.0);
        assert!(!drawable(PhysicalSize::new(0, 0)));
        assert!(!drawable(PhysicalSize::new(800, 0)));
        assert!(!drawable(PhysicalSize::new(0, 600)));
        assert!(drawable(PhysicalSize::new(800, 600)));
    }

    #[test]
    fn fired_poll_applies_the_dimensions_current_at_fire_time() {
        // The camera starts at 800x600; a burst of notifications lands while
        // the window is being dragged, and the size that sticks is whatever
        // is current when the deadline fires.
        let (mut driver, t0) = active_driver();
        let mut camera = Camera::perspective(800.0, 600.0);

        for i in 0..5u32 {
            driver.notify_resize(t0 + Duration::from_millis(i as u64 * 10));
        }

        if driver.poll_resize(t0 + RESIZE_THROTTLE_DELAY) {
            camera.set_viewport(1600.0, 1200.0);
        }

        assert_eq!(camera.aspect(), 1600.0 / 1200.0);
    }

    // ── post-teardown guarding ────────────────────────────────────────────

    #[test]
    fn late_callbacks_after_teardown_mutate_nothing() {
        let (mut driver, t0) = active_driver();
        let mut camera = Camera::perspective(800.0, 600.0);
        let projection_before = camera.projection();

        driver.notify_resize(t0);
        driver.teardown();

        // Late animation tick and late throttle poll, as the runtime would
        // issue them.
        driver.advance();
        if driver.poll_resize(t0 + RESIZE_THROTTLE_DELAY) {
            camera.set_viewport(9999.0, 1.0);
        }

        assert!(driver.scene().is_none());
        assert_eq!(camera.aspect(), 800.0 / 600.0);
        assert_eq!(camera.projection(), projection_before);

        // And notifications stay dead until a new session activates.
        assert!(!driver.notify_resize(t0 + RESIZE_THROTTLE_DELAY * 2));
    }
}
