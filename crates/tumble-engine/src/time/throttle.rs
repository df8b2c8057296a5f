use std::time::{Duration, Instant};

/// Delay between the first resize notification of a window and the applied
/// camera/surface adjustment.
pub const RESIZE_THROTTLE_DELAY: Duration = Duration::from_millis(250);

/// Trailing-edge throttle for resize notifications.
///
/// The first notification arms a deadline. Notifications arriving while the
/// deadline is pending are dropped, not queued. Once a poll observes the
/// deadline, the caller applies a single adjustment using dimensions read at
/// that moment, so the result reflects the viewport at fire time rather than
/// any intermediate event.
///
/// At most one deadline is pending at any time.
#[derive(Debug, Clone)]
pub struct ResizeThrottle {
    delay: Duration,
    deadline: Option<Instant>,
}

impl ResizeThrottle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Records a resize notification observed at `now`.
    ///
    /// Returns `true` when the notification armed a new deadline, `false`
    /// when it was dropped because one is already pending.
    pub fn notify(&mut self, now: Instant) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now + self.delay);
        true
    }

    /// Polls the pending deadline against `now`.
    ///
    /// Returns `true` exactly once per armed window, at the first poll at or
    /// past the deadline. The pending state clears on fire, so a later
    /// notification arms a fresh window.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drops the pending deadline, if any, without firing.
    ///
    /// Called on teardown so a stale deadline cannot fire into a rebuilt
    /// session.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// The instant the pending window elapses, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl Default for ResizeThrottle {
    fn default() -> Self {
        Self::new(RESIZE_THROTTLE_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(250);

    fn throttle() -> (ResizeThrottle, Instant) {
        (ResizeThrottle::new(DELAY), Instant::now())
    }

    // ── notify ────────────────────────────────────────────────────────────

    #[test]
    fn first_notification_arms() {
        let (mut th, t0) = throttle();
        assert!(th.notify(t0));
        assert!(th.is_pending());
        assert_eq!(th.deadline(), Some(t0 + DELAY));
    }

    #[test]
    fn notifications_while_pending_are_dropped() {
        let (mut th, t0) = throttle();
        assert!(th.notify(t0));
        for i in 1..50u32 {
            assert!(!th.notify(t0 + Duration::from_millis(i as u64)));
        }
        // Dropped notifications must not extend the armed deadline.
        assert_eq!(th.deadline(), Some(t0 + DELAY));
    }

    // ── fire ──────────────────────────────────────────────────────────────

    #[test]
    fn never_fires_without_notification() {
        let (mut th, t0) = throttle();
        assert!(!th.fire(t0));
        assert!(!th.fire(t0 + DELAY * 4));
    }

    #[test]
    fn fires_once_at_deadline() {
        let (mut th, t0) = throttle();
        th.notify(t0);
        assert!(!th.fire(t0 + DELAY - Duration::from_millis(1)));
        assert!(th.fire(t0 + DELAY));
        assert!(!th.fire(t0 + DELAY));
        assert!(!th.is_pending());
    }

    #[test]
    fn fifty_notifications_one_fire() {
        let (mut th, t0) = throttle();
        let mut armed = 0;
        for i in 0..50u32 {
            if th.notify(t0 + Duration::from_millis(i as u64)) {
                armed += 1;
            }
        }
        assert_eq!(armed, 1);

        let mut fired = 0;
        for i in 0..500u32 {
            if th.fire(t0 + Duration::from_millis(i as u64)) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
    }

    #[test]
    fn rearms_after_fire() {
        let (mut th, t0) = throttle();
        th.notify(t0);
        assert!(th.fire(t0 + DELAY));

        let t1 = t0 + DELAY + Duration::from_millis(30);
        assert!(th.notify(t1));
        assert_eq!(th.deadline(), Some(t1 + DELAY));
        assert!(th.fire(t1 + DELAY));
    }

    // ── cancel ────────────────────────────────────────────────────────────

    #[test]
    fn cancel_clears_pending() {
        let (mut th, t0) = throttle();
        th.notify(t0);
        th.cancel();
        assert!(!th.is_pending());
        assert!(!th.fire(t0 + DELAY));
        // A fresh notification arms normally after a cancel.
        assert!(th.notify(t0 + DELAY));
    }
}
