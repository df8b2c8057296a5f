//! Dismissible error banner with a 60 second auto-hide.

use std::time::{Duration, Instant};

/// How long a banner stays up before hiding itself.
pub const AUTO_HIDE_AFTER: Duration = Duration::from_secs(60);

/// A single error message surfaced to the viewer.
///
/// Only one message shows at a time; showing again replaces the text and
/// restarts the auto-hide window. The banner keeps no history: once hidden,
/// by timeout or by explicit dismissal, the message is gone.
#[derive(Debug, Default)]
pub struct ErrorBanner {
    message: Option<String>,
    shown_at: Option<Instant>,
}

impl ErrorBanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `message`, replacing any message already up.
    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.message = Some(message.into());
        self.shown_at = Some(now);
    }

    /// Hides the banner immediately. No-op when nothing is showing.
    pub fn dismiss(&mut self) {
        if self.message.take().is_some() {
            log::debug!("error banner dismissed");
        }
        self.shown_at = None;
    }

    /// Auto-hides the banner once [`AUTO_HIDE_AFTER`] has elapsed.
    ///
    /// Returns true when this call hid the banner.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(shown_at) = self.shown_at else {
            return false;
        };
        if now < shown_at + AUTO_HIDE_AFTER {
            return false;
        }
        self.message = None;
        self.shown_at = None;
        true
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// When the banner will auto-hide, if it is showing.
    pub fn deadline(&self) -> Option<Instant> {
        self.shown_at.map(|at| at + AUTO_HIDE_AFTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_hidden() {
        let banner = ErrorBanner::new();
        assert!(!banner.is_visible());
        assert!(banner.message().is_none());
        assert!(banner.deadline().is_none());
    }

    #[test]
    fn show_makes_the_message_visible() {
        let t0 = Instant::now();
        let mut banner = ErrorBanner::new();
        banner.show("context lost", t0);

        assert!(banner.is_visible());
        assert_eq!(banner.message(), Some("context lost"));
        assert_eq!(banner.deadline(), Some(t0 + AUTO_HIDE_AFTER));
    }

    #[test]
    fn dismiss_clears_and_is_idempotent() {
        let mut banner = ErrorBanner::new();
        banner.show("context lost", Instant::now());

        banner.dismiss();
        assert!(!banner.is_visible());
        assert!(banner.deadline().is_none());

        banner.dismiss();
        assert!(!banner.is_visible());
    }

    #[test]
    fn auto_hides_at_the_deadline() {
        let t0 = Instant::now();
        let mut banner = ErrorBanner::new();
        banner.show("context lost", t0);

        assert!(!banner.poll(t0 + AUTO_HIDE_AFTER - Duration::from_secs(1)));
        assert!(banner.is_visible());

        assert!(banner.poll(t0 + AUTO_HIDE_AFTER));
        assert!(!banner.is_visible());

        assert!(!banner.poll(t0 + AUTO_HIDE_AFTER * 2));
    }

    #[test]
    fn reshow_restarts_the_auto_hide_window() {
        let t0 = Instant::now();
        let mut banner = ErrorBanner::new();
        banner.show("first", t0);
        banner.show("second", t0 + Duration::from_secs(30));

        assert_eq!(banner.message(), Some("second"));
        assert!(!banner.poll(t0 + AUTO_HIDE_AFTER));
        assert!(banner.poll(t0 + Duration::from_secs(30) + AUTO_HIDE_AFTER));
    }
}
