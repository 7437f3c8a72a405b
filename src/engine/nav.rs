//! Navigation controller
//!
//! Owns the current phase. All transitions go through here so that rapid
//! repeated input (double-click, animation-interrupted re-entry) can never
//! produce two overlapping transitions or skip a phase.
//!
//! Time is an explicit `now_ms` argument; the controller never reads a clock.

use crate::consts::{NAV_DEBOUNCE_MS, NAV_SETTLE_MS};
use crate::engine::phase::Phase;

/// Debounced, in-flight-guarded phase navigation
#[derive(Debug, Clone)]
pub struct NavigationController {
    current: Phase,
    /// Timestamp of the last accepted navigation
    last_accepted_ms: f64,
    /// Navigations are rejected until this deadline passes (settle window)
    in_flight_until_ms: f64,
    /// An external resume hint is adopted at most once per mount
    external_sync_consumed: bool,
}

impl NavigationController {
    /// Create a controller starting at the resume hint if it names a valid
    /// phase, else at the first phase. Invalid hints are ignored silently:
    /// phase identifiers may come from untrusted persisted state.
    pub fn init(resume_hint: Option<&str>) -> Self {
        let current = resume_hint
            .and_then(Phase::parse)
            .unwrap_or(Phase::Hook);
        if let Some(hint) = resume_hint {
            if Phase::parse(hint).is_none() {
                log::debug!("ignoring invalid resume phase {hint:?}");
            }
        }
        Self {
            current,
            last_accepted_ms: f64::NEG_INFINITY,
            in_flight_until_ms: f64::NEG_INFINITY,
            external_sync_consumed: false,
        }
    }

    /// The phase the lesson is currently in
    pub fn current(&self) -> Phase {
        self.current
    }

    /// Whether a navigation accepted at `now_ms` would be rejected
    pub fn is_in_flight(&self, now_ms: f64) -> bool {
        now_ms < self.in_flight_until_ms
    }

    /// Navigate to an arbitrary phase. Returns true if accepted.
    ///
    /// Rejected while a prior navigation is still in flight, or when fewer
    /// than the debounce interval has elapsed since the last acceptance.
    pub fn go_to_phase(&mut self, target: Phase, now_ms: f64) -> bool {
        if self.is_in_flight(now_ms) {
            log::trace!("navigation to {} rejected: in flight", target.as_str());
            return false;
        }
        if now_ms - self.last_accepted_ms < NAV_DEBOUNCE_MS {
            log::trace!("navigation to {} rejected: debounce", target.as_str());
            return false;
        }
        self.accept(target, now_ms);
        true
    }

    /// Advance to the next phase. No-op at the last phase.
    pub fn go_next(&mut self, now_ms: f64) -> bool {
        match self.current.next() {
            Some(next) => self.go_to_phase(next, now_ms),
            None => false,
        }
    }

    /// Return to the previous phase. No-op at the first phase.
    pub fn go_back(&mut self, now_ms: f64) -> bool {
        match self.current.prev() {
            Some(prev) => self.go_to_phase(prev, now_ms),
            None => false,
        }
    }

    /// Adopt an updated external phase hint (e.g. a saved session loaded
    /// after mount). Applied exactly once, as a single atomic assignment;
    /// bypasses the debounce because it is not a user navigation.
    /// Returns true if the hint was adopted.
    pub fn sync_external(&mut self, hint: &str) -> bool {
        if self.external_sync_consumed {
            return false;
        }
        let Some(target) = Phase::parse(hint) else {
            log::debug!("ignoring invalid external phase {hint:?}");
            return false;
        };
        self.external_sync_consumed = true;
        if target == self.current {
            return false;
        }
        log::info!("external resume override -> {}", target.as_str());
        self.current = target;
        true
    }

    /// Restore the current phase from a snapshot (host persistence path).
    /// Single assignment; clears timing guards.
    pub fn restore(&mut self, phase: Phase) {
        self.current = phase;
        self.last_accepted_ms = f64::NEG_INFINITY;
        self.in_flight_until_ms = f64::NEG_INFINITY;
    }

    fn accept(&mut self, target: Phase, now_ms: f64) {
        log::debug!(
            "phase {} -> {} ({}/{})",
            self.current.as_str(),
            target.as_str(),
            target.index() + 1,
            Phase::order().len()
        );
        self.current = target;
        self.last_accepted_ms = now_ms;
        self.in_flight_until_ms = now_ms + NAV_SETTLE_MS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_defaults_to_hook() {
        let nav = NavigationController::init(None);
        assert_eq!(nav.current(), Phase::Hook);
    }

    #[test]
    fn test_init_with_resume_hint() {
        let nav = NavigationController::init(Some("play"));
        assert_eq!(nav.current(), Phase::Play);
    }

    #[test]
    fn test_init_with_invalid_hint_is_silent() {
        let nav = NavigationController::init(Some("not_a_phase"));
        assert_eq!(nav.current(), Phase::Hook);
    }

    #[test]
    fn test_init_idempotent_for_same_hint() {
        let a = NavigationController::init(Some("review"));
        let b = NavigationController::init(Some("review"));
        assert_eq!(a.current(), b.current());
    }

    #[test]
    fn test_debounce_rejects_second_call() {
        let mut nav = NavigationController::init(None);
        assert!(nav.go_next(1000.0));
        assert_eq!(nav.current(), Phase::Predict);
        // Within both the settle window and the debounce interval
        assert!(!nav.go_next(1100.0));
        assert_eq!(nav.current(), Phase::Predict);
        // Well clear of both
        assert!(nav.go_next(2000.0));
        assert_eq!(nav.current(), Phase::Play);
    }

    #[test]
    fn test_in_flight_window_outlasts_debounce() {
        let mut nav = NavigationController::init(None);
        assert!(nav.go_next(1000.0));
        // Past 200ms debounce but still inside the 350ms settle window
        assert!(!nav.go_next(1250.0));
        assert!(nav.go_next(1351.0));
    }

    #[test]
    fn test_boundary_no_ops() {
        let mut nav = NavigationController::init(None);
        assert!(!nav.go_back(1000.0));
        assert_eq!(nav.current(), Phase::Hook);

        let mut nav = NavigationController::init(Some("mastery"));
        assert!(!nav.go_next(1000.0));
        assert_eq!(nav.current(), Phase::Mastery);
    }

    #[test]
    fn test_external_sync_applies_once() {
        let mut nav = NavigationController::init(None);
        assert!(nav.sync_external("transfer"));
        assert_eq!(nav.current(), Phase::Transfer);
        // Second hint ignored, even if valid
        assert!(!nav.sync_external("test"));
        assert_eq!(nav.current(), Phase::Transfer);
    }

    #[test]
    fn test_external_sync_bypasses_debounce() {
        let mut nav = NavigationController::init(None);
        assert!(nav.go_next(1000.0));
        // Inside the settle window; a user navigation would be rejected
        assert!(nav.sync_external("test"));
        assert_eq!(nav.current(), Phase::Test);
    }

    #[test]
    fn test_external_sync_invalid_does_not_consume() {
        let mut nav = NavigationController::init(None);
        assert!(!nav.sync_external("garbage"));
        // Still allowed to adopt a later, valid hint
        assert!(nav.sync_external("play"));
        assert_eq!(nav.current(), Phase::Play);
    }

    #[test]
    fn test_external_sync_same_phase_consumes() {
        let mut nav = NavigationController::init(Some("play"));
        assert!(!nav.sync_external("play"));
        assert!(!nav.sync_external("test"));
    }
}
