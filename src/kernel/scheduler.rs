//! Fixed-period tick scheduler
//!
//! A single cancellable periodic task per active simulation, started and
//! stopped by phase transitions. The host calls `advance` from its own
//! timer/frame callback; when the scheduler has been stopped, `advance`
//! is a no-op: cancellation is cooperative, not preemptive.

use crate::consts::MAX_TICKS_PER_ADVANCE;
use crate::kernel::SimulationKernel;

/// Accumulator-based fixed timestep driver for one kernel
#[derive(Debug, Clone)]
pub struct TickScheduler {
    period_ms: f64,
    accumulator_ms: f64,
    last_now_ms: f64,
    running: bool,
}

impl TickScheduler {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            accumulator_ms: 0.0,
            last_now_ms: 0.0,
            running: false,
        }
    }

    /// Begin ticking. Restarting while running just re-anchors the clock.
    pub fn start(&mut self, now_ms: f64) {
        self.running = true;
        self.accumulator_ms = 0.0;
        self.last_now_ms = now_ms;
    }

    /// Stop ticking. Idempotent; pending fractional time is discarded so a
    /// later start cannot replay it.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.accumulator_ms = 0.0;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run as many fixed ticks as wall time allows, capped to prevent a
    /// spiral of death after the host tab was backgrounded. Returns the
    /// number of ticks executed (0 when stopped).
    pub fn advance(&mut self, now_ms: f64, kernel: &mut dyn SimulationKernel) -> u32 {
        if !self.running {
            return 0;
        }

        let elapsed = (now_ms - self.last_now_ms).max(0.0);
        self.last_now_ms = now_ms;
        // Cap catch-up work the same way the cap on ticks does
        let max_catchup = self.period_ms * f64::from(MAX_TICKS_PER_ADVANCE);
        self.accumulator_ms = (self.accumulator_ms + elapsed).min(max_catchup);

        let mut ticks = 0;
        while self.accumulator_ms >= self.period_ms && ticks < MAX_TICKS_PER_ADVANCE {
            kernel.tick(self.period_ms);
            self.accumulator_ms -= self.period_ms;
            ticks += 1;
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{AccessLatencyKernel, KernelStatus, SimulationKernel};

    fn kernel() -> AccessLatencyKernel {
        AccessLatencyKernel::new(&[])
    }

    fn set_param(kernel: &mut AccessLatencyKernel, name: &str, value: f64) {
        kernel.set_parameter(name, value).expect("declared parameter");
    }

    #[test]
    fn test_advance_noop_when_stopped() {
        let mut sched = TickScheduler::new(10.0);
        let mut k = kernel();
        assert_eq!(sched.advance(1000.0, &mut k), 0);
    }

    #[test]
    fn test_advance_runs_elapsed_ticks() {
        let mut sched = TickScheduler::new(10.0);
        let mut k = kernel();
        sched.start(0.0);
        assert_eq!(sched.advance(35.0, &mut k), 3);
        // Fractional 5ms carried over
        assert_eq!(sched.advance(40.0, &mut k), 1);
    }

    #[test]
    fn test_stop_is_idempotent_and_cancels() {
        let mut sched = TickScheduler::new(10.0);
        let mut k = kernel();
        sched.start(0.0);
        sched.stop();
        sched.stop();
        assert!(!sched.is_running());
        // A late timer callback after stop must not mutate state
        assert_eq!(sched.advance(500.0, &mut k), 0);
    }

    #[test]
    fn test_restart_does_not_replay_pending_time() {
        let mut sched = TickScheduler::new(10.0);
        let mut k = kernel();
        sched.start(0.0);
        sched.advance(5.0, &mut k);
        sched.stop();
        sched.start(1000.0);
        // Only 5ms elapsed since restart: no ticks
        assert_eq!(sched.advance(1005.0, &mut k), 0);
    }

    #[test]
    fn test_catchup_is_capped() {
        let mut sched = TickScheduler::new(10.0);
        let mut k = kernel();
        sched.start(0.0);
        // Host tab slept for a minute; don't run 6000 ticks
        let ticks = sched.advance(60_000.0, &mut k);
        assert_eq!(ticks, crate::consts::MAX_TICKS_PER_ADVANCE);
        // And the backlog does not persist beyond the cap
        let ticks = sched.advance(60_010.0, &mut k);
        assert!(ticks <= crate::consts::MAX_TICKS_PER_ADVANCE);
    }

    #[test]
    fn test_ticks_drive_kernel_state() {
        let mut sched = TickScheduler::new(10.0);
        let mut k = kernel();
        set_param(&mut k, "target_track", 60.0);
        sched.start(0.0);
        sched.advance(100.0, &mut k);
        let KernelStatus::Access(status) = k.status() else {
            panic!("access kernel");
        };
        assert!(status.head_position > 0.0);
    }
}
