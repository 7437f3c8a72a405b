//! Access-latency kernel (disk seek physics)
//!
//! Rotational latency and seek time derived from RPM and access mode, plus
//! a head-position animation driven at a 10 ms tick. The head steps toward
//! its commanded target by a fixed amount per tick, deliberately not
//! scaled by elapsed time or by distance, so settle time is a fixed small
//! number of ticks regardless of seek length.

use serde::{Deserialize, Serialize};

use crate::consts::ACCESS_TICK_MS;
use crate::kernel::{KernelStatus, ParamTable, SimulationKernel};
use crate::safe_div;
use crate::topic::ParamSpec;

/// Seek time when the workload is sequential (track-to-track)
const SEQUENTIAL_SEEK_MS: f64 = 0.5;

/// Average random seek time per drive class, keyed by spindle speed.
/// Nearest profile at or below the set RPM applies.
const DRIVE_PROFILES: [(f64, f64); 5] = [
    (4200.0, 12.0),
    (5400.0, 9.5),
    (7200.0, 8.5),
    (10_000.0, 4.7),
    (15_000.0, 3.4),
];

/// Head movement per tick, in track units
const HEAD_STEP_PER_TICK: f64 = 4.0;
/// Within this distance the head snaps onto the target
const HEAD_SNAP_DISTANCE: f64 = 1.0;

/// Render-ready snapshot of the access-latency model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessStatus {
    pub rpm: f64,
    pub sequential: bool,
    pub rotational_latency_ms: f64,
    pub seek_ms: f64,
    pub total_access_ms: f64,
    pub random_iops: f64,
    pub head_position: f64,
    pub head_target: f64,
    /// True while the head is still moving toward its target
    pub seeking: bool,
}

impl AccessStatus {
    fn is_finite(&self) -> bool {
        [
            self.rpm,
            self.rotational_latency_ms,
            self.seek_ms,
            self.total_access_ms,
            self.random_iops,
            self.head_position,
            self.head_target,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Disk access-latency kernel
#[derive(Debug, Clone)]
pub struct AccessLatencyKernel {
    params: ParamTable,
    head_position: f64,
    last_good: AccessStatus,
}

impl AccessLatencyKernel {
    pub fn new(overrides: &[ParamSpec]) -> Self {
        let params = ParamTable::new(
            vec![
                ParamSpec::new("rpm", 4200.0, 15_000.0, 100.0, 7200.0),
                // Boolean flag: 0 = random workload, 1 = sequential
                ParamSpec::new("sequential", 0.0, 1.0, 1.0, 0.0),
                ParamSpec::new("target_track", 0.0, 100.0, 1.0, 0.0),
            ],
            overrides,
        );
        let mut kernel = Self {
            params,
            head_position: 0.0,
            last_good: AccessStatus {
                rpm: 7200.0,
                sequential: false,
                rotational_latency_ms: 0.0,
                seek_ms: 0.0,
                total_access_ms: 1.0,
                random_iops: 0.0,
                head_position: 0.0,
                head_target: 0.0,
                seeking: false,
            },
        };
        kernel.head_position = kernel.params.value("target_track");
        kernel.refresh_last_good();
        kernel
    }

    /// Random-access seek time for the drive class at this spindle speed
    fn profile_seek_ms(rpm: f64) -> f64 {
        let mut seek = DRIVE_PROFILES[0].1;
        for &(profile_rpm, profile_seek) in &DRIVE_PROFILES {
            if rpm >= profile_rpm {
                seek = profile_seek;
            }
        }
        seek
    }

    fn compute(&self) -> AccessStatus {
        let rpm = self.params.value("rpm");
        let sequential = self.params.value("sequential") >= 0.5;
        let head_target = self.params.value("target_track");

        // Half a revolution on average
        let rotational_latency_ms = safe_div(60_000.0, rpm) / 2.0;
        let seek_ms = if sequential {
            SEQUENTIAL_SEEK_MS
        } else {
            Self::profile_seek_ms(rpm)
        };
        let total_access_ms = seek_ms + rotational_latency_ms;
        let random_iops = safe_div(1000.0, total_access_ms);

        AccessStatus {
            rpm,
            sequential,
            rotational_latency_ms,
            seek_ms,
            total_access_ms,
            random_iops,
            head_position: self.head_position,
            head_target,
            seeking: (head_target - self.head_position).abs() > 0.0,
        }
    }

    fn refresh_last_good(&mut self) {
        let status = self.compute();
        if status.is_finite() {
            self.last_good = status;
        }
    }
}

impl SimulationKernel for AccessLatencyKernel {
    fn tick(&mut self, _dt_ms: f64) {
        let target = self.params.value("target_track");
        let delta = target - self.head_position;
        // Fixed step per tick until within one track, then snap
        if delta.abs() <= HEAD_SNAP_DISTANCE {
            self.head_position = target;
        } else {
            self.head_position += HEAD_STEP_PER_TICK.copysign(delta);
        }
        self.refresh_last_good();
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> Option<f64> {
        let clamped = self.params.set(name, value)?;
        self.refresh_last_good();
        Some(clamped)
    }

    fn parameter(&self, name: &str) -> Option<f64> {
        self.params.get(name)
    }

    fn parameters(&self) -> std::collections::BTreeMap<String, f64> {
        self.params.values()
    }

    fn reset(&mut self) {
        self.params.reset();
        self.head_position = self.params.value("target_track");
        self.refresh_last_good();
    }

    fn status(&self) -> KernelStatus {
        let status = self.compute();
        if status.is_finite() {
            KernelStatus::Access(status)
        } else {
            log::warn!("access kernel produced non-finite status, keeping last good");
            KernelStatus::Access(self.last_good.clone())
        }
    }

    fn tick_period_ms(&self) -> f64 {
        ACCESS_TICK_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(kernel: &AccessLatencyKernel) -> AccessStatus {
        match kernel.status() {
            KernelStatus::Access(s) => s,
            other => panic!("expected access status, got {other:?}"),
        }
    }

    fn set(kernel: &mut AccessLatencyKernel, name: &str, value: f64) {
        kernel.set_parameter(name, value).expect("declared parameter");
    }

    #[test]
    fn test_rotational_latency_at_7200() {
        let kernel = AccessLatencyKernel::new(&[]);
        let s = status(&kernel);
        // (60 / 7200) * 1000 / 2
        assert!((s.rotational_latency_ms - 4.1667).abs() < 0.001);
    }

    #[test]
    fn test_sequential_always_faster_than_random() {
        let mut kernel = AccessLatencyKernel::new(&[]);
        for rpm in [4200.0, 5400.0, 7200.0, 10_000.0, 15_000.0] {
            set(&mut kernel, "rpm", rpm);
            set(&mut kernel, "sequential", 0.0);
            let random = status(&kernel);
            set(&mut kernel, "sequential", 1.0);
            let sequential = status(&kernel);
            assert!(
                sequential.seek_ms < random.seek_ms,
                "rpm {rpm}: {} !< {}",
                sequential.seek_ms,
                random.seek_ms
            );
        }
    }

    #[test]
    fn test_iops_inverse_of_access_time() {
        let mut kernel = AccessLatencyKernel::new(&[]);
        set(&mut kernel, "rpm", 15_000.0);
        let s = status(&kernel);
        assert!((s.random_iops * s.total_access_ms - 1000.0).abs() < 0.01);
    }

    #[test]
    fn test_faster_spindle_means_more_iops() {
        let mut kernel = AccessLatencyKernel::new(&[]);
        set(&mut kernel, "rpm", 5400.0);
        let slow = status(&kernel);
        set(&mut kernel, "rpm", 15_000.0);
        let fast = status(&kernel);
        assert!(fast.random_iops > slow.random_iops);
    }

    #[test]
    fn test_head_ramp_is_fixed_step() {
        let mut kernel = AccessLatencyKernel::new(&[]);
        set(&mut kernel, "target_track", 40.0);

        kernel.tick(ACCESS_TICK_MS);
        assert!((status(&kernel).head_position - HEAD_STEP_PER_TICK).abs() < 1e-9);

        // Settle time depends on tick count, not distance scaling:
        // 40 units at 4/tick, snapping within the last unit
        let mut ticks = 1;
        while status(&kernel).seeking {
            kernel.tick(ACCESS_TICK_MS);
            ticks += 1;
            assert!(ticks < 50, "head never settled");
        }
        assert_eq!(ticks, 10);
        assert!((status(&kernel).head_position - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_head_snaps_within_one_unit() {
        let mut kernel = AccessLatencyKernel::new(&[]);
        set(&mut kernel, "target_track", 0.5);
        kernel.tick(ACCESS_TICK_MS);
        let s = status(&kernel);
        assert_eq!(s.head_position, 0.5);
        assert!(!s.seeking);
    }

    #[test]
    fn test_head_moves_down_too() {
        let mut kernel = AccessLatencyKernel::new(&[]);
        set(&mut kernel, "target_track", 20.0);
        for _ in 0..10 {
            kernel.tick(ACCESS_TICK_MS);
        }
        set(&mut kernel, "target_track", 8.0);
        kernel.tick(ACCESS_TICK_MS);
        assert!((status(&kernel).head_position - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_rpm_clamped_to_range() {
        let mut kernel = AccessLatencyKernel::new(&[]);
        assert_eq!(kernel.set_parameter("rpm", 1.0), Some(4200.0));
        assert_eq!(kernel.set_parameter("rpm", 1e9), Some(15_000.0));
        assert_eq!(kernel.set_parameter("warp", 9.0), None);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut kernel = AccessLatencyKernel::new(&[]);
        set(&mut kernel, "rpm", 15_000.0);
        set(&mut kernel, "target_track", 90.0);
        for _ in 0..30 {
            kernel.tick(ACCESS_TICK_MS);
        }
        kernel.reset();
        let s = status(&kernel);
        assert_eq!(s.rpm, 7200.0);
        assert_eq!(s.head_position, 0.0);
        assert!(!s.seeking);
    }
}
