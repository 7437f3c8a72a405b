//! Thermal-feedback kernel (CPU throttling)
//!
//! Die temperature follows an exponential approach toward a target set by
//! dissipated power and cooling capacity, at a 50 ms tick. A hysteretic
//! throttle sits on top: it engages at the throttle threshold and releases
//! only below threshold minus the dead-band, so the state cannot flap while
//! temperature sits inside the band. While throttling, the effective clock
//! and voltage decay toward floors; once released they recover toward the
//! user setpoints.

use serde::{Deserialize, Serialize};

use crate::consts::THERMAL_TICK_MS;
use crate::kernel::{KernelStatus, ParamTable, SimulationKernel};
use crate::safe_div;
use crate::topic::ParamSpec;

/// Ambient (and initial die) temperature
const AMBIENT_C: f64 = 25.0;
/// Absolute ceiling the die is clamped at
const CRITICAL_C: f64 = 110.0;
/// Throttling engages at or above this temperature
const THROTTLE_ON_C: f64 = 95.0;
/// Dead-band: throttling releases only below `THROTTLE_ON_C - HYSTERESIS_C`
const HYSTERESIS_C: f64 = 10.0;
/// Fraction of the temperature-to-target gap closed per tick
const SMOOTHING: f64 = 0.05;

/// Dynamic power scale (W per V²·GHz at full workload)
const DYNAMIC_SCALE: f64 = 9.0;
/// Static (leakage) power at ambient
const STATIC_BASE_W: f64 = 8.0;
/// Leakage growth per degree above ambient
const LEAKAGE_PER_C: f64 = 0.02;
/// Cooling capacity at which thermal resistance is 1 degree per watt
const REFERENCE_COOLING_W: f64 = 100.0;

/// Per-tick decay of the effective clock while throttling
const CLOCK_DECAY: f64 = 0.95;
/// Per-tick decay of the effective voltage while throttling
const VOLTAGE_DECAY: f64 = 0.98;
/// Effective clock never drops below this fraction of the setpoint
const CLOCK_FLOOR_FRAC: f64 = 0.5;
/// Effective voltage never drops below this fraction of the setpoint
const VOLTAGE_FLOOR_FRAC: f64 = 0.9;

/// Render-ready snapshot of the thermal model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalStatus {
    pub temperature_c: f64,
    pub target_temp_c: f64,
    pub power_w: f64,
    pub is_throttling: bool,
    pub effective_clock_ghz: f64,
    pub effective_voltage_v: f64,
    /// True once the die sits at the absolute ceiling
    pub at_critical: bool,
}

impl ThermalStatus {
    fn is_finite(&self) -> bool {
        [
            self.temperature_c,
            self.target_temp_c,
            self.power_w,
            self.effective_clock_ghz,
            self.effective_voltage_v,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// CPU thermal-feedback kernel with hysteretic throttling
#[derive(Debug, Clone)]
pub struct ThermalKernel {
    params: ParamTable,
    temperature_c: f64,
    throttling: bool,
    effective_clock_ghz: f64,
    effective_voltage_v: f64,
    last_good: ThermalStatus,
}

impl ThermalKernel {
    pub fn new(overrides: &[ParamSpec]) -> Self {
        let params = ParamTable::new(
            vec![
                ParamSpec::new("clock_ghz", 0.8, 5.0, 0.1, 3.0),
                ParamSpec::new("voltage_v", 0.8, 1.4, 0.05, 1.2),
                ParamSpec::new("workload_pct", 0.0, 100.0, 5.0, 50.0),
                ParamSpec::new("cooling_w", 40.0, 250.0, 10.0, 100.0),
            ],
            overrides,
        );
        let effective_clock_ghz = params.value("clock_ghz");
        let effective_voltage_v = params.value("voltage_v");
        let mut kernel = Self {
            params,
            temperature_c: AMBIENT_C,
            throttling: false,
            effective_clock_ghz,
            effective_voltage_v,
            last_good: ThermalStatus {
                temperature_c: AMBIENT_C,
                target_temp_c: AMBIENT_C,
                power_w: 0.0,
                is_throttling: false,
                effective_clock_ghz,
                effective_voltage_v,
                at_critical: false,
            },
        };
        kernel.refresh_last_good();
        kernel
    }

    /// Dissipated power at the current effective operating point
    fn power_w(&self) -> f64 {
        let workload = self.params.value("workload_pct") / 100.0;
        let dynamic = self.effective_voltage_v * self.effective_voltage_v
            * self.effective_clock_ghz
            * workload
            * DYNAMIC_SCALE;
        let leakage = STATIC_BASE_W * (1.0 + LEAKAGE_PER_C * (self.temperature_c - AMBIENT_C));
        dynamic + leakage.max(0.0)
    }

    fn target_temp_c(&self) -> f64 {
        let cooling = self.params.value("cooling_w");
        let thermal_resistance = safe_div(1.0, cooling / REFERENCE_COOLING_W);
        AMBIENT_C + self.power_w() * thermal_resistance
    }

    fn compute(&self) -> ThermalStatus {
        ThermalStatus {
            temperature_c: self.temperature_c,
            target_temp_c: self.target_temp_c(),
            power_w: self.power_w(),
            is_throttling: self.throttling,
            effective_clock_ghz: self.effective_clock_ghz,
            effective_voltage_v: self.effective_voltage_v,
            at_critical: self.temperature_c >= CRITICAL_C,
        }
    }

    fn refresh_last_good(&mut self) {
        let status = self.compute();
        if status.is_finite() {
            self.last_good = status;
        }
    }
}

impl SimulationKernel for ThermalKernel {
    fn tick(&mut self, _dt_ms: f64) {
        // Exponential approach toward the power-driven target, clamped at
        // the absolute ceiling
        let target = self.target_temp_c();
        self.temperature_c += (target - self.temperature_c) * SMOOTHING;
        self.temperature_c = self.temperature_c.min(CRITICAL_C).max(AMBIENT_C);

        // Hysteretic throttle transitions
        if !self.throttling && self.temperature_c >= THROTTLE_ON_C {
            log::info!("thermal throttle engaged at {:.1} C", self.temperature_c);
            self.throttling = true;
        } else if self.throttling && self.temperature_c < THROTTLE_ON_C - HYSTERESIS_C {
            log::info!("thermal throttle released at {:.1} C", self.temperature_c);
            self.throttling = false;
        }

        let clock_setpoint = self.params.value("clock_ghz");
        let voltage_setpoint = self.params.value("voltage_v");
        if self.throttling {
            self.effective_clock_ghz =
                (self.effective_clock_ghz * CLOCK_DECAY).max(clock_setpoint * CLOCK_FLOOR_FRAC);
            self.effective_voltage_v = (self.effective_voltage_v * VOLTAGE_DECAY)
                .max(voltage_setpoint * VOLTAGE_FLOOR_FRAC);
        } else {
            // Recover toward the setpoints at the inverse of the decay rate
            self.effective_clock_ghz =
                (self.effective_clock_ghz / CLOCK_DECAY).min(clock_setpoint);
            self.effective_voltage_v =
                (self.effective_voltage_v / VOLTAGE_DECAY).min(voltage_setpoint);
        }

        self.refresh_last_good();
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> Option<f64> {
        let clamped = self.params.set(name, value)?;
        // A lowered setpoint takes effect immediately; recovery handles raises
        match name {
            "clock_ghz" => self.effective_clock_ghz = self.effective_clock_ghz.min(clamped),
            "voltage_v" => self.effective_voltage_v = self.effective_voltage_v.min(clamped),
            _ => {}
        }
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
        self.temperature_c = AMBIENT_C;
        self.throttling = false;
        self.effective_clock_ghz = self.params.value("clock_ghz");
        self.effective_voltage_v = self.params.value("voltage_v");
        self.refresh_last_good();
    }

    fn status(&self) -> KernelStatus {
        let status = self.compute();
        if status.is_finite() {
            KernelStatus::Thermal(status)
        } else {
            log::warn!("thermal kernel produced non-finite status, keeping last good");
            KernelStatus::Thermal(self.last_good.clone())
        }
    }

    fn tick_period_ms(&self) -> f64 {
        THERMAL_TICK_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(kernel: &ThermalKernel) -> ThermalStatus {
        match kernel.status() {
            KernelStatus::Thermal(s) => s,
            other => panic!("expected thermal status, got {other:?}"),
        }
    }

    fn set(kernel: &mut ThermalKernel, name: &str, value: f64) {
        kernel.set_parameter(name, value).expect("declared parameter");
    }

    fn tick_for_seconds(kernel: &mut ThermalKernel, seconds: f64) {
        let ticks = (seconds * 1000.0 / THERMAL_TICK_MS) as usize;
        for _ in 0..ticks {
            kernel.tick(THERMAL_TICK_MS);
        }
    }

    #[test]
    fn test_defaults_settle_below_throttle() {
        let mut kernel = ThermalKernel::new(&[]);
        tick_for_seconds(&mut kernel, 10.0);
        let s = status(&kernel);
        assert!(s.temperature_c > AMBIENT_C);
        assert!(s.temperature_c < THROTTLE_ON_C);
        assert!(!s.is_throttling);
    }

    #[test]
    fn test_worst_case_saturates_at_critical() {
        // Full workload, weakest cooler: temperature converges to the
        // ceiling within 5 simulated seconds and throttling holds
        let mut kernel = ThermalKernel::new(&[]);
        set(&mut kernel, "workload_pct", 100.0);
        set(&mut kernel, "cooling_w", 40.0);
        tick_for_seconds(&mut kernel, 5.0);
        let s = status(&kernel);
        assert!((s.temperature_c - CRITICAL_C).abs() < 0.5, "{}", s.temperature_c);
        assert!(s.is_throttling);
        assert!(s.at_critical);
    }

    #[test]
    fn test_hysteresis_no_flapping_inside_dead_band() {
        let mut kernel = ThermalKernel::new(&[]);
        set(&mut kernel, "workload_pct", 100.0);
        set(&mut kernel, "cooling_w", 40.0);

        // Drive into throttling
        tick_for_seconds(&mut kernel, 5.0);
        assert!(status(&kernel).is_throttling);

        // Improve cooling just enough that temperature drifts down into the
        // dead-band but stays above the release bound
        set(&mut kernel, "cooling_w", 250.0);
        let release_c = THROTTLE_ON_C - HYSTERESIS_C;
        let mut saw_dead_band = false;
        for _ in 0..2000 {
            kernel.tick(THERMAL_TICK_MS);
            let s = status(&kernel);
            if s.temperature_c < release_c {
                break;
            }
            if s.temperature_c < THROTTLE_ON_C {
                saw_dead_band = true;
                // Inside the band the throttle must hold, not flap
                assert!(s.is_throttling, "flapped at {:.2} C", s.temperature_c);
            }
        }
        assert!(saw_dead_band, "temperature never entered the dead-band");
    }

    #[test]
    fn test_throttle_releases_below_band() {
        let mut kernel = ThermalKernel::new(&[]);
        set(&mut kernel, "workload_pct", 100.0);
        set(&mut kernel, "cooling_w", 40.0);
        tick_for_seconds(&mut kernel, 5.0);
        assert!(status(&kernel).is_throttling);

        // Kill the load entirely: temperature falls through the band
        set(&mut kernel, "workload_pct", 0.0);
        set(&mut kernel, "cooling_w", 250.0);
        tick_for_seconds(&mut kernel, 20.0);
        let s = status(&kernel);
        assert!(s.temperature_c < THROTTLE_ON_C - HYSTERESIS_C);
        assert!(!s.is_throttling);
    }

    #[test]
    fn test_throttling_reduces_effective_operating_point() {
        let mut kernel = ThermalKernel::new(&[]);
        set(&mut kernel, "workload_pct", 100.0);
        set(&mut kernel, "cooling_w", 40.0);
        tick_for_seconds(&mut kernel, 5.0);

        let s = status(&kernel);
        let clock_setpoint = kernel.parameter("clock_ghz").unwrap();
        let voltage_setpoint = kernel.parameter("voltage_v").unwrap();
        assert!(s.effective_clock_ghz < clock_setpoint);
        assert!(s.effective_voltage_v < voltage_setpoint);
        // Floors hold
        assert!(s.effective_clock_ghz >= clock_setpoint * CLOCK_FLOOR_FRAC - 1e-9);
        assert!(s.effective_voltage_v >= voltage_setpoint * VOLTAGE_FLOOR_FRAC - 1e-9);
    }

    #[test]
    fn test_recovery_restores_setpoints() {
        let mut kernel = ThermalKernel::new(&[]);
        set(&mut kernel, "workload_pct", 100.0);
        set(&mut kernel, "cooling_w", 40.0);
        tick_for_seconds(&mut kernel, 5.0);
        assert!(status(&kernel).effective_clock_ghz < 3.0);

        set(&mut kernel, "workload_pct", 0.0);
        set(&mut kernel, "cooling_w", 250.0);
        tick_for_seconds(&mut kernel, 30.0);
        let s = status(&kernel);
        assert!(!s.is_throttling);
        assert!((s.effective_clock_ghz - 3.0).abs() < 1e-9);
        assert!((s.effective_voltage_v - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_more_cooling_means_cooler_die() {
        let mut weak = ThermalKernel::new(&[]);
        set(&mut weak, "cooling_w", 60.0);
        let mut strong = ThermalKernel::new(&[]);
        set(&mut strong, "cooling_w", 200.0);
        tick_for_seconds(&mut weak, 10.0);
        tick_for_seconds(&mut strong, 10.0);
        assert!(status(&strong).temperature_c < status(&weak).temperature_c);
    }

    #[test]
    fn test_temperature_never_exceeds_critical() {
        let mut kernel = ThermalKernel::new(&[]);
        set(&mut kernel, "workload_pct", 100.0);
        set(&mut kernel, "clock_ghz", 5.0);
        set(&mut kernel, "voltage_v", 1.4);
        set(&mut kernel, "cooling_w", 40.0);
        for _ in 0..1000 {
            kernel.tick(THERMAL_TICK_MS);
            assert!(status(&kernel).temperature_c <= CRITICAL_C);
        }
    }

    #[test]
    fn test_reset_restores_ambient() {
        let mut kernel = ThermalKernel::new(&[]);
        set(&mut kernel, "workload_pct", 100.0);
        set(&mut kernel, "cooling_w", 40.0);
        tick_for_seconds(&mut kernel, 5.0);
        kernel.reset();
        let s = status(&kernel);
        assert_eq!(s.temperature_c, AMBIENT_C);
        assert!(!s.is_throttling);
        assert_eq!(kernel.parameter("workload_pct"), Some(50.0));
    }
}
