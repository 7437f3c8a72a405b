//! Aperture/gain kernel (parabolic antenna)
//!
//! Stateless per tick: gain, beamwidth, and the radiation pattern are pure
//! functions of the current parameters, with no smoothing. `tick` exists
//! only to satisfy the kernel interface.

use serde::{Deserialize, Serialize};

use crate::kernel::{KernelStatus, ParamTable, SimulationKernel};
use crate::topic::ParamSpec;
use crate::{consts, safe_div, safe_log10};

/// Speed of light, m/s
const C_M_PER_S: f64 = 299_792_458.0;
/// Beamwidth constant: half-power beamwidth ~= k / (D/lambda) degrees
const BEAMWIDTH_K: f64 = 70.0;
/// Floor for diameter-in-wavelengths before dividing
const APERTURE_FLOOR: f64 = 1e-3;

/// This kernel has no continuous state, so any period works; match the
/// access kernel's animation driver for a consistent host loop.
const ANTENNA_TICK_MS: f64 = consts::ACCESS_TICK_MS;

/// Render-ready snapshot of the aperture model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntennaStatus {
    pub diameter_m: f64,
    pub frequency_ghz: f64,
    pub efficiency: f64,
    pub wavelength_m: f64,
    pub diameter_in_wavelengths: f64,
    pub gain_linear: f64,
    pub gain_dbi: f64,
    pub beamwidth_deg: f64,
    /// Pattern level at the off-axis angle, dB relative to boresight
    pub offaxis_db: f64,
}

impl AntennaStatus {
    fn is_finite(&self) -> bool {
        [
            self.wavelength_m,
            self.diameter_in_wavelengths,
            self.gain_linear,
            self.gain_dbi,
            self.beamwidth_deg,
            self.offaxis_db,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Parabolic-dish gain kernel
#[derive(Debug, Clone)]
pub struct AntennaGainKernel {
    params: ParamTable,
    last_good: AntennaStatus,
}

impl AntennaGainKernel {
    pub fn new(overrides: &[ParamSpec]) -> Self {
        let params = ParamTable::new(
            vec![
                ParamSpec::new("diameter_m", 0.5, 30.0, 0.1, 3.0),
                ParamSpec::new("frequency_ghz", 1.0, 40.0, 0.5, 12.0),
                ParamSpec::new("efficiency", 0.35, 0.8, 0.05, 0.6),
                ParamSpec::new("offaxis_deg", 0.0, 10.0, 0.1, 0.0),
            ],
            overrides,
        );
        let mut kernel = Self {
            params,
            last_good: AntennaStatus {
                diameter_m: 3.0,
                frequency_ghz: 12.0,
                efficiency: 0.6,
                wavelength_m: 0.025,
                diameter_in_wavelengths: 120.0,
                gain_linear: 1.0,
                gain_dbi: 0.0,
                beamwidth_deg: 0.58,
                offaxis_db: 0.0,
            },
        };
        kernel.refresh_last_good();
        kernel
    }

    /// Normalized power pattern at `offaxis_deg`, as a linear ratio in (0, 1].
    /// Uniform-aperture sinc-squared approximation, floored above zero so
    /// the caller can always take a logarithm.
    fn pattern_linear(diameter_in_wavelengths: f64, offaxis_deg: f64) -> f64 {
        let u = std::f64::consts::PI * diameter_in_wavelengths * offaxis_deg.to_radians().sin();
        let value = if u.abs() < 1e-9 {
            1.0
        } else {
            let s = u.sin() / u;
            s * s
        };
        value.max(consts::LOG_FLOOR)
    }

    fn compute(&self) -> AntennaStatus {
        let diameter_m = self.params.value("diameter_m");
        let frequency_ghz = self.params.value("frequency_ghz");
        let efficiency = self.params.value("efficiency");
        let offaxis_deg = self.params.value("offaxis_deg");

        let wavelength_m = safe_div(C_M_PER_S, frequency_ghz * 1e9);
        let diameter_in_wavelengths = safe_div(diameter_m, wavelength_m).max(APERTURE_FLOOR);

        let gain_linear = {
            let ratio = std::f64::consts::PI * diameter_in_wavelengths;
            ratio * ratio * efficiency
        };
        let gain_dbi = 10.0 * safe_log10(gain_linear);
        let beamwidth_deg = safe_div(BEAMWIDTH_K, diameter_in_wavelengths);
        let offaxis_db = 10.0 * safe_log10(Self::pattern_linear(diameter_in_wavelengths, offaxis_deg));

        AntennaStatus {
            diameter_m,
            frequency_ghz,
            efficiency,
            wavelength_m,
            diameter_in_wavelengths,
            gain_linear,
            gain_dbi,
            beamwidth_deg,
            offaxis_db,
        }
    }

    fn refresh_last_good(&mut self) {
        let status = self.compute();
        if status.is_finite() {
            self.last_good = status;
        }
    }
}

impl SimulationKernel for AntennaGainKernel {
    fn tick(&mut self, _dt_ms: f64) {
        // Stateless: driven directly by parameters
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
        self.refresh_last_good();
    }

    fn status(&self) -> KernelStatus {
        let status = self.compute();
        if status.is_finite() {
            KernelStatus::Antenna(status)
        } else {
            log::warn!("antenna kernel produced non-finite status, keeping last good");
            KernelStatus::Antenna(self.last_good.clone())
        }
    }

    fn tick_period_ms(&self) -> f64 {
        ANTENNA_TICK_MS
    }
}
