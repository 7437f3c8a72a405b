//! Simulation kernels
//!
//! Per-topic numeric models behind one capability interface. This module
//! must be pure and deterministic:
//! - Fixed timestep only, driven by the host through `TickScheduler`
//! - No clocks, no rendering, no platform dependencies
//! - Every division guards its denominator, every logarithm its argument
//! - A kernel never publishes a non-finite status: the last known good
//!   snapshot is substituted instead

pub mod access;
pub mod antenna;
pub mod scheduler;
pub mod thermal;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use access::{AccessLatencyKernel, AccessStatus};
pub use antenna::{AntennaGainKernel, AntennaStatus};
pub use scheduler::TickScheduler;
pub use thermal::{ThermalKernel, ThermalStatus};

use crate::topic::{KernelKind, ParamSpec};

/// Render-ready snapshot derived from a kernel's parameters and state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KernelStatus {
    Access(AccessStatus),
    Thermal(ThermalStatus),
    Antenna(AntennaStatus),
}

/// Capability interface shared by the three topic kernels
pub trait SimulationKernel {
    /// Advance internal continuous state by one fixed timestep
    fn tick(&mut self, dt_ms: f64);

    /// Clamp and store a control input. Returns the clamped value, or
    /// `None` for an unknown parameter name (ignored, not an error).
    fn set_parameter(&mut self, name: &str, value: f64) -> Option<f64>;

    /// Current value of a control input
    fn parameter(&self, name: &str) -> Option<f64>;

    /// All current parameter values (snapshot/restore support)
    fn parameters(&self) -> BTreeMap<String, f64>;

    /// Restore initial state and parameter values
    fn reset(&mut self);

    /// Derive the render-ready status. Always recomputed, never stale;
    /// falls back to the last finite snapshot if a guard was insufficient.
    fn status(&self) -> KernelStatus;

    /// Fixed scheduler period this kernel is designed for
    fn tick_period_ms(&self) -> f64;
}

/// Build the kernel a topic declares, applying the topic's parameter
/// declarations over the kernel's built-in defaults.
pub fn build(kind: KernelKind, overrides: &[ParamSpec]) -> Box<dyn SimulationKernel> {
    match kind {
        KernelKind::AccessLatency => Box::new(AccessLatencyKernel::new(overrides)),
        KernelKind::Thermal => Box::new(ThermalKernel::new(overrides)),
        KernelKind::AntennaGain => Box::new(AntennaGainKernel::new(overrides)),
    }
}

/// Parameter table shared by kernel implementations: declared ranges plus
/// current values, with clamp-on-set semantics.
#[derive(Debug, Clone)]
pub(crate) struct ParamTable {
    specs: Vec<ParamSpec>,
    values: BTreeMap<String, f64>,
}

impl ParamTable {
    /// Build from kernel defaults with topic-level overrides applied by name.
    /// Override specs for names the kernel doesn't know are dropped with a
    /// log line rather than invented.
    pub fn new(defaults: Vec<ParamSpec>, overrides: &[ParamSpec]) -> Self {
        let mut specs = defaults;
        for over in overrides {
            match specs.iter_mut().find(|s| s.name == over.name) {
                Some(spec) => *spec = over.clone(),
                None => log::debug!("ignoring unknown parameter spec {:?}", over.name),
            }
        }
        let values = specs.iter().map(|s| (s.name.clone(), s.initial)).collect();
        Self { specs, values }
    }

    pub fn set(&mut self, name: &str, value: f64) -> Option<f64> {
        let spec = self.specs.iter().find(|s| s.name == name)?;
        let clamped = spec.clamp(if value.is_finite() { value } else { spec.initial });
        self.values.insert(name.to_owned(), clamped);
        Some(clamped)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Read a value that is known to be declared (kernel's own defaults)
    pub fn value(&self, name: &str) -> f64 {
        self.get(name).unwrap_or_else(|| {
            log::warn!("undeclared kernel parameter {name:?}");
            0.0
        })
    }

    pub fn values(&self) -> BTreeMap<String, f64> {
        self.values.clone()
    }

    pub fn reset(&mut self) {
        self.values = self
            .specs
            .iter()
            .map(|s| (s.name.clone(), s.initial))
            .collect();
    }
}
