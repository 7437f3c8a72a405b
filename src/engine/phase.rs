//! The ten-phase guided-discovery flow
//!
//! A lesson is always in exactly one phase; the order is fixed at compile
//! time and never changes at runtime.

use serde::{Deserialize, Serialize};

/// Current phase of the lesson flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Opening scenario that motivates the concept
    Hook,
    /// First prediction (commit before seeing the answer)
    Predict,
    /// Interactive simulation
    Play,
    /// Explanation of what the simulation showed
    Review,
    /// Prediction for the twist variant
    TwistPredict,
    /// Simulation of the twist variant
    TwistPlay,
    /// Explanation of the twist
    TwistReview,
    /// Real-world application gallery
    Transfer,
    /// Ten-question scored quiz
    Test,
    /// Completion screen
    Mastery,
}

/// Fixed phase ordering
pub const PHASE_ORDER: [Phase; 10] = [
    Phase::Hook,
    Phase::Predict,
    Phase::Play,
    Phase::Review,
    Phase::TwistPredict,
    Phase::TwistPlay,
    Phase::TwistReview,
    Phase::Transfer,
    Phase::Test,
    Phase::Mastery,
];

impl Phase {
    /// The full ordered sequence
    pub fn order() -> &'static [Phase; 10] {
        &PHASE_ORDER
    }

    /// Position in the flow (0-based)
    pub fn index(self) -> usize {
        PHASE_ORDER
            .iter()
            .position(|&p| p == self)
            .unwrap_or_default()
    }

    /// The phase after this one, if any
    pub fn next(self) -> Option<Phase> {
        PHASE_ORDER.get(self.index() + 1).copied()
    }

    /// The phase before this one, if any
    pub fn prev(self) -> Option<Phase> {
        self.index().checked_sub(1).and_then(|i| PHASE_ORDER.get(i)).copied()
    }

    /// Stable identifier (matches serde representation)
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Hook => "hook",
            Phase::Predict => "predict",
            Phase::Play => "play",
            Phase::Review => "review",
            Phase::TwistPredict => "twist_predict",
            Phase::TwistPlay => "twist_play",
            Phase::TwistReview => "twist_review",
            Phase::Transfer => "transfer",
            Phase::Test => "test",
            Phase::Mastery => "mastery",
        }
    }

    /// Parse an untrusted phase identifier (e.g. from persisted state).
    /// Unknown strings are simply not phases.
    pub fn parse(candidate: &str) -> Option<Phase> {
        PHASE_ORDER.iter().copied().find(|p| p.as_str() == candidate)
    }

    /// Whether this phase drives a simulation kernel
    pub fn is_simulation(self) -> bool {
        matches!(self, Phase::Play | Phase::TwistPlay)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Hook
    }
}
