//! Resumable module state
//!
//! All state a host may snapshot and restore lives here. The snapshot is
//! the only external touch point into the engine's state: it is applied as
//! a whole, never merged field by field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::phase::Phase;
use crate::engine::progress::{GalleryProgressTracker, PredictionTracker};
use crate::engine::quiz::QuizEngine;

/// Serializable aggregate of one mounted module's progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleState {
    /// Topic the snapshot belongs to; restoring across topics is refused
    pub topic_id: String,
    pub phase: Phase,
    #[serde(default)]
    pub prediction: PredictionTracker,
    #[serde(default)]
    pub twist_prediction: PredictionTracker,
    #[serde(default)]
    pub gallery: GalleryProgressTracker,
    #[serde(default)]
    pub quiz: QuizEngine,
    /// Kernel parameter values by name
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,
}
