//! Topic configuration
//!
//! Immutable per-topic data the engine is parameterized by: screen labels,
//! prediction sets, simulation parameter declarations, quiz questions, and
//! the application gallery. Hosts may ship topics as JSON; malformed configs
//! are repaired rather than rejected (availability over strictness).

use serde::{Deserialize, Serialize};

use crate::consts::QUIZ_LEN;
use crate::engine::phase::Phase;

/// Which simulation kernel a topic drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelKind {
    /// Rotational/seek-latency model (disk)
    AccessLatency,
    /// Thermal RC-feedback model with hysteretic throttling
    Thermal,
    /// Aperture/radiation-pattern model (antenna)
    AntennaGain,
}

/// A user-adjustable simulation parameter declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub initial: f64,
}

impl ParamSpec {
    pub fn new(name: &str, min: f64, max: f64, step: f64, initial: f64) -> Self {
        Self {
            name: name.to_owned(),
            min,
            max,
            step,
            initial,
        }
    }

    /// Clamp a candidate value into the declared range
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// One selectable option in a prediction set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionOption {
    pub id: String,
    pub label: String,
}

/// The option set shown during a prediction phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionSet {
    pub prompt: String,
    pub options: Vec<PredictionOption>,
    /// Id of the correct option
    pub correct: String,
}

/// One selectable option on a quiz question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// A quiz question. Exactly one option carries `is_correct`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub scenario: String,
    pub prompt: String,
    pub options: Vec<QuestionOption>,
    pub explanation: String,
}

impl Question {
    /// Id of the correct option, if the question is well-formed
    pub fn correct_option(&self) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.is_correct)
            .map(|o| o.id.as_str())
    }
}

/// A real-world application gallery entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub stats: Vec<String>,
}

/// Complete configuration for one micro-lesson topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicConfig {
    pub id: String,
    pub title: String,
    /// One display label per phase, in phase order
    pub labels: Vec<String>,
    pub predict: PredictionSet,
    pub twist_predict: PredictionSet,
    pub kernel: KernelKind,
    pub params: Vec<ParamSpec>,
    pub questions: Vec<Question>,
    pub applications: Vec<Application>,
    /// Minimum quiz score to pass
    pub pass_threshold: u8,
}

impl TopicConfig {
    /// Repair a config in place so the engine never has to fail on one.
    ///
    /// - Missing labels are padded from phase identifiers
    /// - The pass threshold is clamped to the question count
    /// - Parameter initials are clamped into their own declared range
    pub fn sanitize(&mut self) {
        let order = Phase::order();
        while self.labels.len() < order.len() {
            let phase = order[self.labels.len()];
            log::warn!(
                "topic {}: missing label for {}, using identifier",
                self.id,
                phase.as_str()
            );
            self.labels.push(phase.as_str().to_owned());
        }
        self.labels.truncate(order.len());

        if self.questions.len() != QUIZ_LEN {
            log::warn!(
                "topic {}: expected {} questions, found {}",
                self.id,
                QUIZ_LEN,
                self.questions.len()
            );
        }

        let max_score = self.questions.len().min(u8::MAX as usize) as u8;
        if self.pass_threshold > max_score {
            log::warn!(
                "topic {}: pass threshold {} exceeds question count, clamping",
                self.id,
                self.pass_threshold
            );
            self.pass_threshold = max_score;
        }

        for param in &mut self.params {
            if param.min > param.max {
                std::mem::swap(&mut param.min, &mut param.max);
            }
            let clamped = param.clamp(param.initial);
            if clamped != param.initial {
                log::warn!(
                    "topic {}: parameter {} initial {} outside [{}, {}], clamping",
                    self.id,
                    param.name,
                    param.initial,
                    param.min,
                    param.max
                );
                param.initial = clamped;
            }
        }
    }

    /// Display label for a phase
    pub fn label(&self, phase: Phase) -> &str {
        self.labels
            .get(phase.index())
            .map(String::as_str)
            .unwrap_or_else(|| phase.as_str())
    }

    /// Parameter declaration by name
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Load a topic from JSON, sanitizing on the way in
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut topic: TopicConfig = serde_json::from_str(json)?;
        topic.sanitize();
        Ok(topic)
    }
}
