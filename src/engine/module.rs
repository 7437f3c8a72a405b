//! Module engine
//!
//! The composition root one host mounts per lesson: navigation with
//! completion gating, the topic's simulation kernel behind its scheduler,
//! prediction/gallery/quiz progress, and the event stream. Every mutation
//! enters through a method here, on the host's single event/timer thread.

use crate::engine::events::{EventQueue, EventSink, LessonEvent};
use crate::engine::nav::NavigationController;
use crate::engine::phase::Phase;
use crate::engine::progress::{GalleryProgressTracker, PredictionTracker};
use crate::engine::quiz::{QuizEngine, QuizOutcome};
use crate::engine::state::ModuleState;
use crate::kernel::{self, KernelStatus, SimulationKernel, TickScheduler};
use crate::topic::TopicConfig;

/// Fired exactly once at quiz submission, according to the pass threshold
type FeedbackHook = Box<dyn FnMut()>;

/// One mounted micro-lesson
pub struct ModuleEngine {
    topic: TopicConfig,
    nav: NavigationController,
    kernel: Box<dyn SimulationKernel>,
    scheduler: TickScheduler,
    prediction: PredictionTracker,
    twist_prediction: PredictionTracker,
    gallery: GalleryProgressTracker,
    quiz: QuizEngine,
    events: EventQueue,
    on_correct_answer: Option<FeedbackHook>,
    on_incorrect_answer: Option<FeedbackHook>,
}

impl std::fmt::Debug for ModuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleEngine")
            .field("topic", &self.topic.id)
            .field("phase", &self.nav.current())
            .field("simulating", &self.scheduler.is_running())
            .finish()
    }
}

impl ModuleEngine {
    /// Mount a lesson for one topic, optionally resuming at a saved phase.
    /// The resume string is untrusted; anything unrecognized lands on the
    /// first phase.
    pub fn new(mut topic: TopicConfig, resume_phase: Option<&str>) -> Self {
        topic.sanitize();
        let kernel = kernel::build(topic.kernel, &topic.params);
        let scheduler = TickScheduler::new(kernel.tick_period_ms());
        let events = EventQueue::new(&topic.id, &topic.title);
        let nav = NavigationController::init(resume_phase);
        log::info!(
            "mounted topic {} at phase {}",
            topic.id,
            nav.current().as_str()
        );
        Self {
            topic,
            nav,
            kernel,
            scheduler,
            prediction: PredictionTracker::new(),
            twist_prediction: PredictionTracker::new(),
            gallery: GalleryProgressTracker::new(),
            quiz: QuizEngine::new(),
            events,
            on_correct_answer: None,
            on_incorrect_answer: None,
        }
    }

    // --- Host wiring -----------------------------------------------------

    /// Forward events to a host sink as they are emitted
    pub fn set_event_sink(&mut self, sink: Box<dyn EventSink>) {
        self.events.set_sink(sink);
    }

    /// Install the pass/fail hooks fired at quiz submission
    pub fn set_feedback_hooks(&mut self, on_correct: FeedbackHook, on_incorrect: FeedbackHook) {
        self.on_correct_answer = Some(on_correct);
        self.on_incorrect_answer = Some(on_incorrect);
    }

    /// Drain queued events
    pub fn take_events(&mut self) -> Vec<LessonEvent> {
        self.events.take_events()
    }

    // --- Phase & navigation ----------------------------------------------

    pub fn topic(&self) -> &TopicConfig {
        &self.topic
    }

    pub fn phase(&self) -> Phase {
        self.nav.current()
    }

    /// Display label for the current phase
    pub fn phase_label(&self) -> &str {
        self.topic.label(self.nav.current())
    }

    /// (1-based position, total) of the current phase
    pub fn position(&self) -> (usize, usize) {
        (self.nav.current().index() + 1, Phase::order().len())
    }

    /// Whether the "next" control should be enabled, from tracker and
    /// engine completeness
    pub fn next_enabled(&self) -> bool {
        match self.nav.current() {
            Phase::Predict => self.prediction.has_answered(),
            Phase::TwistPredict => self.twist_prediction.has_answered(),
            Phase::Transfer => self.gallery.is_complete(self.topic.applications.len()),
            Phase::Test => self.quiz.is_submitted(),
            Phase::Mastery => false,
            _ => true,
        }
    }

    /// Advance to the next phase, if the current phase's gate allows it.
    /// Returns true if the phase changed.
    pub fn request_next(&mut self, now_ms: f64) -> bool {
        if !self.next_enabled() {
            log::debug!(
                "next from {} blocked by completion gate",
                self.nav.current().as_str()
            );
            return false;
        }
        let from = self.nav.current();
        if self.nav.go_next(now_ms) {
            self.after_phase_change(from, now_ms);
            return true;
        }
        false
    }

    /// Return to the previous phase (never gated)
    pub fn request_back(&mut self, now_ms: f64) -> bool {
        let from = self.nav.current();
        if self.nav.go_back(now_ms) {
            self.after_phase_change(from, now_ms);
            return true;
        }
        false
    }

    /// Jump to an arbitrary phase (host-level navigation, e.g. a progress
    /// bar). Subject to the same debounce as any navigation.
    pub fn request_phase(&mut self, target: Phase, now_ms: f64) -> bool {
        let from = self.nav.current();
        if target != from && self.nav.go_to_phase(target, now_ms) {
            self.after_phase_change(from, now_ms);
            return true;
        }
        false
    }

    /// Adopt a late external resume hint (e.g. a saved session that loaded
    /// after mount). Applied at most once; not a user navigation.
    pub fn sync_resume(&mut self, hint: &str, now_ms: f64) -> bool {
        let from = self.nav.current();
        if self.nav.sync_external(hint) {
            self.after_phase_change(from, now_ms);
            return true;
        }
        false
    }

    fn after_phase_change(&mut self, from: Phase, now_ms: f64) {
        // Any running simulation dies with the phase that started it
        self.scheduler.stop();
        let to = self.nav.current();
        self.events.phase_change(from, to, now_ms);
        if to == Phase::Mastery {
            self.events.mastery_reached(self.quiz.score(), now_ms);
        }
    }

    // --- Simulation ------------------------------------------------------

    /// Start or stop the simulation loop. Starting is only honored in a
    /// simulation phase; stopping is always honored and idempotent.
    pub fn set_simulating(&mut self, simulating: bool, now_ms: f64) {
        if !simulating {
            self.scheduler.stop();
            return;
        }
        if !self.nav.current().is_simulation() {
            log::debug!(
                "ignoring simulate request in phase {}",
                self.nav.current().as_str()
            );
            return;
        }
        self.scheduler.start(now_ms);
    }

    pub fn is_simulating(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Advance the kernel from the host's timer callback. No-op unless
    /// simulating. Returns the number of fixed ticks executed.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        self.scheduler.advance(now_ms, self.kernel.as_mut())
    }

    /// Clamp and apply a control input, emitting a parameter-changed event
    /// when the name is known
    pub fn set_parameter(&mut self, name: &str, value: f64, now_ms: f64) -> Option<f64> {
        let clamped = self.kernel.set_parameter(name, value);
        match clamped {
            Some(applied) => self.events.parameter_changed(name, applied, now_ms),
            None => log::debug!("unknown parameter {name:?} ignored"),
        }
        clamped
    }

    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.kernel.parameter(name)
    }

    /// Render-ready kernel snapshot (always recomputed)
    pub fn status(&self) -> KernelStatus {
        self.kernel.status()
    }

    /// Reset the kernel to its initial state (e.g. entering the twist)
    pub fn reset_simulation(&mut self) {
        self.scheduler.stop();
        self.kernel.reset();
    }

    // --- Predictions -----------------------------------------------------

    /// Record the choice for whichever prediction slot the current phase
    /// shows. Ignored outside prediction phases.
    pub fn choose_prediction(&mut self, option_id: &str, now_ms: f64) -> bool {
        let (slot, tracker, correct) = match self.nav.current() {
            Phase::Predict => (
                "predict",
                &mut self.prediction,
                &self.topic.predict.correct,
            ),
            Phase::TwistPredict => (
                "twist_predict",
                &mut self.twist_prediction,
                &self.topic.twist_predict.correct,
            ),
            other => {
                log::debug!("prediction outside a predict phase ({})", other.as_str());
                return false;
            }
        };
        tracker.choose(option_id);
        let is_correct = tracker.is_correct(correct);
        self.events.prediction_made(slot, option_id, is_correct, now_ms);
        true
    }

    pub fn prediction(&self) -> &PredictionTracker {
        &self.prediction
    }

    pub fn twist_prediction(&self) -> &PredictionTracker {
        &self.twist_prediction
    }

    // --- Gallery ---------------------------------------------------------

    /// Mark a gallery application viewed. Idempotent.
    pub fn mark_application_viewed(&mut self, index: usize, now_ms: f64) -> bool {
        let total = self.topic.applications.len();
        let newly_viewed = self.gallery.mark_viewed(index, total);
        if newly_viewed {
            let title = self
                .topic
                .applications
                .get(index)
                .map(|a| a.title.as_str())
                .unwrap_or_default();
            self.events.application_viewed(index, title, now_ms);
        }
        newly_viewed
    }

    pub fn gallery(&self) -> &GalleryProgressTracker {
        &self.gallery
    }

    pub fn gallery_complete(&self) -> bool {
        self.gallery.is_complete(self.topic.applications.len())
    }

    // --- Quiz ------------------------------------------------------------

    pub fn set_answer(&mut self, question_index: usize, option_id: &str) -> bool {
        self.quiz.set_answer(question_index, option_id)
    }

    pub fn quiz(&self) -> &QuizEngine {
        &self.quiz
    }

    /// Grade and freeze the quiz. On the one successful submission, emits
    /// the quiz event and fires exactly one of the feedback hooks.
    pub fn submit_quiz(&mut self, now_ms: f64) -> Option<QuizOutcome> {
        let outcome = self
            .quiz
            .submit(&self.topic.questions, self.topic.pass_threshold)?;
        self.events
            .quiz_submitted(outcome.score, outcome.total, outcome.passed, now_ms);
        let hook = if outcome.passed {
            self.on_correct_answer.as_mut()
        } else {
            self.on_incorrect_answer.as_mut()
        };
        if let Some(hook) = hook {
            hook();
        }
        Some(outcome)
    }

    /// Clear the quiz for a retake
    pub fn reset_quiz(&mut self) {
        self.quiz.reset();
    }

    // --- Snapshot / restore ----------------------------------------------

    /// Capture everything needed to resume this lesson later
    pub fn snapshot(&self) -> ModuleState {
        ModuleState {
            topic_id: self.topic.id.clone(),
            phase: self.nav.current(),
            prediction: self.prediction.clone(),
            twist_prediction: self.twist_prediction.clone(),
            gallery: self.gallery.clone(),
            quiz: self.quiz.clone(),
            parameters: self.kernel.parameters(),
        }
    }

    /// Apply a snapshot as a single atomic assignment. A snapshot from a
    /// different topic is refused (returns false) and leaves the engine
    /// untouched.
    pub fn restore(&mut self, state: &ModuleState) -> bool {
        if state.topic_id != self.topic.id {
            log::warn!(
                "snapshot for topic {} refused by topic {}",
                state.topic_id,
                self.topic.id
            );
            return false;
        }
        self.scheduler.stop();
        self.nav.restore(state.phase);
        self.prediction = state.prediction.clone();
        self.twist_prediction = state.twist_prediction.clone();
        self.gallery = state.gallery.clone();
        self.quiz = state.quiz.clone();
        for (name, value) in &state.parameters {
            if self.kernel.set_parameter(name, *value).is_none() {
                log::debug!("snapshot parameter {name:?} unknown to kernel");
            }
        }
        true
    }
}
