//! Micro Lesson entry point
//!
//! Handles platform-specific initialization: a wasm-bindgen facade that a
//! browser page drives, and a native headless demo that walks one lesson
//! end to end.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_lesson {
    use wasm_bindgen::prelude::*;

    use micro_lesson::engine::ModuleEngine;
    use micro_lesson::topic::TopicConfig;
    use micro_lesson::topics;

    /// LocalStorage key prefix for the per-topic resume phase
    const RESUME_KEY_PREFIX: &str = "micro_lesson_resume_";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
    }

    fn load_resume_phase(topic_id: &str) -> Option<String> {
        let storage = storage()?;
        storage
            .get_item(&format!("{RESUME_KEY_PREFIX}{topic_id}"))
            .ok()
            .flatten()
    }

    fn save_resume_phase(topic_id: &str, phase: &str) {
        if let Some(storage) = storage() {
            let _ = storage.set_item(&format!("{RESUME_KEY_PREFIX}{topic_id}"), phase);
        }
    }

    /// One mounted lesson, exposed to the page. JSON strings cross the
    /// boundary; the page renders, this handle owns the engine.
    #[wasm_bindgen]
    pub struct LessonHandle {
        engine: ModuleEngine,
        last_saved_phase: &'static str,
    }

    #[wasm_bindgen]
    impl LessonHandle {
        /// Mount a built-in topic by id, resuming from LocalStorage if a
        /// phase was saved for it
        #[wasm_bindgen(constructor)]
        pub fn new(topic_id: &str) -> Result<LessonHandle, JsValue> {
            let topic = topics::by_id(topic_id)
                .ok_or_else(|| JsValue::from_str(&format!("unknown topic {topic_id}")))?;
            let resume = load_resume_phase(topic_id);
            let engine = ModuleEngine::new(topic, resume.as_deref());
            let last_saved_phase = engine.phase().as_str();
            Ok(LessonHandle {
                engine,
                last_saved_phase,
            })
        }

        /// Mount from a topic configuration JSON (host-supplied content)
        pub fn from_topic_json(topic_json: &str, resume_phase: Option<String>) -> Result<LessonHandle, JsValue> {
            let topic = TopicConfig::from_json(topic_json)
                .map_err(|e| JsValue::from_str(&format!("bad topic config: {e}")))?;
            let engine = ModuleEngine::new(topic, resume_phase.as_deref());
            let last_saved_phase = engine.phase().as_str();
            Ok(LessonHandle {
                engine,
                last_saved_phase,
            })
        }

        pub fn phase(&self) -> String {
            self.engine.phase().as_str().to_owned()
        }

        pub fn phase_label(&self) -> String {
            self.engine.phase_label().to_owned()
        }

        pub fn position(&self) -> u32 {
            self.engine.position().0 as u32
        }

        pub fn next_enabled(&self) -> bool {
            self.engine.next_enabled()
        }

        pub fn request_next(&mut self) -> bool {
            let changed = self.engine.request_next(js_sys::Date::now());
            self.persist_phase();
            changed
        }

        pub fn request_back(&mut self) -> bool {
            let changed = self.engine.request_back(js_sys::Date::now());
            self.persist_phase();
            changed
        }

        pub fn choose_prediction(&mut self, option_id: &str) -> bool {
            self.engine.choose_prediction(option_id, js_sys::Date::now())
        }

        pub fn mark_application_viewed(&mut self, index: usize) -> bool {
            self.engine.mark_application_viewed(index, js_sys::Date::now())
        }

        pub fn set_answer(&mut self, question_index: usize, option_id: &str) -> bool {
            self.engine.set_answer(question_index, option_id)
        }

        /// Returns the outcome as JSON, or null if the submission was a no-op
        pub fn submit_quiz(&mut self) -> JsValue {
            match self.engine.submit_quiz(js_sys::Date::now()) {
                Some(outcome) => serde_json::to_string(&outcome)
                    .map(|s| JsValue::from_str(&s))
                    .unwrap_or(JsValue::NULL),
                None => JsValue::NULL,
            }
        }

        pub fn reset_quiz(&mut self) {
            self.engine.reset_quiz();
        }

        pub fn set_parameter(&mut self, name: &str, value: f64) -> Option<f64> {
            self.engine.set_parameter(name, value, js_sys::Date::now())
        }

        pub fn set_simulating(&mut self, simulating: bool) {
            self.engine.set_simulating(simulating, js_sys::Date::now());
        }

        /// Drive from requestAnimationFrame; returns ticks executed
        pub fn advance(&mut self) -> u32 {
            self.engine.advance(js_sys::Date::now())
        }

        /// Render-ready kernel status as JSON
        pub fn status_json(&self) -> String {
            serde_json::to_string(&self.engine.status()).unwrap_or_else(|_| "{}".to_owned())
        }

        /// Drain queued lesson events as a JSON array
        pub fn take_events_json(&mut self) -> String {
            serde_json::to_string(&self.engine.take_events()).unwrap_or_else(|_| "[]".to_owned())
        }

        /// Adopt a late resume hint (e.g. a session loaded after mount)
        pub fn sync_resume(&mut self, phase: &str) -> bool {
            let changed = self.engine.sync_resume(phase, js_sys::Date::now());
            self.persist_phase();
            changed
        }

        fn persist_phase(&mut self) {
            let phase = self.engine.phase().as_str();
            if phase != self.last_saved_phase {
                save_resume_phase(&self.engine.topic().id, phase);
                self.last_saved_phase = phase;
            }
        }
    }

    /// List built-in topic ids as a JSON array
    #[wasm_bindgen]
    pub fn builtin_topics() -> String {
        let ids: Vec<String> = topics::all().into_iter().map(|t| t.id).collect();
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_owned())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("micro-lesson engine loaded");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry is wasm_main via wasm-bindgen(start)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use micro_lesson::engine::ModuleEngine;
    use micro_lesson::kernel::KernelStatus;
    use micro_lesson::topics;

    env_logger::init();

    // Headless walk through the thermal lesson: predict, simulate five
    // seconds of full load on a weak cooler, then ace the quiz.
    let topic = topics::thermal::topic();
    println!("=== {} ===", topic.title);

    let mut engine = ModuleEngine::new(topic, None);
    engine.set_event_sink(Box::new(|ev: &micro_lesson::engine::LessonEvent| {
        log::info!("event {} {:?}", ev.event_type, ev.details);
    }));

    // Timestamps spaced past the navigation debounce
    let mut now_ms = 0.0;
    let mut step = move || {
        now_ms += 600.0;
        now_ms
    };

    engine.request_next(step()); // hook -> predict
    let choice = engine.topic().predict.correct.clone();
    engine.choose_prediction(&choice, step());
    engine.request_next(step()); // predict -> play

    let _ = engine.set_parameter("workload_pct", 100.0, step());
    let _ = engine.set_parameter("cooling_w", 40.0, step());
    let start = step();
    engine.set_simulating(true, start);
    // 5 simulated seconds in 100ms host frames
    for frame in 1..=50 {
        engine.advance(start + f64::from(frame) * 100.0);
    }
    if let KernelStatus::Thermal(status) = engine.status() {
        println!(
            "after 5s at full load: {:.1} C (throttling: {})",
            status.temperature_c, status.is_throttling
        );
    }
    engine.set_simulating(false, step());

    engine.request_next(step()); // play -> review
    engine.request_next(step()); // review -> twist_predict
    let choice = engine.topic().twist_predict.correct.clone();
    engine.choose_prediction(&choice, step());
    engine.request_next(step()); // twist_predict -> twist_play
    engine.request_next(step()); // twist_play -> twist_review
    engine.request_next(step()); // twist_review -> transfer

    for i in 0..engine.topic().applications.len() {
        engine.mark_application_viewed(i, step());
    }
    engine.request_next(step()); // transfer -> test

    let answers: Vec<(usize, String)> = engine
        .topic()
        .questions
        .iter()
        .enumerate()
        .filter_map(|(i, q)| q.correct_option().map(|o| (i, o.to_owned())))
        .collect();
    for (i, option) in answers {
        engine.set_answer(i, &option);
    }
    if let Some(outcome) = engine.submit_quiz(step()) {
        println!(
            "quiz: {}/{} ({})",
            outcome.score,
            outcome.total,
            if outcome.passed { "passed" } else { "failed" }
        );
    }

    engine.request_next(step()); // test -> mastery
    let (position, total) = engine.position();
    println!(
        "finished at {} ({}/{})",
        engine.phase_label(),
        position,
        total
    );
}
