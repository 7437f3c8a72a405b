//! Lesson event stream
//!
//! A pure notification channel: the engine queues events, the host drains
//! them (and may forward them to analytics). The core never depends on an
//! event being observed.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::engine::phase::Phase;

/// An emitted lesson event, shaped for direct JSON serialization
#[derive(Debug, Clone, Serialize)]
pub struct LessonEvent {
    pub event_type: &'static str,
    pub topic_id: String,
    pub topic_title: String,
    pub details: Map<String, Value>,
    pub timestamp_ms: f64,
}

/// Host hook receiving events as they are emitted
pub trait EventSink {
    fn emit(&mut self, event: &LessonEvent);
}

impl<F: FnMut(&LessonEvent)> EventSink for F {
    fn emit(&mut self, event: &LessonEvent) {
        self(event)
    }
}

/// Builds events for one topic and queues them for the host
pub struct EventQueue {
    topic_id: String,
    topic_title: String,
    queue: Vec<LessonEvent>,
    sink: Option<Box<dyn EventSink>>,
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("topic_id", &self.topic_id)
            .field("queued", &self.queue.len())
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl EventQueue {
    pub fn new(topic_id: &str, topic_title: &str) -> Self {
        Self {
            topic_id: topic_id.to_owned(),
            topic_title: topic_title.to_owned(),
            queue: Vec::new(),
            sink: None,
        }
    }

    /// Install an optional forwarding sink (replaces any prior sink)
    pub fn set_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sink = Some(sink);
    }

    /// Drain all queued events
    pub fn take_events(&mut self) -> Vec<LessonEvent> {
        std::mem::take(&mut self.queue)
    }

    pub fn phase_change(&mut self, from: Phase, to: Phase, timestamp_ms: f64) {
        let details = details(json!({
            "from": from.as_str(),
            "to": to.as_str(),
            "position": to.index() + 1,
            "total": Phase::order().len(),
        }));
        self.push("phase_change", details, timestamp_ms);
    }

    pub fn prediction_made(&mut self, slot: &str, option_id: &str, correct: bool, timestamp_ms: f64) {
        let details = details(json!({
            "slot": slot,
            "option": option_id,
            "correct": correct,
        }));
        self.push("prediction_made", details, timestamp_ms);
    }

    pub fn parameter_changed(&mut self, name: &str, value: f64, timestamp_ms: f64) {
        let details = details(json!({ "name": name, "value": value }));
        self.push("parameter_changed", details, timestamp_ms);
    }

    pub fn quiz_submitted(&mut self, score: u8, total: u8, passed: bool, timestamp_ms: f64) {
        let details = details(json!({
            "score": score,
            "total": total,
            "passed": passed,
        }));
        self.push("quiz_submitted", details, timestamp_ms);
    }

    pub fn application_viewed(&mut self, index: usize, title: &str, timestamp_ms: f64) {
        let details = details(json!({ "index": index, "title": title }));
        self.push("application_viewed", details, timestamp_ms);
    }

    pub fn mastery_reached(&mut self, score: u8, timestamp_ms: f64) {
        let details = details(json!({ "score": score }));
        self.push("mastery_reached", details, timestamp_ms);
    }

    fn push(&mut self, event_type: &'static str, details: Map<String, Value>, timestamp_ms: f64) {
        let event = LessonEvent {
            event_type,
            topic_id: self.topic_id.clone(),
            topic_title: self.topic_title.clone(),
            details,
            timestamp_ms,
        };
        if let Some(sink) = &mut self.sink {
            sink.emit(&event);
        }
        self.queue.push(event);
    }
}

fn details(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_queue_and_drain() {
        let mut events = EventQueue::new("thermal", "Thermal Throttling");
        events.phase_change(Phase::Hook, Phase::Predict, 1000.0);
        events.parameter_changed("workload_pct", 80.0, 1200.0);

        let drained = events.take_events();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].event_type, "phase_change");
        assert_eq!(drained[0].details["to"], "predict");
        assert_eq!(drained[0].details["position"], 2);
        assert_eq!(drained[1].event_type, "parameter_changed");

        // Drained once, gone
        assert!(events.take_events().is_empty());
    }

    #[test]
    fn test_sink_sees_events_as_emitted() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);

        let mut events = EventQueue::new("disk", "Disk Seek Physics");
        events.set_sink(Box::new(move |ev: &LessonEvent| {
            seen_clone.borrow_mut().push(ev.event_type.to_owned());
        }));

        events.quiz_submitted(8, 10, true, 5000.0);
        events.mastery_reached(8, 6000.0);

        assert_eq!(&*seen.borrow(), &["quiz_submitted", "mastery_reached"]);
    }

    #[test]
    fn test_event_json_shape() {
        let mut events = EventQueue::new("antenna", "Antenna Gain");
        events.prediction_made("predict", "b", true, 42.0);
        let ev = &events.take_events()[0];
        let json = serde_json::to_value(ev).expect("serializes");
        assert_eq!(json["event_type"], "prediction_made");
        assert_eq!(json["topic_id"], "antenna");
        assert_eq!(json["topic_title"], "Antenna Gain");
        assert_eq!(json["timestamp_ms"], 42.0);
        assert_eq!(json["details"]["option"], "b");
    }
}
