//! Lesson engine module
//!
//! All lesson-flow logic lives here. This module must be pure and host-agnostic:
//! - Time is always passed in, never read from a clock
//! - Stable, serializable state (snapshot/restore for session resume)
//! - No rendering or platform dependencies

pub mod events;
pub mod module;
pub mod nav;
pub mod phase;
pub mod progress;
pub mod quiz;
pub mod state;

pub use events::{EventSink, LessonEvent};
pub use module::ModuleEngine;
pub use nav::NavigationController;
pub use phase::Phase;
pub use progress::{GalleryProgressTracker, PredictionTracker};
pub use quiz::{QuizEngine, QuizOutcome};
pub use state::ModuleState;
