//! Prediction and gallery progress tracking
//!
//! Small, self-contained progress records. Both gate "next" controls:
//! a prediction phase unlocks once a choice is recorded, the transfer
//! phase unlocks once every gallery entry has been viewed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A recorded answer-option identifier (topic data defines the id space)
pub type AnswerId = String;

/// Records a single chosen option for one prediction slot.
///
/// The choice is overwritable until the phase advances; there are no
/// retries and no partial credit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionTracker {
    choice: Option<AnswerId>,
}

impl PredictionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the chosen option
    pub fn choose(&mut self, option_id: &str) {
        self.choice = Some(option_id.to_owned());
    }

    /// Whether a choice has been recorded (gates the "next" control)
    pub fn has_answered(&self) -> bool {
        self.choice.is_some()
    }

    /// The recorded choice, if any
    pub fn choice(&self) -> Option<&str> {
        self.choice.as_deref()
    }

    /// Pure comparison against the topic's correct-answer id
    pub fn is_correct(&self, correct_id: &str) -> bool {
        self.choice.as_deref() == Some(correct_id)
    }

    /// Clear the slot (module reset)
    pub fn clear(&mut self) {
        self.choice = None;
    }
}

/// Tracks which entries of a fixed-size application gallery have been viewed.
///
/// `BTreeSet` keeps snapshots byte-stable across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GalleryProgressTracker {
    viewed: BTreeSet<usize>,
}

impl GalleryProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an entry viewed. Idempotent; out-of-range indices are ignored.
    pub fn mark_viewed(&mut self, index: usize, total: usize) -> bool {
        if index >= total {
            log::debug!("gallery index {index} out of range (total {total})");
            return false;
        }
        self.viewed.insert(index)
    }

    /// Number of distinct entries viewed
    pub fn viewed_count(&self) -> usize {
        self.viewed.len()
    }

    /// Whether a given entry has been viewed
    pub fn is_viewed(&self, index: usize) -> bool {
        self.viewed.contains(&index)
    }

    /// True once every entry has been viewed at least once, in any order
    pub fn is_complete(&self, total: usize) -> bool {
        self.viewed.len() >= total
    }

    /// Clear all viewed marks (module reset)
    pub fn clear(&mut self) {
        self.viewed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_prediction_overwrite() {
        let mut tracker = PredictionTracker::new();
        assert!(!tracker.has_answered());

        tracker.choose("a");
        assert!(tracker.has_answered());
        assert!(tracker.is_correct("a"));

        tracker.choose("b");
        assert!(tracker.is_correct("b"));
        assert!(!tracker.is_correct("a"));
    }

    #[test]
    fn test_prediction_unanswered_is_never_correct() {
        let tracker = PredictionTracker::new();
        assert!(!tracker.is_correct("a"));
    }

    #[test]
    fn test_gallery_completion() {
        let mut gallery = GalleryProgressTracker::new();
        let total = 4;

        assert!(!gallery.is_complete(total));
        gallery.mark_viewed(0, total);
        gallery.mark_viewed(2, total);
        // Repeats don't advance progress
        gallery.mark_viewed(2, total);
        assert_eq!(gallery.viewed_count(), 2);
        assert!(!gallery.is_complete(total));

        gallery.mark_viewed(1, total);
        gallery.mark_viewed(3, total);
        assert!(gallery.is_complete(total));
    }

    #[test]
    fn test_gallery_out_of_range_ignored() {
        let mut gallery = GalleryProgressTracker::new();
        assert!(!gallery.mark_viewed(4, 4));
        assert_eq!(gallery.viewed_count(), 0);
    }

    proptest! {
        /// Any proper subset of the gallery is incomplete; only full
        /// coverage completes it, regardless of repeats or order.
        #[test]
        fn prop_gallery_subset_incomplete(
            marks in proptest::collection::vec(0usize..4, 0..32),
        ) {
            let total = 4;
            let mut gallery = GalleryProgressTracker::new();
            for &i in &marks {
                gallery.mark_viewed(i, total);
            }
            let distinct: std::collections::BTreeSet<_> = marks.iter().copied().collect();
            prop_assert_eq!(gallery.is_complete(total), distinct.len() == total);
        }
    }
}
