//! Built-in topics
//!
//! Data-only modules: each builds the `TopicConfig` for one micro-lesson.
//! The engine never special-cases any of these; they go through the same
//! configuration path a JSON-supplied topic would.

pub mod antenna;
pub mod disk;
pub mod thermal;

use crate::topic::TopicConfig;

/// All built-in topics
pub fn all() -> Vec<TopicConfig> {
    vec![disk::topic(), thermal::topic(), antenna::topic()]
}

/// Look up a built-in topic by id
pub fn by_id(id: &str) -> Option<TopicConfig> {
    all().into_iter().find(|t| t.id == id)
}

pub(crate) fn labels(labels: [&str; 10]) -> Vec<String> {
    labels.iter().map(|s| (*s).to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id() {
        assert!(by_id("disk-seek").is_some());
        assert!(by_id("thermal-throttling").is_some());
        assert!(by_id("antenna-gain").is_some());
        assert!(by_id("flux-capacitor").is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let topics = all();
        for (i, a) in topics.iter().enumerate() {
            for b in &topics[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
