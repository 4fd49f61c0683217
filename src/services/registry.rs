//! Trip-scoped deduplication registry.
//!
//! One instance exists per itinerary-generation request and is the only
//! state shared between concurrently processed days. All mutation goes
//! through a single mutex, so two days racing to claim the same landmark
//! name resolve deterministically: the losing claimant falls through to
//! requesting an alternative candidate.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

/// Normalize a landmark name for cross-day comparison: lowercase, strip
/// punctuation and filler words, collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    const STOP_WORDS: &[&str] = &[
        "the", "a", "an", "of", "at", "in", "on", "for", "with", "and", "&",
    ];

    let cleaned: String = name
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            '\'' => None,
            '-' => Some(' '),
            c if c.is_alphanumeric() || c.is_whitespace() => Some(c),
            _ => Some(' '),
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Default)]
struct RegistryState {
    landmarks: HashSet<String>,
    places: HashSet<String>,
}

/// Cloneable handle to the per-request identity sets: normalized landmark
/// names plus restaurant place ids already committed anywhere in the trip.
#[derive(Clone, Default)]
pub struct TripRegistry {
    inner: Arc<Mutex<RegistryState>>,
}

impl TripRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim a landmark name for this trip. Returns `false`
    /// when the normalized name is already taken.
    pub fn reserve(&self, name: &str) -> bool {
        self.inner.lock().landmarks.insert(normalize_name(name))
    }

    /// Release a previously claimed name. Used only when rolling back a
    /// failed day-plan attempt.
    pub fn release(&self, name: &str) {
        self.inner.lock().landmarks.remove(&normalize_name(name));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().landmarks.contains(&normalize_name(name))
    }

    /// Atomically claim a restaurant place id for this trip.
    pub fn reserve_place(&self, place_id: &str) -> bool {
        self.inner.lock().places.insert(place_id.to_string())
    }

    /// Release a restaurant place id claimed by a rolled-back attempt.
    pub fn release_place(&self, place_id: &str) {
        self.inner.lock().places.remove(place_id);
    }

    /// Snapshot of claimed names, sorted for stable prompts.
    pub fn used_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.lock().landmarks.iter().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.inner.lock().landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
