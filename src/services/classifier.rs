//! Theme-park classification.
//!
//! A day that contains a theme park is scheduled around that single
//! full-day anchor instead of being expanded, so classification happens
//! before anything else touches the day. Matching is purely lexical:
//! a curated lexicon of major operators and venue-type signals, with
//! negative exclusions for venues that merely contain the word "park".

use crate::api::Attraction;

/// Major theme-park operators and named properties. Checked first; an
/// operator hit wins even when an exclusion word is also present
/// ("Busch Gardens").
const OPERATOR_SIGNALS: &[&str] = &[
    "universal studios",
    "universal orlando",
    "islands of adventure",
    "volcano bay",
    "citywalk",
    "city walk",
    "disney world",
    "disneyland",
    "walt disney",
    "magic kingdom",
    "epcot",
    "hollywood studios",
    "animal kingdom",
    "six flags",
    "busch gardens",
    "seaworld",
    "sea world",
    "legoland",
    "knott's berry farm",
    "cedar point",
    "europa-park",
    "portaventura",
    "alton towers",
];

/// Venue-type wording that marks a thrill or water park.
const VENUE_SIGNALS: &[&str] = &["theme park", "amusement park", "water park", "thrill park"];

/// Venues that contain park-like wording but are not theme parks.
const EXCLUSIONS: &[&str] = &[
    "museum",
    "science center",
    "science centre",
    "botanical",
    "sculpture",
    "national park",
    "state park",
    "city park",
    "skate park",
    "car park",
    "dog park",
];

/// Classification result for a single attraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_theme_park: bool,
}

/// Classify an attraction as theme park or normal.
///
/// Deterministic and total: always returns a classification, never fails,
/// and carries no hidden state.
pub fn classify(attraction: &Attraction) -> Classification {
    Classification {
        is_theme_park: is_theme_park_text(&attraction.name, &attraction.description),
    }
}

/// Lexical check over a name/description pair.
pub(crate) fn is_theme_park_text(name: &str, description: &str) -> bool {
    let name = name.to_lowercase();
    let description = description.to_lowercase();

    if OPERATOR_SIGNALS
        .iter()
        .any(|s| name.contains(s) || description.contains(s))
    {
        return true;
    }

    if EXCLUSIONS.iter().any(|s| name.contains(s)) {
        return false;
    }

    VENUE_SIGNALS
        .iter()
        .any(|s| name.contains(s) || description.contains(s))
}
