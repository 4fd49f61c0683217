//! Landmark expansion.
//!
//! Fills each day up to the target landmark count. Caller-selected
//! attractions are claimed through the trip registry first; the remainder
//! comes from the generative landmark service in bounded request rounds,
//! seeded with the names already used anywhere in the trip. A candidate
//! the registry rejects was claimed by another day and is discarded.
//!
//! A day containing a theme park short-circuits all of this: the park is
//! the whole day, and the generative service is never called.

use tracing::{debug, info, warn};

use crate::api::{Attraction, Block, BlockKind, DayMode, Location};
use crate::config::EngineConfig;
use crate::models::{DurationMin, TimeOfDay};
use crate::providers::{
    with_retry, CandidateLandmark, Deadline, LandmarkSuggester, RetryBudget, SuggestionRequest,
};
use crate::services::classifier;
use crate::services::registry::TripRegistry;

/// Default visit length for an expanded landmark.
const DEFAULT_LANDMARK_MINUTES: u32 = 120;
/// A theme park is a fixed full-day block.
const THEME_PARK_MINUTES: u32 = 480;
/// Candidates requested when regeneration asks for one extra landmark.
const SUPPLEMENTARY_CANDIDATES: usize = 3;

/// Result of expanding one day.
#[derive(Debug, Clone)]
pub struct ExpandedDay {
    pub mode: DayMode,
    pub landmarks: Vec<Block>,
    /// Landmark count the day was asked to reach.
    pub target: usize,
    /// How far short of the target the day ended up (normal days only).
    pub shortfall: usize,
    /// Caller-supplied names dropped because another day claimed them.
    pub dropped_duplicates: Vec<String>,
}

/// Expand a day's attractions to the target landmark count.
#[allow(clippy::too_many_arguments)]
pub async fn expand_day(
    day: u32,
    destination: &str,
    context: &str,
    attractions: &[Attraction],
    target_count: usize,
    registry: &TripRegistry,
    suggester: &dyn LandmarkSuggester,
    budget: &RetryBudget,
    deadline: &Deadline,
    config: &EngineConfig,
) -> ExpandedDay {
    let mut dropped_duplicates = Vec::new();

    // Theme-park short-circuit: the first park that wins its registry
    // claim anchors the day. A park already claimed by an earlier day is
    // dropped like any other duplicate and the day falls through to
    // normal expansion.
    for attraction in attractions {
        if !classifier::classify(attraction).is_theme_park {
            continue;
        }
        if registry.reserve(&attraction.name) {
            info!(day, park = %attraction.name, "theme park day, skipping expansion");
            return ExpandedDay {
                mode: DayMode::ThemeParkAnchored,
                landmarks: vec![theme_park_block(attraction)],
                target: 1,
                shortfall: 0,
                dropped_duplicates,
            };
        }
        warn!(day, park = %attraction.name, "theme park already used this trip");
        dropped_duplicates.push(attraction.name.clone());
    }

    let mut landmarks: Vec<Block> = Vec::new();
    for attraction in attractions {
        if attraction.kind != BlockKind::Landmark {
            debug!(day, name = %attraction.name, "skipping non-landmark input");
            continue;
        }
        if dropped_duplicates.contains(&attraction.name) {
            continue;
        }
        if registry.reserve(&attraction.name) {
            landmarks.push(landmark_block(
                &attraction.name,
                &attraction.description,
                Some(attraction.location),
            ));
        } else {
            warn!(day, name = %attraction.name, "input landmark already used this trip");
            dropped_duplicates.push(attraction.name.clone());
        }
    }

    let mut round = 0;
    while landmarks.len() < target_count && round < config.expansion_rounds {
        round += 1;
        let request = SuggestionRequest {
            destination: destination.to_string(),
            day,
            context: context.to_string(),
            avoid_names: registry.used_names(),
            count: target_count - landmarks.len(),
        };

        let candidates = match with_retry("suggest_landmarks", budget, deadline, || {
            suggester.suggest_landmarks(&request)
        })
        .await
        {
            Ok(candidates) => candidates,
            Err(error) => {
                warn!(day, round, %error, "landmark suggestion degraded");
                break;
            }
        };

        if candidates.is_empty() {
            // the service has no further novel candidates
            break;
        }
        let accepted = accept_candidates(&mut landmarks, candidates, target_count, registry);
        debug!(day, round, accepted, have = landmarks.len(), "expansion round complete");
    }

    let shortfall = target_count.saturating_sub(landmarks.len());
    if shortfall > 0 {
        info!(day, shortfall, "accepting day below target landmark count");
    }

    ExpandedDay {
        mode: DayMode::Normal,
        landmarks,
        target: target_count,
        shortfall,
        dropped_duplicates,
    }
}

/// Ask the generative service for one extra landmark during gap-driven
/// regeneration. Returns the first candidate the registry accepts.
pub async fn request_supplementary(
    day: u32,
    destination: &str,
    context: &str,
    registry: &TripRegistry,
    suggester: &dyn LandmarkSuggester,
    budget: &RetryBudget,
    deadline: &Deadline,
) -> Option<Block> {
    let request = SuggestionRequest {
        destination: destination.to_string(),
        day,
        context: context.to_string(),
        avoid_names: registry.used_names(),
        count: SUPPLEMENTARY_CANDIDATES,
    };

    let candidates = match with_retry("suggest_landmarks", budget, deadline, || {
        suggester.suggest_landmarks(&request)
    })
    .await
    {
        Ok(candidates) => candidates,
        Err(error) => {
            warn!(day, %error, "supplementary landmark request degraded");
            return None;
        }
    };

    for candidate in candidates {
        if registry.reserve(&candidate.name) {
            debug!(day, name = %candidate.name, "supplementary landmark accepted");
            return Some(candidate_block(&candidate));
        }
    }
    None
}

fn accept_candidates(
    landmarks: &mut Vec<Block>,
    candidates: Vec<CandidateLandmark>,
    target_count: usize,
    registry: &TripRegistry,
) -> usize {
    let mut accepted = 0;
    for candidate in candidates {
        if landmarks.len() >= target_count {
            break;
        }
        if registry.reserve(&candidate.name) {
            landmarks.push(candidate_block(&candidate));
            accepted += 1;
        } else {
            debug!(name = %candidate.name, "candidate already used this trip");
        }
    }
    accepted
}

fn candidate_block(candidate: &CandidateLandmark) -> Block {
    landmark_block(&candidate.name, &candidate.description, candidate.location)
}

fn landmark_block(name: &str, description: &str, location: Option<Location>) -> Block {
    Block {
        kind: BlockKind::Landmark,
        name: name.to_string(),
        description: description.to_string(),
        // provisional; the assembler fixes real start times
        start_time: TimeOfDay::new(9, 0).unwrap(),
        duration: DurationMin::from_minutes(DEFAULT_LANDMARK_MINUTES),
        mealtime: None,
        place_id: None,
        rating: None,
        location,
        address: None,
        website: None,
        photo_url: None,
    }
}

fn theme_park_block(attraction: &Attraction) -> Block {
    let mut block = landmark_block(
        &attraction.name,
        &attraction.description,
        Some(attraction.location),
    );
    block.duration = DurationMin::from_minutes(THEME_PARK_MINUTES);
    block
}
