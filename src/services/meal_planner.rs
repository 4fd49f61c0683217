//! Meal slot planning.
//!
//! Inserts breakfast, lunch and dinner blocks around a day's landmarks.
//! Anchor times are derived from the landmark schedule so that no
//! meal-to-meal or meal-to-landmark stretch exceeds the gap thresholds:
//! lunch slides later when the morning can absorb another landmark, and
//! dinner tracks the end of the afternoon. Theme-park days use fixed
//! anchors with the lunch taken inside the park.
//!
//! Restaurants are discovered through the place catalog near the day's
//! centroid, skipping any place id already used elsewhere in the trip.
//! When the catalog is unreachable the planner degrades to synthesized
//! destination-branded blocks so meal coverage never depends on the
//! network.

use tracing::{debug, warn};

use crate::api::{Block, BlockKind, DayMode, Location, Mealtime};
use crate::config::EngineConfig;
use crate::models::{DurationMin, TimeOfDay};
use crate::providers::{
    with_retry, Deadline, PlaceCatalog, PlaceDetails, RestaurantQuery, RetryBudget,
};
use crate::services::assembler::split_landmarks;
use crate::services::enricher::{
    is_generic_description, photo_proxy_url, sanitize_rating, MIN_RESTAURANT_DESCRIPTION,
};
use crate::services::registry::TripRegistry;

const BREAKFAST_MINUTES: u32 = 45;
const LUNCH_MINUTES: u32 = 60;
const DINNER_MINUTES: u32 = 90;

/// Minimum lunch-end to dinner-start spacing on an empty afternoon.
const MIN_GAP_AFTER_LUNCH: u32 = 120;
/// Dinner follows the last afternoon block by at least this much.
const DINNER_LEAD: u32 = 30;
/// Restaurant search radius around the day centroid, in meters.
const SEARCH_RADIUS_M: u32 = 3000;
/// Catalog results inspected per meal before falling back.
const CANDIDATES_PER_MEAL: usize = 5;

fn t(hour: u16, minute: u16) -> TimeOfDay {
    TimeOfDay::new(hour, minute).expect("static anchor in range")
}

/// Resolved meal anchor times for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MealAnchors {
    pub breakfast: TimeOfDay,
    pub lunch: TimeOfDay,
    pub dinner: TimeOfDay,
}

/// Compute meal anchors from the landmark durations.
///
/// Lunch starts at 12:30 and slides in half-hour steps toward 14:00 until
/// the implied dinner lands within the afternoon meal-gap cap; when no
/// candidate satisfies the cap the afternoon is fully occupied by
/// landmarks and the latest layout wins. With `compress` set (second
/// regeneration attempt) both anchors are pulled toward their preceding
/// blocks so residual gaps shrink instead of adding more landmarks.
pub(crate) fn plan_meal_anchors(
    durations: &[u32],
    mode: DayMode,
    config: &EngineConfig,
    compress: bool,
) -> MealAnchors {
    if mode == DayMode::ThemeParkAnchored {
        return MealAnchors {
            breakfast: t(8, 0),
            lunch: t(12, 30),
            dinner: t(19, 0),
        };
    }

    let breakfast = t(8, 0);
    let breakfast_end = breakfast.plus_minutes(BREAKFAST_MINUTES);

    let candidates: Vec<TimeOfDay> = if compress {
        vec![TimeOfDay::from_minutes(
            t(12, 30)
                .minutes()
                .min(breakfast_end.minutes() + config.max_gap_minutes),
        )]
    } else {
        vec![t(12, 30), t(13, 0), t(13, 30), t(14, 0)]
    };

    let mut chosen = None;
    for lunch in &candidates {
        let lunch = *lunch;
        let lunch_end = lunch.plus_minutes(LUNCH_MINUTES);
        let split = split_landmarks(durations, breakfast_end, lunch, lunch_end, config);

        let computed = TimeOfDay::from_minutes(
            (lunch_end.minutes() + MIN_GAP_AFTER_LUNCH)
                .max(split.last_afternoon_end.minutes() + DINNER_LEAD),
        );
        let mut dinner = computed.clamp_range(t(17, 0), t(20, 0));
        // never pull dinner back into the afternoon's last block
        if dinner < split.last_afternoon_end.plus_minutes(DINNER_LEAD) {
            dinner = split.last_afternoon_end.plus_minutes(DINNER_LEAD);
        }

        if compress {
            let latest_end = lunch_end.minutes().max(split.last_afternoon_end.minutes());
            dinner = TimeOfDay::from_minutes(
                dinner.minutes().min(latest_end + config.max_gap_minutes),
            );
        }

        let within_cap =
            dinner.minutes() <= lunch_end.minutes() + config.meal_gap_max_minutes;
        chosen = Some(MealAnchors {
            breakfast,
            lunch,
            dinner,
        });
        if within_cap {
            break;
        }
    }

    chosen.expect("at least one lunch candidate")
}

/// Plan the day's meal blocks.
///
/// Normal days produce breakfast, lunch and dinner; theme-park days
/// produce the same trio with the single required lunch anchored at
/// 12:30, taken inside the park.
#[allow(clippy::too_many_arguments)]
pub async fn plan_meals(
    day: u32,
    destination: &str,
    landmarks: &[Block],
    mode: DayMode,
    registry: &TripRegistry,
    catalog: &dyn PlaceCatalog,
    budget: &RetryBudget,
    deadline: &Deadline,
    config: &EngineConfig,
    compress: bool,
) -> Vec<Block> {
    let durations: Vec<u32> = landmarks.iter().map(|b| b.duration.minutes()).collect();
    let anchors = plan_meal_anchors(&durations, mode, config, compress);
    let center = day_center(landmarks);

    let slots = [
        (Mealtime::Breakfast, anchors.breakfast, BREAKFAST_MINUTES),
        (Mealtime::Lunch, anchors.lunch, LUNCH_MINUTES),
        (Mealtime::Dinner, anchors.dinner, DINNER_MINUTES),
    ];

    let mut meals = Vec::with_capacity(slots.len());
    for (mealtime, start, minutes) in slots {
        let discovered = match center {
            Some(center) => {
                discover_restaurant(
                    destination, center, mealtime, registry, catalog, budget, deadline,
                )
                .await
            }
            None => None,
        };

        let mut block = match discovered {
            Some(details) => restaurant_block(&details, mealtime, start, minutes),
            None => fallback_restaurant(destination, mealtime, start, minutes),
        };

        if mode == DayMode::ThemeParkAnchored && mealtime == Mealtime::Lunch {
            if block.description.trim().is_empty() {
                block.description = "Quick-service lunch inside the park".to_string();
            } else {
                block.description =
                    format!("{}; can dine inside the park or exit and re-enter", block.description);
            }
        }

        debug!(day, %mealtime, start = %block.start_time, name = %block.name, "meal scheduled");
        meals.push(block);
    }

    meals
}

/// Centroid of the landmarks that carry coordinates.
fn day_center(landmarks: &[Block]) -> Option<Location> {
    let points: Vec<Location> = landmarks.iter().filter_map(|b| b.location).collect();
    Location::centroid(&points)
}

async fn discover_restaurant(
    destination: &str,
    center: Location,
    mealtime: Mealtime,
    registry: &TripRegistry,
    catalog: &dyn PlaceCatalog,
    budget: &RetryBudget,
    deadline: &Deadline,
) -> Option<PlaceDetails> {
    let query = RestaurantQuery {
        center,
        destination: destination.to_string(),
        mealtime,
        radius_m: SEARCH_RADIUS_M,
    };

    let results = match with_retry("find_restaurants", budget, deadline, || {
        catalog.find_restaurants(&query)
    })
    .await
    {
        Ok(results) => results,
        Err(error) => {
            warn!(%mealtime, %error, "restaurant discovery degraded");
            return None;
        }
    };

    for details in results.into_iter().take(CANDIDATES_PER_MEAL) {
        if registry.reserve_place(&details.place_id) {
            return Some(details);
        }
        debug!(place_id = %details.place_id, "restaurant already used this trip");
    }
    None
}

fn restaurant_block(
    details: &PlaceDetails,
    mealtime: Mealtime,
    start: TimeOfDay,
    minutes: u32,
) -> Block {
    let description = details
        .editorial_description
        .as_deref()
        .map(str::trim)
        .filter(|d| d.len() >= MIN_RESTAURANT_DESCRIPTION && !is_generic_description(d))
        .map(str::to_string)
        .unwrap_or_else(|| fallback_description(mealtime).to_string());

    Block {
        kind: BlockKind::Restaurant,
        name: details.name.clone(),
        description,
        start_time: start,
        duration: DurationMin::from_minutes(minutes),
        mealtime: Some(mealtime),
        place_id: Some(details.place_id.clone()),
        rating: sanitize_rating(details.rating),
        location: details.location,
        address: details.address.clone(),
        website: details.website.clone(),
        photo_url: details.photo_reference.as_deref().map(photo_proxy_url),
    }
}

/// Synthesized restaurant used when discovery yields nothing. Keeps meal
/// coverage intact; the enrichment merger may still find a real match for
/// the synthesized name later.
fn fallback_restaurant(
    destination: &str,
    mealtime: Mealtime,
    start: TimeOfDay,
    minutes: u32,
) -> Block {
    let name = match mealtime {
        Mealtime::Breakfast => format!("Popular {destination} Breakfast Cafe"),
        Mealtime::Lunch => format!("Recommended {destination} Bistro"),
        Mealtime::Dinner => format!("Traditional {destination} Restaurant"),
    };

    Block {
        kind: BlockKind::Restaurant,
        name,
        description: fallback_description(mealtime).to_string(),
        start_time: start,
        duration: DurationMin::from_minutes(minutes),
        mealtime: Some(mealtime),
        place_id: None,
        rating: None,
        location: None,
        address: None,
        website: None,
        photo_url: None,
    }
}

fn fallback_description(mealtime: Mealtime) -> &'static str {
    match mealtime {
        Mealtime::Breakfast => "Local breakfast spot known for fresh pastries and coffee",
        Mealtime::Lunch => "Popular lunch stop serving regional specialties",
        Mealtime::Dinner => "Authentic local cuisine in a welcoming atmosphere",
    }
}
