//! Public data model for the itinerary engine.
//!
//! This file consolidates the request/response types consumed and produced
//! by the scheduling core. All types derive Serialize/Deserialize for JSON
//! serialization; the engine exposes exactly one canonical output shape
//! (`ItineraryResponse`), leaving any legacy-compatibility translation to
//! the API layer above it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DurationMin, TimeOfDay};

/// Geographic coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether the coordinate lies within valid WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Centroid of a non-empty set of coordinates.
    pub fn centroid(points: &[Location]) -> Option<Location> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        Some(Location {
            lat: points.iter().map(|p| p.lat).sum::<f64>() / n,
            lng: points.iter().map(|p| p.lng).sum::<f64>() / n,
        })
    }
}

/// Kind of a timeline block or input attraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Landmark,
    Restaurant,
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockKind::Landmark => write!(f, "landmark"),
            BlockKind::Restaurant => write!(f, "restaurant"),
        }
    }
}

/// Meal slot tag, mandatory on restaurant blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mealtime {
    Breakfast,
    Lunch,
    Dinner,
}

impl std::fmt::Display for Mealtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mealtime::Breakfast => write!(f, "breakfast"),
            Mealtime::Lunch => write!(f, "lunch"),
            Mealtime::Dinner => write!(f, "dinner"),
        }
    }
}

/// A candidate attraction supplied by the caller or produced by expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attraction {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub location: Location,
    #[serde(rename = "type")]
    pub kind: BlockKind,
}

/// A scheduled timeline block.
///
/// The enrichment fields (`place_id`, `rating`, `address`, `website`,
/// `photo_url`) are populated by the enhancement merger when the place
/// catalog has a match. `website` is serialized even when null; clients
/// rely on the key being present on restaurant blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_time: TimeOfDay,
    pub duration: DurationMin,
    #[serde(default)]
    pub mealtime: Option<Mealtime>,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl Block {
    /// End of the block on the day timeline.
    pub fn end_time(&self) -> TimeOfDay {
        self.start_time.plus_minutes(self.duration.minutes())
    }

    pub fn is_landmark(&self) -> bool {
        self.kind == BlockKind::Landmark
    }

    pub fn is_restaurant(&self) -> bool {
        self.kind == BlockKind::Restaurant
    }
}

/// Scheduling mode of a day, decided by the theme-park classifier.
///
/// Carried as explicit state so the meal planner and assembler dispatch on
/// it instead of re-deriving the classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayMode {
    #[default]
    Normal,
    ThemeParkAnchored,
}

/// One day of the itinerary: a time-ordered sequence of blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: u32,
    #[serde(skip)]
    pub mode: DayMode,
    pub blocks: Vec<Block>,
}

impl DayPlan {
    pub fn landmarks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.is_landmark())
    }

    pub fn restaurants(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.is_restaurant())
    }
}

/// Traveler profile flags forwarded to the generative landmark service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelerProfile {
    #[serde(default)]
    pub with_kids: bool,
    #[serde(default)]
    pub kids_age: Vec<u8>,
    #[serde(default)]
    pub with_elderly: bool,
}

/// Caller-selected attractions for one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAttractions {
    pub day: u32,
    #[serde(default)]
    pub attractions: Vec<Attraction>,
}

/// Itinerary generation request, validated at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryRequest {
    pub destination: String,
    pub travel_days: u32,
    #[serde(default)]
    pub days: Vec<DayAttractions>,
    #[serde(default)]
    pub preferences: TravelerProfile,
    #[serde(default)]
    pub special_requests: Option<String>,
}

/// Request-boundary validation failures. The scheduling core assumes
/// validated input; these are the only user-visible errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("destination must not be empty")]
    EmptyDestination,
    #[error("travel_days must be at least 1")]
    InvalidTravelDays,
    #[error("day {day} is out of range for a {travel_days}-day trip")]
    DayOutOfRange { day: u32, travel_days: u32 },
    #[error("day {0} appears more than once in the request")]
    DuplicateDay(u32),
    #[error("attraction with empty name on day {0}")]
    EmptyAttractionName(u32),
    #[error("attraction {name:?} has an out-of-range coordinate ({lat}, {lng})")]
    InvalidCoordinate { name: String, lat: f64, lng: f64 },
}

impl ItineraryRequest {
    /// Validate the request boundary invariants.
    ///
    /// Malformed attraction input (missing/out-of-range coordinate, empty
    /// name) is rejected here; everything past this point degrades
    /// gracefully instead of failing the request.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.destination.trim().is_empty() {
            return Err(RequestError::EmptyDestination);
        }
        if self.travel_days < 1 {
            return Err(RequestError::InvalidTravelDays);
        }

        let mut seen_days = std::collections::HashSet::new();
        for day in &self.days {
            if day.day < 1 || day.day > self.travel_days {
                return Err(RequestError::DayOutOfRange {
                    day: day.day,
                    travel_days: self.travel_days,
                });
            }
            if !seen_days.insert(day.day) {
                return Err(RequestError::DuplicateDay(day.day));
            }
            for attraction in &day.attractions {
                if attraction.name.trim().is_empty() {
                    return Err(RequestError::EmptyAttractionName(day.day));
                }
                if !attraction.location.is_valid() {
                    return Err(RequestError::InvalidCoordinate {
                        name: attraction.name.clone(),
                        lat: attraction.location.lat,
                        lng: attraction.location.lng,
                    });
                }
            }
        }
        Ok(())
    }

    /// Attractions selected for a given day, empty when unspecified.
    pub fn attractions_for_day(&self, day: u32) -> &[Attraction] {
        self.days
            .iter()
            .find(|d| d.day == day)
            .map(|d| d.attractions.as_slice())
            .unwrap_or(&[])
    }
}

/// Final itinerary: one `DayPlan` per requested travel day, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryResponse {
    pub itinerary: Vec<DayPlan>,
}
