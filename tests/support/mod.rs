//! Shared test doubles and fixtures for the integration suites.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use wanderplan::api::{Attraction, BlockKind, DayAttractions, ItineraryRequest, Location, Mealtime, TravelerProfile};
use wanderplan::providers::{
    CandidateLandmark, LandmarkSuggester, PlaceCatalog, PlaceDetails, PlaceQuery, ProviderError,
    RestaurantQuery, SuggestionRequest,
};
use wanderplan::services::registry::normalize_name;

pub fn orlando() -> Location {
    Location::new(28.5383, -81.3792)
}

pub fn landmark_attraction(name: &str) -> Attraction {
    Attraction {
        name: name.to_string(),
        description: String::new(),
        location: orlando(),
        kind: BlockKind::Landmark,
    }
}

pub fn request(destination: &str, days: Vec<DayAttractions>) -> ItineraryRequest {
    let travel_days = days.iter().map(|d| d.day).max().unwrap_or(1);
    ItineraryRequest {
        destination: destination.to_string(),
        travel_days,
        days,
        preferences: TravelerProfile::default(),
        special_requests: None,
    }
}

pub fn seeded_day(day: u32, names: &[&str]) -> DayAttractions {
    DayAttractions {
        day,
        attractions: names.iter().map(|n| landmark_attraction(n)).collect(),
    }
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Well-behaved suggester backed by a fixed candidate pool. Honors the
/// avoid-name seed the way the real service is asked to.
pub struct PoolSuggester {
    pool: Vec<String>,
}

impl PoolSuggester {
    pub fn orlando_pool() -> Self {
        Self {
            pool: [
                "Lake Eola Park",
                "Orlando Museum of Art",
                "Leu Gardens",
                "Mennello Museum of American Art",
                "Wekiwa Springs State Park",
                "Kraft Azalea Garden",
                "Winter Park Scenic Boat Tour",
                "Cornell Fine Arts Museum",
                "Mead Botanical Garden",
                "Albin Polasek Museum",
                "Crane's Roost Park",
                "Central Florida Zoo",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        }
    }
}

#[async_trait]
impl LandmarkSuggester for PoolSuggester {
    async fn suggest_landmarks(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Vec<CandidateLandmark>, ProviderError> {
        let avoided: Vec<String> = request
            .avoid_names
            .iter()
            .map(|n| normalize_name(n))
            .collect();
        let candidates = self
            .pool
            .iter()
            .filter(|name| !avoided.contains(&normalize_name(name)))
            .take(request.count)
            .map(|name| CandidateLandmark {
                name: name.clone(),
                description: format!(
                    "{name} is a celebrated stop with plenty to see for every visitor"
                ),
                location: Some(orlando()),
            })
            .collect();
        Ok(candidates)
    }
}

/// Suggester that always returns zero candidates.
pub struct EmptySuggester;

#[async_trait]
impl LandmarkSuggester for EmptySuggester {
    async fn suggest_landmarks(
        &self,
        _request: &SuggestionRequest,
    ) -> Result<Vec<CandidateLandmark>, ProviderError> {
        Ok(Vec::new())
    }
}

/// Suggester that is unreachable.
pub struct FailingSuggester;

#[async_trait]
impl LandmarkSuggester for FailingSuggester {
    async fn suggest_landmarks(
        &self,
        _request: &SuggestionRequest,
    ) -> Result<Vec<CandidateLandmark>, ProviderError> {
        Err(ProviderError::Unavailable("connection refused".into()))
    }
}

/// Catalog double with deterministic lookups and an endless supply of
/// distinct restaurants.
pub struct StubCatalog {
    counter: AtomicU32,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self {
            counter: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl PlaceCatalog for StubCatalog {
    async fn lookup_place(
        &self,
        query: &PlaceQuery,
    ) -> Result<Option<PlaceDetails>, ProviderError> {
        let slug = slug(&query.name);
        Ok(Some(PlaceDetails {
            place_id: format!("pid-{slug}"),
            name: query.name.clone(),
            rating: Some(4.5),
            address: Some(format!("123 {} Ave, {}", query.name, query.destination)),
            website: Some(format!("https://places.example/{slug}")),
            photo_reference: Some(format!("ref-{slug}")),
            editorial_description: Some(format!(
                "{} is a celebrated destination offering memorable experiences for all ages",
                query.name
            )),
            location: query.location.or(Some(orlando())),
        }))
    }

    async fn find_restaurants(
        &self,
        query: &RestaurantQuery,
    ) -> Result<Vec<PlaceDetails>, ProviderError> {
        let meal = match query.mealtime {
            Mealtime::Breakfast => "Breakfast",
            Mealtime::Lunch => "Lunch",
            Mealtime::Dinner => "Dinner",
        };
        let results = (0..3)
            .map(|_| {
                let n = self.counter.fetch_add(1, Ordering::SeqCst);
                PlaceDetails {
                    place_id: format!("rest-{n}"),
                    name: format!("{meal} House No. {n}"),
                    rating: Some(4.2),
                    address: Some(format!("{n} Market St, {}", query.destination)),
                    website: Some(format!("https://restaurants.example/{n}")),
                    photo_reference: Some(format!("rest-ref-{n}")),
                    editorial_description: Some(
                        "Neighborhood kitchen serving seasonal plates and local favorites"
                            .to_string(),
                    ),
                    location: Some(query.center),
                }
            })
            .collect();
        Ok(results)
    }
}

/// Catalog that is unreachable.
pub struct DownCatalog;

#[async_trait]
impl PlaceCatalog for DownCatalog {
    async fn lookup_place(
        &self,
        _query: &PlaceQuery,
    ) -> Result<Option<PlaceDetails>, ProviderError> {
        Err(ProviderError::Unavailable("connection refused".into()))
    }

    async fn find_restaurants(
        &self,
        _query: &RestaurantQuery,
    ) -> Result<Vec<PlaceDetails>, ProviderError> {
        Err(ProviderError::Unavailable("connection refused".into()))
    }
}
