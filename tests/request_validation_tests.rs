//! Request-boundary validation: the only user-visible failure class.

mod support;

use std::sync::Arc;

use wanderplan::api::{DayAttractions, Location, RequestError};
use wanderplan::services::engine::EngineError;
use wanderplan::ItineraryEngine;

use support::{landmark_attraction, request, seeded_day, PoolSuggester, StubCatalog};

fn engine() -> ItineraryEngine {
    ItineraryEngine::new(
        Arc::new(PoolSuggester::orlando_pool()),
        Arc::new(StubCatalog::new()),
    )
}

#[tokio::test]
async fn test_zero_travel_days_rejected() {
    let mut req = request("Orlando", vec![]);
    req.travel_days = 0;
    let error = engine().generate(&req).await.unwrap_err();
    assert!(matches!(
        error,
        EngineError::InvalidRequest(RequestError::InvalidTravelDays)
    ));
}

#[tokio::test]
async fn test_blank_destination_rejected() {
    let mut req = request("Orlando", vec![seeded_day(1, &[])]);
    req.destination = "   ".to_string();
    let error = engine().generate(&req).await.unwrap_err();
    assert!(matches!(
        error,
        EngineError::InvalidRequest(RequestError::EmptyDestination)
    ));
}

#[tokio::test]
async fn test_out_of_range_coordinate_rejected() {
    let mut bad = landmark_attraction("Nowhere Point");
    bad.location = Location::new(95.0, 10.0);
    let req = request(
        "Orlando",
        vec![DayAttractions {
            day: 1,
            attractions: vec![bad],
        }],
    );
    let error = engine().generate(&req).await.unwrap_err();
    assert!(matches!(
        error,
        EngineError::InvalidRequest(RequestError::InvalidCoordinate { .. })
    ));
}

#[tokio::test]
async fn test_day_index_beyond_trip_rejected() {
    let mut req = request("Orlando", vec![seeded_day(2, &["Orlando Science Center"])]);
    req.travel_days = 1;
    let error = engine().generate(&req).await.unwrap_err();
    assert!(matches!(
        error,
        EngineError::InvalidRequest(RequestError::DayOutOfRange { day: 2, .. })
    ));
}

#[tokio::test]
async fn test_valid_request_passes_boundary() {
    let req = request("Orlando", vec![seeded_day(1, &["Orlando Science Center"])]);
    assert!(engine().generate(&req).await.is_ok());
}
