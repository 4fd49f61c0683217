//! Boundary contracts for the external collaborators.
//!
//! The engine consumes two unreliable remote capabilities: a generative
//! landmark service (LLM-backed suggestions) and a place-enrichment
//! catalog (ratings, addresses, photos, restaurant discovery). Only the
//! interfaces are specified here; concrete transports live behind the
//! traits. Both services must be treated as slow and fallible, so every
//! call site goes through [`with_retry`] with a bounded budget and an
//! end-to-end [`Deadline`].

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::{Location, Mealtime};

#[cfg(feature = "http-providers")]
pub mod http;

/// Failures of an external service call. All of these are recovered
/// locally by degrading the affected item; none abort a request.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("call timed out after {0:?}")]
    Timeout(Duration),
    #[error("unexpected response shape: {0}")]
    Decode(String),
    #[error("service returned status {0}")]
    Status(u16),
}

/// Input to the generative landmark service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub destination: String,
    pub day: u32,
    /// Free-text day context: traveler profile and special requests.
    pub context: String,
    /// Names already placed anywhere in the trip, for the service's own
    /// avoidance. The registry remains the authority on uniqueness.
    pub avoid_names: Vec<String>,
    pub count: usize,
}

/// A candidate produced by the generative landmark service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateLandmark {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<Location>,
}

/// Lookup key for place enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceQuery {
    pub name: String,
    #[serde(default)]
    pub location: Option<Location>,
    pub destination: String,
}

/// Restaurant discovery query around a day's centroid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantQuery {
    pub center: Location,
    pub destination: String,
    pub mealtime: Mealtime,
    pub radius_m: u32,
}

/// Place metadata returned by the enrichment catalog. Any field but the
/// identifier may be missing; partial matches are normal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub photo_reference: Option<String>,
    #[serde(default)]
    pub editorial_description: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

/// Generative landmark suggestion service.
///
/// May return fewer candidates than requested, or none at all.
#[async_trait]
pub trait LandmarkSuggester: Send + Sync {
    async fn suggest_landmarks(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Vec<CandidateLandmark>, ProviderError>;
}

/// Place-enrichment catalog: metadata lookup plus restaurant discovery.
#[async_trait]
pub trait PlaceCatalog: Send + Sync {
    /// Look up metadata for a named place. `Ok(None)` means no match.
    async fn lookup_place(
        &self,
        query: &PlaceQuery,
    ) -> Result<Option<PlaceDetails>, ProviderError>;

    /// Find restaurants near a coordinate, ranked best-first.
    async fn find_restaurants(
        &self,
        query: &RestaurantQuery,
    ) -> Result<Vec<PlaceDetails>, ProviderError>;
}

/// End-to-end deadline for one generation request.
///
/// When the deadline is imminent the engine stops issuing provider calls
/// and falls back to best-effort output instead of failing the request.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: tokio::time::Instant,
}

impl Deadline {
    pub fn after(duration: Duration) -> Self {
        Self {
            at: tokio::time::Instant::now() + duration,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(tokio::time::Instant::now())
    }

    pub fn expired(&self) -> bool {
        self.remaining().is_zero()
    }

    /// True when less than `margin` remains; provider calls are skipped
    /// past this point.
    pub fn is_imminent(&self, margin: Duration) -> bool {
        self.remaining() < margin
    }
}

/// Explicit bounded-retry state for unreliable provider calls.
///
/// Modeled as data rather than exception-driven control flow so the retry
/// budget is a first-class, testable parameter.
#[derive(Debug, Clone, Copy)]
pub struct RetryBudget {
    /// Total attempts, first try included.
    pub attempts: u32,
    /// Backoff before the second attempt; doubles each retry.
    pub base_delay: Duration,
    /// Per-attempt timeout.
    pub call_timeout: Duration,
}

impl RetryBudget {
    pub fn new(attempts: u32, call_timeout: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay: Duration::from_millis(250),
            call_timeout,
        }
    }
}

/// Run `operation` under the retry budget, observing the request deadline.
///
/// Retries are safe here: both provider calls are idempotent reads. When
/// the deadline can no longer fit one more attempt the call is abandoned
/// with a `Timeout` and the caller degrades.
pub async fn with_retry<T, F, Fut>(
    op: &str,
    budget: &RetryBudget,
    deadline: &Deadline,
    operation: F,
) -> Result<T, ProviderError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut last_error = ProviderError::Timeout(budget.call_timeout);
    for attempt in 1..=budget.attempts {
        if deadline.is_imminent(Duration::from_millis(100)) {
            warn!(op, attempt, "deadline imminent, abandoning provider call");
            return Err(ProviderError::Timeout(deadline.remaining()));
        }

        let call_timeout = budget.call_timeout.min(deadline.remaining());
        match tokio::time::timeout(call_timeout, operation()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(error)) => {
                debug!(op, attempt, %error, "provider call failed");
                last_error = error;
            }
            Err(_) => {
                debug!(op, attempt, ?call_timeout, "provider call timed out");
                last_error = ProviderError::Timeout(call_timeout);
            }
        }

        if attempt < budget.attempts {
            let backoff = budget.base_delay * 2u32.saturating_pow(attempt - 1);
            tokio::time::sleep(backoff).await;
        }
    }
    Err(last_error)
}
