//! Itinerary generation orchestration.
//!
//! Drives the per-day pipeline: expand landmarks, plan meal slots,
//! assemble the timeline, validate gaps with bounded regeneration, then
//! enrich the accepted blocks. Days run concurrently; the trip registry
//! is the only shared state between them. The whole request runs under an
//! end-to-end deadline past which remaining provider calls are skipped
//! and the engine returns best-effort output.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::{
    DayMode, DayPlan, ItineraryRequest, ItineraryResponse, RequestError,
};
use crate::config::EngineConfig;
use crate::providers::{Deadline, LandmarkSuggester, PlaceCatalog, RetryBudget};
use crate::services::assembler::{self, DayState};
use crate::services::enricher;
use crate::services::expander;
use crate::services::meal_planner;
use crate::services::registry::TripRegistry;

/// Errors surfaced to the caller. Everything except request validation
/// degrades internally instead of failing the request.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    InvalidRequest(#[from] RequestError),
}

/// Per-day annotations: shortfalls and residual gaps are recorded here
/// rather than surfaced as errors.
#[derive(Debug, Clone, Serialize)]
pub struct DayReport {
    pub day: u32,
    pub mode: DayMode,
    pub landmark_count: usize,
    pub meal_count: usize,
    /// Landmarks short of the expansion target.
    pub landmark_shortfall: usize,
    /// Caller-supplied names dropped as trip-wide duplicates.
    pub dropped_duplicates: Vec<String>,
    pub regeneration_attempts: u32,
    /// Largest gap left after regeneration attempts were exhausted.
    pub residual_gap_minutes: Option<u32>,
}

/// Request-level generation summary.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub request_id: Uuid,
    /// Stable fingerprint of the request payload.
    pub fingerprint: String,
    pub generated_at: DateTime<Utc>,
    pub destination: String,
    pub days: Vec<DayReport>,
}

/// Itinerary plus its generation report.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub itinerary: ItineraryResponse,
    pub report: GenerationReport,
}

/// The scheduling and enrichment engine.
///
/// Holds handles to the two external collaborators and the tunable
/// configuration. One engine serves many requests; per-request state
/// (the dedup registry, the deadline) is created inside [`generate`]
/// and dropped with it, so nothing leaks across requests.
///
/// [`generate`]: ItineraryEngine::generate
pub struct ItineraryEngine {
    suggester: Arc<dyn LandmarkSuggester>,
    catalog: Arc<dyn PlaceCatalog>,
    config: EngineConfig,
}

impl ItineraryEngine {
    pub fn new(suggester: Arc<dyn LandmarkSuggester>, catalog: Arc<dyn PlaceCatalog>) -> Self {
        Self::with_config(suggester, catalog, EngineConfig::default())
    }

    pub fn with_config(
        suggester: Arc<dyn LandmarkSuggester>,
        catalog: Arc<dyn PlaceCatalog>,
        config: EngineConfig,
    ) -> Self {
        Self {
            suggester,
            catalog,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate a full itinerary for a validated request.
    pub async fn generate(
        &self,
        request: &ItineraryRequest,
    ) -> Result<GenerationOutcome, EngineError> {
        request.validate()?;

        let request_id = Uuid::new_v4();
        let fingerprint = fingerprint(request);
        info!(
            %request_id,
            destination = %request.destination,
            travel_days = request.travel_days,
            "starting itinerary generation"
        );

        let deadline = Deadline::after(self.config.request_deadline());
        let budget = RetryBudget::new(self.config.provider_retries, self.config.provider_timeout());
        let registry = TripRegistry::new();
        let context = day_context(request);

        let day_futures = (1..=request.travel_days).map(|day| {
            self.build_day(day, request, &context, &registry, &budget, &deadline)
        });
        let results = join_all(day_futures).await;

        let mut days = Vec::with_capacity(results.len());
        let mut reports = Vec::with_capacity(results.len());
        for (plan, report) in results {
            days.push(plan);
            reports.push(report);
        }

        info!(%request_id, days = days.len(), "itinerary generation complete");
        Ok(GenerationOutcome {
            itinerary: ItineraryResponse { itinerary: days },
            report: GenerationReport {
                request_id,
                fingerprint,
                generated_at: Utc::now(),
                destination: request.destination.clone(),
                days: reports,
            },
        })
    }

    /// Build one day: expand, plan meals, assemble, validate with bounded
    /// regeneration, then enrich the accepted blocks.
    async fn build_day(
        &self,
        day: u32,
        request: &ItineraryRequest,
        context: &str,
        registry: &TripRegistry,
        budget: &RetryBudget,
        deadline: &Deadline,
    ) -> (DayPlan, DayReport) {
        let destination = request.destination.as_str();
        let attractions = request.attractions_for_day(day);

        let mut state = DayState::Collecting;
        debug!(day, ?state, "day pipeline started");

        let expanded = expander::expand_day(
            day,
            destination,
            context,
            attractions,
            self.config.target_landmarks,
            registry,
            self.suggester.as_ref(),
            budget,
            deadline,
            &self.config,
        )
        .await;

        let mode = expanded.mode;
        let mut landmarks = expanded.landmarks;
        state = DayState::Merging;
        debug!(day, ?state, landmarks = landmarks.len(), "landmarks committed");

        let mut attempts = 0u32;
        let mut compress = false;
        let residual_gap;

        let accepted = loop {
            let meals = meal_planner::plan_meals(
                day,
                destination,
                &landmarks,
                mode,
                registry,
                self.catalog.as_ref(),
                budget,
                deadline,
                &self.config,
                compress,
            )
            .await;

            let plan = assembler::assemble(day, mode, landmarks.clone(), meals, &self.config);
            state = DayState::Validating;
            let gaps = assembler::validate(&plan, &self.config);
            debug!(day, ?state, gaps = gaps.len(), "timeline validated");

            if gaps.is_empty() || attempts >= self.config.regeneration_attempts || deadline.expired()
            {
                residual_gap = gaps.iter().map(|g| g.minutes).max();
                if let Some(minutes) = residual_gap {
                    warn!(day, minutes, "accepting day with residual gap");
                }
                state = DayState::Accepted;
                debug!(day, ?state, "day accepted");
                break plan;
            }

            state = DayState::Regenerating;
            attempts += 1;
            debug!(day, ?state, attempt = attempts, "regenerating day");

            // Roll back the rejected attempt's restaurant claims so the
            // next pass can pick them again.
            for block in plan.restaurants() {
                if let Some(place_id) = &block.place_id {
                    registry.release_place(place_id);
                }
            }

            if attempts == 1 {
                match expander::request_supplementary(
                    day,
                    destination,
                    context,
                    registry,
                    self.suggester.as_ref(),
                    budget,
                    deadline,
                )
                .await
                {
                    Some(block) => landmarks.push(block),
                    // nothing novel left: shift meal anchors instead
                    None => compress = true,
                }
            } else {
                compress = true;
            }
        };

        let enriched = join_all(accepted.blocks.iter().map(|block| {
            enricher::enhance_block(block, destination, self.catalog.as_ref(), budget, deadline)
        }))
        .await;

        let plan = DayPlan {
            day,
            mode,
            blocks: enriched,
        };

        let report = DayReport {
            day,
            mode,
            landmark_count: plan.landmarks().count(),
            meal_count: plan.restaurants().count(),
            landmark_shortfall: expanded.shortfall,
            dropped_duplicates: expanded.dropped_duplicates,
            regeneration_attempts: attempts,
            residual_gap_minutes: residual_gap,
        };
        (plan, report)
    }
}

/// Stable SHA-256 fingerprint of the request payload.
fn fingerprint(request: &ItineraryRequest) -> String {
    let payload = serde_json::to_vec(request).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&payload);
    hex::encode(hasher.finalize())
}

/// Free-text day context forwarded to the generative service.
fn day_context(request: &ItineraryRequest) -> String {
    let mut parts = Vec::new();
    let profile = &request.preferences;
    if profile.with_kids {
        if profile.kids_age.is_empty() {
            parts.push("traveling with kids".to_string());
        } else {
            let ages: Vec<String> = profile.kids_age.iter().map(u8::to_string).collect();
            parts.push(format!("traveling with kids aged {}", ages.join(", ")));
        }
    }
    if profile.with_elderly {
        parts.push("traveling with elderly companions".to_string());
    }
    if let Some(requests) = request
        .special_requests
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        parts.push(format!("special requests: {requests}"));
    }
    if parts.is_empty() {
        "general sightseeing".to_string()
    } else {
        parts.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::{day_context, fingerprint};
    use crate::api::{ItineraryRequest, TravelerProfile};

    fn request() -> ItineraryRequest {
        ItineraryRequest {
            destination: "Orlando".to_string(),
            travel_days: 2,
            days: vec![],
            preferences: TravelerProfile::default(),
            special_requests: None,
        }
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = request();
        let b = request();
        assert_eq!(fingerprint(&a), fingerprint(&b));

        let mut c = request();
        c.travel_days = 3;
        assert_ne!(fingerprint(&a), fingerprint(&c));
    }

    #[test]
    fn test_day_context_summarizes_profile() {
        let mut r = request();
        assert_eq!(day_context(&r), "general sightseeing");

        r.preferences.with_kids = true;
        r.preferences.kids_age = vec![5, 8];
        r.special_requests = Some("avoid long walks".to_string());
        let context = day_context(&r);
        assert!(context.contains("kids aged 5, 8"));
        assert!(context.contains("avoid long walks"));
    }
}
