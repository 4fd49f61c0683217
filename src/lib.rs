//! # Wanderplan
//!
//! Itinerary timeline scheduling and enrichment engine.
//!
//! Given a destination, a trip length and a sparse list of candidate
//! attractions per day, the engine produces a fully time-blocked,
//! gap-free, duplicate-free day plan per travel day: landmarks expanded
//! to a target count through a generative suggestion service, meals
//! guaranteed in every day, blocks enriched with place metadata, and the
//! theme-park special case handled as an explicit scheduling mode.
//!
//! ## Architecture
//!
//! - [`api`]: request/response data model and boundary validation
//! - [`models`]: clock-time and duration value types
//! - [`config`]: tunable thresholds (gap limits, retry budgets, deadline)
//! - [`logging`]: tracing bootstrap for embedders and test harnesses
//! - [`providers`]: contracts for the external landmark-suggestion and
//!   place-enrichment services, with retry/deadline machinery and HTTP
//!   adapters
//! - [`services`]: the scheduling pipeline — classifier, dedup registry,
//!   expander, meal planner, assembler/validator and the orchestrating
//!   engine
//!
//! ## Degradation model
//!
//! The external services are unreliable by contract. Every failure short
//! of malformed input degrades locally: a day keeps whatever landmarks
//! were reserved, meals fall back to synthesized blocks, enrichment
//! leaves blocks untouched, and oversized gaps survive only after the
//! bounded regeneration budget is spent. Request validation is the sole
//! user-visible failure.

pub mod api;
pub mod config;
pub mod logging;
pub mod models;
pub mod providers;
pub mod services;

pub use api::{ItineraryRequest, ItineraryResponse};
pub use config::EngineConfig;
pub use services::{GenerationOutcome, GenerationReport, ItineraryEngine};
