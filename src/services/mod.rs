//! Service layer: the scheduling and enrichment pipeline.
//!
//! Components in dependency order: the theme-park classifier and the
//! trip registry are leaves; the expander fills days with landmarks; the
//! meal planner inserts breakfast/lunch/dinner; the assembler merges and
//! validates the timeline; the engine orchestrates all of it per
//! request.

pub mod assembler;
pub mod classifier;
pub mod engine;
pub mod enricher;
pub mod expander;
pub mod meal_planner;
pub mod registry;

mod expander_tests;

pub use engine::{GenerationOutcome, GenerationReport, ItineraryEngine};
pub use registry::TripRegistry;
