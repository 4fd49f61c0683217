//! Engine configuration and environment variable handling.
//!
//! The gap thresholds and retry budgets are tunable rather than hard
//! constants; the defaults below are the values the validation suite
//! asserts against.

use std::env;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::models::TimeOfDay;

/// Tunable parameters of the scheduling engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum tolerated gap between adjacent blocks, in minutes.
    pub max_gap_minutes: u32,
    /// Maximum lunch-end to dinner-start gap, in minutes.
    pub meal_gap_max_minutes: u32,
    /// Start of the active scheduling window.
    pub window_start: TimeOfDay,
    /// End of the active scheduling window.
    pub window_end: TimeOfDay,
    /// Landmark count the expander fills each normal day up to.
    pub target_landmarks: usize,
    /// Maximum supplementary-candidate request rounds per day.
    pub expansion_rounds: u32,
    /// Maximum gap-driven regeneration attempts per day.
    pub regeneration_attempts: u32,
    /// Attempts per external service call (first try included).
    pub provider_retries: u32,
    /// Per-call timeout for external service calls, in seconds.
    pub provider_timeout_secs: u64,
    /// End-to-end deadline for one generation request, in seconds.
    pub request_deadline_secs: u64,
    /// Travel buffer inserted between consecutive blocks, in minutes.
    pub travel_buffer_minutes: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_gap_minutes: 180,
            meal_gap_max_minutes: 240,
            window_start: TimeOfDay::new(9, 0).unwrap(),
            window_end: TimeOfDay::new(19, 0).unwrap(),
            target_landmarks: 3,
            expansion_rounds: 3,
            regeneration_attempts: 2,
            provider_retries: 2,
            provider_timeout_secs: 5,
            request_deadline_secs: 12,
            travel_buffer_minutes: 15,
        }
    }
}

impl EngineConfig {
    /// Create a configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// # Environment Variables
    /// - `WANDERPLAN_MAX_GAP_MINUTES` (optional, default: 180)
    /// - `WANDERPLAN_MEAL_GAP_MAX_MINUTES` (optional, default: 240)
    /// - `WANDERPLAN_TARGET_LANDMARKS` (optional, default: 3)
    /// - `WANDERPLAN_PROVIDER_TIMEOUT_SECS` (optional, default: 5)
    /// - `WANDERPLAN_REQUEST_DEADLINE_SECS` (optional, default: 12)
    ///
    /// # Errors
    /// Returns an error if a set variable fails to parse.
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();
        if let Ok(v) = env::var("WANDERPLAN_MAX_GAP_MINUTES") {
            config.max_gap_minutes = v
                .parse()
                .map_err(|_| "WANDERPLAN_MAX_GAP_MINUTES must be a number".to_string())?;
        }
        if let Ok(v) = env::var("WANDERPLAN_MEAL_GAP_MAX_MINUTES") {
            config.meal_gap_max_minutes = v
                .parse()
                .map_err(|_| "WANDERPLAN_MEAL_GAP_MAX_MINUTES must be a number".to_string())?;
        }
        if let Ok(v) = env::var("WANDERPLAN_TARGET_LANDMARKS") {
            config.target_landmarks = v
                .parse()
                .map_err(|_| "WANDERPLAN_TARGET_LANDMARKS must be a number".to_string())?;
        }
        if let Ok(v) = env::var("WANDERPLAN_PROVIDER_TIMEOUT_SECS") {
            config.provider_timeout_secs = v
                .parse()
                .map_err(|_| "WANDERPLAN_PROVIDER_TIMEOUT_SECS must be a number".to_string())?;
        }
        if let Ok(v) = env::var("WANDERPLAN_REQUEST_DEADLINE_SECS") {
            config.request_deadline_secs = v
                .parse()
                .map_err(|_| "WANDERPLAN_REQUEST_DEADLINE_SECS must be a number".to_string())?;
        }
        Ok(config)
    }

    /// Load a configuration from a TOML file. Missing keys fall back to
    /// defaults.
    pub fn from_toml_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("invalid engine config in {}", path.display()))?;
        Ok(config)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn request_deadline(&self) -> Duration {
        Duration::from_secs(self.request_deadline_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::EngineConfig;

    #[test]
    fn test_defaults_match_validation_thresholds() {
        let config = EngineConfig::default();
        assert_eq!(config.max_gap_minutes, 180);
        assert_eq!(config.meal_gap_max_minutes, 240);
        assert_eq!(config.window_start.to_string(), "09:00");
        assert_eq!(config.window_end.to_string(), "19:00");
        assert_eq!(config.target_landmarks, 3);
        assert_eq!(config.regeneration_attempts, 2);
    }

    #[test]
    fn test_toml_overrides_subset() {
        let parsed: EngineConfig = toml::from_str(
            r#"
            max_gap_minutes = 150
            window_end = "20:00"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.max_gap_minutes, 150);
        assert_eq!(parsed.window_end.to_string(), "20:00");
        // untouched keys keep their defaults
        assert_eq!(parsed.meal_gap_max_minutes, 240);
        assert_eq!(parsed.target_landmarks, 3);
    }
}
