#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::api::{Attraction, BlockKind, DayMode, Location};
    use crate::config::EngineConfig;
    use crate::providers::{
        CandidateLandmark, Deadline, LandmarkSuggester, ProviderError, RetryBudget,
        SuggestionRequest,
    };
    use crate::services::expander::{expand_day, request_supplementary};
    use crate::services::registry::TripRegistry;

    /// Suggester double that replays scripted rounds of candidates.
    struct ScriptedSuggester {
        rounds: Mutex<VecDeque<Vec<CandidateLandmark>>>,
        calls: Mutex<Vec<SuggestionRequest>>,
        unavailable: bool,
    }

    impl ScriptedSuggester {
        fn with_rounds(rounds: Vec<Vec<CandidateLandmark>>) -> Self {
            Self {
                rounds: Mutex::new(rounds.into_iter().collect()),
                calls: Mutex::new(Vec::new()),
                unavailable: false,
            }
        }

        fn unavailable() -> Self {
            Self {
                rounds: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
                unavailable: true,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    #[async_trait]
    impl LandmarkSuggester for ScriptedSuggester {
        async fn suggest_landmarks(
            &self,
            request: &SuggestionRequest,
        ) -> Result<Vec<CandidateLandmark>, ProviderError> {
            self.calls.lock().push(request.clone());
            if self.unavailable {
                return Err(ProviderError::Unavailable("connection refused".into()));
            }
            Ok(self.rounds.lock().pop_front().unwrap_or_default())
        }
    }

    fn candidate(name: &str) -> CandidateLandmark {
        CandidateLandmark {
            name: name.to_string(),
            description: format!("{name} is a well-known stop for visitors"),
            location: Some(Location::new(28.54, -81.38)),
        }
    }

    fn attraction(name: &str) -> Attraction {
        Attraction {
            name: name.to_string(),
            description: String::new(),
            location: Location::new(28.5383, -81.3792),
            kind: BlockKind::Landmark,
        }
    }

    fn budget() -> RetryBudget {
        RetryBudget::new(1, std::time::Duration::from_secs(1))
    }

    fn deadline() -> Deadline {
        Deadline::after(std::time::Duration::from_secs(30))
    }

    #[tokio::test]
    async fn test_theme_park_day_skips_expansion() {
        let suggester = ScriptedSuggester::with_rounds(vec![vec![candidate("Lake Eola Park")]]);
        let registry = TripRegistry::new();
        let config = EngineConfig::default();

        let expanded = expand_day(
            1,
            "Orlando",
            "kids trip",
            &[attraction("Universal Studios Florida")],
            3,
            &registry,
            &suggester,
            &budget(),
            &deadline(),
            &config,
        )
        .await;

        assert_eq!(expanded.mode, DayMode::ThemeParkAnchored);
        assert_eq!(expanded.landmarks.len(), 1);
        assert_eq!(expanded.landmarks[0].duration.minutes(), 480);
        assert_eq!(expanded.landmarks[0].start_time.to_string(), "09:00");
        // the generative service is never consulted
        assert_eq!(suggester.call_count(), 0);
        assert!(registry.contains("Universal Studios Florida"));
    }

    #[tokio::test]
    async fn test_expansion_fills_to_target() {
        let suggester = ScriptedSuggester::with_rounds(vec![vec![
            candidate("Lake Eola Park"),
            candidate("Orlando Museum of Art"),
        ]]);
        let registry = TripRegistry::new();
        let config = EngineConfig::default();

        let expanded = expand_day(
            1,
            "Orlando",
            "",
            &[attraction("Orlando Science Center")],
            3,
            &registry,
            &suggester,
            &budget(),
            &deadline(),
            &config,
        )
        .await;

        assert_eq!(expanded.mode, DayMode::Normal);
        assert_eq!(expanded.landmarks.len(), 3);
        assert_eq!(expanded.shortfall, 0);
        let names: Vec<&str> = expanded.landmarks.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Orlando Science Center",
                "Lake Eola Park",
                "Orlando Museum of Art"
            ]
        );
    }

    #[tokio::test]
    async fn test_candidates_rejected_by_registry_are_discarded() {
        let suggester = ScriptedSuggester::with_rounds(vec![
            vec![candidate("Lake Eola Park"), candidate("Wekiwa Springs")],
            vec![],
        ]);
        let registry = TripRegistry::new();
        // another day already claimed this one
        assert!(registry.reserve("Lake Eola Park"));
        let config = EngineConfig::default();

        let expanded = expand_day(
            2,
            "Orlando",
            "",
            &[],
            2,
            &registry,
            &suggester,
            &budget(),
            &deadline(),
            &config,
        )
        .await;

        let names: Vec<&str> = expanded.landmarks.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Wekiwa Springs"]);
        assert_eq!(expanded.shortfall, 1);
    }

    #[tokio::test]
    async fn test_duplicate_input_landmark_is_dropped() {
        let suggester = ScriptedSuggester::with_rounds(vec![vec![]]);
        let registry = TripRegistry::new();
        assert!(registry.reserve("Orlando Science Center"));
        let config = EngineConfig::default();

        let expanded = expand_day(
            2,
            "Orlando",
            "",
            &[attraction("Orlando Science Center")],
            1,
            &registry,
            &suggester,
            &budget(),
            &deadline(),
            &config,
        )
        .await;

        assert!(expanded.landmarks.is_empty());
        assert_eq!(
            expanded.dropped_duplicates,
            vec!["Orlando Science Center".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unavailable_service_degrades_gracefully() {
        let suggester = ScriptedSuggester::unavailable();
        let registry = TripRegistry::new();
        let config = EngineConfig::default();

        let expanded = expand_day(
            1,
            "Orlando",
            "",
            &[attraction("Orlando Science Center")],
            3,
            &registry,
            &suggester,
            &budget(),
            &deadline(),
            &config,
        )
        .await;

        // the seeded landmark survives; the day just runs short
        assert_eq!(expanded.landmarks.len(), 1);
        assert_eq!(expanded.shortfall, 2);
        assert_eq!(suggester.call_count(), 1);
    }

    #[tokio::test]
    async fn test_rounds_are_bounded() {
        // every round yields one fresh candidate but the target is high
        let suggester = ScriptedSuggester::with_rounds(vec![
            vec![candidate("Stop One")],
            vec![candidate("Stop Two")],
            vec![candidate("Stop Three")],
            vec![candidate("Stop Four")],
        ]);
        let registry = TripRegistry::new();
        let config = EngineConfig::default();

        let expanded = expand_day(
            1,
            "Orlando",
            "",
            &[],
            10,
            &registry,
            &suggester,
            &budget(),
            &deadline(),
            &config,
        )
        .await;

        assert_eq!(suggester.call_count(), config.expansion_rounds as usize);
        assert_eq!(expanded.landmarks.len(), 3);
        assert_eq!(expanded.shortfall, 7);
    }

    #[tokio::test]
    async fn test_empty_round_stops_early() {
        let suggester = ScriptedSuggester::with_rounds(vec![vec![], vec![candidate("Later")]]);
        let registry = TripRegistry::new();
        let config = EngineConfig::default();

        let expanded = expand_day(
            1,
            "Orlando",
            "",
            &[],
            3,
            &registry,
            &suggester,
            &budget(),
            &deadline(),
            &config,
        )
        .await;

        assert_eq!(suggester.call_count(), 1);
        assert!(expanded.landmarks.is_empty());
    }

    #[tokio::test]
    async fn test_avoid_names_seeded_from_registry() {
        let suggester = ScriptedSuggester::with_rounds(vec![vec![candidate("Wekiwa Springs")]]);
        let registry = TripRegistry::new();
        registry.reserve("Lake Eola Park");
        let config = EngineConfig::default();

        expand_day(
            2,
            "Orlando",
            "",
            &[],
            1,
            &registry,
            &suggester,
            &budget(),
            &deadline(),
            &config,
        )
        .await;

        let calls = suggester.calls.lock();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].avoid_names.contains(&"lake eola park".to_string()));
    }

    #[tokio::test]
    async fn test_supplementary_takes_first_novel_candidate() {
        let suggester = ScriptedSuggester::with_rounds(vec![vec![
            candidate("Lake Eola Park"),
            candidate("Mead Botanical Garden"),
        ]]);
        let registry = TripRegistry::new();
        registry.reserve("Lake Eola Park");

        let block = request_supplementary(
            1,
            "Orlando",
            "",
            &registry,
            &suggester,
            &budget(),
            &deadline(),
        )
        .await
        .expect("one novel candidate available");

        assert_eq!(block.name, "Mead Botanical Garden");
        assert!(registry.contains("Mead Botanical Garden"));
    }
}
