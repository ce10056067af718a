use std::{sync::Arc, time::Duration};

use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{Coordinate, RecommendationResult, UserPreferences},
    services::{
        aggregator::CandidateAggregator, gemini::GenerativeModel, places::PlacesDirectory,
        prompt::build_recommendation_prompt, reconcile::reconcile_reply,
    },
};

/// Pipeline stage a discovery can fail in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStage {
    Locate,
    Aggregate,
    Consult,
    Parse,
}

impl DiscoveryStage {
    pub fn label(&self) -> &'static str {
        match self {
            DiscoveryStage::Locate => "locating",
            DiscoveryStage::Aggregate => "aggregating",
            DiscoveryStage::Consult => "consulting",
            DiscoveryStage::Parse => "parsing",
        }
    }
}

/// Discovery state machine
///
/// Transitions are strictly sequential: idle → locating → aggregating →
/// consulting → parsing → done, with `Error` reachable from every non-idle
/// state. `Done` carries the result, `Error` a user-presentable message.
/// Returning to `Idle` is always available and discards in-flight state.
#[derive(Debug, Clone)]
pub enum DiscoveryState {
    Idle,
    Locating,
    Aggregating,
    Consulting,
    Parsing,
    Done(RecommendationResult),
    Error {
        stage: DiscoveryStage,
        message: String,
    },
}

impl DiscoveryState {
    pub fn label(&self) -> &'static str {
        match self {
            DiscoveryState::Idle => "idle",
            DiscoveryState::Locating => "locating",
            DiscoveryState::Aggregating => "aggregating",
            DiscoveryState::Consulting => "consulting",
            DiscoveryState::Parsing => "parsing",
            DiscoveryState::Done(_) => "done",
            DiscoveryState::Error { .. } => "error",
        }
    }
}

/// Sequences one discovery: locate → aggregate → consult → parse
///
/// One logical task per request; there are no retries and no mid-pipeline
/// cancellation. The state holder is the engine's only shared mutable state.
pub struct RecommendationEngine {
    aggregator: CandidateAggregator,
    model: Arc<dyn GenerativeModel>,
    state: RwLock<DiscoveryState>,
}

impl RecommendationEngine {
    pub fn new(
        directory: Arc<dyn PlacesDirectory>,
        model: Arc<dyn GenerativeModel>,
        radius_m: u32,
        detail_fetch_delay: Duration,
    ) -> Self {
        Self {
            aggregator: CandidateAggregator::new(directory, radius_m, detail_fetch_delay),
            model,
            state: RwLock::new(DiscoveryState::Idle),
        }
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> DiscoveryState {
        self.state.read().await.clone()
    }

    /// Returns to `Idle`, discarding any in-flight result
    pub async fn reset(&self) {
        *self.state.write().await = DiscoveryState::Idle;
    }

    async fn enter(&self, state: DiscoveryState) {
        tracing::debug!(state = state.label(), "Discovery state transition");
        *self.state.write().await = state;
    }

    async fn fail(&self, stage: DiscoveryStage, error: AppError) -> AppError {
        tracing::warn!(stage = stage.label(), error = %error, "Discovery failed");
        self.enter(DiscoveryState::Error {
            stage,
            message: error.user_message(),
        })
        .await;
        error
    }

    /// Runs one full discovery against the supplied device coordinate and
    /// preferences.
    pub async fn discover(
        &self,
        location: Option<Coordinate>,
        preferences: &UserPreferences,
    ) -> AppResult<RecommendationResult> {
        self.enter(DiscoveryState::Locating).await;
        let origin = match location {
            Some(coordinate) if coordinate.is_finite() => coordinate,
            _ => {
                return Err(self
                    .fail(DiscoveryStage::Locate, AppError::LocationUnavailable)
                    .await)
            }
        };

        self.enter(DiscoveryState::Aggregating).await;
        let candidates = match self.aggregator.collect(origin).await {
            Ok(candidates) => candidates,
            Err(e) => return Err(self.fail(DiscoveryStage::Aggregate, e).await),
        };
        if candidates.is_empty() {
            // Short-circuit: the prompt builder is never reached without candidates
            return Err(self
                .fail(DiscoveryStage::Aggregate, AppError::NoCandidatesFound)
                .await);
        }

        self.enter(DiscoveryState::Consulting).await;
        let prompt = build_recommendation_prompt(&candidates, preferences);
        let reply = match self.model.complete(&prompt).await {
            Ok(reply) => reply,
            Err(e) => return Err(self.fail(DiscoveryStage::Consult, e).await),
        };

        self.enter(DiscoveryState::Parsing).await;
        let result = match reconcile_reply(&reply, &candidates) {
            Ok(result) => result,
            Err(e) => return Err(self.fail(DiscoveryStage::Parse, e).await),
        };

        self.enter(DiscoveryState::Done(result.clone())).await;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlaceDetails, PlaceGeometry, PlaceLatLng, PlaceSummary};
    use crate::services::gemini::MockGenerativeModel;
    use crate::services::places::MockPlacesDirectory;

    fn summary(place_id: &str) -> PlaceSummary {
        PlaceSummary {
            place_id: place_id.to_string(),
            name: format!("Restaurant {}", place_id),
            rating: None,
            price_level: None,
            types: vec![],
            vicinity: None,
        }
    }

    fn details(place_id: &str) -> PlaceDetails {
        PlaceDetails {
            place_id: place_id.to_string(),
            name: format!("Restaurant {}", place_id),
            formatted_address: "1 Test St".to_string(),
            rating: Some(4.0),
            price_level: Some(1),
            types: vec!["restaurant".to_string()],
            opening_hours: None,
            reviews: None,
            photos: None,
            website: None,
            geometry: PlaceGeometry {
                location: PlaceLatLng { lat: 0.0, lng: 0.01 },
            },
        }
    }

    fn location() -> Option<Coordinate> {
        Some(Coordinate {
            latitude: 0.0,
            longitude: 0.0,
        })
    }

    fn engine(
        directory: MockPlacesDirectory,
        model: MockGenerativeModel,
    ) -> RecommendationEngine {
        RecommendationEngine::new(Arc::new(directory), Arc::new(model), 5000, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_missing_location_fails_before_any_fetch() {
        let mut directory = MockPlacesDirectory::new();
        directory.expect_nearby_search().never();
        let mut model = MockGenerativeModel::new();
        model.expect_complete().never();

        let engine = engine(directory, model);
        let result = engine.discover(None, &UserPreferences::default()).await;

        assert!(matches!(result, Err(AppError::LocationUnavailable)));
        match engine.state().await {
            DiscoveryState::Error { stage, message } => {
                assert_eq!(stage, DiscoveryStage::Locate);
                assert!(message.contains("location"));
            }
            other => panic!("expected error state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_finite_location_is_unavailable() {
        let mut directory = MockPlacesDirectory::new();
        directory.expect_nearby_search().never();
        let mut model = MockGenerativeModel::new();
        model.expect_complete().never();

        let engine = engine(directory, model);
        let bad = Some(Coordinate {
            latitude: f64::NAN,
            longitude: 0.0,
        });
        let result = engine.discover(bad, &UserPreferences::default()).await;

        assert!(matches!(result, Err(AppError::LocationUnavailable)));
    }

    #[tokio::test]
    async fn test_empty_batch_short_circuits_before_model() {
        let mut directory = MockPlacesDirectory::new();
        directory.expect_nearby_search().returning(|_, _| Ok(vec![]));
        let mut model = MockGenerativeModel::new();
        model.expect_complete().never();

        let engine = engine(directory, model);
        let result = engine.discover(location(), &UserPreferences::default()).await;

        assert!(matches!(result, Err(AppError::NoCandidatesFound)));
        match engine.state().await {
            DiscoveryState::Error { stage, message } => {
                assert_eq!(stage, DiscoveryStage::Aggregate);
                assert_eq!(message, "No restaurants found in your area.");
            }
            other => panic!("expected error state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_happy_path_reaches_done() {
        let mut directory = MockPlacesDirectory::new();
        directory
            .expect_nearby_search()
            .returning(|_, _| Ok(vec![summary("X")]));
        directory
            .expect_place_details()
            .returning(|place_id| Ok(details(place_id)));

        let mut model = MockGenerativeModel::new();
        model.expect_complete().returning(|_| {
            Ok(r#"{"topRecommendation":{"place_id":"X","matchScore":90,"reasoning":"great fit"},"alternativeOptions":[],"summary":"ok"}"#.to_string())
        });

        let engine = engine(directory, model);
        let result = engine
            .discover(location(), &UserPreferences::default())
            .await
            .unwrap();

        assert_eq!(result.top_pick.restaurant.place_id, "X");
        assert_eq!(result.top_pick.match_score, 90);
        assert!(result.alternatives.is_empty());
        assert!(matches!(engine.state().await, DiscoveryState::Done(_)));
    }

    #[tokio::test]
    async fn test_model_prompt_contains_candidates() {
        let mut directory = MockPlacesDirectory::new();
        directory
            .expect_nearby_search()
            .returning(|_, _| Ok(vec![summary("X")]));
        directory
            .expect_place_details()
            .returning(|place_id| Ok(details(place_id)));

        let mut model = MockGenerativeModel::new();
        model
            .expect_complete()
            .withf(|prompt| prompt.contains("Place ID: X") && prompt.contains("topRecommendation"))
            .returning(|_| {
                Ok(r#"{"topRecommendation":{"place_id":"X","matchScore":80,"reasoning":"r"},"alternativeOptions":[],"summary":"s"}"#.to_string())
            });

        let engine = engine(directory, model);
        engine
            .discover(location(), &UserPreferences::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_malformed_reply_sets_parse_error() {
        let mut directory = MockPlacesDirectory::new();
        directory
            .expect_nearby_search()
            .returning(|_, _| Ok(vec![summary("X")]));
        directory
            .expect_place_details()
            .returning(|place_id| Ok(details(place_id)));

        let mut model = MockGenerativeModel::new();
        model
            .expect_complete()
            .returning(|_| Ok("I could not decide.".to_string()));

        let engine = engine(directory, model);
        let result = engine.discover(location(), &UserPreferences::default()).await;

        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
        match engine.state().await {
            DiscoveryState::Error { stage, .. } => assert_eq!(stage, DiscoveryStage::Parse),
            other => panic!("expected error state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_model_failure_sets_consult_error() {
        let mut directory = MockPlacesDirectory::new();
        directory
            .expect_nearby_search()
            .returning(|_, _| Ok(vec![summary("X")]));
        directory
            .expect_place_details()
            .returning(|place_id| Ok(details(place_id)));

        let mut model = MockGenerativeModel::new();
        model
            .expect_complete()
            .returning(|_| Err(AppError::AiInvocationFailed("overloaded".to_string())));

        let engine = engine(directory, model);
        let result = engine.discover(location(), &UserPreferences::default()).await;

        assert!(matches!(result, Err(AppError::AiInvocationFailed(_))));
        match engine.state().await {
            DiscoveryState::Error { stage, .. } => assert_eq!(stage, DiscoveryStage::Consult),
            other => panic!("expected error state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let mut directory = MockPlacesDirectory::new();
        directory.expect_nearby_search().returning(|_, _| Ok(vec![]));
        let model = MockGenerativeModel::new();

        let engine = engine(directory, model);
        let _ = engine.discover(location(), &UserPreferences::default()).await;
        assert_eq!(engine.state().await.label(), "error");

        engine.reset().await;
        assert!(matches!(engine.state().await, DiscoveryState::Idle));
    }
}
