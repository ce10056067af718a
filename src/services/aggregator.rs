use std::{collections::HashSet, sync::Arc, time::Duration};

use crate::{
    error::AppResult,
    geo::haversine_distance_km,
    models::{CandidateRestaurant, Coordinate},
    services::places::PlacesDirectory,
};

/// Assembles the candidate batch for one discovery request
///
/// Resolves nearby identifiers, then enriches each with a full directory
/// record and the distance from the device coordinate. Detail fetches run
/// sequentially with a fixed delay between successive requests; this is a
/// backpressure policy for the upstream rate limit, so the concurrency of the
/// detail stage is exactly 1.
pub struct CandidateAggregator {
    directory: Arc<dyn PlacesDirectory>,
    radius_m: u32,
    detail_fetch_delay: Duration,
}

impl CandidateAggregator {
    pub fn new(
        directory: Arc<dyn PlacesDirectory>,
        radius_m: u32,
        detail_fetch_delay: Duration,
    ) -> Self {
        Self {
            directory,
            radius_m,
            detail_fetch_delay,
        }
    }

    /// Collects the enriched candidate batch around `origin`.
    ///
    /// Only an outright directory-lookup failure is an error. An empty
    /// identifier list is a valid empty batch, and a per-item detail failure
    /// skips that candidate and continues with the remainder.
    pub async fn collect(&self, origin: Coordinate) -> AppResult<Vec<CandidateRestaurant>> {
        let summaries = self.directory.nearby_search(origin, self.radius_m).await?;

        let mut seen = HashSet::new();
        let mut candidates = Vec::with_capacity(summaries.len());

        for (index, summary) in summaries.iter().enumerate() {
            // Identifiers must be unique within one batch
            if !seen.insert(summary.place_id.clone()) {
                tracing::debug!(place_id = %summary.place_id, "Skipping duplicate identifier");
                continue;
            }

            if index > 0 {
                tokio::time::sleep(self.detail_fetch_delay).await;
            }

            match self.directory.place_details(&summary.place_id).await {
                Ok(details) => {
                    let distance_km = haversine_distance_km(
                        origin,
                        Coordinate {
                            latitude: details.geometry.location.lat,
                            longitude: details.geometry.location.lng,
                        },
                    );
                    candidates.push(CandidateRestaurant::from_details(details, distance_km));
                }
                Err(e) => {
                    tracing::warn!(
                        place_id = %summary.place_id,
                        error = %e,
                        "Skipping candidate after detail fetch failure"
                    );
                }
            }
        }

        tracing::info!(
            enriched = candidates.len(),
            resolved = summaries.len(),
            "Candidate batch assembled"
        );

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{
        PlaceDetails, PlaceGeometry, PlaceLatLng, PlaceSummary,
    };
    use crate::services::places::MockPlacesDirectory;

    fn summary(place_id: &str) -> PlaceSummary {
        PlaceSummary {
            place_id: place_id.to_string(),
            name: format!("Restaurant {}", place_id),
            rating: Some(4.0),
            price_level: Some(2),
            types: vec!["restaurant".to_string()],
            vicinity: None,
        }
    }

    fn details(place_id: &str, lat: f64, lng: f64) -> PlaceDetails {
        PlaceDetails {
            place_id: place_id.to_string(),
            name: format!("Restaurant {}", place_id),
            formatted_address: "1 Test St".to_string(),
            rating: Some(4.0),
            price_level: Some(2),
            types: vec!["restaurant".to_string()],
            opening_hours: None,
            reviews: None,
            photos: None,
            website: None,
            geometry: PlaceGeometry {
                location: PlaceLatLng { lat, lng },
            },
        }
    }

    fn origin() -> Coordinate {
        Coordinate {
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    fn aggregator(directory: MockPlacesDirectory) -> CandidateAggregator {
        CandidateAggregator::new(Arc::new(directory), 5000, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_directory_failure_is_fatal() {
        let mut directory = MockPlacesDirectory::new();
        directory
            .expect_nearby_search()
            .returning(|_, _| Err(AppError::UpstreamFetchFailed("directory down".to_string())));

        let result = aggregator(directory).collect(origin()).await;
        assert!(matches!(result, Err(AppError::UpstreamFetchFailed(_))));
    }

    #[tokio::test]
    async fn test_zero_identifiers_is_valid_empty_batch() {
        let mut directory = MockPlacesDirectory::new();
        directory.expect_nearby_search().returning(|_, _| Ok(vec![]));
        directory.expect_place_details().never();

        let batch = aggregator(directory).collect(origin()).await.unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_detail_fetch_failure_skips_that_candidate() {
        let mut directory = MockPlacesDirectory::new();
        directory
            .expect_nearby_search()
            .returning(|_, _| Ok(vec![summary("a"), summary("b"), summary("c")]));
        directory
            .expect_place_details()
            .returning(|place_id| match place_id {
                "b" => Err(AppError::UpstreamFetchFailed("flaky".to_string())),
                other => Ok(details(other, 0.0, 0.01)),
            });

        let batch = aggregator(directory).collect(origin()).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].place_id, "a");
        assert_eq!(batch[1].place_id, "c");
    }

    #[tokio::test]
    async fn test_distance_is_attached_and_rounded() {
        let mut directory = MockPlacesDirectory::new();
        directory
            .expect_nearby_search()
            .returning(|_, _| Ok(vec![summary("a")]));
        directory
            .expect_place_details()
            .returning(|place_id| Ok(details(place_id, 0.0, 1.0)));

        let batch = aggregator(directory).collect(origin()).await.unwrap();
        assert_eq!(batch.len(), 1);
        // One degree of longitude on the equator
        assert_eq!(batch[0].distance_km, 111.19);
    }

    #[tokio::test]
    async fn test_duplicate_identifiers_fetched_once() {
        let mut directory = MockPlacesDirectory::new();
        directory
            .expect_nearby_search()
            .returning(|_, _| Ok(vec![summary("a"), summary("a")]));
        directory
            .expect_place_details()
            .times(1)
            .returning(|place_id| Ok(details(place_id, 0.0, 0.01)));

        let batch = aggregator(directory).collect(origin()).await.unwrap();
        assert_eq!(batch.len(), 1);
    }
}
