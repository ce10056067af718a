/// Places directory provider
///
/// Narrow seam over the places API: identifier discovery near a coordinate,
/// full-record lookup per identifier, and photo URL assembly. The HTTP client
/// lives behind the [`PlacesDirectory`] trait so the aggregator and the
/// orchestrator can run against a stubbed directory.
use async_trait::async_trait;
use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{Coordinate, PlaceDetails, PlaceDetailsResponse, PlaceSummary, PlacesSearchResponse},
};

/// Detail fields requested per identifier
const DETAILS_FIELDS: &str =
    "place_id,name,formatted_address,rating,price_level,types,opening_hours,reviews,photos,website,geometry";

/// Trait for the places directory
///
/// Both operations authenticate with an API key parameter. Upstream errors
/// surface as non-OK HTTP status or a non-"OK" status field in the payload.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlacesDirectory: Send + Sync {
    /// Resolve restaurants near `center` within `radius_m` meters.
    ///
    /// An empty result list is a valid outcome, not an error.
    async fn nearby_search(
        &self,
        center: Coordinate,
        radius_m: u32,
    ) -> AppResult<Vec<PlaceSummary>>;

    /// Fetch the full directory record for one identifier.
    async fn place_details(&self, place_id: &str) -> AppResult<PlaceDetails>;

    /// URL of the photo endpoint for a stored photo reference.
    ///
    /// Pure string assembly; the directory never fetches the image itself.
    fn photo_url(&self, photo_reference: &str, max_width: u32) -> String;
}

/// Google Places client (legacy REST endpoints)
#[derive(Clone)]
pub struct GooglePlacesClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl GooglePlacesClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }
}

#[async_trait]
impl PlacesDirectory for GooglePlacesClient {
    async fn nearby_search(
        &self,
        center: Coordinate,
        radius_m: u32,
    ) -> AppResult<Vec<PlaceSummary>> {
        let url = format!("{}/nearbysearch/json", self.api_url);
        let location = format!("{},{}", center.latitude, center.longitude);
        let radius = radius_m.to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("type", "restaurant"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamFetchFailed(format!(
                "nearby search returned status {}: {}",
                status, body
            )));
        }

        let search: PlacesSearchResponse = response.json().await?;

        match search.status.as_str() {
            "OK" => {
                tracing::info!(results = search.results.len(), "Nearby search completed");
                Ok(search.results)
            }
            // Nothing nearby is a valid outcome, not a directory failure
            "ZERO_RESULTS" => Ok(Vec::new()),
            other => Err(AppError::UpstreamFetchFailed(format!(
                "nearby search payload status {}",
                other
            ))),
        }
    }

    async fn place_details(&self, place_id: &str) -> AppResult<PlaceDetails> {
        let url = format!("{}/details/json", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("place_id", place_id),
                ("fields", DETAILS_FIELDS),
                ("language", "en"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamFetchFailed(format!(
                "details for {} returned status {}: {}",
                place_id, status, body
            )));
        }

        let details: PlaceDetailsResponse = response.json().await?;

        if details.status != "OK" {
            return Err(AppError::UpstreamFetchFailed(format!(
                "details payload status {} for {}",
                details.status, place_id
            )));
        }

        details.result.ok_or_else(|| {
            AppError::UpstreamFetchFailed(format!("details payload missing result for {}", place_id))
        })
    }

    fn photo_url(&self, photo_reference: &str, max_width: u32) -> String {
        format!(
            "{}/photo?maxwidth={}&photo_reference={}&key={}",
            self.api_url, max_width, photo_reference, self.api_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_client() -> GooglePlacesClient {
        GooglePlacesClient::new(
            "test_key".to_string(),
            "http://places.test.local".to_string(),
        )
    }

    #[test]
    fn test_photo_url_contains_reference_and_key() {
        let client = create_test_client();
        let url = client.photo_url("photo_ref_abc", 400);

        assert_eq!(
            url,
            "http://places.test.local/photo?maxwidth=400&photo_reference=photo_ref_abc&key=test_key"
        );
    }

    #[test]
    fn test_details_fields_cover_candidate_shape() {
        for field in [
            "place_id",
            "name",
            "formatted_address",
            "rating",
            "price_level",
            "opening_hours",
            "reviews",
            "geometry",
        ] {
            assert!(DETAILS_FIELDS.contains(field), "missing field {}", field);
        }
    }
}
