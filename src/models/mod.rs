use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod preferences;

pub use preferences::{Budget, DiningTime, Experience, NoiseLevel, SeatingArea, UserPreferences};

/// A device or restaurant position in decimal degrees
///
/// Both components are finite by contract; captured once and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Whether both components are finite floating-point degrees
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// A restaurant retrieved from the places directory for the current discovery
/// request, enriched with the distance from the device coordinate.
///
/// `place_id` is the join key used throughout the pipeline and is unique
/// within a single candidate batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRestaurant {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
    pub price_level: Option<u8>,
    pub types: Vec<String>,
    pub open_now: Option<bool>,
    pub reviews: Vec<PlaceReview>,
    pub photos: Vec<PlacePhoto>,
    pub website: Option<String>,
    pub location: Coordinate,
    /// Kilometers from the device coordinate, rounded to 2 decimals
    pub distance_km: f64,
}

impl CandidateRestaurant {
    /// Builds a candidate from a directory details record plus the computed
    /// distance from the device coordinate.
    pub fn from_details(details: PlaceDetails, distance_km: f64) -> Self {
        Self {
            place_id: details.place_id,
            name: details.name,
            address: details.formatted_address,
            rating: details.rating,
            price_level: details.price_level,
            types: details.types,
            open_now: details.opening_hours.and_then(|h| h.open_now),
            reviews: details.reviews.unwrap_or_default(),
            photos: details.photos.unwrap_or_default(),
            website: details.website,
            location: Coordinate {
                latitude: details.geometry.location.lat,
                longitude: details.geometry.location.lng,
            },
            distance_km,
        }
    }
}

/// A restaurant with the model's fit assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredPick {
    pub restaurant: CandidateRestaurant,
    /// Integer 0-100 expressing preference fit, taken from the model as-is
    pub match_score: u8,
    pub reasoning: String,
}

/// The reconciled output of one discovery run
///
/// Every restaurant referenced here resolves to a member of the candidate
/// batch that produced it; the pipeline never fabricates a restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub top_pick: ScoredPick,
    pub alternatives: Vec<ScoredPick>,
    pub summary: String,
}

/// A restaurant copied into the favorites or history store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRestaurant {
    pub restaurant: CandidateRestaurant,
    pub saved_at: DateTime<Utc>,
}

// ============================================================================
// Places Directory API Types
// ============================================================================

/// Nearby-search response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct PlacesSearchResponse {
    #[serde(default)]
    pub results: Vec<PlaceSummary>,
    pub status: String,
}

/// One nearby-search hit; only the identifier feeds the details fetch
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceSummary {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub vicinity: Option<String>,
}

/// Details response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetailsResponse {
    #[serde(default)]
    pub result: Option<PlaceDetails>,
    pub status: String,
}

/// Full directory record for one place
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: String,
    pub formatted_address: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub reviews: Option<Vec<PlaceReview>>,
    #[serde(default)]
    pub photos: Option<Vec<PlacePhoto>>,
    #[serde(default)]
    pub website: Option<String>,
    pub geometry: PlaceGeometry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceReview {
    pub author_name: String,
    pub rating: f64,
    pub text: String,
    pub time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacePhoto {
    pub photo_reference: String,
    pub height: u32,
    pub width: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceGeometry {
    pub location: PlaceLatLng,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceLatLng {
    pub lat: f64,
    pub lng: f64,
}
