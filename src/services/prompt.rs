use crate::models::{CandidateRestaurant, UserPreferences};

/// Review excerpts included per candidate
const MAX_REVIEW_EXCERPTS: usize = 2;
/// Character cap per review excerpt
const REVIEW_EXCERPT_CHARS: usize = 100;

/// Builds the single instruction document sent to the generative model.
///
/// Pure function: preference fields that are unset are omitted entirely
/// rather than rendered as placeholders, and an empty candidate list still
/// yields a syntactically valid document. The RESPONSE FORMAT directive at
/// the end is the contract the reconciler parses against; any change to one
/// must be mirrored in the other.
pub fn build_recommendation_prompt(
    candidates: &[CandidateRestaurant],
    preferences: &UserPreferences,
) -> String {
    format!(
        r#"You are an expert restaurant recommendation AI. Analyze the following restaurants and user preferences to provide personalized recommendations.

USER PREFERENCES:
{preferences}

AVAILABLE RESTAURANTS:
{restaurants}

TASK:
1. Analyze each restaurant against the user's preferences
2. Score each restaurant from 0-100 based on how well it matches the preferences
3. Select the TOP recommendation and up to 3 alternative options
4. Provide clear reasoning for each recommendation

RESPONSE FORMAT (JSON):
{{
  "topRecommendation": {{
    "place_id": "restaurant_place_id",
    "matchScore": 95,
    "reasoning": "Detailed explanation of why this is the best match"
  }},
  "alternativeOptions": [
    {{
      "place_id": "restaurant_place_id",
      "matchScore": 85,
      "reasoning": "Why this is a good alternative"
    }}
  ],
  "summary": "Overall summary of the recommendations and key factors considered"
}}

Respond with a single JSON object in exactly this shape.

Consider these factors in your analysis:
- Budget compatibility (price level vs budget preference)
- Distance and transportation needs
- Cuisine preferences
- Ambiance and atmosphere (inferred from reviews and restaurant type)
- Dining time appropriateness
- Dietary restrictions (if mentioned in reviews or restaurant type)
- Overall rating and review quality
- Current availability (opening hours)
"#,
        preferences = format_preferences(preferences),
        restaurants = format_candidates(candidates),
    )
}

/// One line per populated preference field; unset fields produce nothing
fn format_preferences(preferences: &UserPreferences) -> String {
    let mut lines = Vec::new();

    if let Some(budget) = preferences.budget {
        lines.push(format!("Budget: {}", budget.label()));
    }

    if let Some(has_transport) = preferences.has_transport {
        let transport = if has_transport {
            "Has car/transport"
        } else {
            "Walking/public transport only"
        };
        lines.push(format!("Transportation: {}", transport));
    }

    if !preferences.cuisines.is_empty() {
        lines.push(format!(
            "Preferred cuisines: {}",
            preferences.cuisines.join(", ")
        ));
    }

    if !preferences.ambiance.is_empty() {
        lines.push(format!(
            "Preferred ambiance: {}",
            preferences.ambiance.join(", ")
        ));
    }

    if let Some(dining_time) = preferences.dining_time {
        lines.push(format!("Dining time: {}", dining_time.label()));
    }

    if !preferences.dietary.is_empty() {
        lines.push(format!(
            "Dietary restrictions: {}",
            preferences.dietary.join(", ")
        ));
    }

    if let Some(experience) = preferences.experience {
        lines.push(format!("Experience type: {}", experience.label()));
    }

    if let Some(noise) = preferences.noise {
        lines.push(format!("Noise preference: {}", noise.label()));
    }

    if let Some(seating) = preferences.seating {
        lines.push(format!("Seating preference: {}", seating.label()));
    }

    lines.join("\n")
}

/// Enumerates candidates with a fixed field order
fn format_candidates(candidates: &[CandidateRestaurant]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            let rating = candidate
                .rating
                .map(|r| r.to_string())
                .unwrap_or_else(|| "N/A".to_string());

            let price_level = candidate
                .price_level
                .map(|level| "$".repeat(level as usize))
                .unwrap_or_else(|| "Price not available".to_string());

            let status = if candidate.open_now == Some(true) {
                "Open now"
            } else {
                "Closed"
            };

            let reviews = if candidate.reviews.is_empty() {
                "No reviews available".to_string()
            } else {
                candidate
                    .reviews
                    .iter()
                    .take(MAX_REVIEW_EXCERPTS)
                    .map(|review| {
                        format!("\"{}\" ({}/5)", truncate_excerpt(&review.text), review.rating)
                    })
                    .collect::<Vec<_>>()
                    .join("\n   ")
            };

            format!(
                "{number}. {name}\n   \
                 Place ID: {place_id}\n   \
                 Address: {address}\n   \
                 Rating: {rating}/5\n   \
                 Price Level: {price_level}\n   \
                 Distance: {distance}km\n   \
                 Status: {status}\n   \
                 Types: {types}\n   \
                 Recent Reviews:\n   \
                 {reviews}\n",
                number = index + 1,
                name = candidate.name,
                place_id = candidate.place_id,
                address = candidate.address,
                rating = rating,
                price_level = price_level,
                distance = candidate.distance_km,
                status = status,
                types = candidate.types.join(", "),
                reviews = reviews,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Caps an excerpt at [`REVIEW_EXCERPT_CHARS`] characters (char boundaries)
fn truncate_excerpt(text: &str) -> String {
    if text.chars().count() <= REVIEW_EXCERPT_CHARS {
        text.to_string()
    } else {
        let capped: String = text.chars().take(REVIEW_EXCERPT_CHARS).collect();
        format!("{}...", capped)
    }
}
