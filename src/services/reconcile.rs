use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{CandidateRestaurant, RecommendationResult, ScoredPick},
};

/// Payload shape the prompt's RESPONSE FORMAT directive asks the model for
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReply {
    top_recommendation: RawPick,
    #[serde(default)]
    alternative_options: Vec<RawPick>,
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct RawPick {
    place_id: String,
    #[serde(rename = "matchScore")]
    match_score: u8,
    reasoning: String,
}

/// Turns the model's free-text reply into a typed result, resolving every
/// referenced identifier against the candidate batch that produced the
/// prompt.
///
/// The model is trusted only for scores and text; restaurant data always
/// comes from the batch, so a result can never contain a fabricated
/// restaurant. An unresolved top recommendation is fatal
/// (`UnknownRestaurantReference`); unresolved alternatives are dropped
/// individually with the model's ordering preserved for the survivors.
pub fn reconcile_reply(
    reply: &str,
    candidates: &[CandidateRestaurant],
) -> AppResult<RecommendationResult> {
    let json = extract_json_object(reply).ok_or_else(|| {
        tracing::error!(reply = %reply, "No JSON object found in model reply");
        AppError::MalformedResponse("no JSON object found in model reply".to_string())
    })?;

    let raw: RawReply = serde_json::from_str(json).map_err(|e| {
        tracing::error!(error = %e, reply = %reply, "Failed to parse model reply");
        AppError::MalformedResponse(format!("invalid recommendation payload: {}", e))
    })?;

    let top_restaurant = find_candidate(candidates, &raw.top_recommendation.place_id)
        .ok_or_else(|| {
            AppError::UnknownRestaurantReference(raw.top_recommendation.place_id.clone())
        })?;

    let top_pick = ScoredPick {
        restaurant: top_restaurant.clone(),
        match_score: raw.top_recommendation.match_score,
        reasoning: raw.top_recommendation.reasoning,
    };

    let alternatives = raw
        .alternative_options
        .into_iter()
        .filter_map(|alt| match find_candidate(candidates, &alt.place_id) {
            Some(restaurant) => Some(ScoredPick {
                restaurant: restaurant.clone(),
                match_score: alt.match_score,
                reasoning: alt.reasoning,
            }),
            None => {
                tracing::warn!(place_id = %alt.place_id, "Dropping alternative with unknown identifier");
                None
            }
        })
        .collect();

    Ok(RecommendationResult {
        top_pick,
        alternatives,
        summary: raw.summary,
    })
}

fn find_candidate<'a>(
    candidates: &'a [CandidateRestaurant],
    place_id: &str,
) -> Option<&'a CandidateRestaurant> {
    candidates.iter().find(|c| c.place_id == place_id)
}

/// First balanced top-level JSON object embedded in `text`, if any.
///
/// The model may wrap the payload in commentary, so the scan starts at the
/// first `{` and tracks brace depth. It is string- and escape-aware so
/// braces inside string values cannot unbalance it.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in text.as_bytes()[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}
