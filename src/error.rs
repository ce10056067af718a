use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
///
/// Every pipeline failure is terminal for the current discovery request; none
/// are retried automatically. Each variant maps to a single user-presentable
/// message via [`AppError::user_message`].
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Device location unavailable")]
    LocationUnavailable,

    #[error("No candidate restaurants found")]
    NoCandidatesFound,

    #[error("Places directory request failed: {0}")]
    UpstreamFetchFailed(String),

    #[error("Generative model request failed: {0}")]
    AiInvocationFailed(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Model referenced unknown restaurant: {0}")]
    UnknownRestaurantReference(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message safe to surface to the end user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            AppError::LocationUnavailable => {
                "Unable to get your location. Please enable location services.".to_string()
            }
            AppError::NoCandidatesFound => "No restaurants found in your area.".to_string(),
            AppError::UpstreamFetchFailed(_) | AppError::HttpClient(_) => {
                "Unable to find nearby restaurants right now. Please try again.".to_string()
            }
            AppError::AiInvocationFailed(_)
            | AppError::MalformedResponse(_)
            | AppError::UnknownRestaurantReference(_) => {
                "Unable to generate recommendations. Please try again.".to_string()
            }
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Store(_) | AppError::Internal(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::LocationUnavailable => (StatusCode::BAD_REQUEST, self.user_message()),
            AppError::NoCandidatesFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Store(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::UpstreamFetchFailed(_)
            | AppError::AiInvocationFailed(_)
            | AppError::MalformedResponse(_)
            | AppError::UnknownRestaurantReference(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_location() {
        let msg = AppError::LocationUnavailable.user_message();
        assert_eq!(
            msg,
            "Unable to get your location. Please enable location services."
        );
    }

    #[test]
    fn test_user_message_no_candidates() {
        let msg = AppError::NoCandidatesFound.user_message();
        assert_eq!(msg, "No restaurants found in your area.");
    }

    #[test]
    fn test_user_message_model_failures_share_wording() {
        let a = AppError::AiInvocationFailed("boom".to_string()).user_message();
        let b = AppError::MalformedResponse("no json".to_string()).user_message();
        assert_eq!(a, b);
    }
}
