use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use crate::users::StoreError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Success,
    Error,
}

/// Uniform body returned by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub status: Status,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: Status::Ok,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn success(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            data,
        }
    }
}

impl ApiResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            data: None,
        }
    }
}

/// Request-level failures. Each one maps to a status code and an error envelope.
#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error("Invalid request body")]
    InvalidBody(#[source] serde_json::Error),
    #[error("Invalid request body")]
    BodyTooLarge { limit: usize },
    #[error("User not found")]
    UserNotFound(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Not found")]
    RouteNotFound,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) | ApiError::BodyTooLarge { .. } => StatusCode::BAD_REQUEST,
            ApiError::UserNotFound(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    pub fn into_response(self) -> Result<Response<Body>, Error> {
        match &self {
            ApiError::InvalidBody(e) => tracing::warn!("Rejected request body: {}", e),
            ApiError::BodyTooLarge { limit } => {
                tracing::warn!("Rejected request body larger than {} bytes", limit)
            }
            ApiError::UserNotFound(id) => tracing::debug!("User {} not found", id),
            _ => {}
        }
        json_response(self.status_code(), &ApiResponse::error(self.to_string()))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::UserNotFound(id),
        }
    }
}

pub fn json_response<T: Serialize>(
    status: StatusCode,
    envelope: &ApiResponse<T>,
) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(serde_json::to_string(envelope)?.into())
        .map_err(Box::new)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_is_omitted_when_absent() {
        let envelope: ApiResponse = ApiResponse::success("User deleted successfully", None);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"status": "success", "message": "User deleted successfully"})
        );
    }

    #[test]
    fn error_envelope_shape() {
        assert_eq!(
            serde_json::to_value(ApiResponse::error("User not found")).unwrap(),
            json!({"status": "error", "message": "User not found"})
        );
    }

    #[test]
    fn store_errors_map_to_404() {
        let err = ApiError::from(StoreError::NotFound("abc".to_string()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "User not found");
    }

    #[test]
    fn invalid_body_maps_to_400() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let resp = ApiError::InvalidBody(parse_err).into_response().unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let envelope: ApiResponse = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(envelope.status, Status::Error);
        assert_eq!(envelope.message, "Invalid request body");
        assert!(envelope.data.is_none());
    }
}
