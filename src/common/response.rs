use axum::{
    Json,
    http::StatusCode as HttpStatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard API response envelope.
///
/// # Example
/// ```ignore
/// async fn get_note(&self, #[param] id: Uuid) -> ApiResponse<Note> {
///     match self.service.find(id).await {
///         Some(note) => ApiResponse::success(note),
///         None => ApiResponse::error(StatusCode::NotFound, "note not found"),
///     }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    pub success: bool,

    #[serde(skip)]
    pub http_status: HttpStatusCode,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// A successful response with data, HTTP 200.
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            success: true,
            http_status: HttpStatusCode::OK,
        }
    }

    /// A successful response with data, HTTP 201.
    pub fn created(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            success: true,
            http_status: HttpStatusCode::CREATED,
        }
    }

    /// An error response. The error `code` is the `StatusCode` variant name.
    pub fn error(status: crate::common::StatusCode, message: impl Into<String>) -> ApiResponse<T> {
        ApiResponse {
            data: None,
            error: Some(ApiError {
                code: status.to_string(),
                message: message.into(),
            }),
            success: false,
            http_status: status.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.http_status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_carries_the_variant_name_as_code() {
        let response: ApiResponse<()> =
            ApiResponse::error(crate::common::StatusCode::NotFound, "missing");
        let error = response.error.unwrap();
        assert_eq!(error.code, "NotFound");
        assert_eq!(error.message, "missing");
        assert_eq!(response.http_status, HttpStatusCode::NOT_FOUND);
    }

    #[test]
    fn created_sets_http_201() {
        let response = ApiResponse::created("id-1");
        assert!(response.success);
        assert_eq!(response.http_status, HttpStatusCode::CREATED);
    }
}
