use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArmatureError>;

#[derive(Debug, Error)]
pub enum ArmatureError {
    #[error(
        "type {type_name} is not registered (used as a dependency but never listed as a provider)"
    )]
    NotRegistered { type_name: String },

    #[error("failed to downcast resolved instance of {type_name}")]
    DowncastFailed { type_name: String },

    #[error("circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    #[error("duplicate route registration: {method} {path}")]
    DuplicateRoute { method: String, path: String },

    #[error("parameter {index} of {handler} is bound more than once")]
    ConflictingBinding { handler: String, index: usize },

    #[error("module registration failed: {message}")]
    ModuleRegistrationFailed { message: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for ArmatureError {
    fn into_response(self) -> axum::response::Response {
        // Everything in this enum is a framework fault, not a client one.
        let status = axum::http::StatusCode::INTERNAL_SERVER_ERROR;
        let body = Json(json!({
            "statusCode": status.as_u16(),
            "message": self.to_string(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));
        (status, body).into_response()
    }
}
