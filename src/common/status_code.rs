use axum::http::StatusCode as HttpStatusCode;
use strum_macros::Display;

/// Response status vocabulary for [`ApiResponse`](crate::common::ApiResponse).
///
/// The variant name doubles as the machine-readable error `code` (via the
/// strum Display impl), so `NotFound` serializes as `"NotFound"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StatusCode {
    Ok,
    Created,
    NoContent,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    UnprocessableEntity,
    InternalServerError,
}

impl From<StatusCode> for HttpStatusCode {
    fn from(status: StatusCode) -> Self {
        match status {
            StatusCode::Ok => HttpStatusCode::OK,
            StatusCode::Created => HttpStatusCode::CREATED,
            StatusCode::NoContent => HttpStatusCode::NO_CONTENT,
            StatusCode::BadRequest => HttpStatusCode::BAD_REQUEST,
            StatusCode::Unauthorized => HttpStatusCode::UNAUTHORIZED,
            StatusCode::Forbidden => HttpStatusCode::FORBIDDEN,
            StatusCode::NotFound => HttpStatusCode::NOT_FOUND,
            StatusCode::Conflict => HttpStatusCode::CONFLICT,
            StatusCode::UnprocessableEntity => HttpStatusCode::UNPROCESSABLE_ENTITY,
            StatusCode::InternalServerError => HttpStatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_name_is_the_error_code() {
        assert_eq!(StatusCode::NotFound.to_string(), "NotFound");
    }

    #[test]
    fn maps_onto_http_status() {
        assert_eq!(HttpStatusCode::from(StatusCode::Conflict), HttpStatusCode::CONFLICT);
    }
}
