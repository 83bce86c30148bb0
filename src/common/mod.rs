mod response;
mod status_code;

pub use response::{ApiError, ApiResponse};
pub use status_code::StatusCode;
