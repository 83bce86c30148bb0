use armature::axum::http::{HeaderName, HeaderValue};
use armature::prelude::*;

#[controller(path = "/health")]
pub struct HealthController;

#[routes(HealthController)]
impl HealthController {
    #[get("/")]
    pub async fn check(
        &self,
        #[request] info: RequestInfo,
        #[response] head: ResponseHead,
    ) -> Json<serde_json::Value> {
        head.insert_header(
            HeaderName::from_static("x-armature"),
            HeaderValue::from_static("demo"),
        );
        Json(serde_json::json!({
            "status": "ok",
            "method": info.method.as_str(),
        }))
    }
}
