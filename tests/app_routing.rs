use armature::axum::body::Body;
use armature::axum::http::{HeaderMap, HeaderName, HeaderValue, Request, StatusCode};
use armature::prelude::*;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

#[derive(Deserialize)]
struct EchoRequest {
    message: String,
}

#[derive(Injectable)]
struct EchoService {}

impl EchoService {
    async fn shout(&self, message: String) -> String {
        message.to_uppercase()
    }
}

#[controller(path = "/echo")]
struct EchoController {
    service: Arc<EchoService>,
}

#[routes(EchoController)]
impl EchoController {
    #[post("/")]
    async fn create(&self, #[body] request: EchoRequest) -> Json<Value> {
        Json(json!({ "shouted": self.service.shout(request.message).await }))
    }

    #[get("/{id}")]
    async fn find(&self, #[param] id: u64) -> Json<Value> {
        Json(json!({ "id": id }))
    }

    #[get("/")]
    async fn search(
        &self,
        #[query] query: HashMap<String, String>,
        #[headers] headers: HeaderMap,
    ) -> Json<Value> {
        Json(json!({
            "q": query.get("q"),
            "trace": headers.get("x-trace").and_then(|v| v.to_str().ok()),
        }))
    }
}

#[controller(path = "/status")]
struct StatusController;

#[routes(StatusController)]
impl StatusController {
    #[get("/")]
    async fn promote(&self, #[response] head: ResponseHead) -> &'static str {
        head.set_status(StatusCode::ACCEPTED);
        head.insert_header(
            HeaderName::from_static("x-armature"),
            HeaderValue::from_static("on"),
        );
        "accepted"
    }
}

#[module(providers = [EchoService])]
struct EchoModule;

fn app() -> App {
    AppBuilder::new()
        .module::<EchoModule>()
        .controller::<EchoController>()
        .controller::<StatusController>()
        .build()
        .unwrap()
}

async fn body_json(response: armature::axum::response::Response) -> Value {
    let bytes = armature::axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn bound_body_reaches_the_handler() {
    let response = app()
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/echo")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"message":"hi"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "shouted": "HI" }));
}

#[tokio::test]
async fn bound_path_param_is_parsed_by_name() {
    let response = app()
        .router()
        .oneshot(
            Request::builder()
                .uri("/api/echo/42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "id": 42 }));
}

#[tokio::test]
async fn unparsable_path_param_is_a_client_error() {
    let response = app()
        .router()
        .oneshot(
            Request::builder()
                .uri("/api/echo/not-a-number")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bound_query_and_headers_reach_the_handler() {
    let response = app()
        .router()
        .oneshot(
            Request::builder()
                .uri("/api/echo?q=ping")
                .header("x-trace", "trace-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "q": "ping", "trace": "trace-1" })
    );
}

#[tokio::test]
async fn malformed_json_body_is_a_client_error() {
    let response = app()
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/echo")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn response_head_mutations_appear_on_the_wire() {
    let response = app()
        .router()
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(response.headers().get("x-armature").unwrap(), "on");
}

#[tokio::test]
async fn unknown_routes_fall_through_to_404() {
    let response = app()
        .router()
        .oneshot(
            Request::builder()
                .uri("/api/missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_prefix_mounts_routes_at_the_root() {
    let app = AppBuilder::new()
        .config(AppConfig {
            api_prefix: String::new(),
            ..AppConfig::default()
        })
        .module::<EchoModule>()
        .controller::<EchoController>()
        .build()
        .unwrap();

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .uri("/echo/7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn plain_axum_routes_can_use_the_inject_extractor() {
    async fn custom(Inject(service): Inject<EchoService>) -> String {
        service.shout("custom".to_string()).await
    }

    let app = AppBuilder::new()
        .module::<EchoModule>()
        .map_router(|router| router.route("/custom", armature::axum::routing::get(custom)))
        .build()
        .unwrap();

    let response = app
        .router()
        .oneshot(Request::builder().uri("/custom").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = armature::axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"CUSTOM");
}

static GAUGE_CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

struct GaugeService;

impl armature::Injectable for GaugeService {
    fn inject(_: &Container) -> armature::Result<Self> {
        GAUGE_CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
        Ok(GaugeService)
    }
}

#[controller(path = "/gauge-a")]
struct GaugeAController {
    #[allow(dead_code)]
    service: Arc<GaugeService>,
}

#[routes(GaugeAController)]
impl GaugeAController {
    #[get("/")]
    async fn read(&self) -> &'static str {
        "a"
    }
}

#[controller(path = "/gauge-b")]
struct GaugeBController {
    #[allow(dead_code)]
    service: Arc<GaugeService>,
}

#[routes(GaugeBController)]
impl GaugeBController {
    #[get("/")]
    async fn read(&self) -> &'static str {
        "b"
    }
}

#[module(providers = [GaugeService])]
struct GaugeModule;

#[tokio::test]
async fn controllers_share_one_service_instance() {
    let app = AppBuilder::new()
        .module::<GaugeModule>()
        .controller::<GaugeAController>()
        .controller::<GaugeBController>()
        .build()
        .unwrap();

    assert_eq!(GAUGE_CONSTRUCTIONS.load(Ordering::SeqCst), 1);
    drop(app);
}

#[controller(path = "/orphan")]
struct OrphanController {
    #[allow(dead_code)]
    service: Arc<GaugeService>,
}

#[routes(OrphanController)]
impl OrphanController {
    #[get("/")]
    async fn read(&self) -> &'static str {
        "orphan"
    }
}

#[tokio::test]
async fn missing_provider_aborts_startup() {
    // GaugeService is never registered: controller instantiation must fail
    // during build, before any route exists.
    let err = AppBuilder::new()
        .controller::<OrphanController>()
        .build()
        .unwrap_err();
    assert!(matches!(err, ArmatureError::NotRegistered { .. }));
}

#[controller(path = "/dup")]
struct FirstDupController;

#[routes(FirstDupController)]
impl FirstDupController {
    #[get("/")]
    async fn read(&self) -> &'static str {
        "first"
    }
}

#[controller(path = "/dup")]
struct SecondDupController;

#[routes(SecondDupController)]
impl SecondDupController {
    #[get("/")]
    async fn read(&self) -> &'static str {
        "second"
    }
}

#[tokio::test]
async fn duplicate_route_claims_abort_startup() {
    let err = AppBuilder::new()
        .controller::<FirstDupController>()
        .controller::<SecondDupController>()
        .build()
        .unwrap_err();
    match err {
        ArmatureError::DuplicateRoute { method, path } => {
            assert_eq!(method, "GET");
            assert_eq!(path, "/api/dup");
        }
        other => panic!("expected DuplicateRoute, got {other}"),
    }
}
