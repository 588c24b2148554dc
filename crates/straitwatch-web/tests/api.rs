//! End-to-end tests of the gateway's HTTP contract.
//!
//! Run with: cargo test -p straitwatch-web --test api

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use straitwatch_db::QueryStore;
use straitwatch_models::{
    Classifier, ClassifierPipeline, DecisionTree, ModelRegistry, Regressor, SplitCondition,
    StandardScaler, TreeNode, TITANIC_FEATURES,
};
use straitwatch_traffic::{HttpTrafficProvider, MockTrafficProvider, TrafficFeed, TrafficProvider};
use straitwatch_web::{router::build_router, state::AppState};
use tower::ServiceExt;

const MARITIME_BODY: &str = r#"{"vessels":[{"mmsi":416000001,"speed":11.4}],"source":"kpler"}"#;
const AIR_BODY: &str = r#"{"ac":[{"hex":"899123","alt_baro":32000}]}"#;

fn titanic_pipeline() -> ClassifierPipeline {
    // Survival driven by Sex alone: logit = 4 * Sex - 2.
    ClassifierPipeline {
        feature_names: TITANIC_FEATURES.iter().map(|s| s.to_string()).collect(),
        scaler: None,
        classifier: Classifier::Logistic {
            coefficients: vec![0.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            intercept: -2.0,
        },
    }
}

fn housing_scaler() -> StandardScaler {
    StandardScaler::new(vec![3.0, 20.0], vec![1.0, 10.0])
        .with_feature_names(vec!["MedInc".to_string(), "HouseAge".to_string()])
}

fn housing_model(high_leaf: f64) -> Regressor {
    Regressor::Boosted {
        base_score: 2.0,
        learning_rate: 0.5,
        trees: vec![DecisionTree::new(vec![
            TreeNode::split(SplitCondition::new(0, 0.0, true), 1, 2),
            TreeNode::leaf(-1.0),
            TreeNode::leaf(high_leaf),
        ])],
    }
}

struct Harness {
    app: Router,
    maritime: Arc<MockTrafficProvider>,
    _dir: tempfile::TempDir,
}

fn harness_with(
    regressor: Regressor,
    maritime: Arc<MockTrafficProvider>,
    air: Arc<dyn TrafficProvider>,
) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let models = ModelRegistry::from_parts(titanic_pipeline(), housing_scaler(), regressor).unwrap();
    let store = QueryStore::new(dir.path().join("straitwatch.db"));
    let state = AppState::new(models, store, maritime.clone(), air);
    Harness { app: build_router(state), maritime, _dir: dir }
}

fn harness() -> Harness {
    harness_with(
        housing_model(3.0),
        Arc::new(MockTrafficProvider::returning(TrafficFeed::Maritime, MARITIME_BODY)),
        Arc::new(MockTrafficProvider::returning(TrafficFeed::Air, AIR_BODY)),
    )
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn call_raw(
    app: &Router,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn detail(bytes: &[u8]) -> String {
    as_json(bytes)["detail"].as_str().unwrap_or_default().to_string()
}

fn as_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

fn passenger(sex: i64) -> Value {
    json!({"Pclass": 3, "Sex": sex, "Age": 22.0, "SibSp": 1, "Parch": 0, "Fare": 7.25, "Embarked": 2})
}

// ── Inference ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn predict_titanic_returns_binary_class() {
    let h = harness();

    let (status, body) = call(&h.app, Method::POST, "/predict_titanic", Some(passenger(1))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!({"Survived": 1}));

    let (status, body) = call(&h.app, Method::POST, "/predict_titanic", Some(passenger(0))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!({"Survived": 0}));
}

#[tokio::test]
async fn predict_titanic_rejects_structurally_invalid_records() {
    let h = harness();

    let missing = json!({"Pclass": 3, "Sex": 1});
    let (status, body) = call(&h.app, Method::POST, "/predict_titanic", Some(missing)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(detail(&body).contains("Age"));

    let mut wrong_type = passenger(1);
    wrong_type["Age"] = json!("twenty-two");
    let (status, body) = call(&h.app, Method::POST, "/predict_titanic", Some(wrong_type)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!detail(&body).is_empty());
}

#[tokio::test]
async fn predict_titanic_accepts_out_of_range_integers() {
    let h = harness();
    let (status, body) = call(&h.app, Method::POST, "/predict_titanic", Some(passenger(-1))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!({"Survived": 0}));
}

#[tokio::test]
async fn unparseable_bodies_are_422_with_detail() {
    let h = harness();

    let (status, body) =
        call_raw(&h.app, "/predict_titanic", Some("application/json"), "{not json").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!detail(&body).is_empty());

    let (status, body) =
        call_raw(&h.app, "/predict_housing", None, r#"{"MedInc": 3.0, "HouseAge": 20.0}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(detail(&body).contains("Content-Type"));

    let (status, body) = call(&h.app, Method::POST, "/query", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(detail(&body).contains("query"));
}

#[tokio::test]
async fn predict_housing_scales_then_regresses() {
    let h = harness();

    // MedInc 5.0 scales to 2.0 → right leaf: 2.0 + 0.5 * 3.0
    let (status, body) = call(
        &h.app,
        Method::POST,
        "/predict_housing",
        Some(json!({"MedInc": 5.0, "HouseAge": 41.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!({"price": 3.5}));

    // MedInc 1.0 scales to -2.0 → left leaf: 2.0 + 0.5 * -1.0
    let (_, body) = call(
        &h.app,
        Method::POST,
        "/predict_housing",
        Some(json!({"MedInc": 1.0, "HouseAge": 10})),
    )
    .await;
    assert_eq!(as_json(&body), json!({"price": 1.5}));
}

#[tokio::test]
async fn predict_housing_requires_the_artifact_schema() {
    let h = harness();

    let (status, body) = call(
        &h.app,
        Method::POST,
        "/predict_housing",
        Some(json!({"MedInc": 5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(as_json(&body)["detail"].as_str().unwrap().contains("HouseAge"));

    let (status, _) = call(
        &h.app,
        Method::POST,
        "/predict_housing",
        Some(json!({"MedInc": 5.0, "HouseAge": 1.0, "Rooms": 4.0})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn inference_fault_is_an_opaque_server_error() {
    let h = harness_with(
        housing_model(f64::INFINITY),
        Arc::new(MockTrafficProvider::returning(TrafficFeed::Maritime, MARITIME_BODY)),
        Arc::new(MockTrafficProvider::returning(TrafficFeed::Air, AIR_BODY)),
    );

    let (status, body) = call(
        &h.app,
        Method::POST,
        "/predict_housing",
        Some(json!({"MedInc": 5.0, "HouseAge": 41.0})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, b"Internal Server Error");
}

// ── Store passthrough ───────────────────────────────────────────────────────

#[tokio::test]
async fn query_select_literal() {
    let h = harness();
    let (status, body) = call(&h.app, Method::POST, "/query", Some(json!({"query": "SELECT 1"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!({"columns": ["1"], "data": [[1]]}));
}

#[tokio::test]
async fn query_error_surfaces_as_500_with_detail() {
    let h = harness();
    let (status, body) =
        call(&h.app, Method::POST, "/query", Some(json!({"query": "not valid sql"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = as_json(&body)["detail"].as_str().unwrap().to_string();
    assert!(!detail.is_empty());
}

#[tokio::test]
async fn query_can_mutate_the_store() {
    let h = harness();
    for sql in [
        "CREATE TABLE transits (vessel TEXT, knots REAL)",
        "INSERT INTO transits VALUES ('Ever Given', 11.5)",
    ] {
        let (status, _) = call(&h.app, Method::POST, "/query", Some(json!({"query": sql}))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = call(
        &h.app,
        Method::POST,
        "/query",
        Some(json!({"query": "SELECT vessel, knots FROM transits"})),
    )
    .await;
    assert_eq!(
        as_json(&body),
        json!({"columns": ["vessel", "knots"], "data": [["Ever Given", 11.5]]})
    );
}

#[tokio::test]
async fn query_with_several_statements_runs_none() {
    let h = harness();
    let batch = json!({"query": "CREATE TABLE a (x INTEGER); INSERT INTO a VALUES (7)"});
    let (status, body) = call(&h.app, Method::POST, "/query", Some(batch)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(detail(&body).contains("one statement at a time"));

    let (status, _) =
        call(&h.app, Method::POST, "/query", Some(json!({"query": "SELECT x FROM a"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// ── Upstream passthrough ────────────────────────────────────────────────────

#[tokio::test]
async fn maritime_traffic_is_relayed_byte_for_byte() {
    let h = harness();

    let (status, first) = call(&h.app, Method::GET, "/maritime_traffic", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, MARITIME_BODY.as_bytes());

    let (_, second) = call(&h.app, Method::GET, "/maritime_traffic", None).await;
    assert_eq!(first, second);
    assert_eq!(h.maritime.calls(), 2);

    let (status, air) = call(&h.app, Method::GET, "/air_traffic", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(air, AIR_BODY.as_bytes());
}

#[tokio::test]
async fn provider_failures_map_to_fixed_messages() {
    let h = harness_with(
        housing_model(3.0),
        Arc::new(MockTrafficProvider::failing(TrafficFeed::Maritime, "connection refused")),
        Arc::new(MockTrafficProvider::failing(TrafficFeed::Air, "connection refused")),
    );

    let (status, body) = call(&h.app, Method::GET, "/maritime_traffic", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(as_json(&body), json!({"detail": "Error fetching maritime traffic data"}));

    let (status, body) = call(&h.app, Method::GET, "/air_traffic", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(as_json(&body), json!({"detail": "Error fetching air traffic data"}));
}

async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn slow_or_failing_provider_yields_500() {
    let upstream = Router::new()
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "{}"
            }),
        )
        .route("/down", get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "{}") }));
    let base = spawn_upstream(upstream).await;

    let slow = HttpTrafficProvider::new(
        TrafficFeed::Air,
        format!("{}/slow", base),
        None,
        Duration::from_millis(100),
    )
    .unwrap();
    let h = harness_with(
        housing_model(3.0),
        Arc::new(MockTrafficProvider::returning(TrafficFeed::Maritime, MARITIME_BODY)),
        Arc::new(slow),
    );
    let (status, body) = call(&h.app, Method::GET, "/air_traffic", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(as_json(&body), json!({"detail": "Error fetching air traffic data"}));

    let down = HttpTrafficProvider::new(
        TrafficFeed::Air,
        format!("{}/down", base),
        None,
        Duration::from_secs(5),
    )
    .unwrap();
    let h = harness_with(
        housing_model(3.0),
        Arc::new(MockTrafficProvider::returning(TrafficFeed::Maritime, MARITIME_BODY)),
        Arc::new(down),
    );
    let (status, _) = call(&h.app, Method::GET, "/air_traffic", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// ── Stub and health ─────────────────────────────────────────────────────────

#[tokio::test]
async fn slowdown_stub_ignores_input() {
    let h = harness();
    let expected = json!({"message": "Prediction endpoint placeholder"});

    let (status, body) = call(&h.app, Method::GET, "/predict_traffic_slowdown", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), expected);

    let sliders = json!({"maritime_traffic": 50, "air_traffic": 75, "historical_data": true});
    let (status, body) =
        call(&h.app, Method::POST, "/predict_traffic_slowdown", Some(sliders)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), expected);
}

#[tokio::test]
async fn health_reports_loaded_artifacts() {
    let h = harness();
    let (status, body) = call(&h.app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let body = as_json(&body);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["models"]["titanic_classifier"], "logistic");
    assert_eq!(body["models"]["housing_regressor"], "boosted");
    assert_eq!(body["models"]["housing_features"], json!(["MedInc", "HouseAge"]));
}
