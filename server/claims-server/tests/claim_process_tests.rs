use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use database_layer::{ClaimStore, InMemoryClaimStore};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use claims_server::{
    config::{ServerConfig, StorageBackend},
    create_app, ClaimsServer,
};

/// Test harness over an in-memory store
struct TestApp {
    store: Arc<InMemoryClaimStore>,
    app: Router,
}

impl TestApp {
    fn new() -> Self {
        Self::with_store(InMemoryClaimStore::new())
    }

    fn with_store(store: InMemoryClaimStore) -> Self {
        let store = Arc::new(store);
        let config = ServerConfig {
            storage: StorageBackend::Memory,
            ..ServerConfig::default()
        };
        let server = ClaimsServer::with_store(config, store.clone());
        Self {
            store,
            app: create_app(server),
        }
    }

    async fn post_claims(&self, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri("/claim_process")
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .method("GET")
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    async fn stored_count(&self) -> u64 {
        self.store.count().await.unwrap()
    }
}

fn sample_claim() -> Value {
    json!({
        "service_date": "2018-03-28",
        "submitted_procedure": "D0180",
        "quadrant": null,
        "plan_or_Group_no": "GRP-1000",
        "subscriber_no": "3730189502",
        "provider_npi": "1497775530",
        "provider_fees": 100.00,
        "allowed_fees": 100.00,
        "member_coinsurance": 0.00,
        "member_copay": 0.00
    })
}

fn claim_with(field: &str, value: Value) -> Value {
    let mut claim = sample_claim();
    claim[field] = value;
    claim
}

#[tokio::test]
async fn test_net_fee_computed_per_claim() {
    let app = TestApp::new();
    let claim = json!({
        "service_date": "2018-03-28",
        "submitted_procedure": "D4346",
        "quadrant": "UR",
        "plan_or_Group_no": "GRP-1000",
        "subscriber_no": "3730189502",
        "provider_npi": "1497775530",
        "provider_fees": 130.00,
        "allowed_fees": 65.00,
        "member_coinsurance": 16.25,
        "member_copay": 0.00
    });

    let (status, body) = app.post_claims(json!([claim]).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["net_fee"].as_f64(), Some(81.25));
    assert!(Uuid::parse_str(results[0]["uid"].as_str().unwrap()).is_ok());
    assert_eq!(app.stored_count().await, 1);
}

#[tokio::test]
async fn test_results_follow_submission_order() {
    let app = TestApp::new();
    let batch = json!([
        claim_with("provider_fees", json!(100.0)),
        claim_with("provider_fees", json!(150.0)),
        claim_with("provider_fees", json!(125.5)),
    ]);

    let (status, body) = app.post_claims(batch.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    let fees: Vec<f64> = results.iter().map(|r| r["net_fee"].as_f64().unwrap()).collect();
    assert_eq!(fees, vec![0.0, 50.0, 25.5]);

    let mut uids: Vec<&str> = results.iter().map(|r| r["uid"].as_str().unwrap()).collect();
    uids.sort_unstable();
    uids.dedup();
    assert_eq!(uids.len(), 3);
    assert_eq!(app.stored_count().await, 3);
}

#[tokio::test]
async fn test_invalid_procedure_rejects_whole_batch() {
    let app = TestApp::new();
    let batch = json!([sample_claim(), claim_with("submitted_procedure", json!("X0180"))]);

    let (status, body) = app.post_claims(batch.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");
    assert_eq!(body["record"], 1);
    assert!(body["field_errors"]["submitted_procedure"].is_array());
    assert_eq!(app.stored_count().await, 0);
}

#[tokio::test]
async fn test_provider_npi_must_have_ten_characters() {
    let app = TestApp::new();
    let batch = json!([claim_with("provider_npi", json!("149777553"))]);

    let (status, body) = app.post_claims(batch.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_1003");
    assert!(body["message"].as_str().unwrap().contains("provider_npi"));
    assert_eq!(app.stored_count().await, 0);
}

#[tokio::test]
async fn test_missing_field_is_named() {
    let app = TestApp::new();
    let mut claim = sample_claim();
    claim.as_object_mut().unwrap().remove("subscriber_no");

    let (status, body) = app.post_claims(json!([claim]).to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_1002");
    assert!(body["field_errors"]["subscriber_no"].is_array());
}

#[tokio::test]
async fn test_negative_fee_rejected() {
    let app = TestApp::new();
    let batch = json!([claim_with("member_copay", json!(-5.0))]);

    let (status, body) = app.post_claims(batch.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_1004");
    assert_eq!(app.stored_count().await, 0);
}

#[tokio::test]
async fn test_fee_overflow_is_bad_request() {
    let app = TestApp::new();
    let max = "79228162514264337593543950335";
    let mut claim = claim_with("provider_fees", json!(max));
    claim["member_coinsurance"] = json!(max);

    let (status, body) = app.post_claims(json!([sample_claim(), claim]).to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_1004");
    assert_eq!(body["record"], 1);
    assert!(body["field_errors"]["member_coinsurance"].is_array());
    assert_eq!(app.stored_count().await, 0);

    let mut claim = claim_with("provider_fees", json!(7e28));
    claim["member_coinsurance"] = json!(7e28);
    let (status, _) = app.post_claims(json!([claim]).to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.stored_count().await, 0);
}

#[tokio::test]
async fn test_extreme_amounts() {
    let app = TestApp::new();

    let (status, body) = app
        .post_claims(json!([claim_with("allowed_fees", json!(1e300))]).to_string())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_1004");
    assert!(body["field_errors"]["allowed_fees"].is_array());

    // Largest representable amount with nothing added to it
    let mut claim = claim_with("provider_fees", json!("79228162514264337593543950335"));
    claim["allowed_fees"] = json!("79228162514264337593543950335");
    let (status, body) = app.post_claims(json!([claim]).to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["net_fee"].as_f64(), Some(0.0));
    assert_eq!(app.stored_count().await, 1);
}

#[tokio::test]
async fn test_legacy_date_and_string_amounts_accepted() {
    let app = TestApp::new();
    let mut claim = claim_with("service_date", json!("3/28/18 0:00"));
    claim["provider_fees"] = json!("100.00");
    claim["allowed_fees"] = json!("90.00");

    let (status, body) = app.post_claims(json!([claim]).to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["net_fee"].as_f64(), Some(10.0));

    let uid = body[0]["uid"].as_str().unwrap();
    let (status, stored) = app.get(&format!("/claims/{uid}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["service_date"], "2018-03-28");
}

#[tokio::test]
async fn test_storage_failure_stores_nothing() {
    let app = TestApp::with_store(InMemoryClaimStore::new().with_write_failure_after(2));
    let batch = json!([sample_claim(), sample_claim(), sample_claim()]);

    let (status, body) = app.post_claims(batch.to_string()).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error_type"], "database_error");
    assert_eq!(body["error_code"], "DB_4001");
    assert!(!body["message"].as_str().unwrap().contains("simulated"));
    assert_eq!(app.stored_count().await, 0);
}

#[tokio::test]
async fn test_empty_batch_returns_empty_array() {
    let app = TestApp::new();

    let (status, body) = app.post_claims("[]".to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    assert_eq!(app.stored_count().await, 0);
}

#[tokio::test]
async fn test_resubmission_creates_new_claims() {
    let app = TestApp::new();
    let batch = json!([sample_claim()]).to_string();

    let (_, first) = app.post_claims(batch.clone()).await;
    let (_, second) = app.post_claims(batch).await;

    assert_ne!(first[0]["uid"], second[0]["uid"]);
    assert_eq!(first[0]["net_fee"], second[0]["net_fee"]);
    assert_eq!(app.stored_count().await, 2);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = TestApp::new();

    let (status, body) = app.post_claims("{\"not\": \"an array\"}".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_1005");

    let (status, _) = app.post_claims("[{".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.stored_count().await, 0);
}

#[tokio::test]
async fn test_get_claim_round_trip() {
    let app = TestApp::new();
    let (_, body) = app.post_claims(json!([sample_claim()]).to_string()).await;
    let uid = body[0]["uid"].as_str().unwrap();

    let (status, stored) = app.get(&format!("/claims/{uid}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["uid"], uid);
    assert_eq!(stored["provider_npi"], "1497775530");
    assert_eq!(stored["plan_or_group_no"], "GRP-1000");
}

#[tokio::test]
async fn test_get_unknown_claim_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app.get(&format!("/claims/{}", Uuid::now_v7())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "RESOURCE_2001");

    let (status, _) = app.get("/claims/not-a-uid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["store"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
