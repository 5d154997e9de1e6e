// Mock marketplace API for exercising the real HTTP client and store
// Run with: cargo test --test inquiry_mock_server

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;

use inquiry_pipeline::config::ClientConfig;
use inquiry_pipeline::models::inquiry::{Attachment, InquiryRequest};
use inquiry_pipeline::services::inquiry_api_client::REQUEST_ID_HEADER;
use inquiry_pipeline::services::inquiry_store::{CREATE_SUCCESS_MESSAGE, FETCH_LIST_FAILED_FALLBACK};
use inquiry_pipeline::services::{
    InquiryApiClient, InquiryPipeline, SubmissionPhase, SubmissionStore,
};
use inquiry_pipeline::InquiryError;

// ============================================================================
// Mock State
// ============================================================================

#[derive(Debug, Default)]
struct MockMarketState {
    inquiries: Vec<Value>,
    sold_out_products: Vec<String>,
    received_bodies: Vec<Value>,
    request_ids: Vec<String>,
    auth_headers: Vec<String>,
    list_failures: bool,
}

type SharedState = Arc<RwLock<MockMarketState>>;

fn record_headers(state: &mut MockMarketState, headers: &HeaderMap) {
    if let Some(id) = headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()) {
        state.request_ids.push(id.to_string());
    }
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        state.auth_headers.push(auth.to_string());
    }
}

// ============================================================================
// Mock Endpoints
// ============================================================================

async fn create_inquiry(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.write().await;
    record_headers(&mut state, &headers);
    state.received_bodies.push(body.clone());

    let product_id = body["productId"].as_str().unwrap_or_default().to_string();

    if product_id == "p-broken" {
        return (StatusCode::BAD_GATEWAY, "upstream exploded").into_response();
    }

    if state.sold_out_products.contains(&product_id) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "success": false, "message": "Product sold out", "error": "CONFLICT" })),
        )
            .into_response();
    }

    let id = format!("inq-{}", state.inquiries.len() + 1);
    let record = json!({
        "_id": id,
        "quantity": body["quantity"],
        "description": body["description"],
        "productId": product_id,
        "buyerId": body["buyerId"],
        "attachment": body.get("attachment").cloned().unwrap_or(Value::Null),
        "status": "pending",
        "createdAt": "2026-10-19T14:05:00Z",
        "updatedAt": "2026-10-19T14:05:00Z",
        "product": {
            "_id": product_id,
            "name": "Nitrile gloves",
            "price": 12.5,
            "moq": 10,
            "stock": 400,
            "seller": { "_id": "s1", "companyName": "Acme Supply" },
            "category": { "_id": "c1", "name": "PPE" },
            "brand": "Acme"
        },
        "buyer": { "_id": body["buyerId"], "companyName": "City Clinic" }
    });
    state.inquiries.push(record.clone());

    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Inquiry created", "data": record })),
    )
        .into_response()
}

async fn list_inquiries(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let mut state = state.write().await;
    record_headers(&mut state, &headers);

    if state.list_failures {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "success": false }))).into_response();
    }

    Json(json!({ "success": true, "data": state.inquiries })).into_response()
}

async fn get_inquiry(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let state = state.read().await;
    match state.inquiries.iter().find(|i| i["_id"] == id.as_str()) {
        Some(record) => Json(json!({ "success": true, "data": record })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Inquiry not found" })),
        )
            .into_response(),
    }
}

async fn buyer_inquiries(
    State(state): State<SharedState>,
    Path(buyer_id): Path<String>,
) -> Response {
    let state = state.read().await;
    let records: Vec<&Value> = state
        .inquiries
        .iter()
        .filter(|i| i["buyerId"] == buyer_id.as_str())
        .collect();
    Json(json!({ "success": true, "data": records })).into_response()
}

fn create_mock_market(state: SharedState) -> Router {
    Router::new()
        .route("/api/inquiry/create", post(create_inquiry))
        .route("/api/inquiry/all", get(list_inquiries))
        .route("/api/inquiry/buyer/:buyer_id", get(buyer_inquiries))
        .route("/api/inquiry/:id", get(get_inquiry))
        .with_state(state)
}

async fn start_mock_market() -> (String, SharedState) {
    let state = Arc::new(RwLock::new(MockMarketState {
        sold_out_products: vec!["p-sold-out".to_string()],
        ..Default::default()
    }));

    let app = create_mock_market(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), state)
}

fn pipeline_for(base_url: &str) -> InquiryPipeline<InquiryApiClient> {
    let config = ClientConfig::new(base_url).unwrap().with_auth_token("test-token");
    let client = InquiryApiClient::new(config).unwrap();
    InquiryPipeline::new(Arc::new(SubmissionStore::new(client)))
}

// ============================================================================
// Integration Tests
// ============================================================================

#[tokio::test]
async fn test_submit_valid_inquiry_end_to_end() {
    let (base_url, state) = start_mock_market().await;
    let pipeline = pipeline_for(&base_url);

    let request = InquiryRequest::new(5, "Need 5 units urgently", "b1", "p1");
    let record = pipeline.submit(&request).await.unwrap();

    assert_eq!(record.id, "inq-1");
    assert_eq!(record.quantity, 5);
    assert_eq!(record.product.as_ref().map(|p| p.name.as_str()), Some("Nitrile gloves"));
    assert_eq!(record.buyer.as_ref().map(|b| b.display_name()), Some("City Clinic"));

    let snapshot = pipeline.store().state();
    assert_eq!(snapshot.records[0], record);
    assert_eq!(snapshot.success_message.as_deref(), Some(CREATE_SUCCESS_MESSAGE));
    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.phase(), SubmissionPhase::Succeeded);

    let state = state.read().await;
    assert_eq!(
        state.received_bodies[0],
        json!({
            "quantity": 5,
            "description": "Need 5 units urgently",
            "productId": "p1",
            "buyerId": "b1"
        })
    );
    assert_eq!(state.auth_headers, vec!["Bearer test-token"]);
    assert_eq!(state.request_ids.len(), 1);
    assert!(uuid::Uuid::parse_str(&state.request_ids[0]).is_ok());
}

#[tokio::test]
async fn test_payload_is_normalized_before_sending() {
    let (base_url, state) = start_mock_market().await;
    let pipeline = pipeline_for(&base_url);

    let attachment = Attachment::from_bytes(Some("rfq.pdf".to_string()), "application/pdf", b"%PDF-1.4");
    let request = InquiryRequest {
        quantity: Some("12".into()),
        description: Some("   Please quote 12 cartons   ".to_string()),
        buyer_id: Some("b1".to_string()),
        product_id: Some("p1".to_string()),
        attachment: Some(attachment.clone()),
    };

    let record = pipeline.submit(&request).await.unwrap();
    assert_eq!(record.attachment.as_deref(), Some(attachment.content.as_str()));

    let state = state.read().await;
    let body = &state.received_bodies[0];
    assert_eq!(body["quantity"], json!(12));
    assert_eq!(body["description"], json!("Please quote 12 cartons"));
    assert_eq!(body["attachment"], json!(attachment.content));
}

#[tokio::test]
async fn test_server_rejection_surfaces_structured_message() {
    let (base_url, _state) = start_mock_market().await;
    let pipeline = pipeline_for(&base_url);

    let request = InquiryRequest::new(5, "Need 5 units urgently", "b1", "p-sold-out");
    let err = pipeline.submit(&request).await.unwrap_err();
    assert_eq!(err.status_code(), Some(409));

    let snapshot = pipeline.store().state();
    assert_eq!(snapshot.error.as_deref(), Some("Product sold out"));
    assert!(snapshot.success_message.is_none());
    assert!(snapshot.records.is_empty());
    assert!(!snapshot.is_creating);
}

#[tokio::test]
async fn test_raw_text_error_body() {
    let (base_url, _state) = start_mock_market().await;
    let pipeline = pipeline_for(&base_url);

    let request = InquiryRequest::new(1, "Any stock left for this?", "b1", "p-broken");
    pipeline.submit(&request).await.unwrap_err();
    assert_eq!(pipeline.store().state().error.as_deref(), Some("upstream exploded"));
}

#[tokio::test]
async fn test_invalid_inquiry_never_hits_the_network() {
    let (base_url, state) = start_mock_market().await;
    let pipeline = pipeline_for(&base_url);

    let request = InquiryRequest::new(0, "short", "", "p1");
    let err = pipeline.submit(&request).await.unwrap_err();
    match err {
        InquiryError::Validation(errors) => assert_eq!(errors.len(), 3),
        other => panic!("expected validation error, got {:?}", other),
    }

    assert!(state.read().await.received_bodies.is_empty());
    assert_eq!(pipeline.store().state().phase(), SubmissionPhase::Idle);
}

#[tokio::test]
async fn test_read_operations() {
    let (base_url, _state) = start_mock_market().await;
    let pipeline = pipeline_for(&base_url);
    let store = pipeline.store();

    pipeline
        .submit(&InquiryRequest::new(2, "Quote for two pallets", "b1", "p1"))
        .await
        .unwrap();
    pipeline
        .submit(&InquiryRequest::new(3, "Quote for three pallets", "b2", "p1"))
        .await
        .unwrap();

    let all = store.fetch_all_inquiries().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(store.state().records, all);

    let mine = store.fetch_inquiries_by_buyer("b2").await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].buyer_id, "b2");
    assert_eq!(store.state().records.len(), 1);

    let one = store.fetch_inquiry_by_id("inq-1").await.unwrap();
    assert_eq!(one.quantity, 2);
    assert_eq!(store.state().current_record, Some(one));
    assert!(!store.state().is_loading);
}

#[tokio::test]
async fn test_read_failures() {
    let (base_url, state) = start_mock_market().await;
    let pipeline = pipeline_for(&base_url);
    let store = pipeline.store();

    let err = store.fetch_inquiry_by_id("nope").await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(store.state().error.as_deref(), Some("Inquiry not found"));

    state.write().await.list_failures = true;
    store.fetch_all_inquiries().await.unwrap_err();
    assert_eq!(store.state().error.as_deref(), Some(FETCH_LIST_FAILED_FALLBACK));

    store.clear_error();
    store.clear_error();
    assert!(store.state().error.is_none());
}
