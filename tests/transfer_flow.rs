//! End-to-end tests for the transfer core and its HTTP surface.
//!
//! Everything runs against the in-memory store backend, so no external
//! services are required. The HTTP tests drive the real router with
//! `tower::ServiceExt::oneshot` instead of binding a socket.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use pointflow::account::Account;
use pointflow::gateway::{self, state::AppState};
use pointflow::store::{AccountStore, MemoryStore};
use pointflow::transfer::{TransferError, TransferOrchestrator, TransferStatus, UuidKeyGenerator};

/// Orchestrator wired to an in-memory store, with direct store access for
/// assertions.
struct TestHarness {
    orchestrator: Arc<TransferOrchestrator>,
    store: Arc<MemoryStore>,
}

impl TestHarness {
    fn new(accounts: Vec<Account>) -> Self {
        let store = Arc::new(MemoryStore::with_accounts(accounts));
        let orchestrator = Arc::new(TransferOrchestrator::new(
            store.clone(),
            Arc::new(UuidKeyGenerator),
        ));
        Self {
            orchestrator,
            store,
        }
    }

    /// Active account 1 with `sender_points` and active account 2 with
    /// `receiver_points`.
    fn two_accounts(sender_points: i64, receiver_points: i64) -> Self {
        Self::new(vec![
            Account::new(1, sender_points),
            Account::new(2, receiver_points),
        ])
    }

    fn router(&self) -> Router {
        let state = Arc::new(AppState::new(self.orchestrator.clone(), self.store.clone()));
        gateway::router(state)
    }

    async fn points_of(&self, id: i64) -> i64 {
        self.store
            .find_account(id)
            .await
            .unwrap()
            .expect("account must exist")
            .points
    }
}

/// Drive one request through the router, returning status, headers and the
/// parsed JSON body.
async fn send(router: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

fn post_transfer(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/transfers")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// ========================================================================
// Core Flow
// ========================================================================

/// A funded transfer debits the sender, credits the receiver and leaves a
/// COMPLETED record. Points are conserved across the pair.
#[tokio::test]
async fn test_completed_transfer_moves_points() {
    let harness = TestHarness::two_accounts(100, 50);

    let transfer = harness
        .orchestrator
        .create_transfer(1, 2, 30, Some("coffee round".to_string()))
        .await
        .unwrap();

    assert_eq!(transfer.status, TransferStatus::Completed);
    assert!(transfer.transfer_id.is_some());
    assert!(transfer.completed_at.is_some());
    assert!(transfer.fail_reason.is_none());
    assert!(transfer.updated_at >= transfer.created_at);

    assert_eq!(harness.points_of(1).await, 70);
    assert_eq!(harness.points_of(2).await, 80);
    // Conservation: nothing minted, nothing burned.
    assert_eq!(
        harness.points_of(1).await + harness.points_of(2).await,
        150
    );
}

/// An underfunded attempt leaves a FAILED record and touches no balance.
#[tokio::test]
async fn test_insufficient_points_rejected_and_recorded() {
    let harness = TestHarness::two_accounts(10, 0);

    let err = harness
        .orchestrator
        .create_transfer(1, 2, 30, None)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        TransferError::InsufficientPoints {
            available: 10,
            required: 30
        }
    );

    assert_eq!(harness.points_of(1).await, 10);
    assert_eq!(harness.points_of(2).await, 0);

    assert_eq!(harness.store.transfer_count(), 1);
    let page = harness
        .orchestrator
        .list_transfers_for_account(1, 1, 20)
        .await
        .unwrap();
    let record = &page.data[0];
    assert_eq!(record.status, TransferStatus::Failed);
    assert!(record.fail_reason.as_deref().unwrap().contains("insufficient"));
    assert!(record.completed_at.is_none());
}

#[tokio::test]
async fn test_inactive_sender_rejected_with_reason() {
    let mut sender = Account::new(1, 100);
    sender.is_active = false;
    let harness = TestHarness::new(vec![sender, Account::new(2, 0)]);

    let err = harness
        .orchestrator
        .create_transfer(1, 2, 30, None)
        .await
        .unwrap_err();
    assert_eq!(err, TransferError::SenderInactive);

    let page = harness
        .orchestrator
        .list_transfers_for_account(1, 1, 20)
        .await
        .unwrap();
    assert_eq!(page.data[0].status, TransferStatus::Failed);
    assert_eq!(page.data[0].fail_reason.as_deref(), Some("sender inactive"));
    assert_eq!(harness.points_of(1).await, 100);
}

#[tokio::test]
async fn test_inactive_receiver_rejected_with_reason() {
    let mut receiver = Account::new(2, 0);
    receiver.is_active = false;
    let harness = TestHarness::new(vec![Account::new(1, 100), receiver]);

    let err = harness
        .orchestrator
        .create_transfer(1, 2, 30, None)
        .await
        .unwrap_err();
    assert_eq!(err, TransferError::ReceiverInactive);

    let page = harness
        .orchestrator
        .list_transfers_for_account(2, 1, 20)
        .await
        .unwrap();
    assert_eq!(
        page.data[0].fail_reason.as_deref(),
        Some("receiver inactive")
    );
    assert_eq!(harness.points_of(1).await, 100);
    assert_eq!(harness.points_of(2).await, 0);
}

/// Structural rejections happen before anything is loaded or written.
#[tokio::test]
async fn test_validation_failures_persist_nothing() {
    let harness = TestHarness::two_accounts(100, 50);
    let orch = &harness.orchestrator;

    assert_eq!(
        orch.create_transfer(1, 1, 30, None).await.unwrap_err(),
        TransferError::SameAccount
    );
    assert_eq!(
        orch.create_transfer(1, 2, 0, None).await.unwrap_err(),
        TransferError::InvalidAmount
    );
    assert_eq!(
        orch.create_transfer(1, 2, -5, None).await.unwrap_err(),
        TransferError::InvalidAmount
    );
    assert_eq!(
        orch.create_transfer(1, 2, 30, Some("x".repeat(513)))
            .await
            .unwrap_err(),
        TransferError::NoteTooLong
    );

    assert_eq!(harness.store.transfer_count(), 0);
    assert_eq!(harness.points_of(1).await, 100);
    assert_eq!(harness.points_of(2).await, 50);
}

/// Key lookup is a pure read: fetching a settled transfer twice moves no
/// further points.
#[tokio::test]
async fn test_lookup_does_not_re_execute() {
    let harness = TestHarness::two_accounts(100, 50);

    let transfer = harness
        .orchestrator
        .create_transfer(1, 2, 30, None)
        .await
        .unwrap();
    let key = transfer.idempotency_key.clone();

    for _ in 0..2 {
        let found = harness.orchestrator.get_transfer_by_key(&key).await.unwrap();
        assert_eq!(found.status, TransferStatus::Completed);
        assert_eq!(found.transfer_id, transfer.transfer_id);
    }

    assert_eq!(harness.points_of(1).await, 70);
    assert_eq!(harness.points_of(2).await, 80);
}

// ========================================================================
// History and Pagination
// ========================================================================

/// History is ordered most recent first and counts rows where the account
/// appears on either side.
#[tokio::test]
async fn test_listing_is_most_recent_first_with_total() {
    let harness = TestHarness::new(vec![
        Account::new(1, 1_000),
        Account::new(2, 1_000),
        Account::new(3, 1_000),
    ]);
    let orch = &harness.orchestrator;

    // Five transfers touching account 1, with distinct amounts so the
    // ordering is observable.
    orch.create_transfer(1, 2, 11, None).await.unwrap();
    orch.create_transfer(1, 2, 12, None).await.unwrap();
    orch.create_transfer(2, 1, 13, None).await.unwrap();
    orch.create_transfer(1, 2, 14, None).await.unwrap();
    orch.create_transfer(1, 3, 15, None).await.unwrap();

    let page1 = orch.list_transfers_for_account(1, 1, 2).await.unwrap();
    assert_eq!(page1.total, 5);
    assert_eq!(page1.page, 1);
    assert_eq!(page1.page_size, 2);
    let amounts: Vec<i64> = page1.data.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, vec![15, 14]);

    let page3 = orch.list_transfers_for_account(1, 3, 2).await.unwrap();
    assert_eq!(page3.total, 5);
    let amounts: Vec<i64> = page3.data.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, vec![11]);

    // Account 3 only saw the last transfer.
    let other = orch.list_transfers_for_account(3, 1, 20).await.unwrap();
    assert_eq!(other.total, 1);
    assert_eq!(other.data[0].amount, 15);
}

#[tokio::test]
async fn test_page_beyond_history_is_empty_but_counted() {
    let harness = TestHarness::two_accounts(100, 0);
    let orch = &harness.orchestrator;

    orch.create_transfer(1, 2, 10, None).await.unwrap();
    orch.create_transfer(1, 2, 10, None).await.unwrap();

    let page = orch.list_transfers_for_account(1, 2, 10).await.unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.total, 2);
}

// ========================================================================
// Lifecycle Guards
// ========================================================================

/// A settled record refuses cancellation but accepts reversal, and a
/// reversed record is terminal.
#[tokio::test]
async fn test_settled_record_cancel_and_reverse_rules() {
    let harness = TestHarness::two_accounts(100, 50);

    let mut record = harness
        .orchestrator
        .create_transfer(1, 2, 30, None)
        .await
        .unwrap();

    let err = record.cancel().unwrap_err();
    assert_eq!(
        err,
        TransferError::InvalidStateTransition {
            from: TransferStatus::Completed,
            action: "cancel"
        }
    );

    record.reverse().unwrap();
    assert_eq!(record.status, TransferStatus::Reversed);
    assert!(record.is_final());
    assert!(record.fail("too late".to_string()).is_err());
}

// ========================================================================
// Concurrency
// ========================================================================

/// Ten racing transfers over one pair can never overdraw the sender:
/// exactly three 30-point debits fit a 100-point balance.
#[tokio::test]
async fn test_concurrent_transfers_never_overdraw() {
    let harness = TestHarness::two_accounts(100, 0);

    let mut handles = Vec::new();
    for _ in 0..10 {
        let orch = harness.orchestrator.clone();
        handles.push(tokio::spawn(async move {
            orch.create_transfer(1, 2, 30, None).await
        }));
    }

    let mut completed = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(t) => {
                assert_eq!(t.status, TransferStatus::Completed);
                completed += 1;
            }
            Err(TransferError::InsufficientPoints { .. }) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(completed, 3);
    assert_eq!(rejected, 7);
    assert_eq!(harness.points_of(1).await, 10);
    assert_eq!(harness.points_of(2).await, 90);
    // Every attempt, settled or rejected, left an audit record.
    assert_eq!(harness.store.transfer_count(), 10);
}

// ========================================================================
// HTTP API
// ========================================================================

#[tokio::test]
async fn test_post_transfers_returns_201_with_key_header() {
    let harness = TestHarness::two_accounts(100, 50);
    let router = harness.router();

    let (status, headers, body) = send(
        &router,
        post_transfer(json!({
            "fromUserId": 1,
            "toUserId": 2,
            "amount": 30,
            "note": "coffee round"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);

    let header_key = headers
        .get("Idempotency-Key")
        .expect("Idempotency-Key header must be set")
        .to_str()
        .unwrap();
    assert_eq!(body["transfer"]["idempotencyKey"], header_key);

    assert_eq!(body["transfer"]["status"], "completed");
    assert_eq!(body["transfer"]["fromAccountId"], 1);
    assert_eq!(body["transfer"]["toAccountId"], 2);
    assert_eq!(body["transfer"]["amount"], 30);
    assert_eq!(body["transfer"]["note"], "coffee round");
    assert!(body["transfer"]["completedAt"].is_string());

    // Absent optionals are omitted, not null.
    let obj = body["transfer"].as_object().unwrap();
    assert!(!obj.contains_key("failReason"));
}

#[tokio::test]
async fn test_post_transfers_validation_is_400() {
    let harness = TestHarness::two_accounts(100, 50);
    let router = harness.router();

    let (status, _, body) = send(
        &router,
        post_transfer(json!({"fromUserId": 1, "toUserId": 2, "amount": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "amount must be positive");
}

#[tokio::test]
async fn test_post_transfers_business_rule_is_409() {
    let harness = TestHarness::two_accounts(10, 0);
    let router = harness.router();

    let (status, _, body) = send(
        &router,
        post_transfer(json!({"fromUserId": 1, "toUserId": 2, "amount": 30})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "BUSINESS_RULE_VIOLATION");
    assert!(body["message"].as_str().unwrap().contains("insufficient points"));
}

#[tokio::test]
async fn test_post_transfers_inactive_sender_message() {
    let mut sender = Account::new(1, 100);
    sender.is_active = false;
    let harness = TestHarness::new(vec![sender, Account::new(2, 0)]);
    let router = harness.router();

    let (status, _, body) = send(
        &router,
        post_transfer(json!({"fromUserId": 1, "toUserId": 2, "amount": 30})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "sender inactive");
}

#[tokio::test]
async fn test_post_transfers_unknown_account_is_400() {
    let harness = TestHarness::two_accounts(100, 50);
    let router = harness.router();

    let (status, _, body) = send(
        &router,
        post_transfer(json!({"fromUserId": 1, "toUserId": 99, "amount": 30})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "receiver account not found: 99");
}

#[tokio::test]
async fn test_get_transfer_by_key_roundtrip() {
    let harness = TestHarness::two_accounts(100, 50);
    let router = harness.router();

    let (_, headers, _) = send(
        &router,
        post_transfer(json!({"fromUserId": 1, "toUserId": 2, "amount": 30})),
    )
    .await;
    let key = headers["Idempotency-Key"].to_str().unwrap().to_string();

    let (status, _, body) = send(&router, get(&format!("/transfers/{key}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transfer"]["idempotencyKey"], key.as_str());
    assert_eq!(body["transfer"]["status"], "completed");

    let (status, _, body) = send(&router, get("/transfers/no-such-key")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_list_endpoint_shape_and_bounds() {
    let harness = TestHarness::two_accounts(100, 50);
    let router = harness.router();

    for _ in 0..2 {
        let (status, _, _) = send(
            &router,
            post_transfer(json!({"fromUserId": 1, "toUserId": 2, "amount": 10})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _, body) = send(&router, get("/transfers?userId=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 20);
    assert_eq!(body["total"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, _, body) = send(&router, get("/transfers?userId=1&page=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _, body) = send(&router, get("/transfers?userId=1&pageSize=201")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    // Page so large the row offset would not fit in an i64.
    let (status, _, body) = send(
        &router,
        get("/transfers?userId=1&page=9223372036854775807&pageSize=200"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_health_and_openapi_endpoints() {
    let harness = TestHarness::two_accounts(0, 0);
    let router = harness.router();

    let (status, _, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _, body) = send(&router, get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/transfers"]["post"].is_object());
}
