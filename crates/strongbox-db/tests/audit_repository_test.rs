//! Integration tests for the append-only audit repository.

use chrono::{Duration, TimeZone, Utc};
use strongbox_core::models::audit::{AuditOperation, AuditOutcome, CreateOperationAuditRecord};
use strongbox_core::repository::{AuditRecordFilter, AuditRecordRepository, Pagination};
use strongbox_db::repository::SurrealAuditRecordRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn setup() -> SurrealAuditRecordRepository<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    strongbox_db::run_migrations(&db).await.unwrap();
    SurrealAuditRecordRepository::new(db)
}

fn record(
    path: &str,
    operation: AuditOperation,
    outcome: AuditOutcome,
    offset_secs: i64,
) -> CreateOperationAuditRecord {
    let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    CreateOperationAuditRecord {
        path: path.into(),
        operation,
        failure_code: match outcome {
            AuditOutcome::Success => None,
            AuditOutcome::Failure => Some("error.credential_not_found".into()),
        },
        outcome,
        actor: Some("uaa-client:tester".into()),
        timestamp: base + Duration::seconds(offset_secs),
    }
}

#[tokio::test]
async fn append_returns_stored_record() {
    let repo = setup().await;

    let stored = repo
        .append(record(
            "/api/v1/data/foo",
            AuditOperation::CredentialAccess,
            AuditOutcome::Failure,
            0,
        ))
        .await
        .unwrap();

    assert_eq!(stored.path, "/api/v1/data/foo");
    assert_eq!(stored.operation, AuditOperation::CredentialAccess);
    assert_eq!(stored.outcome, AuditOutcome::Failure);
    assert_eq!(
        stored.failure_code.as_deref(),
        Some("error.credential_not_found")
    );
    assert_eq!(stored.actor.as_deref(), Some("uaa-client:tester"));
}

#[tokio::test]
async fn list_preserves_append_order() {
    let repo = setup().await;

    for path in ["/api/v1/ca/one", "/api/v1/ca/two", "/api/v1/ca/three"] {
        repo.append(record(path, AuditOperation::CaUpdate, AuditOutcome::Success, 0))
            .await
            .unwrap();
    }

    let page = repo
        .list(AuditRecordFilter::default(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    let paths: Vec<_> = page.items.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(
        paths,
        ["/api/v1/ca/one", "/api/v1/ca/two", "/api/v1/ca/three"]
    );
}

#[tokio::test]
async fn list_filters_by_path_and_operation() {
    let repo = setup().await;

    repo.append(record(
        "/api/v1/data/foo",
        AuditOperation::CredentialUpdate,
        AuditOutcome::Success,
        0,
    ))
    .await
    .unwrap();
    repo.append(record(
        "/api/v1/data/foo",
        AuditOperation::CredentialAccess,
        AuditOutcome::Success,
        1,
    ))
    .await
    .unwrap();
    repo.append(record(
        "/api/v1/data/bar",
        AuditOperation::CredentialAccess,
        AuditOutcome::Success,
        2,
    ))
    .await
    .unwrap();

    let page = repo
        .list(
            AuditRecordFilter {
                path: Some("/api/v1/data/foo".into()),
                operation: Some(AuditOperation::CredentialAccess),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].path, "/api/v1/data/foo");
    assert_eq!(page.items[0].operation, AuditOperation::CredentialAccess);
}

#[tokio::test]
async fn list_filters_by_time_window() {
    let repo = setup().await;

    for offset in [0, 10, 20] {
        repo.append(record(
            "/api/v1/data/t",
            AuditOperation::CredentialAccess,
            AuditOutcome::Success,
            offset,
        ))
        .await
        .unwrap();
    }

    let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let page = repo
        .list(
            AuditRecordFilter {
                from: Some(base + Duration::seconds(5)),
                to: Some(base + Duration::seconds(15)),
                ..Default::default()
            },
            Pagination::default(),
        )
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].timestamp, base + Duration::seconds(10));
}

#[tokio::test]
async fn list_paginates() {
    let repo = setup().await;

    for i in 0..5 {
        repo.append(record(
            &format!("/api/v1/data/p{i}"),
            AuditOperation::CredentialUpdate,
            AuditOutcome::Success,
            i,
        ))
        .await
        .unwrap();
    }

    let page = repo
        .list(
            AuditRecordFilter::default(),
            Pagination {
                offset: 2,
                limit: 2,
            },
        )
        .await
        .unwrap();

    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].path, "/api/v1/data/p2");
    assert_eq!(page.items[1].path, "/api/v1/data/p3");
}
