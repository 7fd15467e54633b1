//! Operation audit correlation.
//!
//! Every request that passes routing runs inside [`AuditCorrelator::record`],
//! which appends exactly one audit record once the handler has finished,
//! whatever its outcome, and only then hands the handler's result back.

use std::sync::Arc;

use strongbox_core::clock::Clock;
use strongbox_core::error::{StrongboxError, StrongboxResult};
use strongbox_core::models::audit::{AuditOperation, AuditOutcome, CreateOperationAuditRecord};
use strongbox_core::repository::AuditRecordRepository;
use tracing::{error, info, warn};

/// What is known about a request before it is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditContext {
    pub path: String,
    pub operation: AuditOperation,
    pub actor: Option<String>,
}

pub struct AuditCorrelator<A: AuditRecordRepository> {
    repo: A,
    clock: Arc<dyn Clock>,
}

impl<A: AuditRecordRepository> AuditCorrelator<A> {
    pub fn new(repo: A, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Await `handling`, append one record describing it, then return its
    /// result. A failed append fails the request with
    /// [`StrongboxError::AuditPersistence`], even if handling succeeded.
    pub async fn record<T, F>(&self, context: AuditContext, handling: F) -> StrongboxResult<T>
    where
        F: Future<Output = StrongboxResult<T>>,
    {
        let timestamp = self.clock.now();
        let result = handling.await;

        let (outcome, failure_code) = match &result {
            Ok(_) => (AuditOutcome::Success, None),
            Err(e) => {
                if e.is_client_error() {
                    info!(path = %context.path, code = %e.code(), "Request rejected");
                } else {
                    warn!(path = %context.path, error = %e, "Request failed");
                }
                (AuditOutcome::Failure, Some(e.code()))
            }
        };

        let record = CreateOperationAuditRecord {
            path: context.path,
            operation: context.operation,
            outcome,
            failure_code,
            actor: context.actor,
            timestamp,
        };

        match self.repo.append(record).await {
            Ok(stored) => {
                info!(
                    audit_id = %stored.id,
                    path = %stored.path,
                    operation = %stored.operation,
                    outcome = stored.outcome.as_str(),
                    "Operation audited"
                );
                result
            }
            Err(e) => {
                error!(error = %e, "Audit record could not be saved; failing request");
                Err(StrongboxError::AuditPersistence(e.to_string()))
            }
        }
    }
}
