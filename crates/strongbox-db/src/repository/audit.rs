//! SurrealDB implementation of [`AuditRecordRepository`].
//!
//! Only `append` and `list` exist; records are never updated or removed.

use chrono::{DateTime, Utc};
use strongbox_core::error::StrongboxResult;
use strongbox_core::models::audit::{
    AuditOperation, AuditOutcome, CreateOperationAuditRecord, OperationAuditRecord,
};
use strongbox_core::repository::{
    AuditRecordFilter, AuditRecordRepository, PaginatedResult, Pagination,
};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AuditRow {
    path: String,
    operation: String,
    outcome: String,
    failure_code: Option<String>,
    actor: Option<String>,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AuditRowWithId {
    record_id: String,
    path: String,
    operation: String,
    outcome: String,
    failure_code: Option<String>,
    actor: Option<String>,
    timestamp: DateTime<Utc>,
}

fn decode_err(reason: String) -> DbError {
    DbError::Decode {
        entity: "operation_audit_record".into(),
        reason,
    }
}

fn row_to_record(row: AuditRow, id: Uuid) -> Result<OperationAuditRecord, DbError> {
    let operation = AuditOperation::parse(&row.operation)
        .ok_or_else(|| decode_err(format!("unknown operation '{}'", row.operation)))?;
    let outcome = AuditOutcome::parse(&row.outcome)
        .ok_or_else(|| decode_err(format!("unknown outcome '{}'", row.outcome)))?;
    Ok(OperationAuditRecord {
        id,
        path: row.path,
        operation,
        outcome,
        failure_code: row.failure_code,
        actor: row.actor,
        timestamp: row.timestamp,
    })
}

impl AuditRowWithId {
    fn try_into_record(self) -> Result<OperationAuditRecord, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| decode_err(format!("invalid UUID: {e}")))?;
        let row = AuditRow {
            path: self.path,
            operation: self.operation,
            outcome: self.outcome,
            failure_code: self.failure_code,
            actor: self.actor,
            timestamp: self.timestamp,
        };
        row_to_record(row, id)
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Build the WHERE clause for the populated filter fields.
fn where_clause(filter: &AuditRecordFilter) -> String {
    let mut conditions = Vec::new();
    if filter.path.is_some() {
        conditions.push("path = $path");
    }
    if filter.operation.is_some() {
        conditions.push("operation = $operation");
    }
    if filter.from.is_some() {
        conditions.push("timestamp >= $from");
    }
    if filter.to.is_some() {
        conditions.push("timestamp <= $to");
    }
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}

/// SurrealDB implementation of the audit record repository.
#[derive(Clone)]
pub struct SurrealAuditRecordRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAuditRecordRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AuditRecordRepository for SurrealAuditRecordRepository<C> {
    async fn append(
        &self,
        input: CreateOperationAuditRecord,
    ) -> StrongboxResult<OperationAuditRecord> {
        let id = Uuid::now_v7();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('operation_audit_record', $id) SET \
                 path = $path, \
                 operation = $operation, \
                 outcome = $outcome, \
                 failure_code = $failure_code, \
                 actor = $actor, \
                 timestamp = $timestamp",
            )
            .bind(("id", id_str.clone()))
            .bind(("path", input.path))
            .bind(("operation", input.operation.as_str()))
            .bind(("outcome", input.outcome.as_str()))
            .bind(("failure_code", input.failure_code))
            .bind(("actor", input.actor))
            .bind(("timestamp", input.timestamp))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<AuditRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "operation_audit_record".into(),
            id: id_str,
        })?;

        row_to_record(row, id).map_err(Into::into)
    }

    async fn list(
        &self,
        filter: AuditRecordFilter,
        pagination: Pagination,
    ) -> StrongboxResult<PaginatedResult<OperationAuditRecord>> {
        let conditions = where_clause(&filter);
        let operation = filter.operation.map(|op| op.as_str().to_string());

        let mut count_result = self
            .db
            .query(format!(
                "SELECT count() AS total FROM operation_audit_record{conditions} GROUP ALL"
            ))
            .bind(("path", filter.path.clone()))
            .bind(("operation", operation.clone()))
            .bind(("from", filter.from))
            .bind(("to", filter.to))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(format!(
                "SELECT meta::id(id) AS record_id, * \
                 FROM operation_audit_record{conditions} \
                 ORDER BY id ASC \
                 LIMIT $limit START $offset"
            ))
            .bind(("path", filter.path))
            .bind(("operation", operation))
            .bind(("from", filter.from))
            .bind(("to", filter.to))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AuditRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(AuditRowWithId::try_into_record)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_no_where_clause() {
        assert_eq!(where_clause(&AuditRecordFilter::default()), "");
    }

    #[test]
    fn populated_filters_are_joined() {
        let filter = AuditRecordFilter {
            path: Some("/api/v1/data/foo".into()),
            operation: Some(AuditOperation::CredentialAccess),
            ..Default::default()
        };
        assert_eq!(
            where_clause(&filter),
            " WHERE path = $path AND operation = $operation"
        );
    }
}
