use std::str::FromStr;

use sqlx::types::Uuid;
use sqlx::PgConnection;
use time::OffsetDateTime;

use kernel::interface::query::LedgerOutboxQuery;
use kernel::interface::update::LedgerOutboxModifier;
use kernel::prelude::entity::{ContractId, LedgerOutbox, OutboxStatus, UpdatedAt};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::{ConvertError, DriverError};

pub struct PostgresLedgerOutboxRepository;

#[async_trait::async_trait]
impl LedgerOutboxQuery<PostgresTransaction> for PostgresLedgerOutboxRepository {
    async fn find_unregistered(
        &self,
        con: &mut PostgresTransaction,
        limit: i64,
    ) -> error_stack::Result<Vec<LedgerOutbox>, KernelError> {
        PgLedgerOutboxInternal::find_unregistered(con, limit).await
    }
}

#[async_trait::async_trait]
impl LedgerOutboxModifier<PostgresTransaction> for PostgresLedgerOutboxRepository {
    async fn create(
        &self,
        con: &mut PostgresTransaction,
        contract_id: &ContractId,
    ) -> error_stack::Result<(), KernelError> {
        PgLedgerOutboxInternal::create(con, contract_id).await
    }

    async fn mark_succeeded(
        &self,
        con: &mut PostgresTransaction,
        contract_id: &ContractId,
    ) -> error_stack::Result<(), KernelError> {
        PgLedgerOutboxInternal::mark_succeeded(con, contract_id).await
    }

    async fn mark_failed(
        &self,
        con: &mut PostgresTransaction,
        contract_id: &ContractId,
        error: &str,
    ) -> error_stack::Result<(), KernelError> {
        PgLedgerOutboxInternal::mark_failed(con, contract_id, error).await
    }
}

#[derive(sqlx::FromRow)]
struct LedgerOutboxRow {
    contract_id: Uuid,
    status: String,
    attempts: i32,
    last_error: Option<String>,
    updated_at: OffsetDateTime,
}

impl TryFrom<LedgerOutboxRow> for LedgerOutbox {
    type Error = DriverError;
    fn try_from(row: LedgerOutboxRow) -> Result<Self, DriverError> {
        let status = OutboxStatus::from_str(&row.status).map_err(|_| {
            DriverError::Conversion(anyhow::anyhow!("unknown outbox status: {}", row.status))
        })?;
        Ok(LedgerOutbox::new(
            ContractId::new(row.contract_id),
            status,
            row.attempts,
            row.last_error,
            UpdatedAt::new(row.updated_at),
        ))
    }
}

pub(in crate::database) struct PgLedgerOutboxInternal;

impl PgLedgerOutboxInternal {
    async fn find_unregistered(
        con: &mut PgConnection,
        limit: i64,
    ) -> error_stack::Result<Vec<LedgerOutbox>, KernelError> {
        let rows = sqlx::query_as::<_, LedgerOutboxRow>(
            // language=postgresql
            r#"
            SELECT contract_id, status, attempts, last_error, updated_at
            FROM ledger_outbox
            WHERE status <> 'SUCCEEDED'
            ORDER BY updated_at
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter()
            .map(LedgerOutbox::try_from)
            .collect::<Result<Vec<_>, DriverError>>()
            .convert_error()
    }

    async fn create(
        con: &mut PgConnection,
        contract_id: &ContractId,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO ledger_outbox (contract_id, status, attempts, last_error, updated_at)
            VALUES ($1, 'PENDING', 0, NULL, $2)
            "#,
        )
        .bind(contract_id.as_ref())
        .bind(OffsetDateTime::now_utc())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn mark_succeeded(
        con: &mut PgConnection,
        contract_id: &ContractId,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE ledger_outbox
            SET status = 'SUCCEEDED', last_error = NULL, updated_at = $2
            WHERE contract_id = $1
            "#,
        )
        .bind(contract_id.as_ref())
        .bind(OffsetDateTime::now_utc())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn mark_failed(
        con: &mut PgConnection,
        contract_id: &ContractId,
        error: &str,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE ledger_outbox
            SET status = 'FAILED', attempts = attempts + 1, last_error = $2, updated_at = $3
            WHERE contract_id = $1
            "#,
        )
        .bind(contract_id.as_ref())
        .bind(error)
        .bind(OffsetDateTime::now_utc())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
