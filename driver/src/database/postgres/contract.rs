use sqlx::types::Uuid;
use sqlx::PgConnection;
use time::OffsetDateTime;

use kernel::interface::query::RentalContractQuery;
use kernel::interface::update::RentalContractModifier;
use kernel::prelude::entity::{
    AgreedTerms, CarId, ContractId, CreatedAt, DailyRate, LedgerRef, RentalContract, RentalPeriod,
    RequestId, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresRentalContractRepository;

#[async_trait::async_trait]
impl RentalContractQuery<PostgresTransaction> for PostgresRentalContractRepository {
    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &ContractId,
    ) -> error_stack::Result<Option<RentalContract>, KernelError> {
        PgRentalContractInternal::find_by_id(con, id).await
    }
}

#[async_trait::async_trait]
impl RentalContractModifier<PostgresTransaction> for PostgresRentalContractRepository {
    async fn create(
        &self,
        con: &mut PostgresTransaction,
        contract: &RentalContract,
    ) -> error_stack::Result<(), KernelError> {
        PgRentalContractInternal::create(con, contract).await
    }

    async fn set_ledger_ref(
        &self,
        con: &mut PostgresTransaction,
        id: &ContractId,
        ledger_ref: &LedgerRef,
    ) -> error_stack::Result<(), KernelError> {
        PgRentalContractInternal::set_ledger_ref(con, id, ledger_ref).await
    }
}

#[derive(sqlx::FromRow)]
struct RentalContractRow {
    id: Uuid,
    request_id: Uuid,
    car_id: Uuid,
    lessor_id: Uuid,
    lessee_id: Uuid,
    start_at: OffsetDateTime,
    end_at: OffsetDateTime,
    daily_rate: i64,
    pickup_location: Option<String>,
    signed_at: OffsetDateTime,
    ledger_ref: Option<String>,
}

impl From<RentalContractRow> for RentalContract {
    fn from(row: RentalContractRow) -> Self {
        RentalContract::new(
            ContractId::new(row.id),
            RequestId::new(row.request_id),
            CarId::new(row.car_id),
            UserId::new(row.lessor_id),
            UserId::new(row.lessee_id),
            AgreedTerms::new(
                RentalPeriod::new(row.start_at, row.end_at),
                DailyRate::new(row.daily_rate),
                row.pickup_location,
            ),
            CreatedAt::new(row.signed_at),
            row.ledger_ref.map(LedgerRef::new),
        )
    }
}

pub(in crate::database) struct PgRentalContractInternal;

impl PgRentalContractInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &ContractId,
    ) -> error_stack::Result<Option<RentalContract>, KernelError> {
        let row = sqlx::query_as::<_, RentalContractRow>(
            // language=postgresql
            r#"
            SELECT id, request_id, car_id, lessor_id, lessee_id, start_at, end_at, daily_rate, pickup_location, signed_at, ledger_ref
            FROM rental_contracts
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(RentalContract::from))
    }

    /// The unique index on `request_id` turns a duplicate insert into
    /// `Conflict`.
    async fn create(
        con: &mut PgConnection,
        contract: &RentalContract,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO rental_contracts (id, request_id, car_id, lessor_id, lessee_id, start_at, end_at, daily_rate, pickup_location, signed_at, ledger_ref)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(contract.id().as_ref())
        .bind(contract.request_id().as_ref())
        .bind(contract.car_id().as_ref())
        .bind(contract.lessor_id().as_ref())
        .bind(contract.lessee_id().as_ref())
        .bind(contract.terms().period().start())
        .bind(contract.terms().period().end())
        .bind(contract.terms().daily_rate().as_ref())
        .bind(contract.terms().pickup_location())
        .bind(contract.signed_at().as_ref())
        .bind(contract.ledger_ref().map(AsRef::as_ref))
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn set_ledger_ref(
        con: &mut PgConnection,
        id: &ContractId,
        ledger_ref: &LedgerRef,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE rental_contracts
            SET ledger_ref = $2
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .bind(ledger_ref.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
