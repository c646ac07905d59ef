use std::str::FromStr;

use sqlx::types::Uuid;
use sqlx::PgConnection;
use time::OffsetDateTime;

use kernel::interface::query::RentalRequestQuery;
use kernel::interface::update::RentalRequestModifier;
use kernel::prelude::entity::{
    CarId, CreatedAt, DailyRate, RentalPeriod, RentalRequest, RequestId, RequestStatus, UpdatedAt,
    UserId,
};
use kernel::interface::query::{PageRequest, RequestSort};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::{ConvertError, DriverError};

pub struct PostgresRentalRequestRepository;

#[async_trait::async_trait]
impl RentalRequestQuery<PostgresTransaction> for PostgresRentalRequestRepository {
    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &RequestId,
    ) -> error_stack::Result<Option<RentalRequest>, KernelError> {
        PgRentalRequestInternal::find_by_id(con, id).await
    }

    async fn find_pending_by_id_and_lessor(
        &self,
        con: &mut PostgresTransaction,
        id: &RequestId,
        lessor_id: &UserId,
    ) -> error_stack::Result<Option<RentalRequest>, KernelError> {
        PgRentalRequestInternal::find_pending_by_id_and_lessor(con, id, lessor_id).await
    }

    async fn find_by_lessor(
        &self,
        con: &mut PostgresTransaction,
        lessor_id: &UserId,
        status: Option<&RequestStatus>,
        sort: &RequestSort,
        page: &PageRequest,
    ) -> error_stack::Result<Vec<RentalRequest>, KernelError> {
        PgRentalRequestInternal::find_by_party(con, "lessor_id", lessor_id, status, sort, page)
            .await
    }

    async fn count_by_lessor(
        &self,
        con: &mut PostgresTransaction,
        lessor_id: &UserId,
        status: Option<&RequestStatus>,
    ) -> error_stack::Result<i64, KernelError> {
        PgRentalRequestInternal::count_by_party(con, "lessor_id", lessor_id, status).await
    }

    async fn find_by_lessee(
        &self,
        con: &mut PostgresTransaction,
        lessee_id: &UserId,
        status: Option<&RequestStatus>,
        sort: &RequestSort,
        page: &PageRequest,
    ) -> error_stack::Result<Vec<RentalRequest>, KernelError> {
        PgRentalRequestInternal::find_by_party(con, "lessee_id", lessee_id, status, sort, page)
            .await
    }

    async fn count_by_lessee(
        &self,
        con: &mut PostgresTransaction,
        lessee_id: &UserId,
        status: Option<&RequestStatus>,
    ) -> error_stack::Result<i64, KernelError> {
        PgRentalRequestInternal::count_by_party(con, "lessee_id", lessee_id, status).await
    }
}

#[async_trait::async_trait]
impl RentalRequestModifier<PostgresTransaction> for PostgresRentalRequestRepository {
    async fn create(
        &self,
        con: &mut PostgresTransaction,
        request: &RentalRequest,
    ) -> error_stack::Result<(), KernelError> {
        PgRentalRequestInternal::create(con, request).await
    }

    async fn transition_from_pending(
        &self,
        con: &mut PostgresTransaction,
        id: &RequestId,
        lessor_id: &UserId,
        to: &RequestStatus,
    ) -> error_stack::Result<Option<RentalRequest>, KernelError> {
        PgRentalRequestInternal::transition_from_pending(con, id, lessor_id, to).await
    }
}

#[derive(sqlx::FromRow)]
struct RentalRequestRow {
    id: Uuid,
    car_id: Uuid,
    lessee_id: Uuid,
    lessor_id: Uuid,
    start_at: OffsetDateTime,
    end_at: OffsetDateTime,
    offered_rate: i64,
    status: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<RentalRequestRow> for RentalRequest {
    type Error = DriverError;
    fn try_from(row: RentalRequestRow) -> Result<Self, DriverError> {
        let status = RequestStatus::from_str(&row.status).map_err(|_| {
            DriverError::Conversion(anyhow::anyhow!("unknown request status: {}", row.status))
        })?;
        Ok(RentalRequest::new(
            RequestId::new(row.id),
            CarId::new(row.car_id),
            UserId::new(row.lessee_id),
            UserId::new(row.lessor_id),
            RentalPeriod::new(row.start_at, row.end_at),
            DailyRate::new(row.offered_rate),
            status,
            CreatedAt::new(row.created_at),
            UpdatedAt::new(row.updated_at),
        ))
    }
}

pub(in crate::database) struct PgRentalRequestInternal;

impl PgRentalRequestInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &RequestId,
    ) -> error_stack::Result<Option<RentalRequest>, KernelError> {
        let row = sqlx::query_as::<_, RentalRequestRow>(
            // language=postgresql
            r#"
            SELECT id, car_id, lessee_id, lessor_id, start_at, end_at, offered_rate, status, created_at, updated_at
            FROM rental_requests
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(RentalRequest::try_from).transpose().convert_error()
    }

    async fn find_pending_by_id_and_lessor(
        con: &mut PgConnection,
        id: &RequestId,
        lessor_id: &UserId,
    ) -> error_stack::Result<Option<RentalRequest>, KernelError> {
        let row = sqlx::query_as::<_, RentalRequestRow>(
            // language=postgresql
            r#"
            SELECT id, car_id, lessee_id, lessor_id, start_at, end_at, offered_rate, status, created_at, updated_at
            FROM rental_requests
            WHERE id = $1 AND lessor_id = $2 AND status = 'PENDING'
            "#,
        )
        .bind(id.as_ref())
        .bind(lessor_id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(RentalRequest::try_from).transpose().convert_error()
    }

    async fn find_by_party(
        con: &mut PgConnection,
        party_column: &'static str,
        party_id: &UserId,
        status: Option<&RequestStatus>,
        sort: &RequestSort,
        page: &PageRequest,
    ) -> error_stack::Result<Vec<RentalRequest>, KernelError> {
        // Sort column and direction come from closed enums, never from the
        // caller's input.
        let query = format!(
            r#"
            SELECT id, car_id, lessee_id, lessor_id, start_at, end_at, offered_rate, status, created_at, updated_at
            FROM rental_requests
            WHERE {party_column} = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY {} {}
            LIMIT $3 OFFSET $4
            "#,
            sort.field().as_column(),
            if sort.is_descending() { "DESC" } else { "ASC" },
        );
        let rows = sqlx::query_as::<_, RentalRequestRow>(&query)
            .bind(party_id.as_ref())
            .bind(status.map(RequestStatus::as_str))
            .bind(page.size())
            .bind(page.offset())
            .fetch_all(con)
            .await
            .convert_error()?;
        rows.into_iter()
            .map(RentalRequest::try_from)
            .collect::<Result<Vec<_>, DriverError>>()
            .convert_error()
    }

    async fn count_by_party(
        con: &mut PgConnection,
        party_column: &'static str,
        party_id: &UserId,
        status: Option<&RequestStatus>,
    ) -> error_stack::Result<i64, KernelError> {
        let query = format!(
            r#"
            SELECT COUNT(*)
            FROM rental_requests
            WHERE {party_column} = $1 AND ($2::text IS NULL OR status = $2)
            "#
        );
        let count = sqlx::query_scalar::<_, i64>(&query)
            .bind(party_id.as_ref())
            .bind(status.map(RequestStatus::as_str))
            .fetch_one(con)
            .await
            .convert_error()?;
        Ok(count)
    }

    async fn create(
        con: &mut PgConnection,
        request: &RentalRequest,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO rental_requests (id, car_id, lessee_id, lessor_id, start_at, end_at, offered_rate, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(request.id().as_ref())
        .bind(request.car_id().as_ref())
        .bind(request.lessee_id().as_ref())
        .bind(request.lessor_id().as_ref())
        .bind(request.period().start())
        .bind(request.period().end())
        .bind(request.offered_rate().as_ref())
        .bind(request.status().as_str())
        .bind(request.created_at().as_ref())
        .bind(request.updated_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn transition_from_pending(
        con: &mut PgConnection,
        id: &RequestId,
        lessor_id: &UserId,
        to: &RequestStatus,
    ) -> error_stack::Result<Option<RentalRequest>, KernelError> {
        let row = sqlx::query_as::<_, RentalRequestRow>(
            // language=postgresql
            r#"
            UPDATE rental_requests
            SET status = $3, updated_at = $4
            WHERE id = $1 AND lessor_id = $2 AND status = 'PENDING'
            RETURNING id, car_id, lessee_id, lessor_id, start_at, end_at, offered_rate, status, created_at, updated_at
            "#,
        )
        .bind(id.as_ref())
        .bind(lessor_id.as_ref())
        .bind(to.as_str())
        .bind(OffsetDateTime::now_utc())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(RentalRequest::try_from).transpose().convert_error()
    }
}
