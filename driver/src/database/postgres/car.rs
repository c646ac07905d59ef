use sqlx::types::Uuid;
use sqlx::PgConnection;

use kernel::interface::query::CarQuery;
use kernel::prelude::entity::{Car, CarId, CarName, DailyRate, UserId};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresCarRepository;

#[async_trait::async_trait]
impl CarQuery<PostgresTransaction> for PostgresCarRepository {
    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &CarId,
    ) -> error_stack::Result<Option<Car>, KernelError> {
        PgCarInternal::find_by_id(con, id).await
    }
}

#[derive(sqlx::FromRow)]
struct CarRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    daily_rate: i64,
}

impl From<CarRow> for Car {
    fn from(row: CarRow) -> Self {
        Car::new(
            CarId::new(row.id),
            UserId::new(row.owner_id),
            CarName::new(row.name),
            DailyRate::new(row.daily_rate),
        )
    }
}

pub(in crate::database) struct PgCarInternal;

impl PgCarInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &CarId,
    ) -> error_stack::Result<Option<Car>, KernelError> {
        let row = sqlx::query_as::<_, CarRow>(
            // language=postgresql
            r#"
            SELECT id, owner_id, name, daily_rate
            FROM cars
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Car::from))
    }
}
