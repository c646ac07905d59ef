use crate::database::Transaction;
use crate::entity::{RentalRequest, RequestId, RequestStatus, UserId};
use crate::query::{PageRequest, RequestSort};
use crate::KernelError;

#[async_trait::async_trait]
pub trait RentalRequestQuery<Connection: Transaction>: Sync + Send + 'static {
    async fn find_by_id(
        &self,
        con: &mut Connection,
        id: &RequestId,
    ) -> error_stack::Result<Option<RentalRequest>, KernelError>;

    /// Ownership-scoped lookup used by the decision path. Filters on
    /// `Pending`, so a decided request is indistinguishable from one that
    /// does not belong to the lessor.
    async fn find_pending_by_id_and_lessor(
        &self,
        con: &mut Connection,
        id: &RequestId,
        lessor_id: &UserId,
    ) -> error_stack::Result<Option<RentalRequest>, KernelError>;

    async fn find_by_lessor(
        &self,
        con: &mut Connection,
        lessor_id: &UserId,
        status: Option<&RequestStatus>,
        sort: &RequestSort,
        page: &PageRequest,
    ) -> error_stack::Result<Vec<RentalRequest>, KernelError>;

    async fn count_by_lessor(
        &self,
        con: &mut Connection,
        lessor_id: &UserId,
        status: Option<&RequestStatus>,
    ) -> error_stack::Result<i64, KernelError>;

    async fn find_by_lessee(
        &self,
        con: &mut Connection,
        lessee_id: &UserId,
        status: Option<&RequestStatus>,
        sort: &RequestSort,
        page: &PageRequest,
    ) -> error_stack::Result<Vec<RentalRequest>, KernelError>;

    async fn count_by_lessee(
        &self,
        con: &mut Connection,
        lessee_id: &UserId,
        status: Option<&RequestStatus>,
    ) -> error_stack::Result<i64, KernelError>;
}

pub trait DependOnRentalRequestQuery<Connection: Transaction>: Sync + Send + 'static {
    type RentalRequestQuery: RentalRequestQuery<Connection>;
    fn rental_request_query(&self) -> &Self::RentalRequestQuery;
}
