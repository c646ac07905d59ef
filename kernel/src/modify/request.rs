use crate::database::Transaction;
use crate::entity::{RentalRequest, RequestId, RequestStatus, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait RentalRequestModifier<Connection: Transaction>: 'static + Sync + Send {
    async fn create(
        &self,
        con: &mut Connection,
        request: &RentalRequest,
    ) -> error_stack::Result<(), KernelError>;

    /// Atomic conditional transition: updates status and `updated_at` only
    /// where the row is still `Pending` and owned by `lessor_id`, returning
    /// the updated request. `None` means the guard did not match; the
    /// caller decides between `NotFound` and `Conflict`.
    async fn transition_from_pending(
        &self,
        con: &mut Connection,
        id: &RequestId,
        lessor_id: &UserId,
        to: &RequestStatus,
    ) -> error_stack::Result<Option<RentalRequest>, KernelError>;
}

pub trait DependOnRentalRequestModifier<Connection: Transaction>: 'static + Sync + Send {
    type RentalRequestModifier: RentalRequestModifier<Connection>;
    fn rental_request_modifier(&self) -> &Self::RentalRequestModifier;
}
