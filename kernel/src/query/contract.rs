use crate::database::Transaction;
use crate::entity::{ContractId, RentalContract};
use crate::KernelError;

#[async_trait::async_trait]
pub trait RentalContractQuery<Connection: Transaction>: Sync + Send + 'static {
    async fn find_by_id(
        &self,
        con: &mut Connection,
        id: &ContractId,
    ) -> error_stack::Result<Option<RentalContract>, KernelError>;
}

pub trait DependOnRentalContractQuery<Connection: Transaction>: Sync + Send + 'static {
    type RentalContractQuery: RentalContractQuery<Connection>;
    fn rental_contract_query(&self) -> &Self::RentalContractQuery;
}
