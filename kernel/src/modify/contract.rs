use crate::database::Transaction;
use crate::entity::{ContractId, LedgerRef, RentalContract};
use crate::KernelError;

#[async_trait::async_trait]
pub trait RentalContractModifier<Connection: Transaction>: 'static + Sync + Send {
    async fn create(
        &self,
        con: &mut Connection,
        contract: &RentalContract,
    ) -> error_stack::Result<(), KernelError>;

    async fn set_ledger_ref(
        &self,
        con: &mut Connection,
        id: &ContractId,
        ledger_ref: &LedgerRef,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnRentalContractModifier<Connection: Transaction>: 'static + Sync + Send {
    type RentalContractModifier: RentalContractModifier<Connection>;
    fn rental_contract_modifier(&self) -> &Self::RentalContractModifier;
}
