use crate::database::Transaction;
use crate::entity::ContractId;
use crate::KernelError;

#[async_trait::async_trait]
pub trait LedgerOutboxModifier<Connection: Transaction>: 'static + Sync + Send {
    /// Inserts a `Pending` entry with zero attempts.
    async fn create(
        &self,
        con: &mut Connection,
        contract_id: &ContractId,
    ) -> error_stack::Result<(), KernelError>;

    async fn mark_succeeded(
        &self,
        con: &mut Connection,
        contract_id: &ContractId,
    ) -> error_stack::Result<(), KernelError>;

    /// Records a failed attempt, bumping the attempt counter.
    async fn mark_failed(
        &self,
        con: &mut Connection,
        contract_id: &ContractId,
        error: &str,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnLedgerOutboxModifier<Connection: Transaction>: 'static + Sync + Send {
    type LedgerOutboxModifier: LedgerOutboxModifier<Connection>;
    fn ledger_outbox_modifier(&self) -> &Self::LedgerOutboxModifier;
}
