use crate::database::Transaction;
use crate::entity::LedgerOutbox;
use crate::KernelError;

#[async_trait::async_trait]
pub trait LedgerOutboxQuery<Connection: Transaction>: Sync + Send + 'static {
    /// Entries whose registration has not succeeded yet, oldest first.
    /// Includes `Pending` rows: a crash between commit and dispatch leaves
    /// them behind, and the reconciler picks them up here.
    async fn find_unregistered(
        &self,
        con: &mut Connection,
        limit: i64,
    ) -> error_stack::Result<Vec<LedgerOutbox>, KernelError>;
}

pub trait DependOnLedgerOutboxQuery<Connection: Transaction>: Sync + Send + 'static {
    type LedgerOutboxQuery: LedgerOutboxQuery<Connection>;
    fn ledger_outbox_query(&self) -> &Self::LedgerOutboxQuery;
}
