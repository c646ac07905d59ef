use crate::entity::{LedgerRef, RentalContract};
use crate::KernelError;

/// Append-only external ledger. Registration may be slow or fail
/// independently of local persistence; the returned reference is the
/// durable proof of success.
#[async_trait::async_trait]
pub trait LedgerClient: 'static + Sync + Send {
    async fn register_contract(
        &self,
        contract: &RentalContract,
    ) -> error_stack::Result<LedgerRef, KernelError>;
}

pub trait DependOnLedgerClient: 'static + Sync + Send {
    type LedgerClient: LedgerClient;
    fn ledger_client(&self) -> &Self::LedgerClient;
}
