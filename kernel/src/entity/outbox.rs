mod status;

pub use self::status::*;
use serde::{Deserialize, Serialize};

use crate::entity::{ContractId, UpdatedAt};

/// Durable record of a contract's ledger registration, written in the same
/// transaction as the contract itself. The background worker flips it to
/// `Succeeded` or `Failed`; the reconciler re-drives anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerOutbox {
    contract_id: ContractId,
    status: OutboxStatus,
    attempts: i32,
    last_error: Option<String>,
    updated_at: UpdatedAt<LedgerOutbox>,
}

impl LedgerOutbox {
    pub fn new(
        contract_id: ContractId,
        status: OutboxStatus,
        attempts: i32,
        last_error: Option<String>,
        updated_at: UpdatedAt<LedgerOutbox>,
    ) -> Self {
        Self {
            contract_id,
            status,
            attempts,
            last_error,
            updated_at,
        }
    }

    pub fn contract_id(&self) -> &ContractId {
        &self.contract_id
    }

    pub fn status(&self) -> &OutboxStatus {
        &self.status
    }

    pub fn attempts(&self) -> i32 {
        self.attempts
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn updated_at(&self) -> &UpdatedAt<LedgerOutbox> {
        &self.updated_at
    }
}
