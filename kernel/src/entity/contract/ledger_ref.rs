use serde::{Deserialize, Serialize};

/// Opaque transaction reference returned by the external ledger.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerRef(String);

impl LedgerRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }
}

impl AsRef<str> for LedgerRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<LedgerRef> for String {
    fn from(value: LedgerRef) -> Self {
        value.0
    }
}
