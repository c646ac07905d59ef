use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(Uuid);

impl ContractId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}

impl AsRef<Uuid> for ContractId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<ContractId> for Uuid {
    fn from(value: ContractId) -> Self {
        value.0
    }
}
