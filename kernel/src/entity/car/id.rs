use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarId(Uuid);

impl CarId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}

impl AsRef<Uuid> for CarId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<CarId> for Uuid {
    fn from(value: CarId) -> Self {
        value.0
    }
}
