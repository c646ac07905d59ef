use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarName(String);

impl CarName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl AsRef<str> for CarName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CarName> for String {
    fn from(value: CarName) -> Self {
        value.0
    }
}
