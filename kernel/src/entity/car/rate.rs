use serde::{Deserialize, Serialize};

/// Rental rate in minor currency units per day.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyRate(i64);

impl DailyRate {
    pub fn new(rate: impl Into<i64>) -> Self {
        Self(rate.into())
    }
}

impl AsRef<i64> for DailyRate {
    fn as_ref(&self) -> &i64 {
        &self.0
    }
}

impl From<DailyRate> for i64 {
    fn from(value: DailyRate) -> Self {
        value.0
    }
}
