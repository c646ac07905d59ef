use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Requested rental date range. Construction is infallible; range checks
/// belong to the request-validating transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RentalPeriod {
    start: OffsetDateTime,
    end: OffsetDateTime,
}

impl RentalPeriod {
    pub fn new(start: impl Into<OffsetDateTime>, end: impl Into<OffsetDateTime>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn start(&self) -> &OffsetDateTime {
        &self.start
    }

    pub fn end(&self) -> &OffsetDateTime {
        &self.end
    }

    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }
}
