use serde::{Deserialize, Serialize};

use crate::entity::{DailyRate, RentalPeriod};

/// Terms the parties are bound to, fixed at approval time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreedTerms {
    period: RentalPeriod,
    daily_rate: DailyRate,
    pickup_location: Option<String>,
}

impl AgreedTerms {
    pub fn new(
        period: RentalPeriod,
        daily_rate: DailyRate,
        pickup_location: Option<String>,
    ) -> Self {
        Self {
            period,
            daily_rate,
            pickup_location,
        }
    }

    pub fn period(&self) -> &RentalPeriod {
        &self.period
    }

    pub fn daily_rate(&self) -> &DailyRate {
        &self.daily_rate
    }

    pub fn pickup_location(&self) -> Option<&str> {
        self.pickup_location.as_deref()
    }
}

/// Optional adjustments supplied by the lessor on approval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalTerms {
    daily_rate: Option<DailyRate>,
    pickup_location: Option<String>,
}

impl ApprovalTerms {
    pub fn new(daily_rate: Option<DailyRate>, pickup_location: Option<String>) -> Self {
        Self {
            daily_rate,
            pickup_location,
        }
    }

    pub fn daily_rate(&self) -> Option<DailyRate> {
        self.daily_rate
    }

    pub fn into_pickup_location(self) -> Option<String> {
        self.pickup_location
    }
}
