use kernel::prelude::entity::{ApprovalTerms, DailyRate, RentalContract};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::transfer::{ApprovalTermsDto, RentalRequestDto};

#[derive(Debug, Clone, PartialEq)]
pub struct RentalContractDto {
    pub id: Uuid,
    pub request_id: Uuid,
    pub car_id: Uuid,
    pub lessor_id: Uuid,
    pub lessee_id: Uuid,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
    pub daily_rate: i64,
    pub pickup_location: Option<String>,
    pub signed_at: OffsetDateTime,
    pub ledger_ref: Option<String>,
}

impl From<RentalContract> for RentalContractDto {
    fn from(value: RentalContract) -> Self {
        Self {
            id: *value.id().as_ref(),
            request_id: *value.request_id().as_ref(),
            car_id: *value.car_id().as_ref(),
            lessor_id: *value.lessor_id().as_ref(),
            lessee_id: *value.lessee_id().as_ref(),
            start: *value.terms().period().start(),
            end: *value.terms().period().end(),
            daily_rate: (*value.terms().daily_rate()).into(),
            pickup_location: value.terms().pickup_location().map(str::to_owned),
            signed_at: *value.signed_at().as_ref(),
            ledger_ref: value.ledger_ref().map(|r| r.as_ref().to_owned()),
        }
    }
}

impl From<ApprovalTermsDto> for ApprovalTerms {
    fn from(value: ApprovalTermsDto) -> Self {
        ApprovalTerms::new(value.daily_rate.map(DailyRate::new), value.pickup_location)
    }
}

/// What `decide` hands back: the contract on approval, the updated request
/// on rejection.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionOutcomeDto {
    Approved(RentalContractDto),
    Rejected(RentalRequestDto),
}
