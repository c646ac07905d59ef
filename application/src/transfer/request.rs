use kernel::interface::query::RequestSortField;
use kernel::prelude::entity::{RentalRequest, RequestStatus};
use time::OffsetDateTime;
use uuid::Uuid;

pub struct SubmitRequestDto {
    pub car_id: Uuid,
    pub lessee_id: Uuid,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
    pub offered_rate: i64,
}

#[derive(Debug, Clone)]
pub struct ApprovalTermsDto {
    pub daily_rate: Option<i64>,
    pub pickup_location: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Decision {
    Approve(Option<ApprovalTermsDto>),
    Reject,
}

pub struct DecideDto {
    pub request_id: Uuid,
    pub lessor_id: Uuid,
    pub decision: Decision,
}

pub struct GetRequestDto {
    pub request_id: Uuid,
}

pub struct ListRequestsDto {
    pub actor_id: Uuid,
    pub status: Option<RequestStatus>,
    pub sort_field: RequestSortField,
    pub descending: bool,
    pub page: i64,
    pub size: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RentalRequestDto {
    pub id: Uuid,
    pub car_id: Uuid,
    pub lessee_id: Uuid,
    pub lessor_id: Uuid,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
    pub offered_rate: i64,
    pub status: RequestStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<RentalRequest> for RentalRequestDto {
    fn from(value: RentalRequest) -> Self {
        Self {
            id: *value.id().as_ref(),
            car_id: *value.car_id().as_ref(),
            lessee_id: *value.lessee_id().as_ref(),
            lessor_id: *value.lessor_id().as_ref(),
            start: *value.period().start(),
            end: *value.period().end(),
            offered_rate: (*value.offered_rate()).into(),
            status: *value.status(),
            created_at: *value.created_at().as_ref(),
            updated_at: *value.updated_at().as_ref(),
        }
    }
}
