mod id;
mod period;
mod status;

pub use self::{id::*, period::*, status::*};
use serde::{Deserialize, Serialize};

use crate::entity::{CarId, CreatedAt, DailyRate, UpdatedAt, UserId};

/// A rental proposal from a lessee, pending the lessor's decision.
///
/// The lessor is copied from the car's owner at creation time and never
/// re-derived. Requests start `Pending` and move exactly once to `Approved`
/// or `Rejected`; they are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalRequest {
    id: RequestId,
    car_id: CarId,
    lessee_id: UserId,
    lessor_id: UserId,
    period: RentalPeriod,
    offered_rate: DailyRate,
    status: RequestStatus,
    created_at: CreatedAt<RentalRequest>,
    updated_at: UpdatedAt<RentalRequest>,
}

impl RentalRequest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: RequestId,
        car_id: CarId,
        lessee_id: UserId,
        lessor_id: UserId,
        period: RentalPeriod,
        offered_rate: DailyRate,
        status: RequestStatus,
        created_at: CreatedAt<RentalRequest>,
        updated_at: UpdatedAt<RentalRequest>,
    ) -> Self {
        Self {
            id,
            car_id,
            lessee_id,
            lessor_id,
            period,
            offered_rate,
            status,
            created_at,
            updated_at,
        }
    }

    /// Builds a freshly submitted request. Status is always `Pending`.
    pub fn open(
        id: RequestId,
        car_id: CarId,
        lessee_id: UserId,
        lessor_id: UserId,
        period: RentalPeriod,
        offered_rate: DailyRate,
    ) -> Self {
        Self {
            id,
            car_id,
            lessee_id,
            lessor_id,
            period,
            offered_rate,
            status: RequestStatus::Pending,
            created_at: CreatedAt::now(),
            updated_at: UpdatedAt::now(),
        }
    }

    /// Returns the request with `status` replaced and `updated_at` refreshed.
    pub fn transitioned(mut self, to: RequestStatus) -> Self {
        self.status = to;
        self.updated_at = UpdatedAt::now();
        self
    }

    pub fn id(&self) -> &RequestId {
        &self.id
    }

    pub fn car_id(&self) -> &CarId {
        &self.car_id
    }

    pub fn lessee_id(&self) -> &UserId {
        &self.lessee_id
    }

    pub fn lessor_id(&self) -> &UserId {
        &self.lessor_id
    }

    pub fn period(&self) -> &RentalPeriod {
        &self.period
    }

    pub fn offered_rate(&self) -> &DailyRate {
        &self.offered_rate
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    pub fn created_at(&self) -> &CreatedAt<RentalRequest> {
        &self.created_at
    }

    pub fn updated_at(&self) -> &UpdatedAt<RentalRequest> {
        &self.updated_at
    }
}
