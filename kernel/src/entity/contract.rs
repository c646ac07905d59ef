mod id;
mod ledger_ref;
mod terms;

pub use self::{id::*, ledger_ref::*, terms::*};
use serde::{Deserialize, Serialize};

use crate::entity::{Car, CarId, CreatedAt, RentalRequest, RequestId, UserId};

/// The binding agreement materialized when a request is approved.
///
/// Exactly one contract may exist per request. `ledger_ref` stays unset
/// until the asynchronous ledger registration reports back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalContract {
    id: ContractId,
    request_id: RequestId,
    car_id: CarId,
    lessor_id: UserId,
    lessee_id: UserId,
    terms: AgreedTerms,
    signed_at: CreatedAt<RentalContract>,
    ledger_ref: Option<LedgerRef>,
}

impl RentalContract {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ContractId,
        request_id: RequestId,
        car_id: CarId,
        lessor_id: UserId,
        lessee_id: UserId,
        terms: AgreedTerms,
        signed_at: CreatedAt<RentalContract>,
        ledger_ref: Option<LedgerRef>,
    ) -> Self {
        Self {
            id,
            request_id,
            car_id,
            lessor_id,
            lessee_id,
            terms,
            signed_at,
            ledger_ref,
        }
    }

    /// Builds the contract for an approved request. Terms come from the
    /// request and the car's current rate unless the lessor overrides them.
    pub fn conclude(
        id: ContractId,
        request: &RentalRequest,
        car: &Car,
        approval: Option<ApprovalTerms>,
    ) -> Self {
        let approval = approval.unwrap_or_default();
        let terms = AgreedTerms::new(
            *request.period(),
            approval.daily_rate().unwrap_or(*car.daily_rate()),
            approval.into_pickup_location(),
        );
        Self {
            id,
            request_id: request.id().clone(),
            car_id: request.car_id().clone(),
            lessor_id: request.lessor_id().clone(),
            lessee_id: request.lessee_id().clone(),
            terms,
            signed_at: CreatedAt::now(),
            ledger_ref: None,
        }
    }

    /// Returns the contract with the ledger reference recorded.
    pub fn registered(mut self, ledger_ref: LedgerRef) -> Self {
        self.ledger_ref = Some(ledger_ref);
        self
    }

    pub fn id(&self) -> &ContractId {
        &self.id
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn car_id(&self) -> &CarId {
        &self.car_id
    }

    pub fn lessor_id(&self) -> &UserId {
        &self.lessor_id
    }

    pub fn lessee_id(&self) -> &UserId {
        &self.lessee_id
    }

    pub fn terms(&self) -> &AgreedTerms {
        &self.terms
    }

    pub fn signed_at(&self) -> &CreatedAt<RentalContract> {
        &self.signed_at
    }

    pub fn ledger_ref(&self) -> Option<&LedgerRef> {
        self.ledger_ref.as_ref()
    }
}
