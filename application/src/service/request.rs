use error_stack::Report;
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::notify::{
    DependOnNotificationDispatcher, Notification, NotificationDispatcher,
};
use kernel::interface::query::{
    CarQuery, DependOnCarQuery, DependOnRentalRequestQuery, DependOnUserQuery, PageRequest,
    RentalRequestQuery, RequestSort, SortDirection, UserQuery,
};
use kernel::interface::update::{
    DependOnLedgerOutboxModifier, DependOnRentalContractModifier, DependOnRentalRequestModifier,
    LedgerOutboxModifier, RentalContractModifier, RentalRequestModifier,
};
use kernel::prelude::entity::{
    CarId, ContractId, DailyRate, RentalContract, RentalPeriod, RentalRequest, RequestId,
    RequestStatus, UserId,
};
use kernel::{EntityKind, KernelError};
use uuid::Uuid;

use crate::service::DependOnLedgerDispatch;
use crate::transfer::{
    Decision, DecideDto, DecisionOutcomeDto, GetRequestDto, ListRequestsDto, Page,
    RentalRequestDto, SubmitRequestDto,
};

/// Fires a notification and absorbs the outcome. Delivery is best effort;
/// a dispatch failure never fails the workflow that produced it.
async fn dispatch_absorbed<D: NotificationDispatcher>(dispatcher: &D, notification: Notification) {
    if let Err(report) = dispatcher.dispatch(notification).await {
        tracing::warn!("notification dispatch failed: {report:?}");
    }
}

#[async_trait::async_trait]
pub trait SubmitRequestService<Connection: Transaction + Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnCarQuery<Connection>
    + DependOnRentalRequestModifier<Connection>
    + DependOnNotificationDispatcher
{
    async fn submit_request(
        &self,
        dto: SubmitRequestDto,
    ) -> error_stack::Result<RentalRequestDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let car_id = CarId::new(dto.car_id);
        let car = self
            .car_query()
            .find_by_id(&mut connection, &car_id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound(EntityKind::Car))
                    .attach_printable(format!("car id: {}", dto.car_id))
            })?;

        let request = RentalRequest::open(
            RequestId::new(Uuid::new_v4()),
            car_id,
            UserId::new(dto.lessee_id),
            car.owner_id().clone(),
            RentalPeriod::new(dto.start, dto.end),
            DailyRate::new(dto.offered_rate),
        );
        self.rental_request_modifier()
            .create(&mut connection, &request)
            .await?;
        connection.commit().await?;

        dispatch_absorbed(
            self.notification_dispatcher(),
            Notification::request_submitted(request.lessor_id().clone(), request.id()),
        )
        .await;

        Ok(RentalRequestDto::from(request))
    }
}

impl<Connection: Transaction + Send, T> SubmitRequestService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnCarQuery<Connection>
        + DependOnRentalRequestModifier<Connection>
        + DependOnNotificationDispatcher
{
}

#[async_trait::async_trait]
pub trait DecideRequestService<Connection: Transaction + Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnRentalRequestQuery<Connection>
    + DependOnCarQuery<Connection>
    + DependOnUserQuery<Connection>
    + DependOnRentalRequestModifier<Connection>
    + DependOnRentalContractModifier<Connection>
    + DependOnLedgerOutboxModifier<Connection>
    + DependOnNotificationDispatcher
    + DependOnLedgerDispatch
{
    /// Decides a pending request on behalf of its lessor.
    ///
    /// The lookup is scoped by id, lessor and `Pending` status: a request
    /// that is missing, already decided, or addressed to another lessor is
    /// uniformly `NotFound`. A decision that loses the conditional update
    /// race gets `Conflict` instead; the storage layer serializes
    /// concurrent decisions, so at most one contract per request can exist.
    ///
    /// Approval runs in a single transaction up to and including the
    /// contract and outbox writes; ledger registration is handed to the
    /// detached worker and never blocks the caller.
    async fn decide(&self, dto: DecideDto) -> error_stack::Result<DecisionOutcomeDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let request_id = RequestId::new(dto.request_id);
        let lessor_id = UserId::new(dto.lessor_id);
        self.rental_request_query()
            .find_pending_by_id_and_lessor(&mut connection, &request_id, &lessor_id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound(EntityKind::RentalRequest))
                    .attach_printable(format!("request id: {}", dto.request_id))
            })?;

        match dto.decision {
            Decision::Reject => {
                let rejected = self
                    .rental_request_modifier()
                    .transition_from_pending(
                        &mut connection,
                        &request_id,
                        &lessor_id,
                        &RequestStatus::Rejected,
                    )
                    .await?
                    .ok_or_else(|| Report::new(KernelError::Conflict))?;
                connection.commit().await?;

                dispatch_absorbed(
                    self.notification_dispatcher(),
                    Notification::request_rejected(rejected.lessee_id().clone(), rejected.id()),
                )
                .await;

                Ok(DecisionOutcomeDto::Rejected(rejected.into()))
            }
            Decision::Approve(terms) => {
                let approved = self
                    .rental_request_modifier()
                    .transition_from_pending(
                        &mut connection,
                        &request_id,
                        &lessor_id,
                        &RequestStatus::Approved,
                    )
                    .await?
                    .ok_or_else(|| Report::new(KernelError::Conflict))?;

                // The transaction is still open: if the car or lessor
                // vanished between submission and decision, the approval
                // write rolls back with everything else.
                let car = self
                    .car_query()
                    .find_by_id(&mut connection, approved.car_id())
                    .await?
                    .ok_or_else(|| Report::new(KernelError::NotFound(EntityKind::Car)))?;
                self.user_query()
                    .find_by_id(&mut connection, approved.lessor_id())
                    .await?
                    .ok_or_else(|| Report::new(KernelError::NotFound(EntityKind::User)))?;

                let contract = RentalContract::conclude(
                    ContractId::new(Uuid::new_v4()),
                    &approved,
                    &car,
                    terms.map(Into::into),
                );
                self.rental_contract_modifier()
                    .create(&mut connection, &contract)
                    .await?;
                self.ledger_outbox_modifier()
                    .create(&mut connection, contract.id())
                    .await?;
                connection.commit().await?;

                dispatch_absorbed(
                    self.notification_dispatcher(),
                    Notification::contract_signed(contract.lessee_id().clone(), contract.id()),
                )
                .await;
                self.ledger_dispatch().dispatch(contract.clone());

                Ok(DecisionOutcomeDto::Approved(contract.into()))
            }
        }
    }
}

impl<Connection: Transaction + Send, T> DecideRequestService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnRentalRequestQuery<Connection>
        + DependOnCarQuery<Connection>
        + DependOnUserQuery<Connection>
        + DependOnRentalRequestModifier<Connection>
        + DependOnRentalContractModifier<Connection>
        + DependOnLedgerOutboxModifier<Connection>
        + DependOnNotificationDispatcher
        + DependOnLedgerDispatch
{
}

#[async_trait::async_trait]
pub trait GetRequestService<Connection: Transaction + Send>:
    'static + Sync + Send + DependOnDatabaseConnection<Connection> + DependOnRentalRequestQuery<Connection>
{
    /// Unscoped accessor; callers layer their own authorization.
    async fn get_request(
        &self,
        dto: GetRequestDto,
    ) -> error_stack::Result<RentalRequestDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let request = self
            .rental_request_query()
            .find_by_id(&mut connection, &RequestId::new(dto.request_id))
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound(EntityKind::RentalRequest))
                    .attach_printable(format!("request id: {}", dto.request_id))
            })?;

        Ok(request.into())
    }

    async fn list_for_lessor(
        &self,
        dto: ListRequestsDto,
    ) -> error_stack::Result<Page<RentalRequestDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let lessor_id = UserId::new(dto.actor_id);
        let sort = sort_of(&dto);
        let page = PageRequest::new(dto.page, dto.size);
        let items = self
            .rental_request_query()
            .find_by_lessor(&mut connection, &lessor_id, dto.status.as_ref(), &sort, &page)
            .await?;
        let total = self
            .rental_request_query()
            .count_by_lessor(&mut connection, &lessor_id, dto.status.as_ref())
            .await?;

        Ok(Page::new(
            items.into_iter().map(Into::into).collect(),
            total,
            dto.page,
            dto.size,
        ))
    }

    async fn list_for_lessee(
        &self,
        dto: ListRequestsDto,
    ) -> error_stack::Result<Page<RentalRequestDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let lessee_id = UserId::new(dto.actor_id);
        let sort = sort_of(&dto);
        let page = PageRequest::new(dto.page, dto.size);
        let items = self
            .rental_request_query()
            .find_by_lessee(&mut connection, &lessee_id, dto.status.as_ref(), &sort, &page)
            .await?;
        let total = self
            .rental_request_query()
            .count_by_lessee(&mut connection, &lessee_id, dto.status.as_ref())
            .await?;

        Ok(Page::new(
            items.into_iter().map(Into::into).collect(),
            total,
            dto.page,
            dto.size,
        ))
    }
}

fn sort_of(dto: &ListRequestsDto) -> RequestSort {
    let direction = if dto.descending {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    RequestSort::new(dto.sort_field, direction)
}

impl<Connection: Transaction + Send, T> GetRequestService<Connection> for T where
    T: DependOnDatabaseConnection<Connection> + DependOnRentalRequestQuery<Connection>
{
}
