use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::ledger::{DependOnLedgerClient, LedgerClient};
use kernel::interface::query::{
    DependOnLedgerOutboxQuery, DependOnRentalContractQuery, LedgerOutboxQuery, RentalContractQuery,
};
use kernel::interface::update::{
    DependOnLedgerOutboxModifier, DependOnRentalContractModifier, LedgerOutboxModifier,
    RentalContractModifier,
};
use kernel::prelude::entity::{ContractId, LedgerRef, RentalContract};
use kernel::KernelError;
use tokio::sync::mpsc;

/// Hand-off point between `decide` and the registration worker. Sending is
/// non-blocking and infallible from the caller's point of view: if the
/// worker is gone the contract stays `Pending` in the outbox and the
/// reconciler re-drives it.
#[derive(Debug, Clone)]
pub struct LedgerDispatch {
    sender: mpsc::UnboundedSender<RentalContract>,
}

impl LedgerDispatch {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RentalContract>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn dispatch(&self, contract: RentalContract) {
        let contract_id = contract.id().clone();
        if self.sender.send(contract).is_err() {
            tracing::error!(
                "ledger worker is gone; contract {} left to the reconciler",
                contract_id.as_ref()
            );
        }
    }
}

pub trait DependOnLedgerDispatch: 'static + Sync + Send {
    fn ledger_dispatch(&self) -> &LedgerDispatch;
}

#[async_trait::async_trait]
pub trait LedgerRegistrationService<Connection: Transaction + Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnLedgerClient
    + DependOnRentalContractModifier<Connection>
    + DependOnLedgerOutboxModifier<Connection>
{
    /// Worker loop for dispatched contracts. Returns once every dispatch
    /// handle is dropped.
    async fn run_ledger_worker(&self, mut receiver: mpsc::UnboundedReceiver<RentalContract>) {
        while let Some(contract) = receiver.recv().await {
            self.register_once(&contract).await;
        }
    }

    /// One registration attempt. Outcomes land in the outbox; nothing
    /// propagates to the workflow that issued the contract.
    async fn register_once(&self, contract: &RentalContract) {
        match self.ledger_client().register_contract(contract).await {
            Ok(ledger_ref) => {
                if let Err(report) = self.record_registration(contract.id(), &ledger_ref).await {
                    tracing::error!(
                        "failed to record ledger registration of contract {}: {report:?}",
                        contract.id().as_ref()
                    );
                }
            }
            Err(report) => {
                tracing::error!(
                    "ledger registration of contract {} failed: {report:?}",
                    contract.id().as_ref()
                );
                if let Err(report) = self
                    .record_failure(contract.id(), &format!("{report:?}"))
                    .await
                {
                    tracing::error!(
                        "failed to record ledger failure of contract {}: {report:?}",
                        contract.id().as_ref()
                    );
                }
            }
        }
    }

    async fn record_registration(
        &self,
        id: &ContractId,
        ledger_ref: &LedgerRef,
    ) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;
        self.rental_contract_modifier()
            .set_ledger_ref(&mut connection, id, ledger_ref)
            .await?;
        self.ledger_outbox_modifier()
            .mark_succeeded(&mut connection, id)
            .await?;
        connection.commit().await?;
        Ok(())
    }

    async fn record_failure(
        &self,
        id: &ContractId,
        error: &str,
    ) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;
        self.ledger_outbox_modifier()
            .mark_failed(&mut connection, id, error)
            .await?;
        connection.commit().await?;
        Ok(())
    }
}

impl<Connection: Transaction + Send, T> LedgerRegistrationService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnLedgerClient
        + DependOnRentalContractModifier<Connection>
        + DependOnLedgerOutboxModifier<Connection>
{
}

#[async_trait::async_trait]
pub trait ReconcileLedgerService<Connection: Transaction + Send>:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection<Connection>
    + DependOnLedgerOutboxQuery<Connection>
    + DependOnRentalContractQuery<Connection>
    + DependOnLedgerOutboxModifier<Connection>
    + DependOnLedgerDispatch
{
    /// Re-drives registrations whose outcome never became `Succeeded`.
    /// Meant to be run periodically, and at startup to cover a crash
    /// between commit and dispatch. Returns how many contracts were handed
    /// back to the worker.
    async fn reconcile_ledger(&self, batch: i64) -> error_stack::Result<usize, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let entries = self
            .ledger_outbox_query()
            .find_unregistered(&mut connection, batch)
            .await?;

        let mut redispatched = 0;
        for entry in entries {
            let contract = self
                .rental_contract_query()
                .find_by_id(&mut connection, entry.contract_id())
                .await?;
            let Some(contract) = contract else {
                tracing::error!(
                    "outbox entry references missing contract {}",
                    entry.contract_id().as_ref()
                );
                continue;
            };
            if contract.ledger_ref().is_some() {
                // Already on the ledger; only the outbox row is stale.
                self.ledger_outbox_modifier()
                    .mark_succeeded(&mut connection, contract.id())
                    .await?;
                continue;
            }
            self.ledger_dispatch().dispatch(contract);
            redispatched += 1;
        }
        connection.commit().await?;

        Ok(redispatched)
    }
}

impl<Connection: Transaction + Send, T> ReconcileLedgerService<Connection> for T where
    T: DependOnDatabaseConnection<Connection>
        + DependOnLedgerOutboxQuery<Connection>
        + DependOnRentalContractQuery<Connection>
        + DependOnLedgerOutboxModifier<Connection>
        + DependOnLedgerDispatch
{
}

#[cfg(test)]
mod test {
    use error_stack::Result;
    use kernel::prelude::entity::{OutboxStatus, RequestStatus};
    use kernel::KernelError;
    use std::sync::atomic::Ordering;
    use time::{Duration, OffsetDateTime};
    use tokio::sync::mpsc::UnboundedReceiver;
    use uuid::Uuid;

    use kernel::prelude::entity::RentalContract;

    use crate::service::memory::MemoryModule;
    use crate::service::{
        DecideRequestService, LedgerRegistrationService, ReconcileLedgerService,
        SubmitRequestService,
    };
    use crate::transfer::{DecideDto, Decision, SubmitRequestDto};

    async fn approved_contract(
        module: &MemoryModule,
        receiver: &mut UnboundedReceiver<RentalContract>,
    ) -> Result<RentalContract, KernelError> {
        let owner = module.add_user("lessor");
        let lessee = module.add_user("lessee");
        let car = module.add_car(owner, 4500);
        let start = OffsetDateTime::now_utc() + Duration::days(1);
        let request = module
            .submit_request(SubmitRequestDto {
                car_id: car,
                lessee_id: lessee,
                start,
                end: start + Duration::days(2),
                offered_rate: 4000,
            })
            .await?;
        module
            .decide(DecideDto {
                request_id: request.id,
                lessor_id: owner,
                decision: Decision::Approve(None),
            })
            .await?;
        Ok(receiver.try_recv().expect("contract dispatched"))
    }

    #[tokio::test]
    async fn successful_registration_fills_ref_and_outbox() -> Result<(), KernelError> {
        let (module, mut receiver) = MemoryModule::new();
        let contract = approved_contract(&module, &mut receiver).await?;

        module.register_once(&contract).await;

        let state = module.state();
        let stored = state.contracts.get(contract.id()).expect("contract kept");
        assert_eq!(
            stored.ledger_ref().map(|r| r.as_ref().to_owned()),
            Some(format!("ledger-tx-{}", contract.id().as_ref()))
        );
        let entry = state.outbox.get(contract.id()).expect("outbox entry");
        assert_eq!(entry.status(), &OutboxStatus::Succeeded);
        drop(state);
        assert_eq!(
            module.ledger().registered.lock().unwrap().as_slice(),
            &[contract.id().clone()]
        );
        Ok(())
    }

    #[tokio::test]
    async fn failed_registration_lands_in_outbox_only() -> Result<(), KernelError> {
        let (module, mut receiver) = MemoryModule::new();
        let contract = approved_contract(&module, &mut receiver).await?;
        module.ledger().fail.store(true, Ordering::SeqCst);

        module.register_once(&contract).await;

        let state = module.state();
        let stored = state.contracts.get(contract.id()).expect("contract kept");
        assert!(stored.ledger_ref().is_none());
        let entry = state.outbox.get(contract.id()).expect("outbox entry");
        assert_eq!(entry.status(), &OutboxStatus::Failed);
        assert_eq!(entry.attempts(), 1);
        assert!(entry.last_error().is_some());
        Ok(())
    }

    #[tokio::test]
    async fn reconcile_redispatches_unregistered_contracts() -> Result<(), KernelError> {
        let (module, mut receiver) = MemoryModule::new();
        let contract = approved_contract(&module, &mut receiver).await?;
        module.ledger().fail.store(true, Ordering::SeqCst);
        module.register_once(&contract).await;

        let redispatched = module.reconcile_ledger(10).await?;
        assert_eq!(redispatched, 1);
        let queued = receiver.try_recv().expect("contract re-dispatched");
        assert_eq!(queued.id(), contract.id());

        // A second round with a healthy ledger completes the registration.
        module.ledger().fail.store(false, Ordering::SeqCst);
        module.register_once(&queued).await;
        assert_eq!(module.reconcile_ledger(10).await?, 0);
        assert!(receiver.try_recv().is_err());
        Ok(())
    }

    #[tokio::test]
    async fn reconcile_skips_missing_contract_rows() -> Result<(), KernelError> {
        let (module, _receiver) = MemoryModule::new();
        {
            use kernel::interface::database::DatabaseConnection;
            use kernel::interface::update::LedgerOutboxModifier;
            use kernel::prelude::entity::ContractId;

            let mut connection = module.transact().await?;
            crate::service::memory::MemoryRepository
                .create(&mut connection, &ContractId::new(Uuid::new_v4()))
                .await?;
        }

        assert_eq!(module.reconcile_ledger(10).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn worker_drains_dispatched_contracts() -> Result<(), KernelError> {
        let (module, receiver) = MemoryModule::new();

        let worker = module.clone();
        tokio::spawn(async move { worker.run_ledger_worker(receiver).await });

        let owner = module.add_user("lessor");
        let lessee = module.add_user("lessee");
        let car = module.add_car(owner, 4500);
        let start = OffsetDateTime::now_utc() + Duration::days(1);
        let request = module
            .submit_request(SubmitRequestDto {
                car_id: car,
                lessee_id: lessee,
                start,
                end: start + Duration::days(2),
                offered_rate: 4000,
            })
            .await?;
        module
            .decide(DecideDto {
                request_id: request.id,
                lessor_id: owner,
                decision: Decision::Approve(None),
            })
            .await?;
        assert_eq!(
            module.state().requests.values().next().unwrap().status(),
            &RequestStatus::Approved
        );

        for _ in 0..200 {
            {
                let state = module.state();
                if state
                    .outbox
                    .values()
                    .all(|entry| entry.status() == &OutboxStatus::Succeeded)
                    && !state.outbox.is_empty()
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("worker never completed the registration");
    }
}
