//! In-memory stand-ins for the kernel interfaces, used by the service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use error_stack::Report;
use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::ledger::{DependOnLedgerClient, LedgerClient};
use kernel::interface::notify::{
    DependOnNotificationDispatcher, Notification, NotificationDispatcher,
};
use kernel::interface::query::{
    CarQuery, DependOnCarQuery, DependOnLedgerOutboxQuery, DependOnRentalContractQuery,
    DependOnRentalRequestQuery, DependOnUserQuery, LedgerOutboxQuery, PageRequest,
    RentalContractQuery, RentalRequestQuery, RequestSort, RequestSortField, UserQuery,
};
use kernel::interface::update::{
    DependOnLedgerOutboxModifier, DependOnRentalContractModifier, DependOnRentalRequestModifier,
    LedgerOutboxModifier, RentalContractModifier, RentalRequestModifier,
};
use kernel::prelude::entity::{
    Car, CarId, CarName, ContractId, DailyRate, LedgerOutbox, LedgerRef, OutboxStatus,
    RentalContract, RentalRequest, RequestId, RequestStatus, UpdatedAt, User, UserId, UserName,
};
use kernel::KernelError;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::service::{DependOnLedgerDispatch, LedgerDispatch};

#[derive(Default)]
pub struct MemoryState {
    pub cars: HashMap<CarId, Car>,
    pub users: HashMap<UserId, User>,
    pub requests: HashMap<RequestId, RentalRequest>,
    pub contracts: HashMap<ContractId, RentalContract>,
    pub outbox: HashMap<ContractId, LedgerOutbox>,
    /// Forces every conditional transition to report a lost race.
    pub deny_transitions: bool,
}

pub struct MemoryTransaction(Arc<Mutex<MemoryState>>);

impl MemoryTransaction {
    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.0.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MemoryRepository;

#[async_trait::async_trait]
impl CarQuery<MemoryTransaction> for MemoryRepository {
    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &CarId,
    ) -> error_stack::Result<Option<Car>, KernelError> {
        Ok(con.lock().cars.get(id).cloned())
    }
}

#[async_trait::async_trait]
impl UserQuery<MemoryTransaction> for MemoryRepository {
    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        Ok(con.lock().users.get(id).cloned())
    }
}

fn page_of(
    mut matching: Vec<RentalRequest>,
    sort: &RequestSort,
    page: &PageRequest,
) -> Vec<RentalRequest> {
    matching.sort_by_key(|request| match sort.field() {
        RequestSortField::CreatedAt => *request.created_at().as_ref(),
        RequestSortField::UpdatedAt => *request.updated_at().as_ref(),
    });
    if sort.is_descending() {
        matching.reverse();
    }
    matching
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.size() as usize)
        .collect()
}

#[async_trait::async_trait]
impl RentalRequestQuery<MemoryTransaction> for MemoryRepository {
    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &RequestId,
    ) -> error_stack::Result<Option<RentalRequest>, KernelError> {
        Ok(con.lock().requests.get(id).cloned())
    }

    async fn find_pending_by_id_and_lessor(
        &self,
        con: &mut MemoryTransaction,
        id: &RequestId,
        lessor_id: &UserId,
    ) -> error_stack::Result<Option<RentalRequest>, KernelError> {
        Ok(con.lock().requests.get(id).cloned().filter(|request| {
            request.lessor_id() == lessor_id && request.status() == &RequestStatus::Pending
        }))
    }

    async fn find_by_lessor(
        &self,
        con: &mut MemoryTransaction,
        lessor_id: &UserId,
        status: Option<&RequestStatus>,
        sort: &RequestSort,
        page: &PageRequest,
    ) -> error_stack::Result<Vec<RentalRequest>, KernelError> {
        let matching = con
            .lock()
            .requests
            .values()
            .filter(|request| request.lessor_id() == lessor_id)
            .filter(|request| status.is_none() || status == Some(request.status()))
            .cloned()
            .collect();
        Ok(page_of(matching, sort, page))
    }

    async fn count_by_lessor(
        &self,
        con: &mut MemoryTransaction,
        lessor_id: &UserId,
        status: Option<&RequestStatus>,
    ) -> error_stack::Result<i64, KernelError> {
        Ok(con
            .lock()
            .requests
            .values()
            .filter(|request| request.lessor_id() == lessor_id)
            .filter(|request| status.is_none() || status == Some(request.status()))
            .count() as i64)
    }

    async fn find_by_lessee(
        &self,
        con: &mut MemoryTransaction,
        lessee_id: &UserId,
        status: Option<&RequestStatus>,
        sort: &RequestSort,
        page: &PageRequest,
    ) -> error_stack::Result<Vec<RentalRequest>, KernelError> {
        let matching = con
            .lock()
            .requests
            .values()
            .filter(|request| request.lessee_id() == lessee_id)
            .filter(|request| status.is_none() || status == Some(request.status()))
            .cloned()
            .collect();
        Ok(page_of(matching, sort, page))
    }

    async fn count_by_lessee(
        &self,
        con: &mut MemoryTransaction,
        lessee_id: &UserId,
        status: Option<&RequestStatus>,
    ) -> error_stack::Result<i64, KernelError> {
        Ok(con
            .lock()
            .requests
            .values()
            .filter(|request| request.lessee_id() == lessee_id)
            .filter(|request| status.is_none() || status == Some(request.status()))
            .count() as i64)
    }
}

#[async_trait::async_trait]
impl RentalContractQuery<MemoryTransaction> for MemoryRepository {
    async fn find_by_id(
        &self,
        con: &mut MemoryTransaction,
        id: &ContractId,
    ) -> error_stack::Result<Option<RentalContract>, KernelError> {
        Ok(con.lock().contracts.get(id).cloned())
    }
}

#[async_trait::async_trait]
impl LedgerOutboxQuery<MemoryTransaction> for MemoryRepository {
    async fn find_unregistered(
        &self,
        con: &mut MemoryTransaction,
        limit: i64,
    ) -> error_stack::Result<Vec<LedgerOutbox>, KernelError> {
        let mut entries: Vec<LedgerOutbox> = con
            .lock()
            .outbox
            .values()
            .filter(|entry| entry.status() != &OutboxStatus::Succeeded)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| *entry.updated_at().as_ref());
        entries.truncate(limit as usize);
        Ok(entries)
    }
}

#[async_trait::async_trait]
impl RentalRequestModifier<MemoryTransaction> for MemoryRepository {
    async fn create(
        &self,
        con: &mut MemoryTransaction,
        request: &RentalRequest,
    ) -> error_stack::Result<(), KernelError> {
        con.lock()
            .requests
            .insert(request.id().clone(), request.clone());
        Ok(())
    }

    async fn transition_from_pending(
        &self,
        con: &mut MemoryTransaction,
        id: &RequestId,
        lessor_id: &UserId,
        to: &RequestStatus,
    ) -> error_stack::Result<Option<RentalRequest>, KernelError> {
        let mut state = con.lock();
        if state.deny_transitions {
            return Ok(None);
        }
        let Some(existing) = state.requests.get(id) else {
            return Ok(None);
        };
        if existing.lessor_id() != lessor_id || existing.status() != &RequestStatus::Pending {
            return Ok(None);
        }
        let updated = existing.clone().transitioned(*to);
        state.requests.insert(id.clone(), updated.clone());
        Ok(Some(updated))
    }
}

#[async_trait::async_trait]
impl RentalContractModifier<MemoryTransaction> for MemoryRepository {
    async fn create(
        &self,
        con: &mut MemoryTransaction,
        contract: &RentalContract,
    ) -> error_stack::Result<(), KernelError> {
        let mut state = con.lock();
        // Mirrors the unique index on request_id.
        if state
            .contracts
            .values()
            .any(|existing| existing.request_id() == contract.request_id())
        {
            return Err(Report::new(KernelError::Conflict));
        }
        state.contracts.insert(contract.id().clone(), contract.clone());
        Ok(())
    }

    async fn set_ledger_ref(
        &self,
        con: &mut MemoryTransaction,
        id: &ContractId,
        ledger_ref: &LedgerRef,
    ) -> error_stack::Result<(), KernelError> {
        let mut state = con.lock();
        let Some(contract) = state.contracts.get(id).cloned() else {
            return Err(Report::new(KernelError::Internal));
        };
        state
            .contracts
            .insert(id.clone(), contract.registered(ledger_ref.clone()));
        Ok(())
    }
}

#[async_trait::async_trait]
impl LedgerOutboxModifier<MemoryTransaction> for MemoryRepository {
    async fn create(
        &self,
        con: &mut MemoryTransaction,
        contract_id: &ContractId,
    ) -> error_stack::Result<(), KernelError> {
        con.lock().outbox.insert(
            contract_id.clone(),
            LedgerOutbox::new(
                contract_id.clone(),
                OutboxStatus::Pending,
                0,
                None,
                UpdatedAt::now(),
            ),
        );
        Ok(())
    }

    async fn mark_succeeded(
        &self,
        con: &mut MemoryTransaction,
        contract_id: &ContractId,
    ) -> error_stack::Result<(), KernelError> {
        let mut state = con.lock();
        let Some(entry) = state.outbox.get(contract_id) else {
            return Err(Report::new(KernelError::Internal));
        };
        let updated = LedgerOutbox::new(
            contract_id.clone(),
            OutboxStatus::Succeeded,
            entry.attempts(),
            entry.last_error().map(str::to_owned),
            UpdatedAt::now(),
        );
        state.outbox.insert(contract_id.clone(), updated);
        Ok(())
    }

    async fn mark_failed(
        &self,
        con: &mut MemoryTransaction,
        contract_id: &ContractId,
        error: &str,
    ) -> error_stack::Result<(), KernelError> {
        let mut state = con.lock();
        let Some(entry) = state.outbox.get(contract_id) else {
            return Err(Report::new(KernelError::Internal));
        };
        let updated = LedgerOutbox::new(
            contract_id.clone(),
            OutboxStatus::Failed,
            entry.attempts() + 1,
            Some(error.to_owned()),
            UpdatedAt::now(),
        );
        state.outbox.insert(contract_id.clone(), updated);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryNotificationDispatcher {
    pub sent: Arc<Mutex<Vec<Notification>>>,
    pub fail: Arc<AtomicBool>,
}

#[async_trait::async_trait]
impl NotificationDispatcher for MemoryNotificationDispatcher {
    async fn dispatch(
        &self,
        notification: Notification,
    ) -> error_stack::Result<(), KernelError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Report::new(KernelError::Internal));
        }
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryLedgerClient {
    pub registered: Arc<Mutex<Vec<ContractId>>>,
    pub fail: Arc<AtomicBool>,
}

#[async_trait::async_trait]
impl LedgerClient for MemoryLedgerClient {
    async fn register_contract(
        &self,
        contract: &RentalContract,
    ) -> error_stack::Result<LedgerRef, KernelError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Report::new(KernelError::Timeout));
        }
        self.registered.lock().unwrap().push(contract.id().clone());
        Ok(LedgerRef::new(format!("ledger-tx-{}", contract.id().as_ref())))
    }
}

#[derive(Clone)]
pub struct MemoryModule {
    state: Arc<Mutex<MemoryState>>,
    repository: MemoryRepository,
    dispatcher: MemoryNotificationDispatcher,
    ledger: MemoryLedgerClient,
    ledger_dispatch: LedgerDispatch,
}

impl MemoryModule {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RentalContract>) {
        let (ledger_dispatch, receiver) = LedgerDispatch::new();
        let module = Self {
            state: Arc::default(),
            repository: MemoryRepository,
            dispatcher: MemoryNotificationDispatcher::default(),
            ledger: MemoryLedgerClient::default(),
            ledger_dispatch,
        };
        (module, receiver)
    }

    pub fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }

    pub fn dispatcher(&self) -> &MemoryNotificationDispatcher {
        &self.dispatcher
    }

    pub fn ledger(&self) -> &MemoryLedgerClient {
        &self.ledger
    }

    pub fn add_user(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state()
            .users
            .insert(UserId::new(id), User::new(UserId::new(id), UserName::new(name)));
        id
    }

    pub fn add_car(&self, owner: Uuid, daily_rate: i64) -> Uuid {
        let id = Uuid::new_v4();
        self.state().cars.insert(
            CarId::new(id),
            Car::new(
                CarId::new(id),
                UserId::new(owner),
                CarName::new("test car"),
                DailyRate::new(daily_rate),
            ),
        );
        id
    }

    pub fn sent_notifications(&self) -> Vec<Notification> {
        self.dispatcher.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection<MemoryTransaction> for MemoryModule {
    async fn transact(&self) -> error_stack::Result<MemoryTransaction, KernelError> {
        Ok(MemoryTransaction(Arc::clone(&self.state)))
    }
}

impl DependOnCarQuery<MemoryTransaction> for MemoryModule {
    type CarQuery = MemoryRepository;
    fn car_query(&self) -> &Self::CarQuery {
        &self.repository
    }
}

impl DependOnUserQuery<MemoryTransaction> for MemoryModule {
    type UserQuery = MemoryRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &self.repository
    }
}

impl DependOnRentalRequestQuery<MemoryTransaction> for MemoryModule {
    type RentalRequestQuery = MemoryRepository;
    fn rental_request_query(&self) -> &Self::RentalRequestQuery {
        &self.repository
    }
}

impl DependOnRentalContractQuery<MemoryTransaction> for MemoryModule {
    type RentalContractQuery = MemoryRepository;
    fn rental_contract_query(&self) -> &Self::RentalContractQuery {
        &self.repository
    }
}

impl DependOnLedgerOutboxQuery<MemoryTransaction> for MemoryModule {
    type LedgerOutboxQuery = MemoryRepository;
    fn ledger_outbox_query(&self) -> &Self::LedgerOutboxQuery {
        &self.repository
    }
}

impl DependOnRentalRequestModifier<MemoryTransaction> for MemoryModule {
    type RentalRequestModifier = MemoryRepository;
    fn rental_request_modifier(&self) -> &Self::RentalRequestModifier {
        &self.repository
    }
}

impl DependOnRentalContractModifier<MemoryTransaction> for MemoryModule {
    type RentalContractModifier = MemoryRepository;
    fn rental_contract_modifier(&self) -> &Self::RentalContractModifier {
        &self.repository
    }
}

impl DependOnLedgerOutboxModifier<MemoryTransaction> for MemoryModule {
    type LedgerOutboxModifier = MemoryRepository;
    fn ledger_outbox_modifier(&self) -> &Self::LedgerOutboxModifier {
        &self.repository
    }
}

impl DependOnNotificationDispatcher for MemoryModule {
    type NotificationDispatcher = MemoryNotificationDispatcher;
    fn notification_dispatcher(&self) -> &Self::NotificationDispatcher {
        &self.dispatcher
    }
}

impl DependOnLedgerClient for MemoryModule {
    type LedgerClient = MemoryLedgerClient;
    fn ledger_client(&self) -> &Self::LedgerClient {
        &self.ledger
    }
}

impl DependOnLedgerDispatch for MemoryModule {
    fn ledger_dispatch(&self) -> &LedgerDispatch {
        &self.ledger_dispatch
    }
}
