use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{ContractId, RequestId, UserId};
use crate::KernelError;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum NotificationKind {
    RentalRequest,
    RentalContract,
}

/// Event record delivered to a user, best effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    recipient: UserId,
    title: String,
    kind: NotificationKind,
    deep_link: String,
    related_id: Uuid,
}

impl Notification {
    pub fn new(
        recipient: UserId,
        title: impl Into<String>,
        kind: NotificationKind,
        deep_link: impl Into<String>,
        related_id: impl Into<Uuid>,
    ) -> Self {
        Self {
            recipient,
            title: title.into(),
            kind,
            deep_link: deep_link.into(),
            related_id: related_id.into(),
        }
    }

    pub fn request_submitted(lessor: UserId, request_id: &RequestId) -> Self {
        Self::new(
            lessor,
            "New rental request",
            NotificationKind::RentalRequest,
            format!("/rental-requests/{}", request_id.as_ref()),
            *request_id.as_ref(),
        )
    }

    pub fn request_rejected(lessee: UserId, request_id: &RequestId) -> Self {
        Self::new(
            lessee,
            "Rental request rejected",
            NotificationKind::RentalRequest,
            format!("/rental-requests/{}", request_id.as_ref()),
            *request_id.as_ref(),
        )
    }

    pub fn contract_signed(lessee: UserId, contract_id: &ContractId) -> Self {
        Self::new(
            lessee,
            "Rental contract signed",
            NotificationKind::RentalContract,
            format!("/rental-contracts/{}", contract_id.as_ref()),
            *contract_id.as_ref(),
        )
    }

    pub fn recipient(&self) -> &UserId {
        &self.recipient
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> &NotificationKind {
        &self.kind
    }

    pub fn deep_link(&self) -> &str {
        &self.deep_link
    }

    pub fn related_id(&self) -> &Uuid {
        &self.related_id
    }
}

/// Best-effort delivery. Callers absorb any returned error; a failed
/// dispatch never fails the workflow that produced it.
#[async_trait::async_trait]
pub trait NotificationDispatcher: 'static + Sync + Send {
    async fn dispatch(&self, notification: Notification)
        -> error_stack::Result<(), KernelError>;
}

pub trait DependOnNotificationDispatcher: 'static + Sync + Send {
    type NotificationDispatcher: NotificationDispatcher;
    fn notification_dispatcher(&self) -> &Self::NotificationDispatcher;
}
