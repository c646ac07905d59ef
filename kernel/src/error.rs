use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EntityKind {
    Car,
    User,
    RentalRequest,
    RentalContract,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Car => write!(f, "Car"),
            EntityKind::User => write!(f, "User"),
            EntityKind::RentalRequest => write!(f, "RentalRequest"),
            EntityKind::RentalContract => write!(f, "RentalContract"),
        }
    }
}

#[derive(Debug)]
pub enum KernelError {
    NotFound(EntityKind),
    Forbidden,
    Conflict,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound(kind) => write!(f, "{kind} not found"),
            KernelError::Forbidden => write!(f, "Actor is not permitted to perform this action"),
            KernelError::Conflict => write!(f, "Conflicting concurrent update"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
