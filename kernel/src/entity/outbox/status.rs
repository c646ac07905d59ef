use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::KernelError;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum OutboxStatus {
    Pending,
    Succeeded,
    Failed,
}

impl OutboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutboxStatus::Pending => "PENDING",
            OutboxStatus::Succeeded => "SUCCEEDED",
            OutboxStatus::Failed => "FAILED",
        }
    }
}

impl FromStr for OutboxStatus {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OutboxStatus::Pending),
            "SUCCEEDED" => Ok(OutboxStatus::Succeeded),
            "FAILED" => Ok(OutboxStatus::Failed),
            _ => Err(KernelError::Internal),
        }
    }
}
