mod id;
mod name;
mod rate;

pub use self::{id::*, name::*, rate::*};
use serde::{Deserialize, Serialize};

use crate::entity::UserId;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Car {
    id: CarId,
    owner_id: UserId,
    name: CarName,
    daily_rate: DailyRate,
}

impl Car {
    pub fn new(id: CarId, owner_id: UserId, name: CarName, daily_rate: DailyRate) -> Self {
        Self {
            id,
            owner_id,
            name,
            daily_rate,
        }
    }

    pub fn id(&self) -> &CarId {
        &self.id
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn name(&self) -> &CarName {
        &self.name
    }

    pub fn daily_rate(&self) -> &DailyRate {
        &self.daily_rate
    }
}
