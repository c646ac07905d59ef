pub use self::{ledger::*, request::*};

mod ledger;
mod request;

#[cfg(test)]
pub(crate) mod memory;
