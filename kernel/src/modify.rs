pub use self::{contract::*, outbox::*, request::*};

mod contract;
mod outbox;
mod request;
