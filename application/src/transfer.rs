pub use self::{contract::*, page::*, request::*};

mod contract;
mod page;
mod request;
