pub use self::{car::*, common::*, contract::*, outbox::*, request::*, user::*};

mod car;
mod common;
mod contract;
mod outbox;
mod request;
mod user;
