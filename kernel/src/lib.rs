pub use crate::error::*;

mod database;
mod entity;
mod error;
mod ledger;
mod modify;
mod notify;
mod query;

#[cfg(feature = "prelude")]
pub mod prelude {
    pub mod entity {
        pub use crate::entity::*;
    }
}

#[cfg(feature = "interface")]
pub mod interface {
    pub mod database {
        pub use crate::database::*;
    }
    pub mod query {
        pub use crate::query::*;
    }
    pub mod update {
        pub use crate::modify::*;
    }
    pub mod notify {
        pub use crate::notify::*;
    }
    pub mod ledger {
        pub use crate::ledger::*;
    }
}
