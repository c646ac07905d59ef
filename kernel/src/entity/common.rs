pub use self::time::*;

mod time;
