#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod sampling;
pub mod time;

pub use error::{BankError, MalformedBank};
pub use time::Clock;
