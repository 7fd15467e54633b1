//! Strongbox Core: domain models, error taxonomy, repository traits and
//! the clock capability shared by every Strongbox crate.

pub mod clock;
pub mod error;
pub mod models;
pub mod repository;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ErrorBody, StrongboxError, StrongboxResult};
