pub mod aggregator;
pub mod error;
pub mod investment;
pub mod loan;
pub mod portfolio;
pub mod time_value;
pub mod types;

#[cfg(feature = "schedule")]
pub mod schedule;

pub use error::FinDeckError;
pub use types::*;

/// Standard result type for all findeck operations
pub type FinDeckResult<T> = Result<T, FinDeckError>;
