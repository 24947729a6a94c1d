pub mod affordability;
pub mod amortization;
pub mod decision;
pub mod error;
pub mod policy;
pub mod scoring;
pub mod types;

#[cfg(feature = "portfolio")]
pub mod portfolio;

#[cfg(feature = "simulate")]
pub mod simulate;

pub use error::AutoFinanceError;
pub use types::*;

/// Standard result type for all auto-finance operations
pub type AutoFinanceResult<T> = Result<T, AutoFinanceError>;
