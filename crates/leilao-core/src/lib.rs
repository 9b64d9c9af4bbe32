pub mod costs;
pub mod error;
pub mod format;
pub mod rates;
pub mod types;

#[cfg(feature = "checklist")]
pub mod checklist;

pub use error::LeilaoError;
pub use types::*;

/// Standard result type for all leilao operations
pub type LeilaoResult<T> = Result<T, LeilaoError>;
