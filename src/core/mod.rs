//! Business logic: recurrence, budgets, reporting and the record store.

pub mod aggregation;
pub mod errors;
pub mod filters;
pub mod record_store;
pub mod recurrence;
pub mod services;

pub use errors::{FinanceError, Result};
pub use filters::{DateRange, TransactionFilter};
pub use record_store::{LoadPolicy, RecordStore};
pub use recurrence::RecurrencePolicy;
