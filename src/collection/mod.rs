//! Per-kind filtered collections: the layer between the record stores
//! and the [transaction feed](crate::feed::TransactionFeed).
//!
//! Each collection owns the current filter state for its record kind
//! and the record set that state selects. Recomputation is pull-based:
//! filter changes and mutations mark the collection stale, and the
//! record set is re-derived from the store on the next read.

mod expense;
mod filter;
mod income;
mod transfer;

pub use expense::ExpenseCollection;
pub use filter::{FilterState, RecurringScope};
pub use income::IncomeCollection;
pub use transfer::TransferCollection;
