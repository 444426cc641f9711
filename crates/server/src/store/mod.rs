//! In-memory record stores.
//!
//! The lifecycle engine consumes storage as a keyed repository: get by id,
//! query by predicate, upsert. These stores keep everything in process
//! behind `tokio::sync::RwLock`, which is also what makes the review
//! transition's read-modify-write atomic with respect to concurrent callers.

pub mod loans;
pub mod users;

pub use loans::LoanStore;
pub use users::{DuplicateField, UserStore};
