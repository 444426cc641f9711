//! Loan record store.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use loanbook_core::{LoanId, LoanStatus};

use crate::models::{Loan, NewLoan};

/// Keyed store of loan records.
///
/// Queries return records in ascending id order (the map's natural order);
/// callers must not re-sort projections built from them.
#[derive(Debug, Default)]
pub struct LoanStore {
    inner: RwLock<LoanTable>,
}

#[derive(Debug, Default)]
struct LoanTable {
    rows: BTreeMap<LoanId, Loan>,
    next_id: i64,
}

impl LoanStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist a new loan, assigning its ID.
    pub async fn insert(&self, new: NewLoan) -> Loan {
        let mut table = self.inner.write().await;
        table.next_id += 1;
        let loan = Loan {
            id: LoanId::new(table.next_id),
            amount: new.amount,
            term_months: new.term_months,
            purpose: new.purpose,
            owner_id: new.owner_id,
            owner_username: new.owner_username,
            status: new.status,
            rejection_reason: new.rejection_reason,
            requested_at: new.requested_at,
            reviewed_at: new.reviewed_at,
            reviewed_by: new.reviewed_by,
            updated_at: new.updated_at,
        };
        table.rows.insert(loan.id, loan.clone());
        loan
    }

    /// Atomically apply `apply` to the loan with `id`.
    ///
    /// The closure runs under the single write lock, so the precondition
    /// check and the write it guards cannot interleave with another update
    /// of the same record. When the closure errors the record is left
    /// exactly as it was.
    ///
    /// Returns `None` when no loan has that id.
    pub async fn update<E>(
        &self,
        id: LoanId,
        apply: impl FnOnce(&mut Loan) -> Result<(), E>,
    ) -> Option<Result<Loan, E>> {
        let mut table = self.inner.write().await;
        let row = table.rows.get_mut(&id)?;

        let mut candidate = row.clone();
        match apply(&mut candidate) {
            Ok(()) => {
                *row = candidate.clone();
                Some(Ok(candidate))
            }
            Err(e) => Some(Err(e)),
        }
    }

    pub async fn find_by_id(&self, id: LoanId) -> Option<Loan> {
        self.inner.read().await.rows.get(&id).cloned()
    }

    pub async fn find_all(&self) -> Vec<Loan> {
        self.inner.read().await.rows.values().cloned().collect()
    }

    pub async fn find_by_owner(&self, username: &str) -> Vec<Loan> {
        self.inner
            .read()
            .await
            .rows
            .values()
            .filter(|l| l.owner_username == username)
            .cloned()
            .collect()
    }

    pub async fn find_by_status(&self, status: LoanStatus) -> Vec<Loan> {
        self.inner
            .read()
            .await
            .rows
            .values()
            .filter(|l| l.status == status)
            .cloned()
            .collect()
    }

    pub async fn count(&self) -> u64 {
        self.inner.read().await.rows.len() as u64
    }

    pub async fn count_by_status(&self, status: LoanStatus) -> u64 {
        self.inner
            .read()
            .await
            .rows
            .values()
            .filter(|l| l.status == status)
            .count() as u64
    }

    pub async fn count_by_owner(&self, username: &str) -> u64 {
        self.inner
            .read()
            .await
            .rows
            .values()
            .filter(|l| l.owner_username == username)
            .count() as u64
    }

    pub async fn count_by_owner_and_status(&self, username: &str, status: LoanStatus) -> u64 {
        self.inner
            .read()
            .await
            .rows
            .values()
            .filter(|l| l.owner_username == username && l.status == status)
            .count() as u64
    }
}
