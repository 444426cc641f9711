//! Aggregate statistics views.

use serde::{Deserialize, Serialize};

/// Ledger-wide loan counts and outcome rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStatistics {
    pub total_loans: u64,
    pub approved_loans: u64,
    pub pending_loans: u64,
    pub rejected_loans: u64,
    /// Approved share of all loans, in percent. 0.0 on an empty ledger.
    pub approval_rate: f64,
    /// Rejected share of all loans, in percent. 0.0 on an empty ledger.
    pub rejection_rate: f64,
}

/// Loan counts scoped to a single user. No rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    pub total_loans: u64,
    pub approved_loans: u64,
    pub pending_loans: u64,
    pub rejected_loans: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_global_statistics_field_names() {
        let stats = GlobalStatistics {
            total_loans: 4,
            approved_loans: 1,
            pending_loans: 2,
            rejected_loans: 1,
            approval_rate: 25.0,
            rejection_rate: 25.0,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalLoans"], 4);
        assert_eq!(json["approvalRate"], 25.0);
        assert_eq!(json["rejectionRate"], 25.0);
    }
}
