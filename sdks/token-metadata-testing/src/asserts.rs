//! Structured assertions over transaction outcomes.

use regex::Regex;

use crate::errors::TransactionHandlerError;
use crate::handler::ConfirmedTransactionDetails;
use crate::ledger::TransactionSummary;

/// Expected shape of a transaction summary.
///
/// `fee` is compared exactly when set. Each pattern in `msg_rx` must match at
/// least one log line; patterns are checked independently, so two patterns
/// may match the same line.
#[derive(Debug, Default)]
pub struct SummaryExpectation {
    /// Exact fee in lamports, when the test pins it down.
    pub fee: Option<u64>,
    /// Log patterns, each of which must match somewhere in the log output.
    pub msg_rx: Vec<Regex>,
}

/// Panics unless the send produced a confirmed transaction; returns the
/// details for follow-up assertions.
pub fn assert_confirmed_transaction(
    result: &Result<ConfirmedTransactionDetails, TransactionHandlerError>,
) -> &ConfirmedTransactionDetails {
    match result {
        Ok(details) => details,
        Err(err) => panic!("expected confirmed transaction, got: {err}"),
    }
}

/// Panics unless `summary` satisfies `expected`.
pub fn assert_transaction_summary(summary: &TransactionSummary, expected: &SummaryExpectation) {
    if let Some(fee) = expected.fee {
        assert_eq!(
            summary.fee, fee,
            "fee mismatch, logs: {:#?}",
            summary.log_messages
        );
    }
    for pattern in &expected.msg_rx {
        assert!(
            summary
                .log_messages
                .iter()
                .any(|line| pattern.is_match(line)),
            "no log line matched {pattern}, logs: {:#?}",
            summary.log_messages
        );
    }
}
