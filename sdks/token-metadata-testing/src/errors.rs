//! Error types for the test harness.

use std::time::Duration;

use solana_sdk::signature::Signature;
use thiserror::Error;
use token_metadata_program::error::MetadataError;

use crate::ledger::TransactionSummary;

/// Failures crossing the ledger capability boundary.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum LedgerError {
    /// The ledger refused the transaction before inclusion.
    #[error("transaction rejected: {0}")]
    Rejected(String),
    /// Transport-level failure between client and ledger.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Failures surfaced by [`crate::PayerTransactionHandler`].
///
/// The three submission outcomes stay distinct so tests can branch on them:
/// refused before inclusion, executed and reverted, or never confirmed in
/// time.
#[derive(Debug, Error)]
pub enum TransactionHandlerError {
    /// The transaction was refused before inclusion (signing or preflight).
    #[error("submission rejected: {reason}")]
    SubmissionRejected {
        /// Refusal reason reported by the signer or the ledger.
        reason: String,
    },
    /// The transaction executed and the program reverted.
    #[error("execution failed: {error}")]
    ExecutionFailed {
        /// Program error string, e.g. `.. custom program error: 0x2`.
        error: String,
        /// Execution record of the failed transaction, logs included.
        summary: TransactionSummary,
    },
    /// No confirmation arrived within the deadline.
    #[error("no confirmation for {signature} within {timeout:?}")]
    ConfirmationTimeout {
        /// Signature of the transaction that never confirmed.
        signature: Signature,
        /// Deadline that elapsed.
        timeout: Duration,
    },
    /// Transport-class failure from the ledger.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl TransactionHandlerError {
    pub(crate) fn submission_rejected(reason: impl Into<String>) -> Self {
        Self::SubmissionRejected {
            reason: reason.into(),
        }
    }

    /// Program log output carried by this error, if any.
    pub fn log_messages(&self) -> Option<&[String]> {
        match self {
            Self::ExecutionFailed { summary, .. } => Some(&summary.log_messages),
            _ => None,
        }
    }

    /// Whether a caller-side retry (with a fresh blockhash) is reasonable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConfirmationTimeout { .. } | Self::Ledger(LedgerError::Transport(_))
        )
    }
}

/// Maps the `custom program error: 0x..` tail of an execution error string
/// back to the program's error table.
pub fn parse_custom_program_error(error: &str) -> Option<MetadataError> {
    let (_, tail) = error.split_once("custom program error: 0x")?;
    let code = u32::from_str_radix(tail.trim(), 16).ok()?;
    MetadataError::from_code(code)
}
