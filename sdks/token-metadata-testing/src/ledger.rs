//! Ledger capability boundary.

use async_trait::async_trait;
use solana_sdk::{
    account::Account, commitment_config::CommitmentLevel, hash::Hash, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};

use crate::errors::LedgerError;

/// Execution record for one transaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransactionSummary {
    /// Slot the transaction landed in.
    pub slot: u64,
    /// Fee charged, in lamports.
    pub fee: u64,
    /// Program log output, in emission order.
    pub log_messages: Vec<String>,
}

/// Confirmation-time view of a transaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfirmedTransaction {
    /// Execution record, present for failed transactions too.
    pub summary: TransactionSummary,
    /// `None` when the transaction executed successfully.
    pub err: Option<String>,
}

/// The ledger capabilities tests depend on: submit, confirm, fetch, airdrop,
/// plus blockhash supply for transaction assembly.
///
/// Implementations must be shareable across tasks. The in-process simulated
/// backend lives in this crate.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Current blockhash for transaction assembly.
    async fn latest_blockhash(&self) -> Result<Hash, LedgerError>;

    /// Credit `lamports` to `to` straight from the faucet.
    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature, LedgerError>;

    /// Relay a signed transaction. `max_retries` is a relay hint only; the
    /// ledger never re-executes on its own.
    async fn submit_transaction(
        &self,
        transaction: Transaction,
        skip_preflight: bool,
        max_retries: Option<usize>,
    ) -> Result<Signature, LedgerError>;

    /// Confirmation-time view of a transaction, or `None` while the ledger
    /// has not seen it reach the requested commitment.
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        commitment: CommitmentLevel,
    ) -> Result<Option<ConfirmedTransaction>, LedgerError>;

    /// Fetch an account, or `None` if it does not exist.
    async fn fetch_account(&self, address: &Pubkey) -> Result<Option<Account>, LedgerError>;
}
