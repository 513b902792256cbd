//! Payer-centric transaction handler: sign, submit, await confirmation.

use std::time::Duration;

use solana_sdk::{
    commitment_config::CommitmentLevel,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};

use crate::errors::{LedgerError, TransactionHandlerError};
use crate::ledger::{ConfirmedTransaction, Ledger, TransactionSummary};

const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Knobs for one submit-and-confirm round.
#[derive(Clone, Debug)]
pub struct SendOptions {
    /// Commitment the confirmation wait targets.
    pub commitment: CommitmentLevel,
    /// Skip the ledger's preflight checks (fee payer funding, blockhash).
    pub skip_preflight: bool,
    /// Relay retry hint passed through to the ledger. Never an internal
    /// execution retry; retry policy stays with the caller.
    pub max_retries: Option<usize>,
    /// Deadline for the confirmation wait.
    pub timeout: Duration,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            commitment: CommitmentLevel::Confirmed,
            skip_preflight: false,
            max_retries: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Outcome of a confirmed transaction.
#[derive(Clone, Debug)]
pub struct ConfirmedTransactionDetails {
    /// Signature the transaction was submitted under.
    pub signature: Signature,
    /// Execution record reported by the ledger.
    pub summary: TransactionSummary,
}

/// Signs with a fixed payer, submits, and cooperatively awaits confirmation.
///
/// Submission is not idempotent: every call signs a fresh transaction against
/// the latest blockhash, so a retry after [`TransactionHandlerError::ConfirmationTimeout`]
/// is a new submission with a new signature, never a replay.
pub struct PayerTransactionHandler<L: Ledger> {
    ledger: L,
    payer: Keypair,
}

impl<L: Ledger> PayerTransactionHandler<L> {
    pub fn new(ledger: L, payer: Keypair) -> Self {
        Self { ledger, payer }
    }

    pub fn payer_pubkey(&self) -> Pubkey {
        self.payer.pubkey()
    }

    /// Submit `instructions` as one transaction and wait for its confirmation.
    ///
    /// `extra_signers` adds signatures beyond the payer, e.g. a mint keypair
    /// when the transaction creates the mint account.
    pub async fn send_and_confirm_transaction(
        &self,
        instructions: &[Instruction],
        extra_signers: &[&Keypair],
        options: &SendOptions,
    ) -> Result<ConfirmedTransactionDetails, TransactionHandlerError> {
        let recent_blockhash = self.ledger.latest_blockhash().await?;

        let mut transaction = Transaction::new_with_payer(instructions, Some(&self.payer.pubkey()));
        let mut signers: Vec<&Keypair> = vec![&self.payer];
        signers.extend_from_slice(extra_signers);
        transaction
            .try_sign(&signers, recent_blockhash)
            .map_err(|err| TransactionHandlerError::submission_rejected(err.to_string()))?;

        let signature = match self
            .ledger
            .submit_transaction(transaction, options.skip_preflight, options.max_retries)
            .await
        {
            Ok(signature) => signature,
            Err(LedgerError::Rejected(reason)) => {
                return Err(TransactionHandlerError::submission_rejected(reason))
            }
            Err(err) => return Err(err.into()),
        };
        tracing::debug!(%signature, "transaction submitted");

        let confirmed = match tokio::time::timeout(
            options.timeout,
            self.wait_for_confirmation(&signature, options.commitment),
        )
        .await
        {
            Ok(result) => result?,
            Err(_elapsed) => {
                tracing::debug!(%signature, timeout = ?options.timeout, "confirmation timed out");
                return Err(TransactionHandlerError::ConfirmationTimeout {
                    signature,
                    timeout: options.timeout,
                });
            }
        };

        let ConfirmedTransaction { summary, err } = confirmed;
        if let Some(error) = err {
            tracing::debug!(%signature, %error, "transaction failed");
            return Err(TransactionHandlerError::ExecutionFailed { error, summary });
        }

        tracing::debug!(%signature, slot = summary.slot, "transaction confirmed");
        Ok(ConfirmedTransactionDetails { signature, summary })
    }

    async fn wait_for_confirmation(
        &self,
        signature: &Signature,
        commitment: CommitmentLevel,
    ) -> Result<ConfirmedTransaction, TransactionHandlerError> {
        loop {
            if let Some(confirmed) = self
                .ledger
                .confirm_transaction(signature, commitment)
                .await?
            {
                return Ok(confirmed);
            }
            tokio::time::sleep(CONFIRM_POLL_INTERVAL).await;
        }
    }
}
