//! Test harness for token metadata flows.
//!
//! This crate provides:
//! - [`Ledger`], the capability trait tests depend on (submit, confirm,
//!   fetch, airdrop)
//! - [`SimulatedLedger`], a deterministic in-process implementation
//! - [`PayerTransactionHandler`], which signs, submits, and cooperatively
//!   awaits confirmation
//! - assertion helpers over transaction summaries, and [`AddressLabels`]
//!   for readable test diagnostics
//!
//! Tests run through [`TestRunner::run`], which wires tracing up and hands
//! the body a fresh [`TestContext`].

use std::future::Future;
use std::time::Duration;

use solana_sdk::{
    account::Account,
    commitment_config::CommitmentLevel,
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
};

pub mod asserts;
pub mod errors;
pub mod handler;
pub mod labels;
pub mod ledger;
pub mod simulated;

pub use asserts::{assert_confirmed_transaction, assert_transaction_summary, SummaryExpectation};
pub use errors::{parse_custom_program_error, LedgerError, TransactionHandlerError};
pub use handler::{ConfirmedTransactionDetails, PayerTransactionHandler, SendOptions};
pub use labels::AddressLabels;
pub use ledger::{ConfirmedTransaction, Ledger, TransactionSummary};
pub use simulated::{SimulatedLedger, DEFAULT_AIRDROP_LAMPORTS, LAMPORTS_PER_SIGNATURE};

const AIRDROP_CONFIRM_ATTEMPTS: usize = 100;
const AIRDROP_CONFIRM_INTERVAL: Duration = Duration::from_millis(10);

/// Entry point for async ledger tests.
pub struct TestRunner;

impl TestRunner {
    /// Runs `body` against a fresh [`TestContext`], panicking on error so
    /// the failure lands in the test report.
    pub async fn run<F, Fut>(body: F)
    where
        F: FnOnce(TestContext) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        init_tracing();
        let ctx = TestContext::new();
        if let Err(err) = body(ctx).await {
            panic!("test run failed: {err:#}");
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// Per-test handle on a simulated ledger.
pub struct TestContext {
    ledger: SimulatedLedger,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            ledger: SimulatedLedger::new(),
        }
    }

    /// The ledger behind this context, for direct control (holds, slots).
    pub fn ledger(&self) -> &SimulatedLedger {
        &self.ledger
    }

    pub fn generate_new_keypair(&self) -> (Keypair, Pubkey) {
        let keypair = Keypair::new();
        let pubkey = keypair.pubkey();
        (keypair, pubkey)
    }

    /// Credits [`DEFAULT_AIRDROP_LAMPORTS`] to `keypair` and waits for the
    /// airdrop to confirm.
    pub async fn fund_keypair_with_faucet(&self, keypair: &Keypair) -> anyhow::Result<()> {
        let signature = self
            .ledger
            .request_airdrop(&keypair.pubkey(), DEFAULT_AIRDROP_LAMPORTS)
            .await?;
        for _ in 0..AIRDROP_CONFIRM_ATTEMPTS {
            if self
                .ledger
                .confirm_transaction(&signature, CommitmentLevel::Confirmed)
                .await?
                .is_some()
            {
                return Ok(());
            }
            tokio::time::sleep(AIRDROP_CONFIRM_INTERVAL).await;
        }
        anyhow::bail!("airdrop {signature} was not confirmed")
    }

    /// Transaction handler paying with `payer` against this context's ledger.
    pub fn payer_handler(&self, payer: &Keypair) -> PayerTransactionHandler<SimulatedLedger> {
        PayerTransactionHandler::new(self.ledger.clone(), payer.insecure_clone())
    }

    /// Fetches an account that is expected to exist.
    pub async fn read_account_info(&self, address: Pubkey) -> anyhow::Result<Account> {
        self.ledger
            .fetch_account(&address)
            .await?
            .ok_or_else(|| anyhow::anyhow!("account {address} not found"))
    }
}
