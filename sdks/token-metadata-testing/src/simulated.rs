//! Deterministic in-process ledger.
//!
//! Executes the three program families the metadata flows touch: system
//! (create_account, transfer), SPL token (mint initialization), and the token
//! metadata program itself. Blockhashes and slots advance deterministically,
//! fees are charged per signature, and log output follows the reference
//! network's `Program .. invoke/success/failed` format.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentLevel,
    hash::{hashv, Hash},
    message::Message,
    native_token::LAMPORTS_PER_SOL,
    program_error::ProgramError,
    program_option::COption,
    program_pack::Pack,
    pubkey::Pubkey,
    rent::Rent,
    signature::Signature,
    system_instruction::SystemInstruction,
    system_program,
    transaction::Transaction,
};
use spl_token::instruction::TokenInstruction;
use tokio::sync::Mutex;

use token_metadata_program as metadata_program;
use metadata_program::error::MetadataError;
use metadata_program::find_metadata_pda_with_program;
use metadata_program::instruction::{
    CreateMetadataAccountArgs, MetadataInstruction, UpdateMetadataAccountArgs,
};
use metadata_program::state::{
    Data, Key, Metadata, MAX_CREATOR_LIMIT, MAX_NAME_LENGTH, MAX_SELLER_FEE_BASIS_POINTS,
    MAX_SYMBOL_LENGTH, MAX_URI_LENGTH,
};

use crate::errors::LedgerError;
use crate::ledger::{ConfirmedTransaction, Ledger, TransactionSummary};

/// Base fee charged per transaction signature, in lamports.
pub const LAMPORTS_PER_SIGNATURE: u64 = 5_000;

/// Grant credited by [`crate::TestContext::fund_keypair_with_faucet`].
pub const DEFAULT_AIRDROP_LAMPORTS: u64 = 2 * LAMPORTS_PER_SOL;

/// How many blockhash generations remain submittable.
const BLOCKHASH_WINDOW: u64 = 32;

#[derive(Debug)]
struct ExecutedTransaction {
    slot: u64,
    fee: u64,
    log_messages: Vec<String>,
    err: Option<String>,
}

#[derive(Default)]
struct LedgerState {
    slot: u64,
    blockhash_counter: u64,
    hold_confirmations: bool,
    accounts: HashMap<Pubkey, Account>,
    transactions: HashMap<Signature, ExecutedTransaction>,
}

impl LedgerState {
    fn latest_blockhash(&self) -> Hash {
        blockhash_at(self.blockhash_counter)
    }

    fn is_blockhash_valid(&self, candidate: &Hash) -> bool {
        let oldest = self.blockhash_counter.saturating_sub(BLOCKHASH_WINDOW);
        (oldest..=self.blockhash_counter).any(|generation| blockhash_at(generation) == *candidate)
    }
}

fn blockhash_at(generation: u64) -> Hash {
    hashv(&[b"simulated-ledger-blockhash", &generation.to_le_bytes()])
}

fn synthetic_signature(seeds: &[&[u8]]) -> Signature {
    let first = hashv(seeds);
    let second = hashv(&[first.as_ref()]);
    let mut bytes = [0u8; 64];
    bytes[..32].copy_from_slice(first.as_ref());
    bytes[32..].copy_from_slice(second.as_ref());
    Signature::from(bytes)
}

/// In-process ledger with deterministic blockhashes and slots.
///
/// Cloning is cheap and shares the underlying state, so a clone handed to a
/// transaction handler observes the same accounts as the test.
#[derive(Clone, Default)]
pub struct SimulatedLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl SimulatedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, [`Ledger::confirm_transaction`] reports nothing, even for
    /// transactions that already executed. Lets tests exercise confirmation
    /// deadlines without a real network.
    pub async fn hold_confirmations(&self, hold: bool) {
        self.state.lock().await.hold_confirmations = hold;
    }

    /// Advance `generations` slots, expiring blockhashes along the way.
    pub async fn advance_slots(&self, generations: u64) {
        let mut state = self.state.lock().await;
        state.slot += generations;
        state.blockhash_counter += generations;
    }
}

#[async_trait]
impl Ledger for SimulatedLedger {
    async fn latest_blockhash(&self) -> Result<Hash, LedgerError> {
        Ok(self.state.lock().await.latest_blockhash())
    }

    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature, LedgerError> {
        let mut state = self.state.lock().await;
        state.blockhash_counter += 1;
        state.slot += 1;
        let slot = state.slot;

        credit(&mut state.accounts, *to, lamports);

        let signature = synthetic_signature(&[
            b"airdrop",
            to.as_ref(),
            &lamports.to_le_bytes(),
            &state.blockhash_counter.to_le_bytes(),
        ]);
        state.transactions.insert(
            signature,
            ExecutedTransaction {
                slot,
                fee: 0,
                log_messages: vec![],
                err: None,
            },
        );
        Ok(signature)
    }

    async fn submit_transaction(
        &self,
        transaction: Transaction,
        skip_preflight: bool,
        _max_retries: Option<usize>,
    ) -> Result<Signature, LedgerError> {
        let mut state = self.state.lock().await;

        let Some(signature) = transaction.signatures.first().copied() else {
            return Err(LedgerError::Rejected("transaction has no signatures".into()));
        };
        if state.transactions.contains_key(&signature) {
            return Err(LedgerError::Rejected("transaction already processed".into()));
        }

        let message = &transaction.message;
        let Some(fee_payer) = message.account_keys.first().copied() else {
            return Err(LedgerError::Rejected("transaction has no fee payer".into()));
        };
        let fee = LAMPORTS_PER_SIGNATURE * u64::from(message.header.num_required_signatures);

        let blockhash_valid = state.is_blockhash_valid(&message.recent_blockhash);
        let fee_payable = state
            .accounts
            .get(&fee_payer)
            .is_some_and(|account| account.lamports >= fee);

        if !skip_preflight {
            if !blockhash_valid {
                return Err(LedgerError::Rejected("blockhash not found".into()));
            }
            if !fee_payable {
                return Err(LedgerError::Rejected(
                    "fee payer cannot cover the transaction fee".into(),
                ));
            }
        } else if !blockhash_valid || !fee_payable {
            // Accepted by the relay but never lands; no record is kept.
            tracing::debug!(%signature, "transaction dropped");
            return Ok(signature);
        }

        state.blockhash_counter += 1;
        state.slot += 1;
        let slot = state.slot;

        if let Some(account) = state.accounts.get_mut(&fee_payer) {
            account.lamports = account.lamports.saturating_sub(fee);
        }

        let (log_messages, err) = execute_message(&mut state.accounts, message);
        tracing::debug!(%signature, slot, failed = err.is_some(), "transaction executed");
        state.transactions.insert(
            signature,
            ExecutedTransaction {
                slot,
                fee,
                log_messages,
                err,
            },
        );
        Ok(signature)
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        _commitment: CommitmentLevel,
    ) -> Result<Option<ConfirmedTransaction>, LedgerError> {
        let state = self.state.lock().await;
        if state.hold_confirmations {
            return Ok(None);
        }
        // Executed transactions are visible at every commitment level; the
        // simulation has no forks to roll back.
        Ok(state.transactions.get(signature).map(|record| {
            ConfirmedTransaction {
                summary: TransactionSummary {
                    slot: record.slot,
                    fee: record.fee,
                    log_messages: record.log_messages.clone(),
                },
                err: record.err.clone(),
            }
        }))
    }

    async fn fetch_account(&self, address: &Pubkey) -> Result<Option<Account>, LedgerError> {
        Ok(self.state.lock().await.accounts.get(address).cloned())
    }
}

// === Message execution ===

struct ResolvedInstruction {
    program_id: Pubkey,
    accounts: Vec<(Pubkey, bool)>,
    data: Vec<u8>,
}

impl ResolvedInstruction {
    fn key(&self, index: usize) -> Result<Pubkey, ProgramFailure> {
        self.accounts
            .get(index)
            .map(|(key, _)| *key)
            .ok_or_else(|| ProgramFailure::Message("not enough account keys".into()))
    }

    fn is_signer(&self, index: usize) -> bool {
        self.accounts
            .get(index)
            .map(|(_, signer)| *signer)
            .unwrap_or(false)
    }
}

#[derive(Debug)]
enum ProgramFailure {
    Custom(u32),
    Message(String),
}

impl fmt::Display for ProgramFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(code) => write!(f, "custom program error: 0x{code:x}"),
            Self::Message(message) => f.write_str(message),
        }
    }
}

impl From<MetadataError> for ProgramFailure {
    fn from(err: MetadataError) -> Self {
        match ProgramError::from(err) {
            ProgramError::Custom(code) => Self::Custom(code),
            other => Self::Message(other.to_string()),
        }
    }
}

fn execute_message(
    accounts: &mut HashMap<Pubkey, Account>,
    message: &Message,
) -> (Vec<String>, Option<String>) {
    // Instructions run against a working copy; only a fully successful
    // transaction commits. The fee was charged before execution either way.
    let mut working = accounts.clone();
    let mut logs = Vec::new();

    for index in 0..message.instructions.len() {
        let resolved = match resolve_instruction(message, index) {
            Ok(resolved) => resolved,
            Err(failure) => {
                return (
                    logs,
                    Some(format!("Error processing Instruction {index}: {failure}")),
                );
            }
        };
        let program_id = resolved.program_id;
        logs.push(format!("Program {program_id} invoke [1]"));

        let result = if program_id == system_program::id() {
            execute_system_instruction(&resolved, &mut working)
        } else if program_id == spl_token::id() {
            execute_token_instruction(&resolved, &mut working, &mut logs)
        } else if program_id == metadata_program::id() {
            execute_metadata_instruction(&resolved, &mut working, &mut logs)
        } else {
            Err(ProgramFailure::Message(format!(
                "unsupported program {program_id}"
            )))
        };

        match result {
            Ok(()) => logs.push(format!("Program {program_id} success")),
            Err(failure) => {
                logs.push(format!("Program {program_id} failed: {failure}"));
                return (
                    logs,
                    Some(format!("Error processing Instruction {index}: {failure}")),
                );
            }
        }
    }

    *accounts = working;
    (logs, None)
}

fn resolve_instruction(
    message: &Message,
    index: usize,
) -> Result<ResolvedInstruction, ProgramFailure> {
    let Some(compiled) = message.instructions.get(index) else {
        return Err(ProgramFailure::Message("instruction index out of range".into()));
    };
    let program_id = *message
        .account_keys
        .get(compiled.program_id_index as usize)
        .ok_or_else(|| ProgramFailure::Message("invalid program account index".into()))?;

    let mut accounts = Vec::with_capacity(compiled.accounts.len());
    for &account_index in &compiled.accounts {
        let account_index = account_index as usize;
        let key = *message
            .account_keys
            .get(account_index)
            .ok_or_else(|| ProgramFailure::Message("invalid account index".into()))?;
        accounts.push((key, message.is_signer(account_index)));
    }

    Ok(ResolvedInstruction {
        program_id,
        accounts,
        data: compiled.data.clone(),
    })
}

// === System program ===

fn execute_system_instruction(
    ix: &ResolvedInstruction,
    accounts: &mut HashMap<Pubkey, Account>,
) -> Result<(), ProgramFailure> {
    let instruction: SystemInstruction = bincode::deserialize(&ix.data)
        .map_err(|_| ProgramFailure::Message("invalid system instruction data".into()))?;

    match instruction {
        SystemInstruction::CreateAccount {
            lamports,
            space,
            owner,
        } => {
            let from = ix.key(0)?;
            let to = ix.key(1)?;
            if !ix.is_signer(1) {
                return Err(ProgramFailure::Message(
                    "missing required signature for new account".into(),
                ));
            }
            let in_use = accounts
                .get(&to)
                .is_some_and(|account| account.lamports > 0 || !account.data.is_empty());
            if in_use {
                return Err(ProgramFailure::Message("account already in use".into()));
            }
            debit(accounts, &from, lamports)?;
            accounts.insert(to, Account::new(lamports, space as usize, &owner));
            Ok(())
        }
        SystemInstruction::Transfer { lamports } => {
            let from = ix.key(0)?;
            let to = ix.key(1)?;
            if !ix.is_signer(0) {
                return Err(ProgramFailure::Message(
                    "missing required signature for transfer".into(),
                ));
            }
            debit(accounts, &from, lamports)?;
            credit(accounts, to, lamports);
            Ok(())
        }
        _ => Err(ProgramFailure::Message(
            "unsupported system instruction".into(),
        )),
    }
}

fn debit(
    accounts: &mut HashMap<Pubkey, Account>,
    from: &Pubkey,
    lamports: u64,
) -> Result<(), ProgramFailure> {
    let funded = accounts
        .get(from)
        .is_some_and(|account| account.lamports >= lamports);
    if !funded {
        return Err(ProgramFailure::Message(
            "insufficient funds for instruction".into(),
        ));
    }
    if let Some(account) = accounts.get_mut(from) {
        account.lamports -= lamports;
    }
    Ok(())
}

fn credit(accounts: &mut HashMap<Pubkey, Account>, to: Pubkey, lamports: u64) {
    accounts
        .entry(to)
        .or_insert_with(|| Account::new(0, 0, &system_program::id()))
        .lamports += lamports;
}

// === SPL token program ===

fn execute_token_instruction(
    ix: &ResolvedInstruction,
    accounts: &mut HashMap<Pubkey, Account>,
    logs: &mut Vec<String>,
) -> Result<(), ProgramFailure> {
    let instruction = TokenInstruction::unpack(&ix.data)
        .map_err(|_| ProgramFailure::Message("invalid token instruction data".into()))?;

    match instruction {
        TokenInstruction::InitializeMint {
            decimals,
            mint_authority,
            freeze_authority,
        } => {
            logs.push("Program log: Instruction: InitializeMint".to_string());
            initialize_mint(ix, accounts, decimals, mint_authority, freeze_authority)
        }
        TokenInstruction::InitializeMint2 {
            decimals,
            mint_authority,
            freeze_authority,
        } => {
            logs.push("Program log: Instruction: InitializeMint2".to_string());
            initialize_mint(ix, accounts, decimals, mint_authority, freeze_authority)
        }
        _ => Err(ProgramFailure::Message(
            "unsupported token instruction".into(),
        )),
    }
}

fn initialize_mint(
    ix: &ResolvedInstruction,
    accounts: &mut HashMap<Pubkey, Account>,
    decimals: u8,
    mint_authority: Pubkey,
    freeze_authority: COption<Pubkey>,
) -> Result<(), ProgramFailure> {
    let mint_key = ix.key(0)?;
    let Some(mint_account) = accounts.get_mut(&mint_key) else {
        return Err(ProgramFailure::Message("mint account not found".into()));
    };
    if mint_account.owner != spl_token::id()
        || mint_account.data.len() != spl_token::state::Mint::LEN
    {
        return Err(ProgramFailure::Message(
            "mint account not owned by the token program".into(),
        ));
    }
    let initialized = spl_token::state::Mint::unpack_unchecked(&mint_account.data)
        .is_ok_and(|mint| mint.is_initialized);
    if initialized {
        return Err(ProgramFailure::Message("mint already initialized".into()));
    }

    let mint = spl_token::state::Mint {
        mint_authority: COption::Some(mint_authority),
        supply: 0,
        decimals,
        is_initialized: true,
        freeze_authority,
    };
    let mut data = vec![0u8; spl_token::state::Mint::LEN];
    spl_token::state::Mint::pack(mint, &mut data)
        .map_err(|_| ProgramFailure::Message("mint serialization failed".into()))?;
    mint_account.data = data;
    Ok(())
}

// === Token metadata program ===

fn execute_metadata_instruction(
    ix: &ResolvedInstruction,
    accounts: &mut HashMap<Pubkey, Account>,
    logs: &mut Vec<String>,
) -> Result<(), ProgramFailure> {
    let instruction = MetadataInstruction::unpack(&ix.data)
        .map_err(|_| ProgramFailure::from(MetadataError::InstructionUnpackError))?;

    match instruction {
        MetadataInstruction::CreateMetadataAccount(args) => {
            logs.push("Program log: Instruction: Create Metadata Accounts".to_string());
            process_create_metadata(ix, accounts, args)
        }
        MetadataInstruction::UpdateMetadataAccount(args) => {
            logs.push("Program log: Instruction: Update Metadata Accounts".to_string());
            process_update_metadata(ix, accounts, args)
        }
    }
}

fn process_create_metadata(
    ix: &ResolvedInstruction,
    accounts: &mut HashMap<Pubkey, Account>,
    args: CreateMetadataAccountArgs,
) -> Result<(), ProgramFailure> {
    if ix.accounts.len() < 7 {
        return Err(ProgramFailure::Message("not enough account keys".into()));
    }
    let metadata_key = ix.key(0)?;
    let mint_key = ix.key(1)?;
    let mint_authority = ix.key(2)?;
    let payer = ix.key(3)?;
    let update_authority = ix.key(4)?;

    let (derived, _bump) = find_metadata_pda_with_program(&metadata_program::id(), &mint_key);
    if metadata_key != derived {
        return Err(MetadataError::DerivedKeyInvalid.into());
    }
    let occupied = accounts
        .get(&metadata_key)
        .is_some_and(|account| !account.data.is_empty());
    if occupied {
        return Err(MetadataError::AlreadyInitialized.into());
    }

    let mint = accounts
        .get(&mint_key)
        .filter(|account| account.owner == spl_token::id())
        .and_then(|account| spl_token::state::Mint::unpack(&account.data).ok())
        .ok_or(MetadataError::InvalidMintAccount)?;
    if !ix.is_signer(2) {
        return Err(ProgramFailure::Message("missing required signature".into()));
    }
    if mint.mint_authority != COption::Some(mint_authority) {
        return Err(MetadataError::InvalidMintAuthority.into());
    }
    if !ix.is_signer(3) {
        return Err(ProgramFailure::Message("missing required signature".into()));
    }

    validate_data(&args.data)?;

    let metadata = Metadata {
        key: Key::MetadataV1,
        update_authority,
        mint: mint_key,
        data: args.data,
        primary_sale_happened: false,
        is_mutable: args.is_mutable,
    };
    let serialized = borsh::to_vec(&metadata)
        .map_err(|_| ProgramFailure::Message("metadata serialization failed".into()))?;

    let rent = Rent::default().minimum_balance(serialized.len());
    debit(accounts, &payer, rent)?;
    accounts.insert(
        metadata_key,
        Account {
            lamports: rent,
            data: serialized,
            owner: metadata_program::id(),
            executable: false,
            rent_epoch: 0,
        },
    );
    Ok(())
}

fn process_update_metadata(
    ix: &ResolvedInstruction,
    accounts: &mut HashMap<Pubkey, Account>,
    args: UpdateMetadataAccountArgs,
) -> Result<(), ProgramFailure> {
    if ix.accounts.len() < 2 {
        return Err(ProgramFailure::Message("not enough account keys".into()));
    }
    let metadata_key = ix.key(0)?;
    let authority = ix.key(1)?;

    let mut metadata = accounts
        .get(&metadata_key)
        .filter(|account| account.owner == metadata_program::id())
        .ok_or(MetadataError::Uninitialized)
        .and_then(|account| Metadata::from_account_data(&account.data))?;

    if metadata.update_authority != authority {
        return Err(MetadataError::UpdateAuthorityIncorrect.into());
    }
    if !ix.is_signer(1) {
        return Err(MetadataError::UpdateAuthorityIsNotSigner.into());
    }

    if let Some(new_data) = args.data {
        if !metadata.is_mutable {
            return Err(MetadataError::ImmutableMetadata.into());
        }
        validate_data(&new_data)?;
        metadata.data = new_data;
    }
    if let Some(new_authority) = args.update_authority {
        metadata.update_authority = new_authority;
    }
    if let Some(primary_sale_happened) = args.primary_sale_happened {
        metadata.primary_sale_happened = primary_sale_happened;
    }

    let serialized = borsh::to_vec(&metadata)
        .map_err(|_| ProgramFailure::Message("metadata serialization failed".into()))?;
    if let Some(account) = accounts.get_mut(&metadata_key) {
        account.data = serialized;
    }
    Ok(())
}

fn validate_data(data: &Data) -> Result<(), MetadataError> {
    if data.name.len() > MAX_NAME_LENGTH {
        return Err(MetadataError::NameTooLong);
    }
    if data.symbol.len() > MAX_SYMBOL_LENGTH {
        return Err(MetadataError::SymbolTooLong);
    }
    if data.uri.len() > MAX_URI_LENGTH {
        return Err(MetadataError::UriTooLong);
    }
    if data.seller_fee_basis_points > MAX_SELLER_FEE_BASIS_POINTS {
        return Err(MetadataError::InvalidBasisPoints);
    }
    if let Some(creators) = data.creators.as_ref() {
        if creators.is_empty() || creators.len() > MAX_CREATOR_LIMIT {
            return Err(MetadataError::InvalidCreators);
        }
        let share_total: u32 = creators.iter().map(|c| u32::from(c.share)).sum();
        if share_total != 100 {
            return Err(MetadataError::InvalidCreators);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::{
        signature::Keypair,
        signer::Signer,
        system_instruction,
    };

    async fn funded_keypair(ledger: &SimulatedLedger, lamports: u64) -> Keypair {
        let keypair = Keypair::new();
        ledger
            .request_airdrop(&keypair.pubkey(), lamports)
            .await
            .unwrap();
        keypair
    }

    fn transfer_transaction(payer: &Keypair, to: &Pubkey, lamports: u64, blockhash: Hash) -> Transaction {
        Transaction::new_signed_with_payer(
            &[system_instruction::transfer(&payer.pubkey(), to, lamports)],
            Some(&payer.pubkey()),
            &[payer],
            blockhash,
        )
    }

    #[tokio::test]
    async fn duplicate_submission_is_rejected() {
        let ledger = SimulatedLedger::new();
        let payer = funded_keypair(&ledger, LAMPORTS_PER_SOL).await;
        let to = Pubkey::new_unique();

        let blockhash = ledger.latest_blockhash().await.unwrap();
        let tx = transfer_transaction(&payer, &to, 1_000, blockhash);

        ledger
            .submit_transaction(tx.clone(), false, None)
            .await
            .unwrap();
        let err = ledger.submit_transaction(tx, false, None).await.unwrap_err();
        assert_eq!(
            err,
            LedgerError::Rejected("transaction already processed".into()),
        );
    }

    #[tokio::test]
    async fn stale_blockhash_is_rejected() {
        let ledger = SimulatedLedger::new();
        let payer = funded_keypair(&ledger, LAMPORTS_PER_SOL).await;

        let stale = ledger.latest_blockhash().await.unwrap();
        ledger.advance_slots(BLOCKHASH_WINDOW + 1).await;

        let tx = transfer_transaction(&payer, &Pubkey::new_unique(), 1_000, stale);
        let err = ledger.submit_transaction(tx, false, None).await.unwrap_err();
        assert_eq!(err, LedgerError::Rejected("blockhash not found".into()));
    }

    #[tokio::test]
    async fn fees_and_transfers_are_deducted() {
        let ledger = SimulatedLedger::new();
        let payer = funded_keypair(&ledger, LAMPORTS_PER_SOL).await;
        let to = Pubkey::new_unique();

        let blockhash = ledger.latest_blockhash().await.unwrap();
        let tx = transfer_transaction(&payer, &to, 1_000, blockhash);
        let signature = ledger.submit_transaction(tx, false, None).await.unwrap();

        let confirmed = ledger
            .confirm_transaction(&signature, CommitmentLevel::Confirmed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(confirmed.err, None);
        assert_eq!(confirmed.summary.fee, LAMPORTS_PER_SIGNATURE);

        let payer_account = ledger
            .fetch_account(&payer.pubkey())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            payer_account.lamports,
            LAMPORTS_PER_SOL - 1_000 - LAMPORTS_PER_SIGNATURE,
        );
        let to_account = ledger.fetch_account(&to).await.unwrap().unwrap();
        assert_eq!(to_account.lamports, 1_000);
    }

    #[tokio::test]
    async fn failed_transactions_charge_fees_and_roll_back() {
        let ledger = SimulatedLedger::new();
        let payer = funded_keypair(&ledger, LAMPORTS_PER_SOL).await;
        let to = Pubkey::new_unique();

        // transfer more than the payer holds
        let blockhash = ledger.latest_blockhash().await.unwrap();
        let tx = transfer_transaction(&payer, &to, 2 * LAMPORTS_PER_SOL, blockhash);
        let signature = ledger.submit_transaction(tx, false, None).await.unwrap();

        let confirmed = ledger
            .confirm_transaction(&signature, CommitmentLevel::Confirmed)
            .await
            .unwrap()
            .unwrap();
        assert!(confirmed.err.is_some());

        let payer_account = ledger
            .fetch_account(&payer.pubkey())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            payer_account.lamports,
            LAMPORTS_PER_SOL - LAMPORTS_PER_SIGNATURE,
        );
        assert!(ledger.fetch_account(&to).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn held_confirmations_become_visible_after_release() {
        let ledger = SimulatedLedger::new();
        let payer = funded_keypair(&ledger, LAMPORTS_PER_SOL).await;

        ledger.hold_confirmations(true).await;
        let blockhash = ledger.latest_blockhash().await.unwrap();
        let tx = transfer_transaction(&payer, &Pubkey::new_unique(), 1_000, blockhash);
        let signature = ledger.submit_transaction(tx, false, None).await.unwrap();

        assert!(ledger
            .confirm_transaction(&signature, CommitmentLevel::Confirmed)
            .await
            .unwrap()
            .is_none());

        ledger.hold_confirmations(false).await;
        assert!(ledger
            .confirm_transaction(&signature, CommitmentLevel::Confirmed)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn preflight_rejects_unfunded_payer_but_skip_preflight_drops() {
        let ledger = SimulatedLedger::new();
        let broke = Keypair::new();
        let to = Pubkey::new_unique();

        let blockhash = ledger.latest_blockhash().await.unwrap();
        let tx = transfer_transaction(&broke, &to, 1_000, blockhash);

        let err = ledger
            .submit_transaction(tx.clone(), false, None)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(_)));

        // Same transaction with preflight skipped: accepted, never lands.
        let signature = ledger.submit_transaction(tx, true, None).await.unwrap();
        assert!(ledger
            .confirm_transaction(&signature, CommitmentLevel::Confirmed)
            .await
            .unwrap()
            .is_none());
    }
}
