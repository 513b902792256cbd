//! Token Metadata – Rust SDK (client-side helpers)
//!
//! This crate provides:
//! - PDA helpers for metadata accounts
//! - Instruction builders with correct account ordering and client-side validation
//! - Transaction builders for common flows (compose Vec<Instruction>)
//!
//! Signers, recent blockhashes, and submission are left to the caller.

use solana_sdk::program_pack::Pack;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_instruction, system_program, sysvar,
};

use token_metadata_program as program;
use program::instruction::{
    CreateMetadataAccountArgs, MetadataInstruction, UpdateMetadataAccountArgs,
};
use program::state::{
    Data, MAX_CREATOR_LIMIT, MAX_NAME_LENGTH, MAX_SELLER_FEE_BASIS_POINTS, MAX_SYMBOL_LENGTH,
    MAX_URI_LENGTH,
};

/// Thin client for building PDAs and instructions for the Token Metadata program.
///
/// `new()` binds the canonical program id; use `with_program_id` for alternate
/// deployments. PDA derivation folds the program id in, so the two must
/// always travel together.
pub struct MetadataClient {
    pub program_id: Pubkey,
}

impl Default for MetadataClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataClient {
    pub fn new() -> Self {
        Self {
            program_id: program::id(),
        }
    }

    pub fn with_program_id(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    /// Derive the metadata PDA for a given mint.
    pub fn metadata_pda(&self, mint: &Pubkey) -> Pubkey {
        let (pda, _bump) = program::find_metadata_pda_with_program(&self.program_id, mint);
        pda
    }

    /// Derive the metadata PDA for a given mint, with the bump.
    pub fn metadata_pda_and_bump(&self, mint: &Pubkey) -> (Pubkey, u8) {
        program::find_metadata_pda_with_program(&self.program_id, mint)
    }

    /// Build a CreateMetadataAccount instruction.
    ///
    /// Accounts (strict order):
    /// - metadata_pda (writable)
    /// - mint (readonly)
    /// - mint_authority (readonly, signer)
    /// - payer (writable, signer)
    /// - update_authority (readonly)
    /// - system_program (readonly)
    /// - rent sysvar (readonly)
    pub fn create_metadata_account_ix(
        &self,
        params: CreateMetadataAccountParams,
    ) -> anyhow::Result<Instruction> {
        self.validate_metadata_data(&params.data)?;
        anyhow::ensure!(
            params.metadata == self.metadata_pda(&params.mint),
            "metadata address is not the derived address for the mint"
        );
        let update_authority = params.update_authority.unwrap_or(params.payer);

        let data = MetadataInstruction::CreateMetadataAccount(CreateMetadataAccountArgs {
            data: params.data,
            is_mutable: true,
        })
        .pack();

        Ok(Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(params.metadata, false),
                AccountMeta::new_readonly(params.mint, false),
                AccountMeta::new_readonly(params.mint_authority, true),
                AccountMeta::new(params.payer, true),
                AccountMeta::new_readonly(update_authority, false),
                AccountMeta::new_readonly(system_program::id(), false),
                AccountMeta::new_readonly(sysvar::rent::id(), false),
            ],
            data,
        })
    }

    /// Build an UpdateMetadataAccount instruction.
    ///
    /// Accounts (strict order):
    /// - metadata_pda (writable)
    /// - update_authority (readonly, signer)
    pub fn update_metadata_account_ix(
        &self,
        params: UpdateMetadataAccountParams,
    ) -> anyhow::Result<Instruction> {
        if let Some(new_data) = params.new_data.as_ref() {
            self.validate_metadata_data(new_data)?;
        }

        let data = MetadataInstruction::UpdateMetadataAccount(UpdateMetadataAccountArgs {
            data: params.new_data,
            update_authority: params.new_update_authority,
            primary_sale_happened: params.primary_sale_happened,
        })
        .pack();

        Ok(Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(params.metadata, false),
                AccountMeta::new_readonly(params.update_authority, true),
            ],
            data,
        })
    }

    // Upstream SPL Token program helpers
    /// Build a SystemProgram create_account to allocate an SPL Token mint account.
    ///
    /// `lamports` is the rent-exempt balance for `Mint::LEN` bytes; the caller
    /// supplies it so this builder stays free of rent lookups.
    pub fn create_mint_account_ix(&self, payer: Pubkey, mint: Pubkey, lamports: u64) -> Instruction {
        system_instruction::create_account(
            &payer,
            &mint,
            lamports,
            spl_token::state::Mint::LEN as u64,
            &spl_token::id(),
        )
    }

    /// Build an SPL Token initialize_mint2 instruction.
    pub fn initialize_mint2_ix(
        &self,
        mint: Pubkey,
        mint_authority: Pubkey,
        freeze_authority: Option<Pubkey>,
        decimals: u8,
    ) -> anyhow::Result<Instruction> {
        let ix = spl_token::instruction::initialize_mint2(
            &spl_token::id(),
            &mint,
            &mint_authority,
            freeze_authority.as_ref(),
            decimals,
        )?;
        Ok(ix)
    }

    // Transaction patterns (compose instructions; signing and submission left to caller)
    /// Create an SPL Token mint and its metadata account in one sequence.
    ///
    /// Returns a Vec<Instruction> with: [create_mint, initialize_mint2, create_metadata_account].
    pub fn create_token_with_metadata_ixs(
        &self,
        params: CreateTokenWithMetadataParams,
    ) -> anyhow::Result<Vec<Instruction>> {
        let create_mint_ix =
            self.create_mint_account_ix(params.payer, params.mint, params.mint_rent);

        let init_mint_ix = self.initialize_mint2_ix(
            params.mint,
            params.mint_authority,
            params.freeze_authority,
            params.decimals,
        )?;

        let create_md_ix = self.create_metadata_account_ix(CreateMetadataAccountParams {
            metadata: self.metadata_pda(&params.mint),
            mint: params.mint,
            mint_authority: params.mint_authority,
            payer: params.payer,
            update_authority: params.update_authority,
            data: params.data,
        })?;

        Ok(vec![create_mint_ix, init_mint_ix, create_md_ix])
    }
}

// === Params ===
/// Parameters for CreateMetadataAccount instruction.
pub struct CreateMetadataAccountParams {
    /// Metadata account to initialize; must equal the PDA derived from the mint
    pub metadata: Pubkey,
    /// Token mint the metadata describes
    pub mint: Pubkey,
    /// Mint authority (must sign)
    pub mint_authority: Pubkey,
    /// Account that funds the metadata account (must sign)
    pub payer: Pubkey,
    /// Update authority recorded on the account; defaults to the payer
    pub update_authority: Option<Pubkey>,
    /// Metadata payload to store
    pub data: Data,
}

/// Parameters for UpdateMetadataAccount instruction.
pub struct UpdateMetadataAccountParams {
    /// Metadata account being updated
    pub metadata: Pubkey,
    /// Current update authority (must sign)
    pub update_authority: Pubkey,
    /// Optional replacement payload
    pub new_data: Option<Data>,
    /// Optional replacement update authority
    pub new_update_authority: Option<Pubkey>,
    /// Optional new primary-sale flag
    pub primary_sale_happened: Option<bool>,
}

/// Parameters for the create_token_with_metadata_ixs transaction pattern.
pub struct CreateTokenWithMetadataParams {
    /// Payer that funds the mint account and metadata account
    pub payer: Pubkey,
    /// Mint account public key (signs the create_account instruction)
    pub mint: Pubkey,
    /// Rent-exempt balance for the mint account
    pub mint_rent: u64,
    /// Initial mint authority (must sign the metadata creation)
    pub mint_authority: Pubkey,
    /// Optional freeze authority for the mint
    pub freeze_authority: Option<Pubkey>,
    /// Number of decimals for the mint
    pub decimals: u8,
    /// Update authority for the metadata; defaults to the payer
    pub update_authority: Option<Pubkey>,
    /// Metadata payload
    pub data: Data,
}

// === Validation helpers ===
impl MetadataClient {
    fn validate_metadata_data(&self, data: &Data) -> anyhow::Result<()> {
        anyhow::ensure!(data.name.len() <= MAX_NAME_LENGTH, "name too long");
        anyhow::ensure!(data.symbol.len() <= MAX_SYMBOL_LENGTH, "symbol too long");
        anyhow::ensure!(data.uri.len() <= MAX_URI_LENGTH, "uri too long");
        anyhow::ensure!(
            data.seller_fee_basis_points <= MAX_SELLER_FEE_BASIS_POINTS,
            "seller fee basis points above 10000"
        );
        if let Some(creators) = data.creators.as_ref() {
            anyhow::ensure!(!creators.is_empty(), "creators list is empty");
            anyhow::ensure!(creators.len() <= MAX_CREATOR_LIMIT, "too many creators");
            let share_total: u32 = creators.iter().map(|c| u32::from(c.share)).sum();
            anyhow::ensure!(share_total == 100, "creator shares must sum to 100");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use program::state::Creator;

    fn sample_data() -> Data {
        Data {
            name: "test".to_string(),
            symbol: "sym".to_string(),
            uri: "uri".to_string(),
            seller_fee_basis_points: 10,
            creators: None,
        }
    }

    fn create_params(client: &MetadataClient, payer: Pubkey, mint: Pubkey, data: Data) -> CreateMetadataAccountParams {
        CreateMetadataAccountParams {
            metadata: client.metadata_pda(&mint),
            mint,
            mint_authority: payer,
            payer,
            update_authority: None,
            data,
        }
    }

    #[test]
    fn metadata_pda_is_deterministic() {
        let client = MetadataClient::new();
        let mint = Pubkey::new_unique();
        assert_eq!(client.metadata_pda(&mint), client.metadata_pda(&mint));
        assert_ne!(
            client.metadata_pda(&mint),
            client.metadata_pda(&Pubkey::new_unique())
        );
    }

    #[test]
    fn create_metadata_account_ix_orders_accounts() {
        let client = MetadataClient::new();
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let mint_authority = Pubkey::new_unique();
        let update_authority = Pubkey::new_unique();
        let metadata = client.metadata_pda(&mint);

        let ix = client
            .create_metadata_account_ix(CreateMetadataAccountParams {
                metadata,
                mint,
                mint_authority,
                payer,
                update_authority: Some(update_authority),
                data: sample_data(),
            })
            .unwrap();

        assert_eq!(ix.program_id, program::id());
        let keys: Vec<Pubkey> = ix.accounts.iter().map(|m| m.pubkey).collect();
        assert_eq!(
            keys,
            vec![
                metadata,
                mint,
                mint_authority,
                payer,
                update_authority,
                system_program::id(),
                sysvar::rent::id(),
            ],
        );
        let signers: Vec<bool> = ix.accounts.iter().map(|m| m.is_signer).collect();
        assert_eq!(signers, vec![false, false, true, true, false, false, false]);
        let writable: Vec<bool> = ix.accounts.iter().map(|m| m.is_writable).collect();
        assert_eq!(writable, vec![true, false, false, true, false, false, false]);
    }

    #[test]
    fn update_authority_defaults_to_payer() {
        let client = MetadataClient::new();
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let ix = client
            .create_metadata_account_ix(create_params(&client, payer, mint, sample_data()))
            .unwrap();
        assert_eq!(ix.accounts[4].pubkey, payer);

        match MetadataInstruction::unpack(&ix.data).unwrap() {
            MetadataInstruction::CreateMetadataAccount(args) => {
                assert_eq!(args.data, sample_data());
                assert!(args.is_mutable);
            }
            other => panic!("unexpected instruction: {other:?}"),
        }
    }

    #[test]
    fn create_rejects_oversized_fields() {
        let client = MetadataClient::new();
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let mut data = sample_data();
        data.name = "n".repeat(MAX_NAME_LENGTH + 1);
        let err = client
            .create_metadata_account_ix(create_params(&client, payer, mint, data))
            .unwrap_err();
        assert_eq!(err.to_string(), "name too long");

        let mut data = sample_data();
        data.symbol = "s".repeat(MAX_SYMBOL_LENGTH + 1);
        let err = client
            .create_metadata_account_ix(create_params(&client, payer, mint, data))
            .unwrap_err();
        assert_eq!(err.to_string(), "symbol too long");

        let mut data = sample_data();
        data.uri = "u".repeat(MAX_URI_LENGTH + 1);
        let err = client
            .create_metadata_account_ix(create_params(&client, payer, mint, data))
            .unwrap_err();
        assert_eq!(err.to_string(), "uri too long");

        let mut data = sample_data();
        data.seller_fee_basis_points = MAX_SELLER_FEE_BASIS_POINTS + 1;
        assert!(client
            .create_metadata_account_ix(create_params(&client, payer, mint, data))
            .is_err());
    }

    #[test]
    fn create_rejects_bad_creator_lists() {
        let client = MetadataClient::new();
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let creator = |share| Creator {
            address: Pubkey::new_unique(),
            verified: false,
            share,
        };

        let mut data = sample_data();
        data.creators = Some(vec![]);
        assert!(client
            .create_metadata_account_ix(create_params(&client, payer, mint, data))
            .is_err());

        let mut data = sample_data();
        data.creators = Some((0..6).map(|_| creator(10)).collect());
        assert!(client
            .create_metadata_account_ix(create_params(&client, payer, mint, data))
            .is_err());

        let mut data = sample_data();
        data.creators = Some(vec![creator(60), creator(39)]);
        let err = client
            .create_metadata_account_ix(create_params(&client, payer, mint, data))
            .unwrap_err();
        assert_eq!(err.to_string(), "creator shares must sum to 100");

        let mut data = sample_data();
        data.creators = Some(vec![creator(60), creator(40)]);
        assert!(client
            .create_metadata_account_ix(create_params(&client, payer, mint, data))
            .is_ok());
    }

    #[test]
    fn create_rejects_mismatched_metadata_address() {
        let client = MetadataClient::new();
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let mut params = create_params(&client, payer, mint, sample_data());
        params.metadata = Pubkey::new_unique();
        let err = client.create_metadata_account_ix(params).unwrap_err();
        assert_eq!(
            err.to_string(),
            "metadata address is not the derived address for the mint"
        );
    }

    #[test]
    fn update_metadata_account_ix_orders_accounts() {
        let client = MetadataClient::new();
        let metadata = Pubkey::new_unique();
        let update_authority = Pubkey::new_unique();

        let ix = client
            .update_metadata_account_ix(UpdateMetadataAccountParams {
                metadata,
                update_authority,
                new_data: None,
                new_update_authority: None,
                primary_sale_happened: Some(true),
            })
            .unwrap();

        assert_eq!(ix.accounts.len(), 2);
        assert_eq!(ix.accounts[0].pubkey, metadata);
        assert!(ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, update_authority);
        assert!(ix.accounts[1].is_signer);
    }

    #[test]
    fn update_validates_replacement_payload() {
        let client = MetadataClient::new();
        let mut new_data = sample_data();
        new_data.uri = "u".repeat(MAX_URI_LENGTH + 1);

        let err = client
            .update_metadata_account_ix(UpdateMetadataAccountParams {
                metadata: Pubkey::new_unique(),
                update_authority: Pubkey::new_unique(),
                new_data: Some(new_data),
                new_update_authority: None,
                primary_sale_happened: None,
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "uri too long");
    }

    #[test]
    fn token_with_metadata_sequence_is_ordered() {
        let client = MetadataClient::new();
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let ixs = client
            .create_token_with_metadata_ixs(CreateTokenWithMetadataParams {
                payer,
                mint,
                mint_rent: 1_000_000,
                mint_authority: payer,
                freeze_authority: None,
                decimals: 0,
                update_authority: None,
                data: sample_data(),
            })
            .unwrap();

        assert_eq!(ixs.len(), 3);
        assert_eq!(ixs[0].program_id, system_program::id());
        assert_eq!(ixs[1].program_id, spl_token::id());
        assert_eq!(ixs[2].program_id, program::id());
        assert_eq!(ixs[2].accounts[0].pubkey, client.metadata_pda(&mint));
    }
}
