//! Instruction types

use {
    crate::state::Data,
    borsh::{BorshDeserialize, BorshSerialize},
    solana_sdk::{program_error::ProgramError, pubkey::Pubkey},
};

/// Arguments for [`MetadataInstruction::CreateMetadataAccount`].
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct CreateMetadataAccountArgs {
    /// Payload to store in the new metadata account.
    pub data: Data,
    /// Whether the update authority may mutate the record later.
    pub is_mutable: bool,
}

/// Arguments for [`MetadataInstruction::UpdateMetadataAccount`].
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct UpdateMetadataAccountArgs {
    /// Replacement payload, if the payload should change.
    pub data: Option<Data>,
    /// Replacement update authority, if authority should rotate.
    pub update_authority: Option<Pubkey>,
    /// New primary-sale flag, if it should change.
    pub primary_sale_happened: Option<bool>,
}

/// Instructions supported by the token metadata program.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub enum MetadataInstruction {
    /// Create a metadata account for a mint.
    ///
    /// Accounts (strict order):
    ///   0. `[writable]` Metadata account (pda of \['metadata', program id, mint\])
    ///   1. `[]` Mint
    ///   2. `[signer]` Mint authority
    ///   3. `[signer, writable]` Payer
    ///   4. `[]` Update authority
    ///   5. `[]` System program
    ///   6. `[]` Rent sysvar
    CreateMetadataAccount(CreateMetadataAccountArgs),
    /// Update an existing metadata account.
    ///
    /// Accounts (strict order):
    ///   0. `[writable]` Metadata account
    ///   1. `[signer]` Current update authority
    UpdateMetadataAccount(UpdateMetadataAccountArgs),
}

impl MetadataInstruction {
    /// Unpack a byte array into a MetadataInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        borsh::from_slice(input).map_err(|_| ProgramError::InvalidInstructionData)
    }

    /// Pack the MetadataInstruction into a byte array
    pub fn pack(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap()
    }
}
