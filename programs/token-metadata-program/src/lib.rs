#![deny(missing_docs)]
#![cfg_attr(not(test), forbid(unsafe_code))]

//! Interface for the token metadata program.
//!
//! The program is deployed externally; this crate only describes its
//! contract. It exposes the canonical program id, the PDA derivation for
//! metadata accounts, the borsh instruction encoding, the account layouts
//! with their discriminant tags, and the program's error-code table.

pub mod error;
pub mod instruction;
pub mod state;

use solana_sdk::pubkey::Pubkey;

/// Canonical id of the deployed token metadata program.
pub const ID: Pubkey = solana_sdk::pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Returns the canonical program id.
pub fn id() -> Pubkey {
    ID
}

/// Seed prefix for metadata account derivation.
pub const METADATA_SEED: &[u8] = b"metadata";

/// Derives the metadata PDA and bump for `mint` under `program_id`.
///
/// Seeds are `[METADATA_SEED, program_id, mint]`, so metadata addresses are
/// distinct per deployment of the program.
pub fn find_metadata_pda_with_program(program_id: &Pubkey, mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[METADATA_SEED, program_id.as_ref(), mint.as_ref()],
        program_id,
    )
}

/// Derives the metadata PDA for `mint` under the canonical program id.
pub fn find_metadata_pda(mint: &Pubkey) -> (Pubkey, u8) {
    find_metadata_pda_with_program(&ID, mint)
}
