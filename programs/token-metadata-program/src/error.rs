//! Error types

use {
    num_derive::FromPrimitive, num_traits::FromPrimitive,
    solana_sdk::program_error::ProgramError, thiserror::Error,
};

/// Errors that may be returned by the Token Metadata program.
#[derive(Clone, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum MetadataError {
    // 0
    /// Failed to unpack instruction data
    #[error("Failed to unpack instruction data")]
    InstructionUnpackError,
    /// Metadata account is not the derived address for the mint
    #[error("Metadata account is not the derived address for the mint")]
    DerivedKeyInvalid,
    /// Metadata account already initialized
    #[error("Metadata account already initialized")]
    AlreadyInitialized,
    /// Metadata account is uninitialized
    #[error("Metadata account is uninitialized")]
    Uninitialized,
    /// Mint account is missing or not a valid mint
    #[error("Mint account is missing or not a valid mint")]
    InvalidMintAccount,
    /// Signer is not the mint authority
    #[error("Signer is not the mint authority")]
    InvalidMintAuthority,
    /// Update authority does not match the metadata account
    #[error("Update authority does not match the metadata account")]
    UpdateAuthorityIncorrect,
    /// Update authority did not sign
    #[error("Update authority did not sign")]
    UpdateAuthorityIsNotSigner,
    // 8
    /// Metadata is immutable
    #[error("Metadata is immutable")]
    ImmutableMetadata,
    /// Name too long
    #[error("Name too long")]
    NameTooLong,
    /// Symbol too long
    #[error("Symbol too long")]
    SymbolTooLong,
    /// Uri too long
    #[error("Uri too long")]
    UriTooLong,
    /// Basis points cannot exceed 10000
    #[error("Basis points cannot exceed 10000")]
    InvalidBasisPoints,
    /// Creators list is invalid
    #[error("Creators list is invalid")]
    InvalidCreators,
    /// Account has the wrong discriminant for this type
    #[error("Account has the wrong discriminant for this type")]
    DataTypeMismatch,
    /// Account data could not be decoded
    #[error("Account data could not be decoded")]
    InvalidAccountData,
}

impl MetadataError {
    /// Maps a custom program error code back to its variant.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::from_u32(code)
    }
}

impl From<MetadataError> for ProgramError {
    fn from(e: MetadataError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
