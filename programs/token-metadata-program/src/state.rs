//! Account state for the token metadata program.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;

use crate::error::MetadataError;

/// Maximum byte length of the metadata name.
pub const MAX_NAME_LENGTH: usize = 32;

/// Maximum byte length of the metadata symbol.
pub const MAX_SYMBOL_LENGTH: usize = 10;

/// Maximum byte length of the metadata uri.
pub const MAX_URI_LENGTH: usize = 200;

/// Maximum number of creators a metadata account may list.
pub const MAX_CREATOR_LIMIT: usize = 5;

/// Seller fees are basis points; 10_000 is 100%.
pub const MAX_SELLER_FEE_BASIS_POINTS: u16 = 10_000;

/// Discriminant tag identifying the logical type of a program account.
///
/// The borsh discriminant doubles as the on-chain tag byte, so variant
/// order is part of the external contract.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Key {
    /// Allocated but never initialized by the program.
    Uninitialized,
    /// Edition record, v1 layout.
    EditionV1,
    /// Master edition record, original v1 layout.
    MasterEditionV1,
    /// Reservation list, v1 layout.
    ReservationListV1,
    /// Metadata record, v1 layout.
    MetadataV1,
    /// Reservation list, v2 layout.
    ReservationListV2,
    /// Master edition record, v2 layout.
    MasterEditionV2,
    /// Edition marker bitfield.
    EditionMarker,
    /// Use-authority delegation record.
    UseAuthorityRecord,
    /// Collection-authority delegation record.
    CollectionAuthorityRecord,
}

/// Royalty recipient listed in a metadata payload.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct Creator {
    /// Address receiving this creator's share.
    pub address: Pubkey,
    /// Whether the creator has countersigned the metadata.
    pub verified: bool,
    /// Share of seller fees, in percent. Shares across the list sum to 100.
    pub share: u8,
}

/// Descriptive payload carried by a metadata account.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct Data {
    /// Display name, at most [`MAX_NAME_LENGTH`] bytes.
    pub name: String,
    /// Ticker-style symbol, at most [`MAX_SYMBOL_LENGTH`] bytes.
    pub symbol: String,
    /// URI of the off-chain asset, at most [`MAX_URI_LENGTH`] bytes.
    pub uri: String,
    /// Royalty charged on secondary sales, in basis points.
    pub seller_fee_basis_points: u16,
    /// Optional royalty recipients; shares must sum to 100 when present.
    pub creators: Option<Vec<Creator>>,
}

/// Metadata account record, tagged [`Key::MetadataV1`].
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Eq, PartialEq)]
pub struct Metadata {
    /// Account discriminant; always [`Key::MetadataV1`] for this layout.
    pub key: Key,
    /// Authority allowed to mutate the record while it is mutable.
    pub update_authority: Pubkey,
    /// Mint this record describes.
    pub mint: Pubkey,
    /// Descriptive payload.
    pub data: Data,
    /// Set once the token has been through a primary sale.
    pub primary_sale_happened: bool,
    /// Whether the update authority may still mutate the record.
    pub is_mutable: bool,
}

impl Metadata {
    /// Decodes a metadata record from raw account bytes.
    ///
    /// Fails with [`MetadataError::InvalidAccountData`] when the buffer does
    /// not deserialize as this layout, and with
    /// [`MetadataError::DataTypeMismatch`] when it deserializes but carries
    /// a different discriminant tag. Never yields a partially populated
    /// record.
    pub fn from_account_data(data: &[u8]) -> Result<Self, MetadataError> {
        let metadata: Metadata =
            borsh::from_slice(data).map_err(|_| MetadataError::InvalidAccountData)?;
        if metadata.key != Key::MetadataV1 {
            return Err(MetadataError::DataTypeMismatch);
        }
        Ok(metadata)
    }
}
