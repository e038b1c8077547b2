//! PDA (Program Derived Address) derivation functions.
//!
//! Matches the derivations the metadata and vesting programs perform on-chain.

use solana_pubkey::Pubkey;

use crate::program::constants::{ESCROW_SEED, METADATA_PROGRAM_ID, METADATA_SEED};

/// Get the token metadata PDA for a mint.
///
/// Seeds: ["metadata", metadata_program_id, mint]
pub fn get_metadata_pda(mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[METADATA_SEED, METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
        &METADATA_PROGRAM_ID,
    )
}

/// Get the vesting escrow token PDA for a stream.
///
/// Seeds: ["strm", stream_metadata]
pub fn get_escrow_pda(stream_metadata: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[ESCROW_SEED, stream_metadata.as_ref()], program_id)
}
