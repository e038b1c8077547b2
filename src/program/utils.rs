//! Utility functions: ATA derivation and little-endian byte helpers.

use solana_pubkey::Pubkey;

use crate::program::constants::{ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID};

// ============================================================================
// Associated Token Account Helpers
// ============================================================================

/// Get the Associated Token Address for a wallet and mint.
///
/// Uses the standard Solana ATA derivation.
pub fn get_associated_token_address(
    wallet: &Pubkey,
    mint: &Pubkey,
    token_program_id: &Pubkey,
) -> Pubkey {
    Pubkey::find_program_address(
        &[wallet.as_ref(), token_program_id.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .0
}

/// Get the ATA for a token owned by the SPL Token program.
pub fn get_token_ata(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(wallet, mint, &TOKEN_PROGRAM_ID)
}

// ============================================================================
// Byte Helpers
// ============================================================================

/// Extract a fixed-size array from a slice.
///
/// Callers check the buffer length up front.
#[inline]
pub(crate) fn read_bytes<const N: usize>(data: &[u8], offset: usize) -> [u8; N] {
    let mut arr = [0u8; N];
    arr.copy_from_slice(&data[offset..offset + N]);
    arr
}

#[inline]
pub(crate) fn read_u64(data: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes(read_bytes::<8>(data, offset))
}

#[inline]
pub(crate) fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(read_bytes::<4>(data, offset))
}

#[inline]
pub(crate) fn read_bool(data: &[u8], offset: usize) -> bool {
    data[offset] != 0
}

/// Append a u32 little-endian length prefix followed by the UTF-8 bytes.
pub(crate) fn write_prefixed_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

/// Left-pack a string into a fixed-width, zero-padded field.
///
/// Returns the field and whether the input had to be truncated.
pub(crate) fn fixed_width_str<const N: usize>(s: &str) -> ([u8; N], bool) {
    let bytes = s.as_bytes();
    let len = bytes.len().min(N);
    let mut field = [0u8; N];
    field[..len].copy_from_slice(&bytes[..len]);
    (field, bytes.len() > N)
}
