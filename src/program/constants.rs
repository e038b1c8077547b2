//! Constants for the external on-chain programs.
//!
//! Program IDs, seeds, instruction tags and layout sizes matching the
//! metadata and vesting programs exactly.

use solana_pubkey::Pubkey;
use std::str::FromStr;

// ============================================================================
// Program IDs
// ============================================================================

lazy_static::lazy_static! {
    /// Token metadata program ID
    pub static ref METADATA_PROGRAM_ID: Pubkey = Pubkey::from_str("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s").unwrap();

    /// Vesting program ID (mainnet-beta)
    pub static ref VESTING_MAINNET_PROGRAM_ID: Pubkey = Pubkey::from_str("strmRqUCoQUgGUan5YhzUZa6KqdzwX5L6FpUxfmKg5m").unwrap();

    /// Vesting program ID (devnet and every other cluster)
    pub static ref VESTING_DEVNET_PROGRAM_ID: Pubkey = Pubkey::from_str("HqDGZjaVRXJ9MGRQEw7qDc2rAr6iH1n1kAQdCZaCMfMZ").unwrap();

    /// Vesting program treasury
    pub static ref VESTING_TREASURY: Pubkey = Pubkey::from_str("5SEpbdjFK5FxwTvfsGMXVQTD2v4M2c5tyRTxhdsPkgDw").unwrap();

    /// Vesting program withdrawor (also used as partner)
    pub static ref VESTING_WITHDRAWOR: Pubkey = Pubkey::from_str("wdrwhnCv4pzW8beKsbPa4S2UDZrXenjg16KJdKSpb5u").unwrap();

    /// Vesting program fee oracle
    pub static ref VESTING_FEE_ORACLE: Pubkey = Pubkey::from_str("B743wFVk2pCYhV91cn287e1xY7f1vt4gdY48hhNiuQmT").unwrap();
}

/// SPL Token Program ID
pub const TOKEN_PROGRAM_ID: Pubkey = spl_token::ID;

/// Associated Token Account Program ID
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = spl_associated_token_account::ID;

/// System Program ID
pub const SYSTEM_PROGRAM_ID: Pubkey = solana_sdk_ids::system_program::ID;

/// Rent Sysvar ID
pub const RENT_SYSVAR_ID: Pubkey = solana_sdk_ids::sysvar::rent::ID;

// ============================================================================
// Instruction Tags
// ============================================================================

/// CreateMetadataAccountV3 tag (single byte).
pub const CREATE_METADATA_V3_TAG: u8 = 33;

/// Vesting stream create tag (8 bytes, little-endian).
pub const VESTING_CREATE_TAG: u64 = 8576854823835016728;

// ============================================================================
// Seeds
// ============================================================================

/// Seed for the token metadata PDA
pub const METADATA_SEED: &[u8] = b"metadata";

/// Seed for the vesting escrow token PDA
pub const ESCROW_SEED: &[u8] = b"strm";

// ============================================================================
// Sizes
// ============================================================================

/// SPL mint account size
pub const MINT_SIZE: u64 = 82;

/// Decimals of every token created by this SDK
pub const TOKEN_DECIMALS: u8 = 6;

/// Fixed width of the vesting stream name field
pub const STREAM_NAME_LEN: usize = 64;

/// Vesting create instruction size:
/// tag (8) + 6 x u64 (48) + 6 flags (6) + name (64) + withdraw frequency (8)
/// + ghost (4) + 2 flags (2)
pub const VESTING_CREATE_LEN: usize = 8 + 6 * 8 + 6 + STREAM_NAME_LEN + 8 + 4 + 2;

/// Creator share written into every metadata instruction
pub const CREATOR_SHARE: u8 = 100;

// ============================================================================
// Vesting Defaults
// ============================================================================

pub mod vesting_defaults {
    pub const PERIOD: u64 = 1;
    pub const AUTOMATIC_WITHDRAWAL: bool = true;
    pub const WITHDRAW_FREQUENCY: u64 = 1;
    pub const GHOST: u32 = 65537;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vesting_create_len() {
        assert_eq!(VESTING_CREATE_LEN, 140);
    }

    #[test]
    fn test_program_ids_parse() {
        assert_ne!(*METADATA_PROGRAM_ID, *VESTING_MAINNET_PROGRAM_ID);
        assert_ne!(*VESTING_MAINNET_PROGRAM_ID, *VESTING_DEVNET_PROGRAM_ID);
    }
}
