//! Token metadata account creation (CreateMetadataAccountV3).
//!
//! Write-only codec: the SDK only ever builds this instruction, it never
//! parses one back.
//!
//! Data layout (little-endian):
//! - [0]       tag (33)
//! - u32 + var name
//! - u32 + var symbol
//! - u32 + var uri
//! - u16       seller fee basis points
//! - u8        creators present (1)
//! - u32       creator count (1)
//! - [u8; 32]  creator pubkey (the update authority)
//! - u8        creator verified (1)
//! - u8        creator share (100)
//! - u8        collection absent (0)
//! - u8        uses absent (0)
//! - u8        is mutable (0)
//! - u8        collection details absent (0)

use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::program::constants::{
    CREATE_METADATA_V3_TAG, CREATOR_SHARE, METADATA_PROGRAM_ID, RENT_SYSVAR_ID,
    SYSTEM_PROGRAM_ID,
};
use crate::program::pda::get_metadata_pda;
use crate::program::utils::write_prefixed_str;

/// Bytes that follow the variable-length strings:
/// fee (2) + creators flag (1) + count (4) + creator (32 + 1 + 1) + 4 trailing flags.
const FIXED_TAIL_LEN: usize = 2 + 1 + 4 + 32 + 1 + 1 + 4;

/// Parameters for a metadata account creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataCreateRequest {
    pub mint: Pubkey,
    /// Mint authority and update authority; also the single verified creator.
    pub authority: Pubkey,
    pub payer: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
}

impl MetadataCreateRequest {
    /// Exact encoded size in bytes.
    pub fn encoded_len(&self) -> usize {
        1 + 4 + self.name.len() + 4 + self.symbol.len() + 4 + self.uri.len() + FIXED_TAIL_LEN
    }
}

/// Encode the instruction data for a metadata account creation.
pub fn encode_metadata_create(request: &MetadataCreateRequest) -> Vec<u8> {
    let mut data = Vec::with_capacity(request.encoded_len());

    data.push(CREATE_METADATA_V3_TAG);
    write_prefixed_str(&mut data, &request.name);
    write_prefixed_str(&mut data, &request.symbol);
    write_prefixed_str(&mut data, &request.uri);
    data.extend_from_slice(&request.seller_fee_basis_points.to_le_bytes());

    // Creators: Some(vec![creator])
    data.push(1);
    data.extend_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(request.authority.as_ref());
    data.push(1); // verified
    data.push(CREATOR_SHARE);

    data.push(0); // collection: None
    data.push(0); // uses: None
    data.push(0); // is_mutable: false
    data.push(0); // collection_details: None

    debug_assert_eq!(data.len(), request.encoded_len());
    data
}

/// Build CreateMetadataAccountV3 instruction.
///
/// Accounts:
/// 0. metadata (mut) - Metadata PDA of the mint
/// 1. mint (readonly)
/// 2. mint_authority (signer)
/// 3. payer (signer, mut)
/// 4. update_authority (signer)
/// 5. system_program (readonly)
/// 6. rent sysvar (readonly)
pub fn build_create_metadata_ix(request: &MetadataCreateRequest) -> Instruction {
    let (metadata, _) = get_metadata_pda(&request.mint);

    let keys = vec![
        AccountMeta::new(metadata, false),
        AccountMeta::new_readonly(request.mint, false),
        AccountMeta::new_readonly(request.authority, true),
        AccountMeta::new(request.payer, true),
        AccountMeta::new_readonly(request.authority, true),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
    ];

    Instruction {
        program_id: *METADATA_PROGRAM_ID,
        accounts: keys,
        data: encode_metadata_create(request),
    }
}
