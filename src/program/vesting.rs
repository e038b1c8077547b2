//! Vesting stream creation: pack/unpack and instruction builder.
//!
//! Data layout (140 bytes, little-endian, no length prefixes):
//! - [0..8]     tag (8576854823835016728)
//! - [8..16]    start_time
//! - [16..24]   net_amount_deposited
//! - [24..32]   period
//! - [32..40]   amount_per_period
//! - [40..48]   cliff
//! - [48..56]   cliff_amount
//! - [56]       cancelable_by_sender
//! - [57]       cancelable_by_recipient
//! - [58]       automatic_withdrawal
//! - [59]       transferable_by_sender
//! - [60]       transferable_by_recipient
//! - [61]       can_topup
//! - [62..126]  stream_name (64 bytes, zero padded)
//! - [126..134] withdraw_frequency
//! - [134..138] ghost (u32)
//! - [138]      pausable
//! - [139]      can_update_rate

use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::error::InstructionError;
use crate::program::constants::{
    vesting_defaults, ASSOCIATED_TOKEN_PROGRAM_ID, RENT_SYSVAR_ID, STREAM_NAME_LEN,
    SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID, VESTING_CREATE_LEN, VESTING_CREATE_TAG,
    VESTING_FEE_ORACLE, VESTING_TREASURY, VESTING_WITHDRAWOR,
};
use crate::program::pda::get_escrow_pda;
use crate::program::utils::{fixed_width_str, get_token_ata, read_bool, read_bytes, read_u32, read_u64};

/// Caller-facing vesting parameters. Absent fields take their documented default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VestingCreateRequest {
    pub start_time: u64,
    pub net_amount_deposited: u64,
    /// Defaults to 1.
    pub period: Option<u64>,
    /// Defaults to `net_amount_deposited`.
    pub amount_per_period: Option<u64>,
    /// Defaults to `start_time`.
    pub cliff: Option<u64>,
    /// Defaults to `net_amount_deposited`.
    pub cliff_amount: Option<u64>,
    pub cancelable_by_sender: Option<bool>,
    pub cancelable_by_recipient: Option<bool>,
    /// Defaults to true.
    pub automatic_withdrawal: Option<bool>,
    pub transferable_by_sender: Option<bool>,
    pub transferable_by_recipient: Option<bool>,
    pub can_topup: Option<bool>,
    /// UTF-8, left-packed into 64 bytes. Longer names are cut at 64 bytes.
    pub stream_name: Option<String>,
    /// Defaults to 1.
    pub withdraw_frequency: Option<u64>,
    /// Defaults to 65537.
    pub ghost: Option<u32>,
    pub pausable: Option<bool>,
    pub can_update_rate: Option<bool>,
}

impl VestingCreateRequest {
    /// A stream with only the required fields set.
    pub fn new(start_time: u64, net_amount_deposited: u64) -> Self {
        Self {
            start_time,
            net_amount_deposited,
            ..Default::default()
        }
    }

    /// Apply defaults, producing exactly what goes on the wire.
    pub fn resolve(&self) -> VestingCreateData {
        let name = self.stream_name.as_deref().unwrap_or("");
        let (stream_name, truncated) = fixed_width_str::<STREAM_NAME_LEN>(name);
        if truncated {
            tracing::warn!(
                len = name.len(),
                "Stream name exceeds {} bytes and was truncated",
                STREAM_NAME_LEN
            );
        }

        VestingCreateData {
            start_time: self.start_time,
            net_amount_deposited: self.net_amount_deposited,
            period: self.period.unwrap_or(vesting_defaults::PERIOD),
            amount_per_period: self.amount_per_period.unwrap_or(self.net_amount_deposited),
            cliff: self.cliff.unwrap_or(self.start_time),
            cliff_amount: self.cliff_amount.unwrap_or(self.net_amount_deposited),
            cancelable_by_sender: self.cancelable_by_sender.unwrap_or(false),
            cancelable_by_recipient: self.cancelable_by_recipient.unwrap_or(false),
            automatic_withdrawal: self
                .automatic_withdrawal
                .unwrap_or(vesting_defaults::AUTOMATIC_WITHDRAWAL),
            transferable_by_sender: self.transferable_by_sender.unwrap_or(false),
            transferable_by_recipient: self.transferable_by_recipient.unwrap_or(false),
            can_topup: self.can_topup.unwrap_or(false),
            stream_name,
            withdraw_frequency: self
                .withdraw_frequency
                .unwrap_or(vesting_defaults::WITHDRAW_FREQUENCY),
            ghost: self.ghost.unwrap_or(vesting_defaults::GHOST),
            pausable: self.pausable.unwrap_or(false),
            can_update_rate: self.can_update_rate.unwrap_or(false),
        }
    }
}

/// Fully resolved vesting instruction payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VestingCreateData {
    pub start_time: u64,
    pub net_amount_deposited: u64,
    pub period: u64,
    pub amount_per_period: u64,
    pub cliff: u64,
    pub cliff_amount: u64,
    pub cancelable_by_sender: bool,
    pub cancelable_by_recipient: bool,
    pub automatic_withdrawal: bool,
    pub transferable_by_sender: bool,
    pub transferable_by_recipient: bool,
    pub can_topup: bool,
    pub stream_name: [u8; STREAM_NAME_LEN],
    pub withdraw_frequency: u64,
    pub ghost: u32,
    pub pausable: bool,
    pub can_update_rate: bool,
}

impl VestingCreateData {
    /// Stream name with zero padding removed. Invalid UTF-8 (a truncated
    /// multi-byte character) is replaced lossily.
    pub fn stream_name_str(&self) -> String {
        let end = self
            .stream_name
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |i| i + 1);
        String::from_utf8_lossy(&self.stream_name[..end]).into_owned()
    }
}

/// Encode the instruction data for a vesting stream creation.
pub fn encode_vesting_create(request: &VestingCreateRequest) -> Vec<u8> {
    pack_vesting_create(&request.resolve())
}

/// Pack already-resolved vesting data.
pub fn pack_vesting_create(data: &VestingCreateData) -> Vec<u8> {
    let mut buf = Vec::with_capacity(VESTING_CREATE_LEN);

    buf.extend_from_slice(&VESTING_CREATE_TAG.to_le_bytes());
    buf.extend_from_slice(&data.start_time.to_le_bytes());
    buf.extend_from_slice(&data.net_amount_deposited.to_le_bytes());
    buf.extend_from_slice(&data.period.to_le_bytes());
    buf.extend_from_slice(&data.amount_per_period.to_le_bytes());
    buf.extend_from_slice(&data.cliff.to_le_bytes());
    buf.extend_from_slice(&data.cliff_amount.to_le_bytes());
    buf.push(data.cancelable_by_sender as u8);
    buf.push(data.cancelable_by_recipient as u8);
    buf.push(data.automatic_withdrawal as u8);
    buf.push(data.transferable_by_sender as u8);
    buf.push(data.transferable_by_recipient as u8);
    buf.push(data.can_topup as u8);
    buf.extend_from_slice(&data.stream_name);
    buf.extend_from_slice(&data.withdraw_frequency.to_le_bytes());
    buf.extend_from_slice(&data.ghost.to_le_bytes());
    buf.push(data.pausable as u8);
    buf.push(data.can_update_rate as u8);

    debug_assert_eq!(buf.len(), VESTING_CREATE_LEN);
    buf
}

/// Decode vesting instruction data.
///
/// The tag is checked before anything else is read.
pub fn decode_vesting_create(data: &[u8]) -> Result<VestingCreateData, InstructionError> {
    if data.len() < 8 {
        return Err(InstructionError::InvalidDataLength {
            expected: VESTING_CREATE_LEN,
            actual: data.len(),
        });
    }

    let tag = read_u64(data, 0);
    if tag != VESTING_CREATE_TAG {
        return Err(InstructionError::InvalidTag {
            expected: VESTING_CREATE_TAG.to_string(),
            actual: tag.to_string(),
        });
    }

    if data.len() < VESTING_CREATE_LEN {
        return Err(InstructionError::InvalidDataLength {
            expected: VESTING_CREATE_LEN,
            actual: data.len(),
        });
    }

    Ok(VestingCreateData {
        start_time: read_u64(data, 8),
        net_amount_deposited: read_u64(data, 16),
        period: read_u64(data, 24),
        amount_per_period: read_u64(data, 32),
        cliff: read_u64(data, 40),
        cliff_amount: read_u64(data, 48),
        cancelable_by_sender: read_bool(data, 56),
        cancelable_by_recipient: read_bool(data, 57),
        automatic_withdrawal: read_bool(data, 58),
        transferable_by_sender: read_bool(data, 59),
        transferable_by_recipient: read_bool(data, 60),
        can_topup: read_bool(data, 61),
        stream_name: read_bytes::<STREAM_NAME_LEN>(data, 62),
        withdraw_frequency: read_u64(data, 126),
        ghost: read_u32(data, 134),
        pausable: read_bool(data, 138),
        can_update_rate: read_bool(data, 139),
    })
}

/// Accounts taking part in a vesting stream creation.
#[derive(Debug, Clone, Copy)]
pub struct VestingAccounts {
    pub sender: Pubkey,
    /// Fresh keypair pubkey that co-signs and becomes the stream account.
    pub stream_metadata: Pubkey,
    pub mint: Pubkey,
}

/// Build the vesting Create instruction. The sender is also the recipient.
///
/// Accounts:
/// 0. sender (signer, mut)
/// 1. sender_tokens (mut) - sender ATA
/// 2. recipient (mut) - same as sender
/// 3. metadata (signer, mut) - stream account
/// 4. escrow_tokens (mut) - escrow PDA
/// 5. recipient_tokens (mut) - recipient ATA
/// 6. streamflow_treasury (mut)
/// 7. streamflow_treasury_tokens (mut)
/// 8. withdrawor (mut)
/// 9. partner (mut) - same as withdrawor
/// 10. partner_tokens (mut)
/// 11. mint (mut)
/// 12. fee_oracle (readonly)
/// 13. rent sysvar (readonly)
/// 14. timelock_program (readonly) - the vesting program itself
/// 15. token_program (readonly)
/// 16. associated_token_program (readonly)
/// 17. system_program (readonly)
pub fn build_vesting_create_ix(
    accounts: &VestingAccounts,
    request: &VestingCreateRequest,
    program_id: &Pubkey,
) -> Instruction {
    let VestingAccounts {
        sender,
        stream_metadata,
        mint,
    } = *accounts;

    let sender_ata = get_token_ata(&sender, &mint);
    let (escrow, _) = get_escrow_pda(&stream_metadata, program_id);
    let treasury_ata = get_token_ata(&VESTING_TREASURY, &mint);
    let partner_ata = get_token_ata(&VESTING_WITHDRAWOR, &mint);

    let keys = vec![
        AccountMeta::new(sender, true),
        AccountMeta::new(sender_ata, false),
        AccountMeta::new(sender, false),
        AccountMeta::new(stream_metadata, true),
        AccountMeta::new(escrow, false),
        AccountMeta::new(sender_ata, false),
        AccountMeta::new(*VESTING_TREASURY, false),
        AccountMeta::new(treasury_ata, false),
        AccountMeta::new(*VESTING_WITHDRAWOR, false),
        AccountMeta::new(*VESTING_WITHDRAWOR, false),
        AccountMeta::new(partner_ata, false),
        AccountMeta::new(mint, false),
        AccountMeta::new(*VESTING_FEE_ORACLE, false),
        AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
        AccountMeta::new_readonly(*program_id, false),
        AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
    ];

    Instruction {
        program_id: *program_id,
        accounts: keys,
        data: encode_vesting_create(request),
    }
}
