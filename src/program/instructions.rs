//! Instruction assembly for token launches and deposits on Solana.
//!
//! Combines system, SPL token, associated token account and metadata
//! instructions into the ordered lists the wallet signs as one transaction.

use solana_instruction::Instruction;
use solana_pubkey::Pubkey;
use spl_token::instruction::AuthorityType;

use crate::error::{ChainError, SdkResult};
use crate::program::constants::{MINT_SIZE, TOKEN_DECIMALS, TOKEN_PROGRAM_ID};
use crate::program::metadata::{build_create_metadata_ix, MetadataCreateRequest};
use crate::program::utils::get_token_ata;

fn spl_error(e: impl std::fmt::Display) -> ChainError {
    ChainError::Instruction(e.to_string())
}

// ============================================================================
// Instruction Builders
// ============================================================================

/// Build an idempotent associated token account creation for an SPL Token mint.
///
/// Accounts: funder (signer, mut), associated account (mut), wallet, mint,
/// system program, token program.
#[allow(deprecated)]
pub fn build_create_ata_idempotent_ix(funder: &Pubkey, wallet: &Pubkey, mint: &Pubkey) -> Instruction {
    spl_associated_token_account::instruction::create_associated_token_account_idempotent(
        funder,
        wallet,
        mint,
        &TOKEN_PROGRAM_ID,
    )
}

/// Everything needed to assemble the token creation transaction.
#[derive(Debug, Clone)]
pub struct TokenLaunchPlan {
    /// Caller wallet: fee payer, mint authority and metadata authority.
    pub payer: Pubkey,
    /// Freshly generated mint account.
    pub mint: Pubkey,
    /// Factory fee recipient; receives the creation fee and the supply transfer.
    pub fee_recipient: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    /// Raw units minted to the payer.
    pub supply: u64,
    /// Rent-exempt minimum for a mint account.
    pub rent_lamports: u64,
    pub fee_lamports: u64,
    /// Raw units moved from the payer to the fee recipient.
    pub transfer_amount: u64,
}

/// Build the ordered instruction list of a token launch.
///
/// Order:
/// 1. create mint account (rent-exempt, owned by the token program)
/// 2. initialize mint (6 decimals, payer as mint and freeze authority)
/// 3. payer ATA (idempotent)
/// 4. mint full supply to payer ATA
/// 5. create metadata
/// 6. revoke mint authority
/// 7. revoke freeze authority
/// 8. transfer creation fee to the fee recipient
/// 9. payer ATA and fee recipient ATA (idempotent)
/// 10. transfer_checked `transfer_amount` to the fee recipient ATA
pub fn build_token_launch_ixs(plan: &TokenLaunchPlan) -> SdkResult<Vec<Instruction>> {
    let payer = plan.payer;
    let mint = plan.mint;
    let payer_ata = get_token_ata(&payer, &mint);
    let recipient_ata = get_token_ata(&plan.fee_recipient, &mint);

    let mut ixs = Vec::with_capacity(11);

    ixs.push(solana_system_interface::instruction::create_account(
        &payer,
        &mint,
        plan.rent_lamports,
        MINT_SIZE,
        &TOKEN_PROGRAM_ID,
    ));

    ixs.push(
        spl_token::instruction::initialize_mint2(
            &TOKEN_PROGRAM_ID,
            &mint,
            &payer,
            Some(&payer),
            TOKEN_DECIMALS,
        )
        .map_err(spl_error)?,
    );

    ixs.push(build_create_ata_idempotent_ix(&payer, &payer, &mint));

    ixs.push(
        spl_token::instruction::mint_to(&TOKEN_PROGRAM_ID, &mint, &payer_ata, &payer, &[], plan.supply)
            .map_err(spl_error)?,
    );

    ixs.push(build_create_metadata_ix(&MetadataCreateRequest {
        mint,
        authority: payer,
        payer,
        name: plan.name.clone(),
        symbol: plan.symbol.clone(),
        uri: plan.uri.clone(),
        seller_fee_basis_points: 0,
    }));

    for authority_type in [AuthorityType::MintTokens, AuthorityType::FreezeAccount] {
        ixs.push(
            spl_token::instruction::set_authority(
                &TOKEN_PROGRAM_ID,
                &mint,
                None,
                authority_type,
                &payer,
                &[],
            )
            .map_err(spl_error)?,
        );
    }

    ixs.push(solana_system_interface::instruction::transfer(
        &payer,
        &plan.fee_recipient,
        plan.fee_lamports,
    ));

    ixs.push(build_create_ata_idempotent_ix(&payer, &payer, &mint));
    ixs.push(build_create_ata_idempotent_ix(&payer, &plan.fee_recipient, &mint));

    ixs.push(
        spl_token::instruction::transfer_checked(
            &TOKEN_PROGRAM_ID,
            &payer_ata,
            &mint,
            &recipient_ata,
            &payer,
            &[],
            plan.transfer_amount,
            TOKEN_DECIMALS,
        )
        .map_err(spl_error)?,
    );

    Ok(ixs)
}

/// Build an SPL token deposit: both ATAs (idempotent) then `transfer_checked`.
pub fn build_token_deposit_ixs(
    sender: &Pubkey,
    recipient: &Pubkey,
    mint: &Pubkey,
    amount: u64,
    decimals: u8,
) -> SdkResult<Vec<Instruction>> {
    let sender_ata = get_token_ata(sender, mint);
    let recipient_ata = get_token_ata(recipient, mint);

    Ok(vec![
        build_create_ata_idempotent_ix(sender, sender, mint),
        build_create_ata_idempotent_ix(sender, recipient, mint),
        spl_token::instruction::transfer_checked(
            &TOKEN_PROGRAM_ID,
            &sender_ata,
            mint,
            &recipient_ata,
            sender,
            &[],
            amount,
            decimals,
        )
        .map_err(spl_error)?,
    ])
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::constants::{
        ASSOCIATED_TOKEN_PROGRAM_ID, METADATA_PROGRAM_ID, SYSTEM_PROGRAM_ID,
    };

    fn plan() -> TokenLaunchPlan {
        TokenLaunchPlan {
            payer: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            fee_recipient: Pubkey::new_unique(),
            name: "Test".into(),
            symbol: "TFK".into(),
            uri: "ipfs://x".into(),
            supply: 2_000_000_000,
            rent_lamports: 1_461_600,
            fee_lamports: 100_000,
            transfer_amount: 2_000_000_000,
        }
    }

    #[test]
    fn test_ata_idempotent_ix() {
        let funder = Pubkey::new_unique();
        let wallet = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let ix = build_create_ata_idempotent_ix(&funder, &wallet, &mint);

        assert_eq!(ix.program_id, ASSOCIATED_TOKEN_PROGRAM_ID);
        assert_eq!(ix.data, vec![1]);
        assert_eq!(ix.accounts.len(), 6);
        assert_eq!(ix.accounts[0].pubkey, funder);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, get_token_ata(&wallet, &mint));
        assert!(ix.accounts[1].is_writable);
        assert_eq!(ix.accounts[2].pubkey, wallet);
        assert_eq!(ix.accounts[3].pubkey, mint);
        assert_eq!(ix.accounts[4].pubkey, SYSTEM_PROGRAM_ID);
        assert_eq!(ix.accounts[5].pubkey, TOKEN_PROGRAM_ID);
    }

    #[test]
    fn test_token_launch_order() {
        let plan = plan();
        let ixs = build_token_launch_ixs(&plan).unwrap();
        let programs: Vec<Pubkey> = ixs.iter().map(|ix| ix.program_id).collect();

        assert_eq!(
            programs,
            vec![
                SYSTEM_PROGRAM_ID,
                TOKEN_PROGRAM_ID,
                ASSOCIATED_TOKEN_PROGRAM_ID,
                TOKEN_PROGRAM_ID,
                *METADATA_PROGRAM_ID,
                TOKEN_PROGRAM_ID,
                TOKEN_PROGRAM_ID,
                SYSTEM_PROGRAM_ID,
                ASSOCIATED_TOKEN_PROGRAM_ID,
                ASSOCIATED_TOKEN_PROGRAM_ID,
                TOKEN_PROGRAM_ID,
            ]
        );
    }

    #[test]
    fn test_token_launch_transfer_targets_fee_recipient() {
        let plan = plan();
        let ixs = build_token_launch_ixs(&plan).unwrap();

        let recipient_ata_ix = &ixs[9];
        assert_eq!(recipient_ata_ix.accounts[2].pubkey, plan.fee_recipient);

        let transfer = ixs.last().unwrap();
        assert_eq!(transfer.accounts[0].pubkey, get_token_ata(&plan.payer, &plan.mint));
        assert_eq!(transfer.accounts[1].pubkey, plan.mint);
        assert_eq!(
            transfer.accounts[2].pubkey,
            get_token_ata(&plan.fee_recipient, &plan.mint)
        );
        // TransferChecked = 12, then u64 amount, then decimals
        assert_eq!(transfer.data[0], 12);
        assert_eq!(&transfer.data[1..9], &plan.transfer_amount.to_le_bytes());
        assert_eq!(transfer.data[9], TOKEN_DECIMALS);
    }

    #[test]
    fn test_token_deposit_ixs() {
        let sender = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let ixs = build_token_deposit_ixs(&sender, &recipient, &mint, 1_500_000, 6).unwrap();

        assert_eq!(ixs.len(), 3);
        assert_eq!(ixs[0].accounts[2].pubkey, sender);
        assert_eq!(ixs[1].accounts[2].pubkey, recipient);
        assert_eq!(ixs[2].program_id, TOKEN_PROGRAM_ID);
    }
}
