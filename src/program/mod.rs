//! On-chain program interaction: instruction codecs, PDAs and transaction assembly.
//!
//! Pure and stateless. Nothing in this module touches the network or key
//! material.

pub mod constants;
pub mod instructions;
pub mod metadata;
pub mod pda;
pub mod utils;
pub mod vesting;

// Re-export commonly used items
pub use constants::*;
pub use instructions::{
    build_create_ata_idempotent_ix, build_token_deposit_ixs, build_token_launch_ixs,
    TokenLaunchPlan,
};
pub use metadata::{build_create_metadata_ix, encode_metadata_create, MetadataCreateRequest};
pub use pda::*;
pub use utils::{get_associated_token_address, get_token_ata};
pub use vesting::{
    build_vesting_create_ix, decode_vesting_create, encode_vesting_create, pack_vesting_create,
    VestingAccounts, VestingCreateData, VestingCreateRequest,
};
