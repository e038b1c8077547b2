//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs`: domain types and the pure rules of the slice
//! - `client.rs`: sub-client driving the wallet, platform and listener
//!
//! Wire types shared with the platform API live in [`crate::http::wire`].

pub mod deployment;
pub mod deposit;
pub mod market;
pub mod withdrawal;
