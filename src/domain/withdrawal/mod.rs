//! Withdrawal domain: request validation against the platform token list.

pub mod client;

use rust_decimal::Decimal;

use crate::error::{SdkError, SdkResult};
use crate::http::wire::TokenListing;
use crate::shared::parse_decimal;

/// Reject a requested amount that is not a positive decimal.
pub fn check_request_amount(amount: &str) -> SdkResult<Decimal> {
    let value = parse_decimal(amount)?;
    if value <= Decimal::ZERO {
        return Err(SdkError::Validation(
            "Withdrawal amount must be greater than zero".into(),
        ));
    }
    Ok(value)
}

/// Find `token_id` among the tokens listed on the blockchain.
pub fn find_listing<'a>(tokens: &'a [TokenListing], token_id: &str) -> SdkResult<&'a TokenListing> {
    tokens
        .iter()
        .find(|t| t.token_id == token_id)
        .ok_or_else(|| SdkError::Validation(format!("Unknown token id {}", token_id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_request_amount() {
        assert!(check_request_amount("0.25").is_ok());
        assert!(matches!(check_request_amount("0"), Err(SdkError::Validation(_))));
        assert!(matches!(check_request_amount("-3"), Err(SdkError::Validation(_))));
        assert!(matches!(check_request_amount("many"), Err(SdkError::Validation(_))));
    }

    #[test]
    fn test_find_listing() {
        let tokens = vec![TokenListing {
            token_id: "erc20:0xabc".into(),
            ..Default::default()
        }];
        assert!(find_listing(&tokens, "erc20:0xabc").is_ok());
        assert!(find_listing(&tokens, "erc20:0xdef").is_err());
    }
}
