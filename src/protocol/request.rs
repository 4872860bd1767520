use alloy_chains::NamedChain;
use alloy_primitives::{Address, U256};
use bon::bon;

use super::{PoolToken, RetirementIntent};
use crate::chain::AcrossChain;
use crate::error::{OffsetZapError, Result};

/// Longest beneficiary display name accepted, in bytes
pub const MAX_BENEFICIARY_NAME_LEN: usize = 128;

/// Longest free-text retirement message accepted, in bytes
pub const MAX_RETIREMENT_MESSAGE_LEN: usize = 512;

/// A user's request to pay on one chain and retire carbon on another
///
/// Requests are validated when built and cannot be changed afterwards, so a
/// quote fetched for a request always describes the same payment.
///
/// The beneficiary is the address that receives the retirement certificate.
/// The human-readable name is carried separately and only shows up in the
/// retirement record.
///
/// # Example
///
/// ```rust
/// use offsetzap_rs::{PoolToken, RetirementRequest};
/// use alloy_chains::NamedChain;
/// use alloy_primitives::{address, U256};
///
/// let request = RetirementRequest::builder()
///     .origin_chain(NamedChain::Base)
///     .destination_chain(NamedChain::Polygon)
///     .input_amount(U256::from(10_000_000u64))
///     .depositor(address!("1111111111111111111111111111111111111111"))
///     .beneficiary(address!("2222222222222222222222222222222222222222"))
///     .beneficiary_name("Green Corp")
///     .pool_token(PoolToken::Bct)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.input_amount(), U256::from(10_000_000u64));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetirementRequest {
    origin_chain: NamedChain,
    destination_chain: NamedChain,
    input_token: Address,
    output_token: Address,
    input_amount: U256,
    depositor: Address,
    beneficiary: Address,
    beneficiary_name: String,
    pool_token: PoolToken,
    retirement_message: String,
}

#[bon]
impl RetirementRequest {
    /// Builds and validates a request.
    ///
    /// Input and output tokens default to native USDC on the respective chains.
    #[builder]
    pub fn new(
        origin_chain: NamedChain,
        destination_chain: NamedChain,
        input_token: Option<Address>,
        output_token: Option<Address>,
        input_amount: U256,
        depositor: Address,
        beneficiary: Address,
        #[builder(into)] beneficiary_name: String,
        pool_token: PoolToken,
        #[builder(into, default)] retirement_message: String,
    ) -> Result<Self> {
        if !origin_chain.is_origin_supported() {
            return Err(OffsetZapError::UnsupportedChain(origin_chain));
        }
        if !destination_chain.is_destination_supported() {
            return Err(OffsetZapError::UnsupportedChain(destination_chain));
        }

        let input_token = match input_token {
            Some(token) => token,
            None => origin_chain.usdc_address()?,
        };
        let output_token = match output_token {
            Some(token) => token,
            None => destination_chain.usdc_address()?,
        };

        let request = Self {
            origin_chain,
            destination_chain,
            input_token,
            output_token,
            input_amount,
            depositor,
            beneficiary,
            beneficiary_name: beneficiary_name.trim().to_string(),
            pool_token,
            retirement_message,
        };
        request.validate()?;
        Ok(request)
    }
}

impl RetirementRequest {
    fn validate(&self) -> Result<()> {
        if self.input_amount.is_zero() {
            return Err(OffsetZapError::InvalidRequest(
                "input amount must be greater than zero".to_string(),
            ));
        }
        if self.origin_chain == self.destination_chain {
            return Err(OffsetZapError::InvalidRequest(
                "origin and destination chains must differ".to_string(),
            ));
        }
        if self.depositor.is_zero() {
            return Err(OffsetZapError::InvalidRequest(
                "depositor must not be the zero address".to_string(),
            ));
        }
        if self.beneficiary.is_zero() {
            return Err(OffsetZapError::InvalidBeneficiary {
                address: self.beneficiary,
                reason: "zero address cannot receive a retirement certificate".to_string(),
            });
        }
        if self.beneficiary_name.is_empty() {
            return Err(OffsetZapError::InvalidRequest(
                "beneficiary name must not be empty".to_string(),
            ));
        }
        if self.beneficiary_name.len() > MAX_BENEFICIARY_NAME_LEN {
            return Err(OffsetZapError::InvalidRequest(format!(
                "beneficiary name exceeds {MAX_BENEFICIARY_NAME_LEN} bytes"
            )));
        }
        if self.retirement_message.len() > MAX_RETIREMENT_MESSAGE_LEN {
            return Err(OffsetZapError::InvalidRequest(format!(
                "retirement message exceeds {MAX_RETIREMENT_MESSAGE_LEN} bytes"
            )));
        }
        // Fails early for pools that do not exist on the destination
        self.pool_token.address_on(self.destination_chain)?;
        Ok(())
    }

    pub fn origin_chain(&self) -> NamedChain {
        self.origin_chain
    }

    pub fn destination_chain(&self) -> NamedChain {
        self.destination_chain
    }

    pub fn input_token(&self) -> Address {
        self.input_token
    }

    pub fn output_token(&self) -> Address {
        self.output_token
    }

    pub fn input_amount(&self) -> U256 {
        self.input_amount
    }

    pub fn depositor(&self) -> Address {
        self.depositor
    }

    pub fn beneficiary(&self) -> Address {
        self.beneficiary
    }

    pub fn beneficiary_name(&self) -> &str {
        &self.beneficiary_name
    }

    pub fn pool_token(&self) -> PoolToken {
        self.pool_token
    }

    pub fn retirement_message(&self) -> &str {
        &self.retirement_message
    }

    /// The amount-independent part of the destination message
    pub fn intent(&self) -> Result<RetirementIntent> {
        Ok(RetirementIntent {
            beneficiary: self.beneficiary,
            beneficiary_name: self.beneficiary_name.clone(),
            pool_token: self.pool_token.address_on(self.destination_chain)?,
            retirement_message: self.retirement_message.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::addresses::{BASE_USDC, POLYGON_BCT, POLYGON_USDC};
    use alloy_primitives::address;

    const DEPOSITOR: Address = address!("1111111111111111111111111111111111111111");
    const BENEFICIARY: Address = address!("2222222222222222222222222222222222222222");

    fn base_to_polygon() -> Result<RetirementRequest> {
        RetirementRequest::builder()
            .origin_chain(NamedChain::Base)
            .destination_chain(NamedChain::Polygon)
            .input_amount(U256::from(10_000_000u64))
            .depositor(DEPOSITOR)
            .beneficiary(BENEFICIARY)
            .beneficiary_name("  Green Corp ")
            .pool_token(PoolToken::Bct)
            .retirement_message("Offsetting our 2025 travel")
            .build()
    }

    #[test]
    fn test_defaults_to_usdc_on_both_sides() {
        let request = base_to_polygon().unwrap();
        assert_eq!(request.input_token(), BASE_USDC);
        assert_eq!(request.output_token(), POLYGON_USDC);
        assert_eq!(request.beneficiary_name(), "Green Corp");
    }

    #[test]
    fn test_intent_resolves_pool_on_destination() {
        let intent = base_to_polygon().unwrap().intent().unwrap();
        assert_eq!(intent.beneficiary, BENEFICIARY);
        assert_eq!(intent.pool_token, POLYGON_BCT);
        assert_eq!(intent.retirement_message, "Offsetting our 2025 travel");
    }

    #[test]
    fn test_zero_amount_rejected() {
        let result = RetirementRequest::builder()
            .origin_chain(NamedChain::Base)
            .destination_chain(NamedChain::Polygon)
            .input_amount(U256::ZERO)
            .depositor(DEPOSITOR)
            .beneficiary(BENEFICIARY)
            .beneficiary_name("Green Corp")
            .pool_token(PoolToken::Bct)
            .build();
        assert!(matches!(result, Err(OffsetZapError::InvalidRequest(_))));
    }

    #[test]
    fn test_zero_beneficiary_rejected() {
        let result = RetirementRequest::builder()
            .origin_chain(NamedChain::Base)
            .destination_chain(NamedChain::Polygon)
            .input_amount(U256::from(1))
            .depositor(DEPOSITOR)
            .beneficiary(Address::ZERO)
            .beneficiary_name("Green Corp")
            .pool_token(PoolToken::Bct)
            .build();
        assert!(matches!(
            result,
            Err(OffsetZapError::InvalidBeneficiary { .. })
        ));
    }

    #[test]
    fn test_empty_and_oversized_names_rejected() {
        for name in ["   ".to_string(), "x".repeat(MAX_BENEFICIARY_NAME_LEN + 1)] {
            let result = RetirementRequest::builder()
                .origin_chain(NamedChain::Base)
                .destination_chain(NamedChain::Polygon)
                .input_amount(U256::from(1))
                .depositor(DEPOSITOR)
                .beneficiary(BENEFICIARY)
                .beneficiary_name(name)
                .pool_token(PoolToken::Nct)
                .build();
            assert!(matches!(result, Err(OffsetZapError::InvalidRequest(_))));
        }
    }

    #[test]
    fn test_unsupported_route_rejected() {
        let result = RetirementRequest::builder()
            .origin_chain(NamedChain::Polygon)
            .destination_chain(NamedChain::Base)
            .input_amount(U256::from(1))
            .depositor(DEPOSITOR)
            .beneficiary(BENEFICIARY)
            .beneficiary_name("Green Corp")
            .pool_token(PoolToken::Nct)
            .build();
        assert!(matches!(
            result,
            Err(OffsetZapError::UnsupportedChain(NamedChain::Polygon))
        ));
    }
}
