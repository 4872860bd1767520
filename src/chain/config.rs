use alloy_chains::NamedChain;
use alloy_primitives::{Address, TxHash};

use super::addresses::{
    ACROSS_MULTICALL_HANDLER, ARBITRUM_SPOKE_POOL_ADDRESS, ARBITRUM_USDC, BASE_SPOKE_POOL_ADDRESS,
    BASE_USDC, ETHEREUM_SPOKE_POOL_ADDRESS, ETHEREUM_USDC, OPTIMISM_SPOKE_POOL_ADDRESS,
    OPTIMISM_USDC, POLYGON_SPOKE_POOL_ADDRESS, POLYGON_USDC,
};
use crate::error::{OffsetZapError, Result};

/// Across chain configuration trait
///
/// Implemented on `alloy_chains::NamedChain` to provide the contract addresses
/// and capabilities needed to route a payment into a retirement.
///
/// # Example
///
/// ```rust
/// use offsetzap_rs::AcrossChain;
/// use alloy_chains::NamedChain;
///
/// assert!(NamedChain::Base.is_origin_supported());
/// assert!(NamedChain::Polygon.is_destination_supported());
/// assert!(!NamedChain::Base.is_destination_supported());
/// ```
pub trait AcrossChain {
    /// Returns true if a retirement payment can start on this chain
    fn is_origin_supported(&self) -> bool;

    /// Returns true if the Facilitator and carbon pools are reachable on this chain
    fn is_destination_supported(&self) -> bool;

    /// The Across `SpokePool` that accepts deposits on this chain
    fn spoke_pool_address(&self) -> Result<Address>;

    /// The Across multicall handler that receives funds plus instructions on this chain
    fn multicall_handler_address(&self) -> Result<Address>;

    /// The native USDC deployment on this chain
    fn usdc_address(&self) -> Result<Address>;

    /// Block explorer base URL, used to point users at a transaction when
    /// the client can no longer track it
    fn explorer_url(&self) -> Result<&'static str>;

    /// Link to a transaction on this chain's block explorer
    fn explorer_tx_url(&self, tx_hash: TxHash) -> Result<String> {
        Ok(format!("{}/tx/{tx_hash}", self.explorer_url()?))
    }
}

impl AcrossChain for NamedChain {
    fn is_origin_supported(&self) -> bool {
        matches!(
            self,
            Self::Mainnet | Self::Base | Self::Arbitrum | Self::Optimism
        )
    }

    fn is_destination_supported(&self) -> bool {
        matches!(self, Self::Polygon)
    }

    fn spoke_pool_address(&self) -> Result<Address> {
        use NamedChain::*;

        match self {
            Mainnet => Ok(ETHEREUM_SPOKE_POOL_ADDRESS),
            Base => Ok(BASE_SPOKE_POOL_ADDRESS),
            Arbitrum => Ok(ARBITRUM_SPOKE_POOL_ADDRESS),
            Optimism => Ok(OPTIMISM_SPOKE_POOL_ADDRESS),
            Polygon => Ok(POLYGON_SPOKE_POOL_ADDRESS),
            _ => Err(OffsetZapError::UnsupportedChain(*self)),
        }
    }

    fn multicall_handler_address(&self) -> Result<Address> {
        if self.is_origin_supported() || self.is_destination_supported() {
            Ok(ACROSS_MULTICALL_HANDLER)
        } else {
            Err(OffsetZapError::UnsupportedChain(*self))
        }
    }

    fn usdc_address(&self) -> Result<Address> {
        use NamedChain::*;

        match self {
            Mainnet => Ok(ETHEREUM_USDC),
            Base => Ok(BASE_USDC),
            Arbitrum => Ok(ARBITRUM_USDC),
            Optimism => Ok(OPTIMISM_USDC),
            Polygon => Ok(POLYGON_USDC),
            _ => Err(OffsetZapError::UnsupportedChain(*self)),
        }
    }

    fn explorer_url(&self) -> Result<&'static str> {
        use NamedChain::*;

        match self {
            Mainnet => Ok("https://etherscan.io"),
            Base => Ok("https://basescan.org"),
            Arbitrum => Ok("https://arbiscan.io"),
            Optimism => Ok("https://optimistic.etherscan.io"),
            Polygon => Ok("https://polygonscan.com"),
            _ => Err(OffsetZapError::UnsupportedChain(*self)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(NamedChain::Mainnet)]
    #[case(NamedChain::Base)]
    #[case(NamedChain::Arbitrum)]
    #[case(NamedChain::Optimism)]
    fn test_origin_chains_have_deposit_contracts(#[case] chain: NamedChain) {
        assert!(chain.is_origin_supported());
        assert!(chain.spoke_pool_address().is_ok());
        assert!(chain.usdc_address().is_ok());
        assert!(chain.explorer_url().is_ok());
    }

    #[test]
    fn test_polygon_is_the_retirement_chain() {
        let chain = NamedChain::Polygon;
        assert!(chain.is_destination_supported());
        assert!(!chain.is_origin_supported());
        assert_eq!(
            chain.multicall_handler_address().unwrap(),
            ACROSS_MULTICALL_HANDLER
        );
        assert_eq!(chain.usdc_address().unwrap(), POLYGON_USDC);
    }

    #[test]
    fn test_unsupported_chain_error() {
        let result = NamedChain::BinanceSmartChain.spoke_pool_address();
        assert!(matches!(
            result.unwrap_err(),
            OffsetZapError::UnsupportedChain(NamedChain::BinanceSmartChain)
        ));
        assert!(NamedChain::BinanceSmartChain
            .multicall_handler_address()
            .is_err());
    }

    #[test]
    fn test_explorer_tx_url() {
        let url = NamedChain::Base
            .explorer_tx_url(TxHash::from([0x12; 32]))
            .unwrap();
        insta::assert_snapshot!(url, @"https://basescan.org/tx/0x1212121212121212121212121212121212121212121212121212121212121212");
    }
}
