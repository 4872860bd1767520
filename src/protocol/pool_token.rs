//! Carbon pool tokens that a retirement can draw from

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::chain::addresses::{POLYGON_BCT, POLYGON_NCT};
use crate::error::{OffsetZapError, Result};

/// Toucan carbon pool selection
///
/// # Example
///
/// ```rust
/// use offsetzap_rs::PoolToken;
///
/// let pool: PoolToken = "nct".parse().unwrap();
/// assert_eq!(pool, PoolToken::Nct);
/// assert_eq!(pool.to_string(), "NCT");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PoolToken {
    /// Base Carbon Tonne
    Bct,
    /// Nature Carbon Tonne
    Nct,
}

impl PoolToken {
    /// Ticker symbol as shown to users
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Bct => "BCT",
            Self::Nct => "NCT",
        }
    }

    /// The pool token contract on `chain`
    pub fn address_on(&self, chain: NamedChain) -> Result<Address> {
        match (chain, self) {
            (NamedChain::Polygon, Self::Bct) => Ok(POLYGON_BCT),
            (NamedChain::Polygon, Self::Nct) => Ok(POLYGON_NCT),
            _ => Err(OffsetZapError::MissingContract {
                chain,
                role: "carbon pool token",
            }),
        }
    }
}

impl fmt::Display for PoolToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for PoolToken {
    type Err = OffsetZapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BCT" => Ok(Self::Bct),
            "NCT" => Ok(Self::Nct),
            _ => Err(OffsetZapError::UnknownPoolToken(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("BCT", PoolToken::Bct)]
    #[case("bct", PoolToken::Bct)]
    #[case(" NCT ", PoolToken::Nct)]
    fn test_parse_pool_token(#[case] input: &str, #[case] expected: PoolToken) {
        assert_eq!(input.parse::<PoolToken>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_pool_token() {
        let err = "UBO".parse::<PoolToken>().unwrap_err();
        assert!(matches!(err, OffsetZapError::UnknownPoolToken(ref s) if s == "UBO"));
    }

    #[test]
    fn test_pool_addresses_only_on_polygon() {
        assert_eq!(
            PoolToken::Bct.address_on(NamedChain::Polygon).unwrap(),
            POLYGON_BCT
        );
        assert!(matches!(
            PoolToken::Nct.address_on(NamedChain::Base),
            Err(OffsetZapError::MissingContract { .. })
        ));
    }

    #[test]
    fn test_serde_uses_symbols() {
        assert_eq!(serde_json::to_string(&PoolToken::Nct).unwrap(), "\"NCT\"");
        let pool: PoolToken = serde_json::from_str("\"BCT\"").unwrap();
        assert_eq!(pool, PoolToken::Bct);
    }
}
