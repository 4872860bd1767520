use alloy_primitives::{Address, U256};

use crate::error::Result;
use crate::traits::ChainClient;

/// Token state containing balance and allowance information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenState {
    /// The token balance of the owner
    pub balance: U256,
    /// The allowance granted to the spender
    pub allowance: U256,
}

impl TokenState {
    /// Reads `owner`'s balance of `token` and its allowance for `spender`.
    pub async fn read<C: ChainClient + ?Sized>(
        client: &C,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<Self> {
        let balance = client.token_balance(token, owner).await?;
        let allowance = client.token_allowance(token, owner, spender).await?;
        Ok(Self { balance, allowance })
    }

    /// Check if approval is needed for the specified amount.
    pub fn needs_approval(&self, amount: U256) -> bool {
        self.allowance < amount
    }

    /// Check if the owner has sufficient balance.
    pub fn has_sufficient_balance(&self, amount: U256) -> bool {
        self.balance >= amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeChainClient;
    use alloy_primitives::address;

    #[test]
    fn test_token_state_checks() {
        let state = TokenState {
            balance: U256::from(1000),
            allowance: U256::from(500),
        };

        assert!(state.has_sufficient_balance(U256::from(1000)));
        assert!(state.needs_approval(U256::from(501)));
        assert!(!state.needs_approval(U256::from(500)));
        assert!(!state.has_sufficient_balance(U256::from(1001)));
    }

    #[tokio::test]
    async fn test_read_from_chain() {
        let token = address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");
        let owner = address!("1111111111111111111111111111111111111111");
        let spender = address!("09aea4b2242abC8bb4BB78D537A67a245A7bEC64");

        let client = FakeChainClient::new(8453);
        client.set_balance(token, owner, U256::from(10_000_000u64));
        client.set_allowance(token, owner, spender, U256::from(1u64));

        let state = TokenState::read(&client, token, owner, spender).await.unwrap();
        assert_eq!(state.balance, U256::from(10_000_000u64));
        assert!(state.needs_approval(U256::from(10_000_000u64)));
    }
}
