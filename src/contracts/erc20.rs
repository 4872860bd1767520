// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! ERC20 contract bindings for approval and allowance operations
//!
//! The origin-chain SpokePool pulls the input token from the depositor, so an
//! allowance has to be in place before `depositV3` is sent.

use alloy_network::{Ethereum, TransactionBuilder};
use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use tracing::{debug, info};

use Erc20::Erc20Instance;

/// ERC20 read-only wrapper backed by an Alloy provider
///
/// # Example
///
/// ```rust,no_run
/// use offsetzap_rs::contracts::erc20::Erc20Contract;
/// use alloy_primitives::address;
/// use alloy_provider::ProviderBuilder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = ProviderBuilder::new().connect("http://localhost:8545").await?;
/// let usdc = address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");
///
/// let erc20 = Erc20Contract::new(usdc, provider);
/// let owner = address!("1234567890123456789012345678901234567890");
/// let spender = address!("09aea4b2242abC8bb4BB78D537A67a245A7bEC64");
/// let allowance = erc20.allowance(owner, spender).await?;
/// # Ok(())
/// # }
/// ```
pub struct Erc20Contract<P: Provider<Ethereum>> {
    instance: Erc20Instance<P>,
}

impl<P: Provider<Ethereum>> Erc20Contract<P> {
    /// Create a new ERC20 contract wrapper
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "erc20_contract_initialized"
        );
        Self {
            instance: Erc20Instance::new(address, provider),
        }
    }

    /// Get the amount of tokens `spender` may pull from `owner`
    pub async fn allowance(
        &self,
        owner: Address,
        spender: Address,
    ) -> Result<U256, alloy_contract::Error> {
        let result = self.instance.allowance(owner, spender).call().await?;

        info!(
            owner = %owner,
            spender = %spender,
            allowance = %result,
            contract_address = %self.instance.address(),
            event = "allowance_retrieved"
        );

        Ok(result)
    }

    /// Get the token balance of an address
    pub async fn balance_of(&self, account: Address) -> Result<U256, alloy_contract::Error> {
        let result = self.instance.balanceOf(account).call().await?;

        debug!(
            account = %account,
            balance = %result,
            contract_address = %self.instance.address(),
            event = "balance_retrieved"
        );

        Ok(result)
    }

    /// Returns the contract address
    pub fn address(&self) -> Address {
        *self.instance.address()
    }
}

/// Create a transaction request approving `spender` for `amount` of `token`.
///
/// This creates but does not send the approval transaction.
pub fn approve_transaction(
    token: Address,
    from: Address,
    spender: Address,
    amount: U256,
) -> TransactionRequest {
    info!(
        from = %from,
        spender = %spender,
        amount = %amount,
        contract_address = %token,
        event = "approve_transaction_created"
    );

    let call = Erc20::approveCall { spender, amount };
    TransactionRequest::default()
        .with_from(from)
        .with_to(token)
        .with_input(call.abi_encode())
}

/// Calldata for `transfer(to, amount)`, executed by the multicall handler on
/// the destination chain.
pub fn transfer_calldata(to: Address, amount: U256) -> Bytes {
    Erc20::transferCall { to, amount }.abi_encode().into()
}

// Minimal ERC20 interface
sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract Erc20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, hex};

    #[test]
    fn test_approve_transaction_targets_token() {
        let token = address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");
        let from = address!("1111111111111111111111111111111111111111");
        let spender = address!("09aea4b2242abC8bb4BB78D537A67a245A7bEC64");

        let tx = approve_transaction(token, from, spender, U256::from(10_000_000u64));

        assert_eq!(tx.from, Some(from));
        assert_eq!(tx.to, Some(token.into()));
        let input = tx.input.input().cloned().unwrap_or_default();
        assert_eq!(&input[..4], &Erc20::approveCall::SELECTOR);

        let decoded = Erc20::approveCall::abi_decode(&input).unwrap();
        assert_eq!(decoded.spender, spender);
        assert_eq!(decoded.amount, U256::from(10_000_000u64));
    }

    #[test]
    fn test_transfer_calldata_layout() {
        let to = address!("2222222222222222222222222222222222222222");
        let calldata = transfer_calldata(to, U256::from(1_000_000u64));

        insta::assert_snapshot!(hex::encode(&calldata), @"a9059cbb000000000000000000000000222222222222222222222222222222222222222200000000000000000000000000000000000000000000000000000000000f4240");
    }
}
