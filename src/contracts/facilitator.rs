// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Facilitator contract bindings
//!
//! The Facilitator lives on the destination chain. It receives bridged funds
//! from the multicall handler, decodes the retirement payload and calls the
//! carbon retirement aggregator on behalf of the beneficiary. Only its ABI is
//! consumed here.

use alloy_network::{Ethereum, TransactionBuilder};
use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use tracing::{debug, info};

use Facilitator::FacilitatorInstance;

/// Facilitator read-only wrapper backed by an Alloy provider
pub struct FacilitatorContract<P: Provider<Ethereum>> {
    instance: FacilitatorInstance<P>,
}

impl<P: Provider<Ethereum>> FacilitatorContract<P> {
    /// Create a new Facilitator wrapper
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "facilitator_contract_initialized"
        );
        Self {
            instance: FacilitatorInstance::new(address, provider),
        }
    }

    /// Returns the current owner of the Facilitator
    pub async fn owner(&self) -> Result<Address, alloy_contract::Error> {
        let owner = self.instance.owner().call().await?;

        debug!(
            owner = %owner,
            contract_address = %self.instance.address(),
            event = "facilitator_owner_retrieved"
        );

        Ok(owner)
    }

    /// Returns the contract address
    pub fn address(&self) -> Address {
        *self.instance.address()
    }
}

/// Calldata for `handleAcrossTransfer(recipient, amount, message)`.
pub fn handle_across_transfer_calldata(recipient: Address, amount: U256, message: Bytes) -> Bytes {
    Facilitator::handleAcrossTransferCall {
        recipient,
        amount,
        message,
    }
    .abi_encode()
    .into()
}

/// Create a transaction request for `withdrawTokens(token, amount)`.
pub fn withdraw_tokens_transaction(
    facilitator: Address,
    from: Address,
    token: Address,
    amount: U256,
) -> TransactionRequest {
    info!(
        from = %from,
        token = %token,
        amount = %amount,
        contract_address = %facilitator,
        event = "withdraw_tokens_transaction_created"
    );

    TransactionRequest::default()
        .with_from(from)
        .with_to(facilitator)
        .with_input(Facilitator::withdrawTokensCall { token, amount }.abi_encode())
}

/// Create a transaction request for `withdrawEth(amount)`.
pub fn withdraw_eth_transaction(
    facilitator: Address,
    from: Address,
    amount: U256,
) -> TransactionRequest {
    info!(
        from = %from,
        amount = %amount,
        contract_address = %facilitator,
        event = "withdraw_eth_transaction_created"
    );

    TransactionRequest::default()
        .with_from(from)
        .with_to(facilitator)
        .with_input(Facilitator::withdrawEthCall { amount }.abi_encode())
}

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract Facilitator {
        function handleAcrossTransfer(address recipient, uint256 amount, bytes message) external;
        function withdrawTokens(address token, uint256 amount) external;
        function withdrawEth(uint256 amount) external;
        function owner() external view returns (address);
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_handle_across_transfer_round_trips_arguments() {
        let recipient = address!("3333333333333333333333333333333333333333");
        let calldata = handle_across_transfer_calldata(
            recipient,
            U256::from(9_950_000u64),
            Bytes::from_static(b"payload"),
        );

        let decoded = Facilitator::handleAcrossTransferCall::abi_decode(&calldata).unwrap();
        assert_eq!(decoded.recipient, recipient);
        assert_eq!(decoded.amount, U256::from(9_950_000u64));
        assert_eq!(decoded.message, Bytes::from_static(b"payload"));
    }

    #[test]
    fn test_withdraw_transactions_target_facilitator() {
        let facilitator = address!("4444444444444444444444444444444444444444");
        let owner = address!("5555555555555555555555555555555555555555");

        let tx = withdraw_eth_transaction(facilitator, owner, U256::from(1));
        assert_eq!(tx.to, Some(facilitator.into()));
        assert_eq!(tx.from, Some(owner));

        let tx = withdraw_tokens_transaction(facilitator, owner, Address::ZERO, U256::from(1));
        let input = tx.input.input().cloned().unwrap_or_default();
        assert_eq!(&input[..4], &Facilitator::withdrawTokensCall::SELECTOR);
    }
}
