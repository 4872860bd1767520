//! Destination message encoding
//!
//! The message attached to a deposit is split in two layers:
//!
//! - [`RetirementIntent`]: who benefits, which pool, what to say. It does not
//!   depend on the bridged amount and is what the Facilitator decodes.
//! - [`EncodedMessage`]: the multicall handler `Instructions` that move the
//!   exact output amount into the Facilitator and invoke it. It embeds the
//!   amount twice and must be rebuilt whenever the quote changes.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolValue};

use crate::contracts::erc20::transfer_calldata;
use crate::contracts::facilitator::handle_across_transfer_calldata;
use crate::contracts::multicall_handler::{Call, Instructions};
use crate::error::{OffsetZapError, Result};

sol!(
    #[allow(missing_docs)]
    struct RetirementPayload {
        address beneficiary;
        string beneficiaryName;
        address poolToken;
        string retirementMessage;
    }
);

/// Amount-independent description of the retirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetirementIntent {
    /// Address credited with the retirement and receiving the certificate
    pub beneficiary: Address,
    pub beneficiary_name: String,
    /// Carbon pool token address on the destination chain
    pub pool_token: Address,
    pub retirement_message: String,
}

impl RetirementIntent {
    /// ABI-encodes the intent as `(address, string, address, string)`
    pub fn abi_encode(&self) -> Bytes {
        RetirementPayload {
            beneficiary: self.beneficiary,
            beneficiaryName: self.beneficiary_name.clone(),
            poolToken: self.pool_token,
            retirementMessage: self.retirement_message.clone(),
        }
        .abi_encode_params()
        .into()
    }

    /// Decodes an intent previously produced by [`RetirementIntent::abi_encode`]
    pub fn abi_decode(data: &[u8]) -> Result<Self> {
        let payload = RetirementPayload::abi_decode_params(data)?;
        Ok(Self {
            beneficiary: payload.beneficiary,
            beneficiary_name: payload.beneficiaryName,
            pool_token: payload.poolToken,
            retirement_message: payload.retirementMessage,
        })
    }
}

/// Deposit message bound to the exact output amount it was built for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMessage {
    bytes: Bytes,
    output_amount: U256,
}

impl EncodedMessage {
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn output_amount(&self) -> U256 {
        self.output_amount
    }

    /// Rejects the message if it was encoded for a different amount
    pub fn ensure_amount(&self, expected: U256) -> Result<()> {
        if self.output_amount != expected {
            return Err(OffsetZapError::StaleMessage {
                encoded: self.output_amount,
                expected,
            });
        }
        Ok(())
    }

    /// Decodes the handler instructions carried by this message
    pub fn instructions(&self) -> Result<Instructions> {
        Ok(Instructions::abi_decode(&self.bytes)?)
    }
}

/// Builds the multicall handler instructions for a retirement.
///
/// Two calls, both carrying `output_amount`:
/// 1. `output_token.transfer(facilitator, output_amount)`
/// 2. `facilitator.handleAcrossTransfer(beneficiary, output_amount, intent)`
///
/// If either call reverts, the handler sends the bridged tokens to
/// `fallback_recipient`.
pub fn encode_deposit_message(
    intent: &RetirementIntent,
    output_token: Address,
    output_amount: U256,
    facilitator: Address,
    fallback_recipient: Address,
) -> EncodedMessage {
    let instructions = Instructions {
        calls: vec![
            Call {
                target: output_token,
                callData: transfer_calldata(facilitator, output_amount),
                value: U256::ZERO,
            },
            Call {
                target: facilitator,
                callData: handle_across_transfer_calldata(
                    intent.beneficiary,
                    output_amount,
                    intent.abi_encode(),
                ),
                value: U256::ZERO,
            },
        ],
        fallbackRecipient: fallback_recipient,
    };

    EncodedMessage {
        bytes: instructions.abi_encode().into(),
        output_amount,
    }
}
