//! Across SpokePool contract bindings
//!
//! Origin side: `depositV3` locks the input token and emits a deposit event
//! carrying the deposit id. Destination side: a relayer fill emits a fill event
//! for the same origin chain and deposit id.
//!
//! SpokePools before v3.5 emit `V3FundsDeposited` and `FilledV3Relay` with
//! address fields and `uint32` deposit ids. From v3.5 on they emit
//! `FundsDeposited` and `FilledRelay` with `bytes32` addresses and `uint256`
//! ids. Both generations are decoded into [`DepositEvent`] and [`FillEvent`].

use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Log, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall, SolEvent};
use tracing::info;

use crate::protocol::{DepositParams, EncodedMessage};
use crate::spans;
use SpokePool::{depositV3Call, FilledRelay, FilledV3Relay, FundsDeposited, V3FundsDeposited};

/// Arguments of a single `depositV3` call, assembled from a quote and a
/// freshly encoded message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositV3Args {
    pub depositor: Address,
    pub recipient: Address,
    pub input_token: Address,
    pub output_token: Address,
    pub input_amount: U256,
    pub destination_chain_id: u64,
    pub params: DepositParams,
    pub message: EncodedMessage,
}

/// Create the transaction request for `depositV3`.
///
/// The output amount is taken from the encoded message so the deposit and the
/// instructions it carries can never disagree on the amount.
pub fn deposit_v3_transaction(args: &DepositV3Args) -> TransactionRequest {
    let span = spans::deposit_v3(
        &args.depositor,
        &args.recipient,
        args.destination_chain_id,
        &args.input_token,
        &args.input_amount,
    );
    let _guard = span.enter();

    let call = depositV3Call {
        depositor: args.depositor,
        recipient: args.recipient,
        inputToken: args.input_token,
        outputToken: args.output_token,
        inputAmount: args.input_amount,
        outputAmount: args.message.output_amount(),
        destinationChainId: U256::from(args.destination_chain_id),
        exclusiveRelayer: args.params.exclusive_relayer,
        quoteTimestamp: args.params.quote_timestamp,
        fillDeadline: args.params.fill_deadline,
        exclusivityDeadline: args.params.exclusivity_deadline,
        message: args.message.bytes().clone(),
    };

    info!(
        depositor = %args.depositor,
        recipient = %args.recipient,
        input_amount = %args.input_amount,
        output_amount = %args.message.output_amount(),
        destination_chain_id = args.destination_chain_id,
        spoke_pool = %args.params.spoke_pool,
        event = "deposit_v3_transaction_created"
    );

    TransactionRequest::default()
        .with_from(args.depositor)
        .with_to(args.params.spoke_pool)
        .with_input(call.abi_encode())
}

/// A deposit read from the origin SpokePool's logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositEvent {
    pub deposit_id: u32,
    pub depositor: Address,
    pub destination_chain_id: U256,
}

/// A relayer fill read from the destination SpokePool's logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillEvent {
    pub deposit_id: u32,
    pub origin_chain_id: U256,
    pub relayer: Address,
}

/// Finds the deposit event emitted by `spoke_pool` among `logs`.
pub fn find_funds_deposited(logs: &[Log], spoke_pool: Address) -> Option<DepositEvent> {
    logs.iter()
        .filter(|log| log.address == spoke_pool)
        .find_map(decode_deposit)
}

/// Finds the fill event matching `origin_chain_id` and `deposit_id` emitted
/// by `spoke_pool` among `logs`.
pub fn find_filled_relay(
    logs: &[Log],
    spoke_pool: Address,
    origin_chain_id: u64,
    deposit_id: u32,
) -> Option<FillEvent> {
    logs.iter()
        .filter(|log| log.address == spoke_pool)
        .filter_map(decode_fill)
        .find(|fill| {
            fill.origin_chain_id == U256::from(origin_chain_id) && fill.deposit_id == deposit_id
        })
}

fn decode_deposit(log: &Log) -> Option<DepositEvent> {
    let topic = *log.topics().first()?;

    if topic == V3FundsDeposited::SIGNATURE_HASH {
        let event = V3FundsDeposited::decode_log_data(&log.data).ok()?;
        Some(DepositEvent {
            deposit_id: event.depositId,
            depositor: event.depositor,
            destination_chain_id: event.destinationChainId,
        })
    } else if topic == FundsDeposited::SIGNATURE_HASH {
        let event = FundsDeposited::decode_log_data(&log.data).ok()?;
        Some(DepositEvent {
            // depositV3 assigns sequential ids; larger ones come from unsafe deposits
            deposit_id: u32::try_from(event.depositId).ok()?,
            depositor: Address::from_word(event.depositor),
            destination_chain_id: event.destinationChainId,
        })
    } else {
        None
    }
}

fn decode_fill(log: &Log) -> Option<FillEvent> {
    let topic = *log.topics().first()?;

    if topic == FilledV3Relay::SIGNATURE_HASH {
        let event = FilledV3Relay::decode_log_data(&log.data).ok()?;
        Some(FillEvent {
            deposit_id: event.depositId,
            origin_chain_id: event.originChainId,
            relayer: event.relayer,
        })
    } else if topic == FilledRelay::SIGNATURE_HASH {
        let event = FilledRelay::decode_log_data(&log.data).ok()?;
        Some(FillEvent {
            deposit_id: u32::try_from(event.depositId).ok()?,
            origin_chain_id: event.originChainId,
            relayer: Address::from_word(event.relayer),
        })
    } else {
        None
    }
}

sol!(
    #[allow(missing_docs)]
    #[allow(clippy::too_many_arguments)]
    interface SpokePool {
        enum FillType {
            FastFill,
            ReplacedSlowFill,
            SlowFill
        }

        struct V3RelayExecutionEventInfo {
            address updatedRecipient;
            bytes updatedMessage;
            uint256 updatedOutputAmount;
            FillType fillType;
        }

        struct RelayExecutionEventInfo {
            bytes32 updatedRecipient;
            bytes32 updatedMessageHash;
            uint256 updatedOutputAmount;
            FillType fillType;
        }

        event V3FundsDeposited(
            address inputToken,
            address outputToken,
            uint256 inputAmount,
            uint256 outputAmount,
            uint256 indexed destinationChainId,
            uint32 indexed depositId,
            uint32 quoteTimestamp,
            uint32 fillDeadline,
            uint32 exclusivityDeadline,
            address indexed depositor,
            address recipient,
            address exclusiveRelayer,
            bytes message
        );

        event FilledV3Relay(
            address inputToken,
            address outputToken,
            uint256 inputAmount,
            uint256 outputAmount,
            uint256 repaymentChainId,
            uint256 indexed originChainId,
            uint32 indexed depositId,
            uint32 fillDeadline,
            uint32 exclusivityDeadline,
            address exclusiveRelayer,
            address indexed relayer,
            address depositor,
            address recipient,
            bytes message,
            V3RelayExecutionEventInfo relayExecutionInfo
        );

        event FundsDeposited(
            bytes32 inputToken,
            bytes32 outputToken,
            uint256 inputAmount,
            uint256 outputAmount,
            uint256 indexed destinationChainId,
            uint256 indexed depositId,
            uint32 quoteTimestamp,
            uint32 fillDeadline,
            uint32 exclusivityDeadline,
            bytes32 indexed depositor,
            bytes32 recipient,
            bytes32 exclusiveRelayer,
            bytes message
        );

        event FilledRelay(
            bytes32 inputToken,
            bytes32 outputToken,
            uint256 inputAmount,
            uint256 outputAmount,
            uint256 repaymentChainId,
            uint256 indexed originChainId,
            uint256 indexed depositId,
            uint32 fillDeadline,
            uint32 exclusivityDeadline,
            bytes32 exclusiveRelayer,
            bytes32 indexed relayer,
            bytes32 depositor,
            bytes32 recipient,
            bytes32 messageHash,
            RelayExecutionEventInfo relayExecutionInfo
        );

        function depositV3(
            address depositor,
            address recipient,
            address inputToken,
            address outputToken,
            uint256 inputAmount,
            uint256 outputAmount,
            uint256 destinationChainId,
            address exclusiveRelayer,
            uint32 quoteTimestamp,
            uint32 fillDeadline,
            uint32 exclusivityDeadline,
            bytes calldata message
        ) external payable;
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::addresses::{BASE_SPOKE_POOL_ADDRESS, POLYGON_SPOKE_POOL_ADDRESS};
    use crate::testing::{
        bytes32_filled_relay_log, bytes32_funds_deposited_log, filled_relay_log,
        funds_deposited_log,
    };
    use alloy_primitives::{address, B256};

    #[test]
    fn test_find_funds_deposited_reads_deposit_id() {
        let depositor = address!("1111111111111111111111111111111111111111");
        let log = funds_deposited_log(BASE_SPOKE_POOL_ADDRESS, 4242, depositor, 137);

        let event = find_funds_deposited(&[log], BASE_SPOKE_POOL_ADDRESS).unwrap();
        assert_eq!(event.deposit_id, 4242);
        assert_eq!(event.depositor, depositor);
        assert_eq!(event.destination_chain_id, U256::from(137));
    }

    #[test]
    fn test_find_funds_deposited_reads_bytes32_event() {
        let depositor = address!("1111111111111111111111111111111111111111");
        let log = bytes32_funds_deposited_log(BASE_SPOKE_POOL_ADDRESS, 4242, depositor, 137);

        let event = find_funds_deposited(&[log], BASE_SPOKE_POOL_ADDRESS).unwrap();
        assert_eq!(
            event,
            DepositEvent {
                deposit_id: 4242,
                depositor,
                destination_chain_id: U256::from(137),
            }
        );
    }

    #[test]
    fn test_deposit_id_beyond_u32_is_ignored() {
        let depositor = address!("1111111111111111111111111111111111111111");
        let event = FundsDeposited {
            inputToken: B256::ZERO,
            outputToken: B256::ZERO,
            inputAmount: U256::from(1u64),
            outputAmount: U256::from(1u64),
            destinationChainId: U256::from(137),
            depositId: U256::from(u64::MAX),
            quoteTimestamp: 0,
            fillDeadline: 0,
            exclusivityDeadline: 0,
            depositor: depositor.into_word(),
            recipient: B256::ZERO,
            exclusiveRelayer: B256::ZERO,
            message: Default::default(),
        };
        let log = Log {
            address: BASE_SPOKE_POOL_ADDRESS,
            data: event.encode_log_data(),
        };

        assert!(find_funds_deposited(&[log], BASE_SPOKE_POOL_ADDRESS).is_none());
    }

    #[test]
    fn test_find_funds_deposited_ignores_other_contracts() {
        let depositor = address!("1111111111111111111111111111111111111111");
        let log = funds_deposited_log(POLYGON_SPOKE_POOL_ADDRESS, 1, depositor, 137);

        assert!(find_funds_deposited(&[log], BASE_SPOKE_POOL_ADDRESS).is_none());
    }

    #[test]
    fn test_find_filled_relay_matches_origin_and_deposit() {
        let logs = vec![
            filled_relay_log(POLYGON_SPOKE_POOL_ADDRESS, 10, 8453),
            filled_relay_log(POLYGON_SPOKE_POOL_ADDRESS, 11, 1),
            filled_relay_log(POLYGON_SPOKE_POOL_ADDRESS, 11, 8453),
        ];

        let fill = find_filled_relay(&logs, POLYGON_SPOKE_POOL_ADDRESS, 8453, 11).unwrap();
        assert_eq!(fill.deposit_id, 11);
        assert_eq!(fill.origin_chain_id, U256::from(8453));

        assert!(find_filled_relay(&logs, POLYGON_SPOKE_POOL_ADDRESS, 10, 12).is_none());
    }

    #[test]
    fn test_find_filled_relay_reads_bytes32_event() {
        let logs = vec![
            bytes32_filled_relay_log(POLYGON_SPOKE_POOL_ADDRESS, 11, 1),
            bytes32_filled_relay_log(POLYGON_SPOKE_POOL_ADDRESS, 11, 8453),
        ];

        let fill = find_filled_relay(&logs, POLYGON_SPOKE_POOL_ADDRESS, 8453, 11).unwrap();
        assert_eq!(fill.deposit_id, 11);
        assert_eq!(fill.relayer, Address::repeat_byte(0xdd));
    }
}
