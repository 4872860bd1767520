//! Across multicall handler instruction format
//!
//! When a deposit carries a non-empty message, Across delivers the output
//! tokens to the handler on the destination chain and calls
//! `handleV3AcrossMessage`, which decodes the message as `Instructions` and
//! executes each call in order. If any call reverts, the tokens go to
//! `fallbackRecipient`.

use alloy_sol_types::sol;

sol!(
    #[allow(missing_docs)]
    struct Call {
        address target;
        bytes callData;
        uint256 value;
    }

    #[allow(missing_docs)]
    struct Instructions {
        Call[] calls;
        address fallbackRecipient;
    }
);
