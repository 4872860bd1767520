//! Contract bindings
//!
//! This module contains Alloy-generated bindings for every contract the
//! retirement flow touches:
//!
//! - [`erc20`]: allowance checks and approvals for the input token
//! - [`spoke_pool`]: Across deposits on the origin chain and fills on the destination
//! - [`multicall_handler`]: the instruction format the Across handler executes
//! - [`facilitator`]: the destination contract that performs the retirement
//!
//! Transaction builders in this module only create requests. Signing and
//! broadcasting go through [`ChainClient`](crate::ChainClient).

pub mod erc20;
pub mod facilitator;
pub mod multicall_handler;
pub mod spoke_pool;
