//! Chain configuration and contract addresses
//!
//! This module contains chain-specific configuration: Across SpokePool and
//! multicall handler addresses, USDC deployments and block explorers for every
//! chain a retirement can start from or settle on.

pub mod addresses;
mod config;

pub use config::AcrossChain;
