// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Contract addresses for Across, USDC and Toucan deployments
//!
//! This module centralizes all contract address constants used when bridging
//! funds into a carbon retirement.

use alloy_primitives::{address, Address};

// Across SpokePool Addresses

/// <https://etherscan.io/address/0x5c7BCd6E7De5423a257D81B442095A1a6ced35C5>
pub const ETHEREUM_SPOKE_POOL_ADDRESS: Address =
    address!("5c7BCd6E7De5423a257D81B442095A1a6ced35C5");

/// <https://basescan.org/address/0x09aea4b2242abC8bb4BB78D537A67a245A7bEC64>
pub const BASE_SPOKE_POOL_ADDRESS: Address =
    address!("09aea4b2242abC8bb4BB78D537A67a245A7bEC64");

/// <https://arbiscan.io/address/0xe35e9842fceaCA96570B734083f4a58e8F7C5f2A>
pub const ARBITRUM_SPOKE_POOL_ADDRESS: Address =
    address!("e35e9842fceaCA96570B734083f4a58e8F7C5f2A");

/// <https://optimistic.etherscan.io/address/0x6f26Bf09B1C792e3228e5467807a900A503c0281>
pub const OPTIMISM_SPOKE_POOL_ADDRESS: Address =
    address!("6f26Bf09B1C792e3228e5467807a900A503c0281");

/// <https://polygonscan.com/address/0x9295ee1d8C5b022Be115A2AD3c30C72E34e7F096>
pub const POLYGON_SPOKE_POOL_ADDRESS: Address =
    address!("9295ee1d8C5b022Be115A2AD3c30C72E34e7F096");

// Across MulticallHandler
//
// The handler is deployed at the same address on every supported chain. Across
// delivers the bridged tokens here and executes the `Instructions` carried in
// the deposit message.

/// <https://polygonscan.com/address/0x924a9f036260DdD5808007E1AA95f08eD08aA569>
pub const ACROSS_MULTICALL_HANDLER: Address =
    address!("924a9f036260DdD5808007E1AA95f08eD08aA569");

// USDC Addresses (native, not bridged USDC.e)

/// <https://etherscan.io/token/0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48>
pub const ETHEREUM_USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

/// <https://basescan.org/token/0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913>
pub const BASE_USDC: Address = address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");

/// <https://arbiscan.io/token/0xaf88d065e77c8cC2239327C5EDb3A432268e5831>
pub const ARBITRUM_USDC: Address = address!("af88d065e77c8cC2239327C5EDb3A432268e5831");

/// <https://optimistic.etherscan.io/token/0x0b2C639c533813f4Aa9D7837CAf62653d097Ff85>
pub const OPTIMISM_USDC: Address = address!("0b2C639c533813f4Aa9D7837CAf62653d097Ff85");

/// <https://polygonscan.com/token/0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359>
pub const POLYGON_USDC: Address = address!("3c499c542cEF5E3811e1192ce70d8cC03d5c3359");

// Toucan carbon pool tokens (Polygon)

/// Base Carbon Tonne
///
/// <https://polygonscan.com/token/0x2F800Db0fdb5223b3C3f354886d907A671414A7F>
pub const POLYGON_BCT: Address = address!("2F800Db0fdb5223b3C3f354886d907A671414A7F");

/// Nature Carbon Tonne
///
/// <https://polygonscan.com/token/0xD838290e877E0188a4A44700463419ED96c16107>
pub const POLYGON_NCT: Address = address!("D838290e877E0188a4A44700463419ED96c16107");
