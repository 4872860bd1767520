// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Fetches a live Across quote for a retirement
//!
//! Reads `ACROSS_API_URL` from the environment (or `.env`) and falls back to
//! the production API. When `FACILITATOR_ADDRESS` is set the quote is priced
//! for the retirement message. No transaction is sent.
//!
//! Run with: `cargo run --example across_quote`

use alloy_chains::NamedChain;
use alloy_primitives::utils::format_units;
use alloy_primitives::{address, Address, U256};
use dotenvy::dotenv;
use offsetzap_rs::providers::{AcrossApiProvider, ACROSS_API};
use offsetzap_rs::traits::QuoteProvider;
use offsetzap_rs::{PoolToken, RetirementRequest};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    println!("💱 Across Quote Example");
    println!("=======================\n");

    let api = env::var("ACROSS_API_URL").unwrap_or_else(|_| ACROSS_API.to_string());
    let mut across = AcrossApiProvider::new(api);
    if let Ok(facilitator) = env::var("FACILITATOR_ADDRESS") {
        across = across.with_facilitator(facilitator.parse::<Address>()?);
    }

    let request = RetirementRequest::builder()
        .origin_chain(NamedChain::Base)
        .destination_chain(NamedChain::Polygon)
        .input_amount(U256::from(10_000_000u64))
        .depositor(address!("742d35Cc6634C0532925a3b844Bc9e7595f8fA0d"))
        .beneficiary(address!("742d35Cc6634C0532925a3b844Bc9e7595f8fA0d"))
        .beneficiary_name("Example Beneficiary")
        .pool_token(PoolToken::Bct)
        .build()?;

    println!("🌐 {}", across.suggested_fees_url(&request)?);

    let quote = across.get_quote(&request).await?;

    println!("\n📊 Quote");
    println!("   Input:        {} USDC", format_units(quote.input_amount, 6)?);
    println!("   Output:       {} USDC", format_units(quote.output_amount, 6)?);
    println!(
        "   Relay fee:    {} USDC",
        format_units(quote.fees.total_relay_fee, 6)?
    );
    println!("   LP fee:       {} USDC", format_units(quote.fees.lp_fee, 6)?);
    println!("   Spoke pool:   {}", quote.deposit.spoke_pool);
    println!("   Fill deadline: {}", quote.deposit.fill_deadline);
    println!("   Est. fill:    ~{}s", quote.estimated_fill_time_sec);

    Ok(())
}
