// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Runs a full retirement against in-memory fakes
//!
//! Shows the progress stream and the final outcome of a 10 USDC Base to
//! Polygon retirement without touching a chain or the Across API.
//!
//! Run with: `RUST_LOG=offsetzap_rs=debug cargo run --example simulated_retirement`

use alloy_chains::NamedChain;
use alloy_primitives::{address, TxHash, U256};
use offsetzap_rs::addresses::{BASE_SPOKE_POOL_ADDRESS, BASE_USDC, POLYGON_SPOKE_POOL_ADDRESS};
use offsetzap_rs::testing::{
    filled_relay_log, funds_deposited_log, sample_quote, sample_request, FakeChainClient,
    FakeClock, FakeDepositStatusProvider, FakeNotificationRelay, FakeQuoteProvider, DEPOSITOR,
};
use offsetzap_rs::traits::Clock;
use offsetzap_rs::{
    DepositStatusResponse, OffsetZapError, PollingConfig, ProgressEvent, ReceiptSummary,
    RetirementPipeline,
};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), OffsetZapError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🌱 Simulated Carbon Retirement");
    println!("==============================\n");

    let deposit_id = 4242;
    let fill_tx = TxHash::repeat_byte(0xf1);
    let clock = FakeClock::new();

    // Base: funded depositor, SpokePool assigns the deposit id
    let base = FakeChainClient::for_chain(NamedChain::Base);
    base.set_balance(BASE_USDC, DEPOSITOR, U256::from(10_000_000u64));
    base.emit_logs_for(
        BASE_SPOKE_POOL_ADDRESS,
        vec![funds_deposited_log(BASE_SPOKE_POOL_ADDRESS, deposit_id, DEPOSITOR, 137)],
    );

    // Polygon: a relayer fill of that deposit
    let polygon = FakeChainClient::for_chain(NamedChain::Polygon);
    polygon.add_receipt(ReceiptSummary {
        transaction_hash: fill_tx,
        block_number: Some(60_000_000),
        success: true,
        logs: vec![filled_relay_log(POLYGON_SPOKE_POOL_ADDRESS, deposit_id, 8453)],
    });

    let status = FakeDepositStatusProvider::with_responses(vec![
        DepositStatusResponse::pending(),
        DepositStatusResponse::pending(),
        DepositStatusResponse::filled(fill_tx),
    ]);
    let relay = FakeNotificationRelay::new();

    let pipeline = RetirementPipeline::builder()
        .origin(base)
        .destination(polygon)
        .quotes(FakeQuoteProvider::new(sample_quote(clock.unix_now())))
        .deposit_status(status)
        .notifier(relay.clone())
        .clock(clock.clone())
        .facilitator(address!("4444444444444444444444444444444444444444"))
        .fill_polling(PollingConfig::fills().with_max_attempts(10))
        .build();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            print_event(&event);
        }
    });

    let outcome = pipeline.execute(&sample_request(), Some(tx)).await?;
    let _ = printer.await;

    println!("\n📦 Outcome");
    println!("   State:      {:?}", outcome.state);
    println!("   Deposit:    #{} ({})", outcome.deposit_id, outcome.deposit_tx);
    println!("   Output:     {} (6 decimals)", outcome.quote.output_amount);
    if let Some(url) = &outcome.deposit_explorer_url {
        println!("   Explorer:   {url}");
    }
    println!("   Simulated wait: {:?}", clock.total_sleep_time());

    println!("\n✉️  Notifications sent");
    for notification in relay.notifications() {
        println!("   - {}", notification.render());
    }

    Ok(())
}

fn print_event(event: &ProgressEvent) {
    match event {
        ProgressEvent::Quoting => println!("🔍 Fetching quote..."),
        ProgressEvent::Quoted {
            output_amount,
            total_relay_fee,
            estimated_fill_time_sec,
        } => println!(
            "💱 Quoted {output_amount} out, fee {total_relay_fee}, ~{estimated_fill_time_sec}s to fill"
        ),
        ProgressEvent::Transaction(record) => println!(
            "   {:<8} {:?} {}",
            record.step().as_str(),
            record.status(),
            record
                .hash()
                .map(|hash| hash.to_string())
                .unwrap_or_default()
        ),
        ProgressEvent::AwaitingFill { deposit_id, .. } => {
            println!("⏳ Waiting for a relayer to fill deposit #{deposit_id}")
        }
        ProgressEvent::Filled { fill_tx, .. } => println!("✅ Filled in {fill_tx}"),
        ProgressEvent::Failed { reason } => println!("❌ Failed: {reason}"),
        ProgressEvent::Abandoned { deposit_tx, .. } => {
            println!("⚠️  No fill before the deadline, check {deposit_tx} manually")
        }
        ProgressEvent::Unconfirmed { deposit_tx } => {
            println!("⚠️  Deposit {deposit_tx} could not be confirmed, check it manually")
        }
    }
}
