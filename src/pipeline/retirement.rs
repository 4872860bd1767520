use alloy_primitives::{Address, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use bon::Builder;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, trace, warn, Instrument};

use super::receipts::wait_for_receipt;
use super::token_state::TokenState;
use super::PollingConfig;
use crate::chain::AcrossChain;
use crate::contracts::erc20::approve_transaction;
use crate::contracts::spoke_pool::{
    deposit_v3_transaction, find_filled_relay, find_funds_deposited, DepositV3Args,
};
use crate::error::{OffsetZapError, Result};
use crate::protocol::{
    encode_deposit_message, DepositStatus, EncodedMessage, PipelineState, ProgressEvent,
    ProgressStep, Quote, ReceiptSummary, RetirementNotification, RetirementRequest,
    RetirementStatus, TransactionHistory, TransactionRecord, TxStatus,
};
use crate::spans;
use crate::traits::{ChainClient, Clock, DepositStatusProvider, NotificationRelay, QuoteProvider};

/// Bridge-then-retire pipeline
///
/// Runs one retirement end to end: quote, encode, approve, deposit, await
/// fill, notify. Every collaborator is injected, so the same pipeline drives
/// production RPC endpoints and the fakes in [`crate::testing`].
///
/// # Example
///
/// ```rust,no_run
/// use offsetzap_rs::providers::{
///     AcrossApiProvider, AlloyChainClient, CachedQuoteProvider, HttpNotificationRelay, TokioClock,
/// };
/// use offsetzap_rs::{PoolToken, RetirementPipeline, RetirementRequest};
/// use alloy_chains::NamedChain;
/// use alloy_primitives::{address, U256};
/// use alloy_provider::ProviderBuilder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let base = ProviderBuilder::new().connect("https://mainnet.base.org").await?;
/// let polygon = ProviderBuilder::new().connect("https://polygon-rpc.com").await?;
///
/// let facilitator = address!("4444444444444444444444444444444444444444");
/// let across = AcrossApiProvider::production().with_facilitator(facilitator);
///
/// let pipeline = RetirementPipeline::builder()
///     .origin(AlloyChainClient::new(base, NamedChain::Base))
///     .destination(AlloyChainClient::new(polygon, NamedChain::Polygon))
///     .quotes(CachedQuoteProvider::new(across.clone(), TokioClock::new()))
///     .deposit_status(across)
///     .notifier(HttpNotificationRelay::default())
///     .clock(TokioClock::new())
///     .facilitator(facilitator)
///     .build();
///
/// let request = RetirementRequest::builder()
///     .origin_chain(NamedChain::Base)
///     .destination_chain(NamedChain::Polygon)
///     .input_amount(U256::from(10_000_000u64))
///     .depositor(address!("1111111111111111111111111111111111111111"))
///     .beneficiary(address!("2222222222222222222222222222222222222222"))
///     .beneficiary_name("Green Corp")
///     .pool_token(PoolToken::Bct)
///     .build()?;
///
/// let outcome = pipeline.execute(&request, None).await?;
/// println!("deposit {} ended in {:?}", outcome.deposit_id, outcome.state);
/// # Ok(())
/// # }
/// ```
#[derive(Builder)]
pub struct RetirementPipeline<O, D, Q, S, N, K> {
    origin: O,
    destination: D,
    quotes: Q,
    deposit_status: S,
    notifier: N,
    clock: K,
    /// Facilitator contract on the destination chain
    facilitator: Address,
    #[builder(default = PollingConfig::receipts())]
    receipt_polling: PollingConfig,
    /// Polling for relayer fills; its total timeout is the abandonment deadline
    #[builder(default = PollingConfig::fills())]
    fill_polling: PollingConfig,
    /// Symbol used in notifications
    #[builder(into, default = "USDC".to_string())]
    token_symbol: String,
    #[builder(default = 6)]
    token_decimals: u8,
    /// JSON file the transaction history of every run is appended to
    #[builder(into)]
    history_path: Option<PathBuf>,
}

/// The confirmed origin-chain deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositReceipt {
    pub deposit_id: u32,
    pub tx_hash: TxHash,
}

/// Result of a retirement that got as far as a confirmed deposit
///
/// Once funds have left the origin chain the pipeline no longer returns
/// errors: a fill failure or a missed deadline is reported through
/// [`state`](Self::state) so the deposit id and transaction hash are never lost.
#[derive(Debug, Clone)]
pub struct RetirementOutcome {
    /// One of [`PipelineState::Filled`], [`PipelineState::Failed`] or [`PipelineState::Abandoned`]
    pub state: PipelineState,
    pub quote: Quote,
    pub deposit_id: u32,
    pub deposit_tx: TxHash,
    pub approve_tx: Option<TxHash>,
    pub fill_tx: Option<TxHash>,
    /// Explorer link to the deposit, for manual follow-up
    pub deposit_explorer_url: Option<String>,
    pub failure: Option<String>,
    /// Relay errors, which never fail a retirement
    pub notification_errors: Vec<String>,
    pub history: TransactionHistory,
}

/// Records transaction progress and forwards every change to an optional
/// progress channel.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    sender: Option<UnboundedSender<ProgressEvent>>,
    history: TransactionHistory,
    deposit_id: Option<u32>,
}

impl ProgressTracker {
    pub fn new(sender: Option<UnboundedSender<ProgressEvent>>) -> Self {
        Self {
            sender,
            history: TransactionHistory::new(),
            deposit_id: None,
        }
    }

    pub fn emit(&self, event: ProgressEvent) {
        if let Some(sender) = &self.sender {
            if sender.send(event).is_err() {
                trace!("progress receiver dropped");
            }
        }
    }

    /// Appends a pending record for `step` and returns its index
    pub fn start(&mut self, step: ProgressStep, chain_id: u64, now: u64) -> usize {
        let mut record = TransactionRecord::new(step, chain_id, now);
        if let Some(deposit_id) = self.deposit_id {
            record.set_deposit_id(deposit_id);
        }
        let index = self.history.push(record.clone());
        self.emit(ProgressEvent::Transaction(record));
        index
    }

    pub fn update(&mut self, index: usize, status: TxStatus, hash: Option<TxHash>, now: u64) {
        let Some(mut record) = self.history.records().get(index).cloned() else {
            return;
        };
        record.update(status, hash, now);
        self.history.replace(index, record.clone());
        self.emit(ProgressEvent::Transaction(record));
    }

    /// Tags this run's records, past and future, with its deposit id
    pub fn set_deposit_id(&mut self, deposit_id: u32) {
        self.deposit_id = Some(deposit_id);
        self.history.tag_deposit(deposit_id);
    }

    pub fn history(&self) -> &TransactionHistory {
        &self.history
    }
}

impl<O, D, Q, S, N, K> RetirementPipeline<O, D, Q, S, N, K>
where
    O: ChainClient,
    D: ChainClient,
    Q: QuoteProvider,
    S: DepositStatusProvider,
    N: NotificationRelay,
    K: Clock,
{
    pub fn facilitator(&self) -> Address {
        self.facilitator
    }

    pub fn fill_polling(&self) -> PollingConfig {
        self.fill_polling
    }

    /// Runs the whole retirement.
    ///
    /// Every state transition is sent on `progress` when a channel is given.
    ///
    /// # Errors
    ///
    /// Returns an error only before the deposit is confirmed: validation,
    /// quoting, approval, or a deposit that was rejected or reverted.
    /// A deposit that was broadcast but whose receipt or deposit id could not
    /// be read is [`DepositUnconfirmed`](OffsetZapError::DepositUnconfirmed),
    /// which carries the transaction hash and is never fatal before deposit.
    /// After a confirmed deposit the result is always `Ok`, with the final
    /// state in [`RetirementOutcome::state`].
    pub async fn execute(
        &self,
        request: &RetirementRequest,
        progress: Option<UnboundedSender<ProgressEvent>>,
    ) -> Result<RetirementOutcome> {
        let span = spans::execute_retirement(
            &request.origin_chain(),
            &request.destination_chain(),
            &request.input_amount(),
            &request.beneficiary(),
        );

        async move {
            let mut tracker = ProgressTracker::new(progress);

            match self.run(request, &mut tracker).await {
                Ok(outcome) => {
                    self.persist_history(&outcome.history);
                    info!(
                        deposit_id = outcome.deposit_id,
                        state = ?outcome.state,
                        event = "retirement_finished"
                    );
                    Ok(outcome)
                }
                Err(e) => {
                    spans::record_error(&e);
                    if let OffsetZapError::DepositUnconfirmed { deposit_tx, .. } = &e {
                        warn!(error = %e, event = "retirement_unconfirmed");
                        tracker.emit(ProgressEvent::Unconfirmed {
                            deposit_tx: *deposit_tx,
                        });
                    } else {
                        error!(error = %e, event = "retirement_failed");
                        tracker.emit(ProgressEvent::Failed {
                            reason: e.to_string(),
                        });
                    }
                    self.persist_history(tracker.history());
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        request: &RetirementRequest,
        tracker: &mut ProgressTracker,
    ) -> Result<RetirementOutcome> {
        tracker.emit(ProgressEvent::Quoting);
        self.check_beneficiary(request).await?;

        let quote = self.quote(request).await?;
        tracker.emit(ProgressEvent::Quoted {
            output_amount: quote.output_amount,
            total_relay_fee: quote.fees.total_relay_fee,
            estimated_fill_time_sec: quote.estimated_fill_time_sec,
        });

        let message = self.prepare_message(request, &quote)?;
        let approve_tx = self
            .approve_if_needed(request, quote.deposit.spoke_pool, tracker)
            .await?;
        let (quote, message) = self
            .requote_if_stale(request, quote, message, tracker)
            .await?;
        let deposit = self.deposit(request, &quote, &message, tracker).await?;
        tracker.set_deposit_id(deposit.deposit_id);

        let mut notification_errors = Vec::new();
        self.notify_logged(
            request,
            deposit.deposit_id,
            quote.output_amount,
            RetirementStatus::Initiated,
            Some(deposit.tx_hash),
            &mut notification_errors,
        )
        .await;

        tracker.emit(ProgressEvent::AwaitingFill {
            deposit_id: deposit.deposit_id,
            deposit_tx: deposit.tx_hash,
        });
        let fill_index = tracker.start(
            ProgressStep::Fill,
            self.destination.chain_id(),
            self.clock.unix_now(),
        );

        let (state, fill_tx, failure) = match self.await_fill(request, &deposit).await {
            Ok(fill_tx) => {
                tracker.update(
                    fill_index,
                    TxStatus::TxSuccess,
                    Some(fill_tx),
                    self.clock.unix_now(),
                );
                tracker.emit(ProgressEvent::Filled {
                    deposit_id: deposit.deposit_id,
                    fill_tx,
                });
                self.notify_logged(
                    request,
                    deposit.deposit_id,
                    quote.output_amount,
                    RetirementStatus::Completed,
                    Some(fill_tx),
                    &mut notification_errors,
                )
                .await;
                (PipelineState::Filled, Some(fill_tx), None)
            }
            Err(e @ OffsetZapError::FillDeadlineExceeded { .. }) => {
                // Fill status is unknown, so the record stays pending
                warn!(error = %e, event = "retirement_abandoned");
                tracker.emit(ProgressEvent::Abandoned {
                    deposit_id: deposit.deposit_id,
                    deposit_tx: deposit.tx_hash,
                });
                (PipelineState::Abandoned, None, Some(e.to_string()))
            }
            Err(e) => {
                error!(error = %e, event = "fill_failed");
                tracker.update(fill_index, TxStatus::Error, None, self.clock.unix_now());
                tracker.emit(ProgressEvent::Failed {
                    reason: e.to_string(),
                });
                self.notify_logged(
                    request,
                    deposit.deposit_id,
                    quote.output_amount,
                    RetirementStatus::Failed,
                    Some(deposit.tx_hash),
                    &mut notification_errors,
                )
                .await;
                (PipelineState::Failed, None, Some(e.to_string()))
            }
        };

        Ok(RetirementOutcome {
            state,
            deposit_id: deposit.deposit_id,
            deposit_tx: deposit.tx_hash,
            approve_tx,
            fill_tx,
            deposit_explorer_url: request
                .origin_chain()
                .explorer_tx_url(deposit.tx_hash)
                .ok(),
            failure,
            notification_errors,
            history: tracker.history().clone(),
            quote,
        })
    }

    /// Rejects beneficiaries that are contracts on the destination chain.
    ///
    /// Retirement certificates are issued to the beneficiary address, and a
    /// contract has no owner the certificate could be shown to.
    pub async fn check_beneficiary(&self, request: &RetirementRequest) -> Result<()> {
        let code = self.destination.get_code(request.beneficiary()).await?;
        if !code.is_empty() {
            return Err(OffsetZapError::InvalidBeneficiary {
                address: request.beneficiary(),
                reason: "address is a contract on the destination chain".to_string(),
            });
        }
        Ok(())
    }

    /// Fetches a quote and checks it can still be consumed.
    pub async fn quote(&self, request: &RetirementRequest) -> Result<Quote> {
        let span = spans::get_quote(
            &request.origin_chain(),
            &request.destination_chain(),
            &request.input_amount(),
        );

        async move {
            let quote = self.quotes.get_quote(request).await.inspect_err(|e| {
                spans::record_error(e);
            })?;
            quote.ensure_fresh(self.clock.unix_now())?;

            let spoke_pool = request.origin_chain().spoke_pool_address()?;
            if quote.deposit.spoke_pool != spoke_pool {
                return Err(OffsetZapError::QuoteUnavailable {
                    reason: format!(
                        "quote targets spoke pool {} instead of {spoke_pool}",
                        quote.deposit.spoke_pool
                    ),
                });
            }

            info!(
                input_amount = %quote.input_amount,
                output_amount = %quote.output_amount,
                total_relay_fee = %quote.fees.total_relay_fee,
                estimated_fill_time_sec = quote.estimated_fill_time_sec,
                event = "quote_accepted"
            );
            Ok(quote)
        }
        .instrument(span)
        .await
    }

    /// Encodes the destination message for the quote's output amount.
    ///
    /// Must be called again whenever the quote changes.
    pub fn prepare_message(
        &self,
        request: &RetirementRequest,
        quote: &Quote,
    ) -> Result<EncodedMessage> {
        let intent = request.intent()?;
        let message = encode_deposit_message(
            &intent,
            request.output_token(),
            quote.output_amount,
            self.facilitator,
            request.depositor(),
        );

        debug!(
            message_len = message.bytes().len(),
            output_amount = %message.output_amount(),
            event = "deposit_message_encoded"
        );
        Ok(message)
    }

    /// Replaces a quote that went stale while the approval was mining.
    ///
    /// The new quote goes through [`quote`](Self::quote) and must target the
    /// SpokePool that was approved. The message is re-encoded for its output
    /// amount, never reused.
    pub async fn requote_if_stale(
        &self,
        request: &RetirementRequest,
        quote: Quote,
        message: EncodedMessage,
        tracker: &ProgressTracker,
    ) -> Result<(Quote, EncodedMessage)> {
        let now = self.clock.unix_now();
        if !quote.is_expired(now) {
            return Ok((quote, message));
        }

        info!(
            quote_timestamp = quote.quote_timestamp(),
            now = now,
            event = "quote_stale_before_deposit"
        );
        let fresh = self.quote(request).await?;
        if fresh.deposit.spoke_pool != quote.deposit.spoke_pool {
            return Err(OffsetZapError::QuoteUnavailable {
                reason: format!(
                    "refreshed quote targets spoke pool {} but {} was approved",
                    fresh.deposit.spoke_pool, quote.deposit.spoke_pool
                ),
            });
        }
        tracker.emit(ProgressEvent::Quoted {
            output_amount: fresh.output_amount,
            total_relay_fee: fresh.fees.total_relay_fee,
            estimated_fill_time_sec: fresh.estimated_fill_time_sec,
        });

        let message = self.prepare_message(request, &fresh)?;
        Ok((fresh, message))
    }

    /// Approves `spender` for the input amount unless the allowance already covers it.
    ///
    /// Returns the approval transaction hash, or `None` when skipped.
    pub async fn approve_if_needed(
        &self,
        request: &RetirementRequest,
        spender: Address,
        tracker: &mut ProgressTracker,
    ) -> Result<Option<TxHash>> {
        let amount = request.input_amount();
        let state = TokenState::read(
            &self.origin,
            request.input_token(),
            request.depositor(),
            spender,
        )
        .await?;

        if !state.has_sufficient_balance(amount) {
            return Err(OffsetZapError::InsufficientFunds(format!(
                "balance {} is below the input amount {amount}",
                state.balance
            )));
        }

        if !state.needs_approval(amount) {
            info!(
                allowance = %state.allowance,
                amount = %amount,
                event = "approval_skipped"
            );
            return Ok(None);
        }

        let tx = approve_transaction(request.input_token(), request.depositor(), spender, amount);
        let receipt = self
            .send_and_confirm(&self.origin, tx, ProgressStep::Approve, tracker)
            .await?;
        Ok(Some(receipt.transaction_hash))
    }

    /// Sends `depositV3` and reads the deposit id from its receipt.
    ///
    /// The message must have been encoded for the quote's output amount and
    /// the quote must still be fresh.
    ///
    /// # Errors
    ///
    /// Once the transaction is broadcast, a missing receipt or a receipt
    /// without a deposit event is
    /// [`DepositUnconfirmed`](OffsetZapError::DepositUnconfirmed): funds may
    /// have left the origin chain. Only a reverted receipt proves they did not.
    pub async fn deposit(
        &self,
        request: &RetirementRequest,
        quote: &Quote,
        message: &EncodedMessage,
        tracker: &mut ProgressTracker,
    ) -> Result<DepositReceipt> {
        message.ensure_amount(quote.output_amount)?;
        quote.ensure_fresh(self.clock.unix_now())?;

        let args = DepositV3Args {
            depositor: request.depositor(),
            recipient: request.destination_chain().multicall_handler_address()?,
            input_token: request.input_token(),
            output_token: request.output_token(),
            input_amount: request.input_amount(),
            destination_chain_id: u64::from(request.destination_chain()),
            params: quote.deposit,
            message: message.clone(),
        };

        let (index, tx_hash) = self
            .broadcast(
                &self.origin,
                deposit_v3_transaction(&args),
                ProgressStep::Deposit,
                tracker,
            )
            .await?;

        // The record stays at TxSent: the deposit may still be mined
        let receipt = wait_for_receipt(&self.origin, &self.clock, self.receipt_polling, tx_hash)
            .await
            .map_err(|e| unconfirmed_deposit(tx_hash, e.to_string()))?;
        let receipt = self.check_receipt(receipt, index, ProgressStep::Deposit, tracker)?;

        let event = find_funds_deposited(&receipt.logs, quote.deposit.spoke_pool).ok_or_else(|| {
            spans::record_error_with_context(
                "FundsDepositedEventNotFound",
                "Deposit event not found in deposit receipt",
                Some(&format!("Receipt contained {} logs", receipt.logs.len())),
            );
            unconfirmed_deposit(
                tx_hash,
                format!(
                    "no deposit event among {} receipt logs",
                    receipt.logs.len()
                ),
            )
        })?;

        info!(
            deposit_id = event.deposit_id,
            tx_hash = %tx_hash,
            event = "deposit_confirmed"
        );
        Ok(DepositReceipt {
            deposit_id: event.deposit_id,
            tx_hash,
        })
    }

    /// Waits for a relayer to fill `deposit` on the destination chain.
    ///
    /// The Across status API only says where to look: a reported fill counts
    /// once its destination receipt succeeded and contains a fill event for
    /// this origin chain and deposit id. Status API failures are logged and
    /// retried.
    ///
    /// The deadline is the fill polling config's total timeout, measured on
    /// the clock from the first poll. Rate-limit backoffs and time spent in
    /// calls count against it, and no sleep runs past it.
    ///
    /// # Errors
    ///
    /// - [`FillFailed`](OffsetZapError::FillFailed) when the deposit expired or was refunded
    /// - [`FillDeadlineExceeded`](OffsetZapError::FillDeadlineExceeded) when no fill was
    ///   confirmed before the deadline
    pub async fn await_fill(
        &self,
        request: &RetirementRequest,
        deposit: &DepositReceipt,
    ) -> Result<TxHash> {
        let origin_chain_id = u64::from(request.origin_chain());
        let polling = self.fill_polling;
        let span = spans::await_fill(
            deposit.deposit_id,
            origin_chain_id,
            polling.max_attempts,
            polling.poll_interval_secs,
        );

        async move {
            let destination_spoke_pool = request.destination_chain().spoke_pool_address()?;
            let poll_interval = Duration::from_secs(polling.poll_interval_secs);
            let deadline = self.clock.now() + Duration::from_secs(polling.total_timeout_secs());
            let mut attempt = 0u32;

            while self.clock.now() < deadline {
                attempt += 1;
                let wait = match self
                    .deposit_status
                    .get_deposit_status(origin_chain_id, deposit.deposit_id)
                    .await
                {
                    Ok(response) => match response.status {
                        DepositStatus::Filled => match response.fill_tx {
                            Some(fill_tx) => {
                                if self
                                    .verify_fill(
                                        destination_spoke_pool,
                                        origin_chain_id,
                                        deposit.deposit_id,
                                        fill_tx,
                                    )
                                    .await
                                {
                                    info!(fill_tx = %fill_tx, attempt = attempt, event = "fill_confirmed");
                                    return Ok(fill_tx);
                                }
                                poll_interval
                            }
                            None => {
                                debug!(attempt = attempt, event = "fill_reported_without_tx");
                                poll_interval
                            }
                        },
                        DepositStatus::Expired | DepositStatus::Refunded => {
                            spans::record_error_with_context(
                                "FillFailed",
                                &format!("Deposit {} was not filled", deposit.deposit_id),
                                Some(&format!("Across reported {:?}", response.status)),
                            );
                            return Err(OffsetZapError::FillFailed {
                                deposit_id: deposit.deposit_id,
                                reason: format!("deposit {:?}", response.status).to_lowercase(),
                            });
                        }
                        DepositStatus::Pending | DepositStatus::SlowFillRequested => {
                            debug!(attempt = attempt, status = ?response.status, event = "fill_pending");
                            poll_interval
                        }
                    },
                    Err(OffsetZapError::RateLimitExceeded {
                        retry_after_seconds,
                    }) => {
                        warn!(
                            retry_after_seconds = retry_after_seconds,
                            attempt = attempt,
                            event = "deposit_status_rate_limited"
                        );
                        Duration::from_secs(retry_after_seconds)
                    }
                    Err(e) => {
                        warn!(error = %e, attempt = attempt, event = "deposit_status_failed");
                        poll_interval
                    }
                };

                let remaining = deadline.saturating_duration_since(self.clock.now());
                self.clock.sleep(wait.min(remaining)).await;
            }

            spans::record_error_with_context(
                "FillDeadlineExceeded",
                &format!(
                    "No fill confirmed for deposit {} after {attempt} attempts",
                    deposit.deposit_id
                ),
                Some(&format!(
                    "Total duration: {} seconds",
                    polling.total_timeout_secs()
                )),
            );
            Err(OffsetZapError::FillDeadlineExceeded {
                deposit_id: deposit.deposit_id,
                deposit_tx: deposit.tx_hash,
            })
        }
        .instrument(span)
        .await
    }

    /// Sends one retirement notification for `deposit_id`.
    pub async fn notify(
        &self,
        request: &RetirementRequest,
        deposit_id: u32,
        amount: U256,
        status: RetirementStatus,
        transaction_hash: Option<TxHash>,
    ) -> Result<()> {
        let notification = RetirementNotification::new(
            request.depositor(),
            deposit_id.to_string(),
            amount,
            self.token_decimals,
            self.token_symbol.clone(),
            status,
            transaction_hash,
        )?;

        self.notifier
            .notify_retirement(&notification)
            .instrument(spans::notify(status, deposit_id))
            .await
    }

    async fn notify_logged(
        &self,
        request: &RetirementRequest,
        deposit_id: u32,
        amount: U256,
        status: RetirementStatus,
        transaction_hash: Option<TxHash>,
        errors: &mut Vec<String>,
    ) {
        if let Err(e) = self
            .notify(request, deposit_id, amount, status, transaction_hash)
            .await
        {
            warn!(
                error = %e,
                deposit_id = deposit_id,
                status = %status,
                event = "notification_failed"
            );
            errors.push(e.to_string());
        }
    }

    async fn verify_fill(
        &self,
        spoke_pool: Address,
        origin_chain_id: u64,
        deposit_id: u32,
        fill_tx: TxHash,
    ) -> bool {
        match self.destination.get_transaction_receipt(fill_tx).await {
            Ok(Some(receipt)) if receipt.success => {
                let found =
                    find_filled_relay(&receipt.logs, spoke_pool, origin_chain_id, deposit_id)
                        .is_some();
                if !found {
                    warn!(fill_tx = %fill_tx, event = "fill_event_missing");
                }
                found
            }
            Ok(Some(_)) => {
                warn!(fill_tx = %fill_tx, event = "fill_transaction_reverted");
                false
            }
            Ok(None) => {
                debug!(fill_tx = %fill_tx, event = "fill_receipt_pending");
                false
            }
            Err(e) => {
                warn!(error = %e, fill_tx = %fill_tx, event = "fill_receipt_lookup_failed");
                false
            }
        }
    }

    /// Broadcasts `tx` and waits for a successful receipt, tracking the step.
    async fn send_and_confirm<C: ChainClient>(
        &self,
        client: &C,
        tx: TransactionRequest,
        step: ProgressStep,
        tracker: &mut ProgressTracker,
    ) -> Result<ReceiptSummary> {
        let (index, tx_hash) = self.broadcast(client, tx, step, tracker).await?;

        let receipt =
            match wait_for_receipt(client, &self.clock, self.receipt_polling, tx_hash).await {
                Ok(receipt) => receipt,
                Err(e) => {
                    tracker.update(index, TxStatus::Error, None, self.clock.unix_now());
                    return Err(e);
                }
            };
        self.check_receipt(receipt, index, step, tracker)
    }

    /// Sends `tx`, returning the history index of its record and its hash.
    async fn broadcast<C: ChainClient>(
        &self,
        client: &C,
        tx: TransactionRequest,
        step: ProgressStep,
        tracker: &mut ProgressTracker,
    ) -> Result<(usize, TxHash)> {
        let index = tracker.start(step, client.chain_id(), self.clock.unix_now());
        debug!(step = %step, event = "transaction_submitting");

        let tx_hash = match client.send_transaction(tx).await {
            Ok(tx_hash) => tx_hash,
            Err(e) => {
                tracker.update(index, TxStatus::Error, None, self.clock.unix_now());
                return Err(e);
            }
        };
        tracker.update(index, TxStatus::TxSent, Some(tx_hash), self.clock.unix_now());
        info!(tx_hash = %tx_hash, step = %step, event = "transaction_sent");
        Ok((index, tx_hash))
    }

    /// Fails on a reverted receipt, otherwise marks the step successful.
    fn check_receipt(
        &self,
        receipt: ReceiptSummary,
        index: usize,
        step: ProgressStep,
        tracker: &mut ProgressTracker,
    ) -> Result<ReceiptSummary> {
        let tx_hash = receipt.transaction_hash;
        if !receipt.success {
            tracker.update(index, TxStatus::Error, None, self.clock.unix_now());
            spans::record_error_with_context(
                "TransactionReverted",
                &format!("{step} transaction {tx_hash} reverted"),
                None,
            );
            return Err(OffsetZapError::TransactionReverted {
                tx_hash,
                step: step.as_str(),
            });
        }

        tracker.update(index, TxStatus::TxSuccess, None, self.clock.unix_now());
        Ok(receipt)
    }

    fn persist_history(&self, history: &TransactionHistory) {
        let Some(path) = &self.history_path else {
            return;
        };

        let result = TransactionHistory::load(path).and_then(|mut existing| {
            existing.extend(history.clone());
            existing.save(path)
        });
        if let Err(e) = result {
            warn!(error = %e, path = %path.display(), event = "history_persist_failed");
        }
    }
}

fn unconfirmed_deposit(deposit_tx: TxHash, reason: String) -> OffsetZapError {
    warn!(deposit_tx = %deposit_tx, reason = %reason, event = "deposit_unconfirmed");
    OffsetZapError::DepositUnconfirmed { deposit_tx, reason }
}
