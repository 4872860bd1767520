//! Across API provider implementation.

use alloy_primitives::Address;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, error, instrument, trace, Instrument};
use url::Url;

use crate::chain::AcrossChain;
use crate::error::{OffsetZapError, Result};
use crate::protocol::{
    encode_deposit_message, DepositStatusResponse, Quote, RetirementRequest, SuggestedFeesResponse,
};
use crate::spans;
use crate::traits::{DepositStatusProvider, QuoteProvider};

/// Across mainnet API
pub const ACROSS_API: &str = "https://app.across.to/api";

/// Across testnet API
pub const ACROSS_API_TESTNET: &str = "https://testnet.across.to/api";

const SUGGESTED_FEES_PATH: &str = "/suggested-fees";
const DEPOSIT_STATUS_PATH: &str = "/deposit/status";

/// Retry-After fallback when the API rate limits without saying for how long
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Production quote and deposit status provider using the Across API.
///
/// # Examples
///
/// ```rust,no_run
/// use offsetzap_rs::providers::AcrossApiProvider;
/// use alloy_primitives::address;
///
/// let across = AcrossApiProvider::production()
///     .with_facilitator(address!("4444444444444444444444444444444444444444"));
/// ```
#[derive(Debug, Clone)]
pub struct AcrossApiProvider {
    base_url: String,
    client: Client,
    facilitator: Option<Address>,
}

impl AcrossApiProvider {
    /// Creates a new Across API provider.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the API including the `/api` prefix
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
            facilitator: None,
        }
    }

    /// Prices quotes for deposits whose message calls `facilitator`.
    ///
    /// Without it the API prices a plain transfer to the handler, which
    /// underestimates the relayer's gas for the retirement calls.
    pub fn with_facilitator(mut self, facilitator: Address) -> Self {
        self.facilitator = Some(facilitator);
        self
    }

    pub fn production() -> Self {
        Self::new(ACROSS_API)
    }

    pub fn testnet() -> Self {
        Self::new(ACROSS_API_TESTNET)
    }

    /// Builds the `suggested-fees` URL for a request.
    ///
    /// The recipient is the destination multicall handler, since that is the
    /// contract the relayer fills into and whose execution it prices. With a
    /// facilitator configured, `message` carries the retirement instructions
    /// encoded for the input amount: the real message differs only in the
    /// amount words, so it simulates at the same size and gas.
    pub fn suggested_fees_url(&self, request: &RetirementRequest) -> Result<Url> {
        let recipient = request.destination_chain().multicall_handler_address()?;
        let mut url = self.endpoint(SUGGESTED_FEES_PATH)?;
        url.query_pairs_mut()
            .append_pair("inputToken", &request.input_token().to_string())
            .append_pair("outputToken", &request.output_token().to_string())
            .append_pair(
                "originChainId",
                &u64::from(request.origin_chain()).to_string(),
            )
            .append_pair(
                "destinationChainId",
                &u64::from(request.destination_chain()).to_string(),
            )
            .append_pair("amount", &request.input_amount().to_string())
            .append_pair("recipient", &recipient.to_string());

        if let Some(facilitator) = self.facilitator {
            let message = encode_deposit_message(
                &request.intent()?,
                request.output_token(),
                request.input_amount(),
                facilitator,
                request.depositor(),
            );
            url.query_pairs_mut()
                .append_pair("message", &message.bytes().to_string());
        }
        Ok(url)
    }

    /// Builds the `deposit/status` URL for a deposit.
    pub fn deposit_status_url(&self, origin_chain_id: u64, deposit_id: u32) -> Result<Url> {
        let mut url = self.endpoint(DEPOSIT_STATUS_PATH)?;
        url.query_pairs_mut()
            .append_pair("originChainId", &origin_chain_id.to_string())
            .append_pair("depositId", &deposit_id.to_string());
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}{path}", self.base_url)).map_err(|e| OffsetZapError::InvalidUrl {
            reason: format!("Failed to construct Across API URL: {e}"),
        })
    }

    async fn get(&self, url: &Url) -> Result<Response> {
        trace!(url = %url, "Requesting Across API");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .instrument(spans::http_request("GET", url))
            .await
            .map_err(OffsetZapError::Network)?;

        trace!(status_code = %response.status(), "Received response from Across API");

        // Handle rate limiting - extract Retry-After header if present
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

            debug!(retry_after_seconds = retry_after, "Rate limit exceeded");
            return Err(OffsetZapError::RateLimitExceeded {
                retry_after_seconds: retry_after,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl QuoteProvider for AcrossApiProvider {
    #[instrument(skip(self, request), fields(
        origin_chain = %request.origin_chain(),
        destination_chain = %request.destination_chain(),
        amount = %request.input_amount(),
    ))]
    async fn get_quote(&self, request: &RetirementRequest) -> Result<Quote> {
        let url = self.suggested_fees_url(request)?;
        let response = self.get(&url).await?;

        let status_code = response.status();
        let body = response.text().await.map_err(OffsetZapError::Network)?;

        // The API reports unsupported routes and bad amounts as 4xx with a message body
        if !status_code.is_success() {
            error!(
                status_code = %status_code,
                response_body = %body,
                event = "suggested_fees_rejected"
            );
            return Err(OffsetZapError::QuoteUnavailable {
                reason: format!("Across API returned {status_code}: {body}"),
            });
        }

        let fees: SuggestedFeesResponse =
            serde_json::from_str(&body).map_err(|e| OffsetZapError::QuoteUnavailable {
                reason: format!("malformed suggested-fees response: {e}"),
            })?;

        let quote = fees.into_quote(request.input_amount())?;
        debug!(
            output_amount = %quote.output_amount,
            total_relay_fee = %quote.fees.total_relay_fee,
            quote_timestamp = quote.quote_timestamp(),
            event = "quote_received"
        );
        Ok(quote)
    }
}

#[async_trait]
impl DepositStatusProvider for AcrossApiProvider {
    #[instrument(skip(self))]
    async fn get_deposit_status(
        &self,
        origin_chain_id: u64,
        deposit_id: u32,
    ) -> Result<DepositStatusResponse> {
        let url = self.deposit_status_url(origin_chain_id, deposit_id)?;
        let response = self.get(&url).await?;

        // Handle 404 - the indexer has not seen the deposit yet
        if response.status() == StatusCode::NOT_FOUND {
            debug!("Deposit not indexed yet");
            return Ok(DepositStatusResponse::pending());
        }

        if !response.status().is_success() {
            return Err(OffsetZapError::Monitoring(format!(
                "deposit status returned {}",
                response.status()
            )));
        }

        let status: DepositStatusResponse = response
            .json()
            .await
            .map_err(|e| OffsetZapError::Monitoring(format!("malformed deposit status: {e}")))?;
        debug!(status = ?status.status, "Deposit status parsed");

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::multicall_handler::Instructions;
    use alloy_chains::NamedChain;
    use alloy_primitives::{address, Bytes, U256};
    use alloy_sol_types::SolValue;

    const FACILITATOR: Address = address!("4444444444444444444444444444444444444444");

    fn request() -> RetirementRequest {
        RetirementRequest::builder()
            .origin_chain(NamedChain::Base)
            .destination_chain(NamedChain::Polygon)
            .input_amount(U256::from(10_000_000u64))
            .depositor(address!("1111111111111111111111111111111111111111"))
            .beneficiary(address!("2222222222222222222222222222222222222222"))
            .beneficiary_name("Alice")
            .pool_token(crate::PoolToken::Bct)
            .build()
            .unwrap()
    }

    #[test]
    fn test_suggested_fees_url() {
        let url = AcrossApiProvider::production()
            .suggested_fees_url(&request())
            .unwrap();

        insta::assert_snapshot!(url.as_str(), @"https://app.across.to/api/suggested-fees?inputToken=0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913&outputToken=0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359&originChainId=8453&destinationChainId=137&amount=10000000&recipient=0x924a9f036260DdD5808007E1AA95f08eD08aA569");
    }

    #[test]
    fn test_suggested_fees_url_carries_retirement_message() {
        let url = AcrossApiProvider::production()
            .with_facilitator(FACILITATOR)
            .suggested_fees_url(&request())
            .unwrap();

        let keys: Vec<_> = url.query_pairs().map(|(key, _)| key.into_owned()).collect();
        insta::assert_snapshot!(keys.join(","), @"inputToken,outputToken,originChainId,destinationChainId,amount,recipient,message");

        let message: Bytes = url
            .query_pairs()
            .find(|(key, _)| key == "message")
            .map(|(_, value)| value.parse().unwrap())
            .unwrap();
        let instructions = Instructions::abi_decode(&message).unwrap();
        assert_eq!(instructions.calls.len(), 2);
        assert_eq!(instructions.calls[1].target, FACILITATOR);
        assert_eq!(
            instructions.fallbackRecipient,
            address!("1111111111111111111111111111111111111111")
        );
    }

    #[test]
    fn test_deposit_status_url_trims_trailing_slash() {
        let url = AcrossApiProvider::new("https://app.across.to/api/")
            .deposit_status_url(8453, 4242)
            .unwrap();

        insta::assert_snapshot!(url.as_str(), @"https://app.across.to/api/deposit/status?originChainId=8453&depositId=4242");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = AcrossApiProvider::new("not a url").deposit_status_url(1, 1);
        assert!(matches!(result, Err(OffsetZapError::InvalidUrl { .. })));
    }
}
