//! Quote caching wrapper.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::protocol::{Quote, RetirementRequest, QUOTE_VALIDITY_SECS};
use crate::traits::{Clock, QuoteProvider};

/// Oldest quote the cache hands out.
///
/// Half the validity window, so a served quote survives an approval being
/// mined before the deposit consumes it.
pub const MAX_CACHED_QUOTE_AGE_SECS: u64 = QUOTE_VALIDITY_SECS / 2;

/// Everything that determines a route's fee structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RouteKey {
    origin_chain_id: u64,
    destination_chain_id: u64,
    input_token: Address,
    output_token: Address,
    input_amount: U256,
}

impl From<&RetirementRequest> for RouteKey {
    fn from(request: &RetirementRequest) -> Self {
        Self {
            origin_chain_id: u64::from(request.origin_chain()),
            destination_chain_id: u64::from(request.destination_chain()),
            input_token: request.input_token(),
            output_token: request.output_token(),
            input_amount: request.input_amount(),
        }
    }
}

/// Serves the same quote for the same route and amount for up to
/// [`MAX_CACHED_QUOTE_AGE_SECS`].
///
/// Two requests made inside that window therefore see an identical fee
/// structure, and the upstream API is hit once per window. Older entries are
/// evicted on every lookup.
///
/// # Examples
///
/// ```rust
/// use offsetzap_rs::providers::{AcrossApiProvider, CachedQuoteProvider, TokioClock};
///
/// let quotes = CachedQuoteProvider::new(AcrossApiProvider::production(), TokioClock::new());
/// ```
#[derive(Debug)]
pub struct CachedQuoteProvider<Q, C> {
    inner: Q,
    clock: C,
    cache: Mutex<HashMap<RouteKey, Quote>>,
}

impl<Q, C> CachedQuoteProvider<Q, C>
where
    Q: QuoteProvider,
    C: Clock,
{
    pub fn new(inner: Q, clock: C) -> Self {
        Self {
            inner,
            clock,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of routes currently cached
    pub async fn len(&self) -> usize {
        self.cache.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.lock().await.is_empty()
    }
}

fn is_servable(quote: &Quote, now: u64) -> bool {
    now.saturating_sub(quote.quote_timestamp()) <= MAX_CACHED_QUOTE_AGE_SECS
}

#[async_trait]
impl<Q, C> QuoteProvider for CachedQuoteProvider<Q, C>
where
    Q: QuoteProvider,
    C: Clock,
{
    async fn get_quote(&self, request: &RetirementRequest) -> Result<Quote> {
        let key = RouteKey::from(request);
        let now = self.clock.unix_now();

        {
            let mut cache = self.cache.lock().await;
            cache.retain(|_, quote| is_servable(quote, now));
            if let Some(quote) = cache.get(&key) {
                debug!(
                    quote_timestamp = quote.quote_timestamp(),
                    event = "quote_cache_hit"
                );
                return Ok(quote.clone());
            }
        }

        let quote = self.inner.get_quote(request).await?;
        debug!(
            quote_timestamp = quote.quote_timestamp(),
            event = "quote_cache_miss"
        );
        self.cache.lock().await.insert(key, quote.clone());
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        sample_quote, sample_request, FakeClock, FakeQuoteProvider, BENEFICIARY, DEPOSITOR,
    };
    use crate::PoolToken;
    use alloy_chains::NamedChain;
    use rstest::rstest;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_route_within_window_is_served_from_cache() {
        let clock = FakeClock::at_unix(1_700_000_000);
        let upstream = FakeQuoteProvider::new(sample_quote(1_700_000_000));
        let provider = CachedQuoteProvider::new(upstream.clone(), clock.clone());
        let request = sample_request();

        let first = provider.get_quote(&request).await.unwrap();
        clock.advance(Duration::from_secs(120));
        let second = provider.get_quote(&request).await.unwrap();

        assert_eq!(first.fees, second.fees);
        assert_eq!(first, second);
        assert_eq!(upstream.call_count(), 1);
    }

    #[rstest]
    #[case::past_half_window(MAX_CACHED_QUOTE_AGE_SECS + 1)]
    #[case::expired(QUOTE_VALIDITY_SECS + 1)]
    #[tokio::test]
    async fn test_aged_quote_is_refetched(#[case] age: u64) {
        let clock = FakeClock::at_unix(1_700_000_000);
        let upstream = FakeQuoteProvider::new(sample_quote(1_700_000_000));
        let provider = CachedQuoteProvider::new(upstream.clone(), clock.clone());
        let request = sample_request();

        provider.get_quote(&request).await.unwrap();
        clock.advance(Duration::from_secs(age));
        upstream.set_quote(sample_quote(1_700_000_000 + age));
        let quote = provider.get_quote(&request).await.unwrap();

        assert_eq!(upstream.call_count(), 2);
        assert_eq!(quote.quote_timestamp(), 1_700_000_000 + age);
    }

    #[tokio::test]
    async fn test_stale_routes_are_evicted_on_lookup() {
        let clock = FakeClock::at_unix(1_700_000_000);
        let upstream = FakeQuoteProvider::new(sample_quote(1_700_000_000));
        let provider = CachedQuoteProvider::new(upstream.clone(), clock.clone());

        provider.get_quote(&sample_request()).await.unwrap();
        assert_eq!(provider.len().await, 1);

        clock.advance(Duration::from_secs(600));
        upstream.set_quote(sample_quote(1_700_000_600));
        let other_route = RetirementRequest::builder()
            .origin_chain(NamedChain::Base)
            .destination_chain(NamedChain::Polygon)
            .input_amount(U256::from(25_000_000u64))
            .depositor(DEPOSITOR)
            .beneficiary(BENEFICIARY)
            .beneficiary_name("Green Corp")
            .pool_token(PoolToken::Nct)
            .build()
            .unwrap();
        provider.get_quote(&other_route).await.unwrap();

        // Only the route just quoted is left
        assert_eq!(provider.len().await, 1);
    }
}
