//! Production implementations of the trait abstractions.
//!
//! This module provides the "real" implementations of the traits defined in
//! [`crate::traits`] that talk to actual chains over JSON-RPC, the Across
//! API, the notification relay and the system clock.
//!
//! Applications will typically use these providers, while test code uses
//! the fakes in [`crate::testing`].

mod across;
mod alloy;
mod cached_quote;
mod notify;
mod tokio_clock;

pub use self::across::{AcrossApiProvider, ACROSS_API, ACROSS_API_TESTNET};
pub use self::alloy::AlloyChainClient;
pub use self::cached_quote::{CachedQuoteProvider, MAX_CACHED_QUOTE_AGE_SECS};
pub use self::notify::{HttpNotificationRelay, DEFAULT_NOTIFICATION_URL};
pub use self::tokio_clock::TokioClock;
