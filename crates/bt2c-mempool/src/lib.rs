//! # BT2C Mempool
//!
//! Maintains admissible pending transactions and selects an ordered
//! batch for the Block Producer. Talks to ledger state only through
//! the [`state_provider::StateProvider`] port, and never blocks on
//! DoS-guard rate limiting — that check is a plain yes/no consult of
//! the [`rate_limiter::RateLimiter`] port.

#![warn(missing_docs)]

pub mod errors;
pub mod pool;
pub mod priced;
pub mod rate_limiter;
pub mod state_provider;
pub mod status;

pub use errors::AdmitError;
pub use pool::Mempool;
pub use priced::PricedTransaction;
pub use rate_limiter::{NoopLimiter, RateLimiter, TokenBucketLimiter};
pub use state_provider::StateProvider;
pub use status::MempoolStatus;
