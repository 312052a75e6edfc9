//! # BT2C Block Validator/Applier
//!
//! End-to-end checks on an incoming block — structural, transactional,
//! economic — followed by fork-choice and atomic commit through
//! `bt2c_state::StateMachine` and `bt2c_store::Store`.

#![warn(missing_docs)]

pub mod applier;
pub mod chain;
pub mod errors;
pub mod finality;
pub mod fork_choice;
pub mod validation;

pub use applier::{genesis_committed, Applier, ApplyOutcome, MempoolPort};
pub use chain::{ChainEntry, ChainState};
pub use errors::{ApplierError, ValidationError};
pub use finality::FinalityTracker;
pub use fork_choice::HeadDecision;
