//! One module per end-to-end scenario from the contract's testable
//! properties section.

pub mod double_spend_prevention;
pub mod genesis_and_first_block;
pub mod halving;
pub mod replay;
pub mod slashing;
pub mod unauthorized_system_credit;
pub mod unstake_rate_limit;
