//! Column family names used to partition the key space by subsystem.

/// Block headers and bodies, keyed by big-endian height.
pub const CF_BLOCKS: &str = "blocks";
/// Account balances/stake/nonce, keyed by address.
pub const CF_ACCOUNTS: &str = "accounts";
/// Validator registry entries, keyed by address.
pub const CF_VALIDATORS: &str = "validators";
/// Pending/processed unstake queue entries, keyed by
/// `height ‖ validator`.
pub const CF_UNSTAKE_QUEUE: &str = "unstake_queue";
/// Observed string-form nonces within the replay retention window,
/// keyed by `sender ‖ nonce`.
pub const CF_NONCES: &str = "nonces";
/// Chain metadata: tip height, tip hash, finalized height.
pub const CF_METADATA: &str = "metadata";
/// Rolling window of double-sign evidence timestamps per validator,
/// keyed by address, used to decide tombstoning.
pub const CF_SLASH_HISTORY: &str = "slash_history";

/// All column families the node opens at startup.
pub const ALL: &[&str] = &[
    CF_BLOCKS,
    CF_ACCOUNTS,
    CF_VALIDATORS,
    CF_UNSTAKE_QUEUE,
    CF_NONCES,
    CF_METADATA,
    CF_SLASH_HISTORY,
];
