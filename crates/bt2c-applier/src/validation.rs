//! Structural, transactional, and economic checks run on an incoming
//! block before it ever reaches the State Machine (§4.7, steps 1-3).

use bt2c_crypto::{Address, Hash};
use bt2c_ledger::{Block, Transaction, TransactionType, Validator, ValidatorStatus};
use bt2c_registry::select_producer;
use bt2c_state::ApplyContext;

use crate::errors::ValidationError;

/// The block this candidate claims to extend.
pub struct ParentInfo {
    /// Parent's own hash.
    pub hash: Hash,
    /// Parent's height.
    pub height: u64,
}

/// Run every structural check from §4.7 step 1 against `block`,
/// assuming it claims to extend `parent` and that `producer` is
/// `block.validator`'s current registry record.
pub fn validate_structural(
    block: &Block,
    parent: &ParentInfo,
    producer: &Validator,
    active_validators: &[Validator],
) -> Result<(), ValidationError> {
    if block.previous_hash != parent.hash {
        return Err(ValidationError::WrongParent {
            expected: parent.hash,
            got: block.previous_hash,
        });
    }
    if block.height != parent.height + 1 {
        return Err(ValidationError::WrongHeight {
            expected: parent.height + 1,
            got: block.height,
        });
    }
    if block.verify_hash().is_err() {
        return Err(ValidationError::HashMismatch);
    }
    let signature = block
        .signature
        .as_ref()
        .ok_or(ValidationError::BadBlockSignature(block.validator))?;
    if producer.public_key.verify(&block.hash, signature).is_err() {
        return Err(ValidationError::BadBlockSignature(block.validator));
    }
    if !matches!(producer.status, ValidatorStatus::Active) {
        return Err(ValidationError::ValidatorNotActive(block.validator));
    }

    let expected = select_producer(active_validators, parent.hash, block.height)
        .ok_or(ValidationError::NoEligibleProducer)?;
    if expected != block.validator {
        return Err(ValidationError::WrongProducer {
            expected,
            got: block.validator,
        });
    }
    Ok(())
}

/// Run every transactional check from §4.7 step 2: per-transaction
/// hash/signature validity and the block's Merkle root.
pub fn validate_transactional(block: &Block) -> Result<(), ValidationError> {
    if block.verify_merkle_root().is_err() {
        return Err(ValidationError::MerkleMismatch);
    }
    for tx in &block.transactions {
        if bt2c_ledger::encoding::tx_hash(tx) != tx.hash() {
            return Err(ValidationError::TransactionHashMismatch);
        }
        if !tx.verify_signature() {
            return Err(ValidationError::TransactionBadSignature);
        }
    }
    Ok(())
}

/// Run the economic check from §4.7 step 3: the declared reward
/// matches the halving schedule, and the block carries exactly one
/// `Reward`/`Genesis`-kind transaction, addressed to the producer for
/// that exact amount. Any other shape — a second system credit, one
/// routed to somebody else, a stray `Genesis` transaction outside the
/// genesis block — is how a producer would mint currency outside the
/// schedule, so it is rejected rather than merely ignored.
pub fn validate_economic(block: &Block, ctx: &ApplyContext) -> Result<(), ValidationError> {
    if block.is_genesis() {
        return Ok(());
    }
    let expected = bt2c_state::issuance::block_reward(block.height, ctx.block_time_secs, ctx.halving_seconds);
    if block.reward != expected {
        return Err(ValidationError::RewardMismatch {
            expected,
            got: block.reward,
        });
    }

    let system_credits: Vec<&Transaction> = block
        .transactions
        .iter()
        .filter(|tx| matches!(tx.kind, TransactionType::Reward | TransactionType::Genesis))
        .collect();
    let [credit] = system_credits.as_slice() else {
        return Err(ValidationError::UnauthorizedSystemCredit);
    };
    if credit.kind != TransactionType::Reward || credit.recipient != block.validator {
        return Err(ValidationError::UnauthorizedSystemCredit);
    }
    if credit.amount != expected {
        return Err(ValidationError::RewardMismatch {
            expected,
            got: credit.amount,
        });
    }
    Ok(())
}

/// True if `candidate` and `existing` are two distinct blocks at the
/// same height signed by the same validator address — the double-sign
/// condition (§4.7 failure semantics).
pub fn is_double_sign(candidate: &Block, existing_validator: Address, existing_height: u64, existing_hash: Hash) -> bool {
    candidate.validator == existing_validator
        && candidate.height == existing_height
        && candidate.hash != existing_hash
}
