//! Transactions: transfers, stakes, unstakes, rewards, and genesis credits.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::errors::LedgerError;
use bt2c_crypto::{Address, Hash, PublicKey, Signature};

/// Minimum byte length of a string-form nonce (design notes §9).
pub const MIN_STRING_NONCE_LEN: usize = 16;

/// A transaction nonce.
///
/// Per design notes §9, the canonical form is a per-sender monotonic
/// `u64`, checked against `Account.next_nonce` with no gaps allowed. A
/// string-form nonce is still accepted on the wire, but only when it is
/// also globally unique within the replay window; implementations should
/// prefer the sequential form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nonce {
    /// Per-sender monotonic counter, starting at 0.
    Sequential(u64),
    /// An opaque, globally-unique byte string of at least
    /// [`MIN_STRING_NONCE_LEN`] bytes.
    Unique(Vec<u8>),
}

impl Nonce {
    /// Validate the nonce's shape (not its uniqueness, which requires
    /// Store access).
    pub fn validate(&self) -> Result<(), LedgerError> {
        match self {
            Nonce::Sequential(_) => Ok(()),
            Nonce::Unique(bytes) if bytes.len() >= MIN_STRING_NONCE_LEN => Ok(()),
            Nonce::Unique(bytes) => Err(LedgerError::NonceTooShort {
                min: MIN_STRING_NONCE_LEN,
                actual: bytes.len(),
            }),
        }
    }

    /// Canonical byte encoding used inside the transaction hash (length
    /// prefixed, per the transaction byte layout).
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Nonce::Sequential(n) => n.to_be_bytes().to_vec(),
            Nonce::Unique(bytes) => bytes.clone(),
        }
    }
}

/// The kind of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TransactionType {
    /// A value transfer between two accounts.
    Transfer = 0,
    /// Locks funds into the sender's validator stake.
    Stake = 1,
    /// Requests withdrawal of staked funds via the unstake queue.
    Unstake = 2,
    /// A block reward credit; only injectable by the block-production
    /// path, never admitted from the mempool.
    Reward = 3,
    /// A genesis distribution credit; only valid in the genesis block.
    Genesis = 4,
}

/// A ledger transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// The kind of transaction.
    pub kind: TransactionType,
    /// Sending address. For `Reward`/`Genesis`, this is
    /// [`Address::system`].
    pub sender: Address,
    /// Receiving address.
    pub recipient: Address,
    /// Amount transferred/staked/unstaked/rewarded; must be > 0 except
    /// for stake transactions, which may stake 0 (a no-op registration
    /// touch).
    pub amount: Amount,
    /// Flat fee paid to the block's validator.
    pub fee: Amount,
    /// Replay-protection nonce.
    pub nonce: Nonce,
    /// Unix timestamp (seconds) at which the client created this
    /// transaction.
    pub timestamp: u64,
    /// Opaque client memo; never interpreted by consensus.
    pub payload: Vec<u8>,
    /// Sender's public key, carried alongside the signature so a node
    /// can verify a first-seen address without a prior registration
    /// step (ed25519 signatures are not recoverable). Excluded from
    /// the canonical hash, like `signature`. Absent for
    /// `Reward`/`Genesis` transactions.
    pub sender_public_key: Option<PublicKey>,
    /// Sender's signature over `tx_hash(self)`; absent for
    /// `Reward`/`Genesis` transactions, which are not client-originated.
    pub signature: Option<Signature>,
}

impl Transaction {
    /// Structural validation independent of any ledger state: positive
    /// amount (for non-stake kinds) and well-formed nonce.
    pub fn validate_shape(&self) -> Result<(), LedgerError> {
        self.nonce.validate()?;
        let needs_positive_amount = !matches!(self.kind, TransactionType::Stake);
        if needs_positive_amount && self.amount.is_zero() {
            return Err(LedgerError::NonPositiveAmount);
        }
        Ok(())
    }

    /// True if this transaction is a system-originated credit
    /// (`Reward`/`Genesis`) exempt from nonce and balance preconditions.
    pub fn is_system_credit(&self) -> bool {
        matches!(self.kind, TransactionType::Reward | TransactionType::Genesis)
    }

    /// Compute this transaction's canonical hash (excludes the `signature`
    /// field itself, per the ledger model's hash contract).
    pub fn hash(&self) -> Hash {
        crate::encoding::tx_hash(self)
    }

    /// Verify this transaction's signature and that `sender_public_key`
    /// actually derives `sender`. System credits (`Reward`/`Genesis`)
    /// have no signature and trivially pass.
    pub fn verify_signature(&self) -> bool {
        if self.is_system_credit() {
            return true;
        }
        let (Some(pubkey), Some(sig)) = (&self.sender_public_key, &self.signature) else {
            return false;
        };
        if pubkey.derive_address() != self.sender {
            return false;
        }
        pubkey.verify(&self.hash(), sig).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(kind: TransactionType, amount: u64) -> Transaction {
        Transaction {
            kind,
            sender: Address::from_bytes([1u8; 20]),
            recipient: Address::from_bytes([2u8; 20]),
            amount: Amount::from_whole(amount),
            fee: Amount::ZERO,
            nonce: Nonce::Sequential(0),
            timestamp: 1000,
            payload: vec![],
            sender_public_key: None,
            signature: None,
        }
    }

    fn sign(tx: &mut Transaction, kp: &bt2c_crypto::KeyPair) {
        tx.sender = kp.address();
        tx.sender_public_key = Some(kp.public_key());
        tx.signature = Some(kp.sign(&tx.hash()));
    }

    #[test]
    fn zero_amount_transfer_is_rejected() {
        let tx = sample(TransactionType::Transfer, 0);
        assert_eq!(tx.validate_shape(), Err(LedgerError::NonPositiveAmount));
    }

    #[test]
    fn zero_amount_stake_is_allowed() {
        let tx = sample(TransactionType::Stake, 0);
        assert!(tx.validate_shape().is_ok());
    }

    #[test]
    fn short_unique_nonce_is_rejected() {
        let mut tx = sample(TransactionType::Transfer, 1);
        tx.nonce = Nonce::Unique(vec![0u8; 4]);
        assert!(matches!(
            tx.validate_shape(),
            Err(LedgerError::NonceTooShort { .. })
        ));
    }

    #[test]
    fn reward_is_system_credit_exempt_from_signature() {
        let tx = sample(TransactionType::Reward, 1);
        assert!(tx.is_system_credit());
        assert!(tx.verify_signature());
    }

    #[test]
    fn transfer_without_signature_fails_verification() {
        let tx = sample(TransactionType::Transfer, 1);
        assert!(!tx.verify_signature());
    }

    #[test]
    fn properly_signed_transfer_verifies() {
        let kp = bt2c_crypto::KeyPair::generate();
        let mut tx = sample(TransactionType::Transfer, 1);
        sign(&mut tx, &kp);
        assert!(tx.verify_signature());
    }

    #[test]
    fn signature_from_wrong_key_fails_verification() {
        let kp = bt2c_crypto::KeyPair::generate();
        let other = bt2c_crypto::KeyPair::generate();
        let mut tx = sample(TransactionType::Transfer, 1);
        tx.sender = kp.address();
        tx.sender_public_key = Some(kp.public_key());
        tx.signature = Some(other.sign(&tx.hash()));
        assert!(!tx.verify_signature());
    }

    #[test]
    fn hash_excludes_signature_field() {
        let mut a = sample(TransactionType::Transfer, 1);
        let kp = bt2c_crypto::KeyPair::generate();
        a.signature = Some(kp.sign(b"whatever"));
        let mut b = a.clone();
        b.signature = None;
        assert_eq!(a.hash(), b.hash());
    }
}
