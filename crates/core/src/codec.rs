//! The contract every backend codec implements.

use crate::{
    error::{CodecError, CodecResult},
    hashes::{sha256, PrehashType},
    types::{Address, ChainId, Identity, Nonce, SignedTransaction, Transaction, TransactionId},
};

/// Bytes to be signed, and the hash the signer must apply to them first.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignJob {
    /// The exact signable bytes
    pub bytes: Vec<u8>,
    /// The prehash to apply before signing
    pub prehash: PrehashType,
}

impl SignJob {
    /// The digest a signer signs: `prehash(bytes)`.
    pub fn digest(&self) -> Vec<u8> {
        self.prehash.digest(&self.bytes)
    }
}

/// The wire form of an optional memo. Every wire format reads an empty memo back as no memo,
/// so `Some("")` is refused.
pub fn wire_memo(memo: &Option<String>) -> CodecResult<&str> {
    match memo.as_deref() {
        Some("") => Err(CodecError::UnsupportedShape(
            "empty memo, leave the memo out instead".to_owned(),
        )),
        Some(memo) => Ok(memo),
        None => Ok(""),
    }
}

/// A backend codec. Translates between the transaction model and one chain's wire format.
///
/// Implementations hold only read-only configuration, and every method is a pure function of
/// its inputs and that configuration.
pub trait TxCodec {
    /// Produce the bytes the creator signs, for `tx` at `nonce`. Deterministic.
    fn bytes_to_sign(&self, tx: &Transaction, nonce: Nonce) -> CodecResult<SignJob>;

    /// Embed the signatures into the canonical envelope. For every `signed` this codec
    /// accepts, `parse_bytes(bytes_to_post(signed), creator chain id) == signed`.
    fn bytes_to_post(&self, signed: &SignedTransaction) -> CodecResult<Vec<u8>>;

    /// Parse posted bytes. The chain id is supplied by the caller because not every wire
    /// format carries it.
    fn parse_bytes(&self, bytes: &[u8], chain_id: &ChainId) -> CodecResult<SignedTransaction>;

    /// A content hash over `bytes_to_post`, as 64 uppercase hex characters. Defaults to
    /// sha256.
    fn identifier(&self, signed: &SignedTransaction) -> CodecResult<TransactionId> {
        let posted = self.bytes_to_post(signed)?;
        Ok(TransactionId::from_digest(&sha256(&posted)))
    }

    /// Derive the address of an identity on its chain.
    fn identity_to_address(&self, identity: &Identity) -> CodecResult<Address>;

    /// True if `address` is well-formed for this codec's chains. Never panics.
    fn is_valid_address(&self, address: &str) -> bool;
}
