//! The weave `TxCodec`.

use ed25519_dalek::Verifier;
use log::trace;
use prost::Message;
use serde::{Deserialize, Serialize};
use sha2::Sha512;

use xchain_core::{
    hashes::{DigestWriter, PrehashType},
    ser::{fixed_length, ByteFormat},
    Address, ChainId, CodecError, CodecResult, FullSignature, Identity, Nonce, SignJob,
    SignedTransaction, Transaction, TxCodec,
};

use crate::{
    decode, enc,
    encode::{self, SignBytes},
    proto::grafain,
};

/// Runtime configuration of a `WeaveCodec`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaveConfig {
    /// How deep proposal batches may nest. Weave chains execute one level of batching.
    pub max_batch_depth: usize,
    /// Check every Ed25519 signature when parsing.
    pub verify_signatures: bool,
}

impl Default for WeaveConfig {
    fn default() -> Self {
        Self {
            max_batch_depth: 1,
            verify_signatures: true,
        }
    }
}

/// Encodes and parses weave protobuf transactions.
#[derive(Clone, Debug, Default)]
pub struct WeaveCodec {
    config: WeaveConfig,
}

impl WeaveCodec {
    /// Instantiate a codec
    pub fn new(config: WeaveConfig) -> Self {
        Self { config }
    }

    /// The codec's configuration
    pub fn config(&self) -> &WeaveConfig {
        &self.config
    }

    fn sign_bytes(&self, tx: &Transaction, nonce: Nonce) -> CodecResult<SignBytes> {
        let unsigned = encode::encode_unsigned(tx, self.config.max_batch_depth)?;
        SignBytes::new(&tx.creator.chain_id, nonce, unsigned.encode_to_vec())
    }

    fn verify(&self, tx: &Transaction, signature: &FullSignature) -> CodecResult<()> {
        let mut writer = DigestWriter::<Sha512>::default();
        self.sign_bytes(tx, signature.nonce)?.write_to(&mut writer)?;
        let digest = writer.finish();

        let pubkey: [u8; 32] = fixed_length("pubkey", signature.pubkey.data.items())?;
        let sig: [u8; 64] = fixed_length("signature", signature.signature.items())?;
        let key = ed25519_dalek::VerifyingKey::from_bytes(&pubkey)
            .map_err(|e| CodecError::MalformedEncoding(e.to_string()))?;
        key.verify(&digest, &ed25519_dalek::Signature::from_bytes(&sig))
            .map_err(|_| CodecError::MalformedEncoding("invalid signature".to_owned()))
    }
}

impl TxCodec for WeaveCodec {
    fn bytes_to_sign(&self, tx: &Transaction, nonce: Nonce) -> CodecResult<SignJob> {
        trace!("weave sign bytes for {} at nonce {}", tx.kind(), nonce);
        Ok(SignJob {
            bytes: self.sign_bytes(tx, nonce)?.to_bytes()?,
            prehash: PrehashType::Sha512,
        })
    }

    fn bytes_to_post(&self, signed: &SignedTransaction) -> CodecResult<Vec<u8>> {
        let tx = &signed.transaction;
        if signed.primary_signature.pubkey != tx.creator.pubkey {
            return Err(CodecError::UnsupportedShape(
                "the primary signature must be the creator's".to_owned(),
            ));
        }
        let mut envelope = encode::encode_unsigned(tx, self.config.max_batch_depth)?;
        envelope.signatures = signed
            .signatures()
            .map(encode::encode_signature)
            .collect::<CodecResult<_>>()?;
        Ok(envelope.encode_to_vec())
    }

    fn parse_bytes(&self, bytes: &[u8], chain_id: &ChainId) -> CodecResult<SignedTransaction> {
        let envelope = grafain::Tx::decode(bytes)
            .map_err(|e| CodecError::MalformedEncoding(e.to_string()))?;
        if envelope.encode_to_vec() != bytes {
            return Err(CodecError::MalformedEncoding(
                "non-canonical envelope".to_owned(),
            ));
        }

        let mut signatures = envelope
            .signatures
            .iter()
            .map(decode::decode_signature)
            .collect::<CodecResult<Vec<_>>>()?
            .into_iter();
        let primary_signature = signatures.next().ok_or(CodecError::MissingSignature)?;

        let sum = envelope
            .sum
            .as_ref()
            .ok_or_else(|| CodecError::UnsupportedMessageType("empty envelope".to_owned()))?;
        let transaction = Transaction {
            creator: Identity::new(chain_id.clone(), primary_signature.pubkey.clone()),
            fee: decode::decode_fee(&envelope.fees)?,
            multisig: envelope
                .multisig
                .iter()
                .map(|id| decode::decode_id("multisig", id))
                .collect::<CodecResult<_>>()?,
            body: decode::decode_body(chain_id, sum, self.config.max_batch_depth)?,
        };
        trace!("parsed weave {} from {} bytes", transaction.kind(), bytes.len());

        let signed = SignedTransaction {
            transaction,
            primary_signature,
            other_signatures: signatures.collect(),
        };
        if self.bytes_to_post(&signed)? != bytes {
            return Err(CodecError::MalformedEncoding(
                "envelope does not re-encode to its input".to_owned(),
            ));
        }
        if self.config.verify_signatures {
            for signature in signed.signatures() {
                self.verify(&signed.transaction, signature)?;
            }
        }
        Ok(signed)
    }

    fn identity_to_address(&self, identity: &Identity) -> CodecResult<Address> {
        enc::encode_address(&identity.chain_id, &enc::pubkey_to_payload(&identity.pubkey)?)
    }

    fn is_valid_address(&self, address: &str) -> bool {
        enc::is_valid_address(address)
    }
}
