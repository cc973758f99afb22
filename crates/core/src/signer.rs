//! The asynchronous signing boundary.
//!
//! Codecs never suspend. `sign_transaction` asks the codec for a `SignJob`, awaits a
//! `TxSigner`, and returns a `SignedTransaction` ready for `bytes_to_post`.

use async_trait::async_trait;
use ed25519_dalek::Signer as _;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use log::debug;
use thiserror::Error;

use crate::{
    codec::{SignJob, TxCodec},
    error::CodecResult,
    ser::fixed_length,
    types::{
        Algorithm, FullSignature, Nonce, PrivkeyBundle, PubkeyBundle, SignatureBytes,
        SignedTransaction, Transaction,
    },
};

/// Errors from signers.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The secret key bytes are not a valid key.
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// The underlying signature primitive failed.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// The signer's key is not the key the transaction expects.
    #[error("Signer key does not match the transaction creator")]
    WrongKey,

    /// The private key is for an algorithm this signer does not implement.
    #[error("Signer does not support {0:?} keys")]
    UnsupportedAlgorithm(Algorithm),
}

/// Something that can sign codec output. May suspend, e.g. to reach a remote key store.
#[async_trait]
pub trait TxSigner: Send + Sync {
    /// The public key signatures verify against.
    fn pubkey(&self) -> PubkeyBundle;

    /// Apply `job.prehash` to `job.bytes` and sign the digest.
    async fn sign(&self, job: &SignJob) -> Result<SignatureBytes, SignerError>;
}

/// An in-memory Ed25519 signer. Signs the prehash digest, as weave chains expect.
pub struct Ed25519Signer {
    key: ed25519_dalek::SigningKey,
}

impl Ed25519Signer {
    /// Instantiate from a 32-byte secret
    pub fn from_bytes(secret: &[u8]) -> Result<Self, SignerError> {
        let secret: [u8; 32] = fixed_length("ed25519 secret", secret)
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Ok(Self {
            key: ed25519_dalek::SigningKey::from_bytes(&secret),
        })
    }
}

#[async_trait]
impl TxSigner for Ed25519Signer {
    fn pubkey(&self) -> PubkeyBundle {
        PubkeyBundle::ed25519(self.key.verifying_key().as_bytes())
    }

    async fn sign(&self, job: &SignJob) -> Result<SignatureBytes, SignerError> {
        let signature = self.key.sign(&job.digest());
        Ok(signature.to_bytes().to_vec().into())
    }
}

/// An in-memory secp256k1 signer.
///
/// By default it reports a compressed public key and produces 64-byte `r || s` signatures, as
/// Amino chains expect. `recoverable()` switches to an uncompressed key and 65-byte
/// `r || s || recovery` signatures, as Ethereum expects.
pub struct Secp256k1Signer {
    key: k256::ecdsa::SigningKey,
    recoverable: bool,
}

impl Secp256k1Signer {
    /// Instantiate from a 32-byte secret scalar
    pub fn from_bytes(secret: &[u8]) -> Result<Self, SignerError> {
        let key = k256::ecdsa::SigningKey::from_slice(secret)
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Ok(Self {
            key,
            recoverable: false,
        })
    }

    /// Produce recoverable signatures and report the uncompressed public key
    pub fn recoverable(mut self) -> Self {
        self.recoverable = true;
        self
    }
}

#[async_trait]
impl TxSigner for Secp256k1Signer {
    fn pubkey(&self) -> PubkeyBundle {
        let point = k256::PublicKey::from(self.key.verifying_key()).to_encoded_point(!self.recoverable);
        PubkeyBundle::secp256k1(point.as_bytes())
    }

    async fn sign(&self, job: &SignJob) -> Result<SignatureBytes, SignerError> {
        let (signature, recovery) = self
            .key
            .sign_prehash_recoverable(&job.digest())
            .map_err(|e| SignerError::Signing(e.to_string()))?;
        let mut out = signature.to_bytes().to_vec();
        if self.recoverable {
            out.push(recovery.to_byte());
        }
        Ok(out.into())
    }
}

/// Build an in-memory signer for a private key bundle.
pub fn signer_for(privkey: &PrivkeyBundle) -> Result<Box<dyn TxSigner>, SignerError> {
    match privkey.algo {
        Algorithm::Ed25519 => Ok(Box::new(Ed25519Signer::from_bytes(privkey.data.items())?)),
        Algorithm::Secp256k1 => Ok(Box::new(Secp256k1Signer::from_bytes(
            privkey.data.items(),
        )?)),
    }
}

/// Sign `tx` as its creator at `nonce`. The signer's key must be the creator's key.
pub async fn sign_transaction<C, S>(
    codec: &C,
    signer: &S,
    tx: Transaction,
    nonce: Nonce,
) -> CodecResult<SignedTransaction>
where
    C: TxCodec + ?Sized,
    S: TxSigner + ?Sized,
{
    let pubkey = signer.pubkey();
    if pubkey != tx.creator.pubkey {
        return Err(SignerError::WrongKey.into());
    }
    let job = codec.bytes_to_sign(&tx, nonce)?;
    debug!(
        "signing {} on {} with {:?} prehash",
        tx.kind(),
        tx.creator.chain_id,
        job.prehash
    );
    let signature = signer.sign(&job).await?;
    Ok(SignedTransaction {
        transaction: tx,
        primary_signature: FullSignature {
            nonce,
            pubkey,
            signature,
        },
        other_signatures: vec![],
    })
}

/// Add a co-signature to an already signed transaction, e.g. from a multisig participant.
pub async fn append_signature<C, S>(
    codec: &C,
    signer: &S,
    mut signed: SignedTransaction,
    nonce: Nonce,
) -> CodecResult<SignedTransaction>
where
    C: TxCodec + ?Sized,
    S: TxSigner + ?Sized,
{
    let job = codec.bytes_to_sign(&signed.transaction, nonce)?;
    debug!(
        "appending signature {} to {}",
        signed.other_signatures.len() + 1,
        signed.transaction.kind()
    );
    let signature = signer.sign(&job).await?;
    signed.other_signatures.push(FullSignature {
        nonce,
        pubkey: signer.pubkey(),
        signature,
    });
    Ok(signed)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hashes::PrehashType;
    use ed25519_dalek::Verifier;

    fn job(prehash: PrehashType) -> SignJob {
        SignJob {
            bytes: b"sign me".to_vec(),
            prehash,
        }
    }

    #[tokio::test]
    async fn it_signs_ed25519_over_the_prehash() {
        let signer = Ed25519Signer::from_bytes(&[7u8; 32]).unwrap();
        let job = job(PrehashType::Sha512);
        let sig = signer.sign(&job).await.unwrap();
        assert_eq!(sig.len(), 64);

        let pubkey: [u8; 32] = fixed_length("pubkey", signer.pubkey().data.items()).unwrap();
        let vk = ed25519_dalek::VerifyingKey::from_bytes(&pubkey).unwrap();
        let sig = ed25519_dalek::Signature::from_slice(sig.items()).unwrap();
        assert!(vk.verify(&job.digest(), &sig).is_ok());
        assert!(vk.verify(&job.bytes, &sig).is_err());
    }

    #[tokio::test]
    async fn it_signs_secp256k1_in_both_formats() {
        let fixed = Secp256k1Signer::from_bytes(&[9u8; 32]).unwrap();
        assert_eq!(fixed.pubkey().data.len(), 33);
        assert_eq!(fixed.sign(&job(PrehashType::Sha256)).await.unwrap().len(), 64);

        let recoverable = Secp256k1Signer::from_bytes(&[9u8; 32]).unwrap().recoverable();
        assert_eq!(recoverable.pubkey().data.len(), 65);
        let job = job(PrehashType::Keccak256);
        let sig = recoverable.sign(&job).await.unwrap();
        assert_eq!(sig.len(), 65);

        let signature = k256::ecdsa::Signature::from_slice(&sig.items()[..64]).unwrap();
        let recovery = k256::ecdsa::RecoveryId::from_byte(sig.items()[64]).unwrap();
        let recovered =
            k256::ecdsa::VerifyingKey::recover_from_prehash(&job.digest(), &signature, recovery)
                .unwrap();
        let point = k256::PublicKey::from(&recovered).to_encoded_point(false);
        assert_eq!(point.as_bytes(), recoverable.pubkey().data.items());
    }

    #[test]
    fn it_rejects_bad_secrets() {
        match Ed25519Signer::from_bytes(&[1u8; 31]) {
            Err(SignerError::InvalidKey(_)) => {}
            _ => assert!(false, "expected InvalidKey"),
        }
        match Secp256k1Signer::from_bytes(&[0u8; 32]) {
            Err(SignerError::InvalidKey(_)) => {}
            _ => assert!(false, "expected InvalidKey"),
        }
    }
}
