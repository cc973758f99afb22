//! Public keys, private keys, signatures and identities.

use serde::{Deserialize, Serialize};

use crate::types::primitives::ChainId;

/// Signature algorithms understood by the codecs.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Ed25519, used by weave chains
    Ed25519,
    /// ECDSA over secp256k1, used by Cosmos and Ethereum
    Secp256k1,
}

wrap_byte_vector!(
    /// Raw public key bytes. secp256k1 keys may be compressed (33 bytes) or uncompressed
    /// (65 bytes).
    PubkeyBytes
);

wrap_byte_vector!(
    /// Raw private key bytes
    PrivkeyBytes
);

wrap_byte_vector!(
    /// Raw signature bytes. Recoverable secp256k1 signatures are `r || s || recovery` (65 bytes).
    SignatureBytes
);

/// A public key tagged with its algorithm.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PubkeyBundle {
    /// The signature algorithm
    pub algo: Algorithm,
    /// The key bytes
    pub data: PubkeyBytes,
}

impl PubkeyBundle {
    /// Instantiate an Ed25519 bundle
    pub fn ed25519(data: &[u8]) -> Self {
        Self {
            algo: Algorithm::Ed25519,
            data: data.into(),
        }
    }

    /// Instantiate a secp256k1 bundle
    pub fn secp256k1(data: &[u8]) -> Self {
        Self {
            algo: Algorithm::Secp256k1,
            data: data.into(),
        }
    }
}

/// A private key tagged with its algorithm.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PrivkeyBundle {
    /// The signature algorithm
    pub algo: Algorithm,
    /// The key bytes
    pub data: PrivkeyBytes,
}

/// A public key on a specific chain. The address is derived from this by a codec.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// The chain this identity acts on
    pub chain_id: ChainId,
    /// The identity's public key
    pub pubkey: PubkeyBundle,
}

impl Identity {
    /// Instantiate an identity
    pub fn new(chain_id: impl Into<ChainId>, pubkey: PubkeyBundle) -> Self {
        Self {
            chain_id: chain_id.into(),
            pubkey,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_serializes_keys_as_hex() {
        let identity = Identity::new("iov-lovenet", PubkeyBundle::ed25519(&[0xde, 0xad]));
        let json = serde_json::to_string(&identity).unwrap();
        assert_eq!(
            json,
            r#"{"chain_id":"iov-lovenet","pubkey":{"algo":"ed25519","data":"dead"}}"#
        );
        let decoded: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, identity);
    }
}
