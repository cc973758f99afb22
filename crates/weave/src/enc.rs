//! Weave address and key encoding.
//!
//! An address is the first 20 bytes of `sha256("sigs/ed25519/" || pubkey)`, rendered as bech32
//! with prefix `iov` on mainnet chains and `tiov` everywhere else.

use xchain_core::{
    enc::{decode_bech32_address, AddressEncoder, Bech32Encoder, NetworkParams},
    hashes::sha256,
    Address, Algorithm, ChainId, CodecError, CodecResult, PrivkeyBundle, PubkeyBundle,
};

use crate::proto::crypto;

/// Chain ids starting with this get mainnet addresses.
pub const MAINNET_CHAIN_PREFIX: &str = "iov-mainnet";

/// The domain separator hashed in front of Ed25519 public keys.
pub const ED25519_CONDITION_PREFIX: &[u8] = b"sigs/ed25519/";

/// A param struct for IOV mainnet addresses
#[derive(Debug, Clone)]
pub struct IovMainnet;

impl NetworkParams for IovMainnet {
    const HRP: &'static str = "iov";
}

/// A param struct for IOV testnet addresses
#[derive(Debug, Clone)]
pub struct IovTestnet;

impl NetworkParams for IovTestnet {
    const HRP: &'static str = "tiov";
}

/// Encoder for `iov1...` addresses
pub type MainnetEncoder = Bech32Encoder<IovMainnet>;

/// Encoder for `tiov1...` addresses
pub type TestnetEncoder = Bech32Encoder<IovTestnet>;

/// True if addresses on `chain_id` use the mainnet prefix.
pub fn is_mainnet(chain_id: &ChainId) -> bool {
    chain_id.as_str().starts_with(MAINNET_CHAIN_PREFIX)
}

/// Hash an Ed25519 public key into its 20-byte address payload.
pub fn pubkey_to_payload(pubkey: &PubkeyBundle) -> CodecResult<Vec<u8>> {
    if pubkey.algo != Algorithm::Ed25519 {
        return Err(CodecError::UnsupportedAlgorithm(pubkey.algo));
    }
    let mut preimage = ED25519_CONDITION_PREFIX.to_vec();
    preimage.extend_from_slice(pubkey.data.items());
    Ok(sha256(&preimage)[..20].to_vec())
}

/// Render a 20-byte payload as an address for `chain_id`.
pub fn encode_address(chain_id: &ChainId, payload: &[u8]) -> CodecResult<Address> {
    let address = if is_mainnet(chain_id) {
        MainnetEncoder::encode_address(payload)?
    } else {
        TestnetEncoder::encode_address(payload)?
    };
    Ok(address)
}

/// Decode an address into its 20-byte payload. The prefix must match the network of
/// `chain_id`; a testnet address is never accepted on mainnet or the reverse.
pub fn decode_address(chain_id: &ChainId, address: &Address) -> CodecResult<Vec<u8>> {
    let payload = if is_mainnet(chain_id) {
        MainnetEncoder::decode_address(address)?
    } else {
        TestnetEncoder::decode_address(address)?
    };
    Ok(payload)
}

/// True if `s` is an address of either network.
pub fn is_valid_address(s: &str) -> bool {
    decode_bech32_address(&[IovMainnet::HRP, IovTestnet::HRP], s).is_ok()
}

/// Wrap an Ed25519 public key in its protobuf message.
pub fn encode_pubkey(pubkey: &PubkeyBundle) -> CodecResult<crypto::PublicKey> {
    match pubkey.algo {
        Algorithm::Ed25519 => Ok(crypto::PublicKey {
            r#pub: Some(crypto::public_key::Pub::Ed25519(pubkey.data.items().to_vec())),
        }),
        other => Err(CodecError::UnsupportedAlgorithm(other)),
    }
}

/// Unwrap a public key message.
pub fn decode_pubkey(pubkey: &crypto::PublicKey) -> CodecResult<PubkeyBundle> {
    match &pubkey.r#pub {
        Some(crypto::public_key::Pub::Ed25519(data)) => Ok(PubkeyBundle::ed25519(data)),
        None => Err(CodecError::MissingField("pubkey")),
    }
}

/// Wrap an Ed25519 private key in its protobuf message.
pub fn encode_privkey(privkey: &PrivkeyBundle) -> CodecResult<crypto::PrivateKey> {
    match privkey.algo {
        Algorithm::Ed25519 => Ok(crypto::PrivateKey {
            r#priv: Some(crypto::private_key::Priv::Ed25519(
                privkey.data.items().to_vec(),
            )),
        }),
        other => Err(CodecError::UnsupportedAlgorithm(other)),
    }
}

/// Unwrap a private key message.
pub fn decode_privkey(privkey: &crypto::PrivateKey) -> CodecResult<PrivkeyBundle> {
    match &privkey.r#priv {
        Some(crypto::private_key::Priv::Ed25519(data)) => Ok(PrivkeyBundle {
            algo: Algorithm::Ed25519,
            data: data.as_slice().into(),
        }),
        None => Err(CodecError::MissingField("privkey")),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use prost::Message;
    use xchain_core::enc::EncodingError;

    #[test]
    fn it_encodes_addresses_per_network() {
        let payload = hex::decode("a4f97447e7df55b6ef0d6209ebef2a7b22625376").unwrap();
        let testnet = encode_address(&"iov-lovenet".into(), &payload).unwrap();
        assert_eq!(testnet.as_ref(), "tiov15nuhg3l8ma2mdmcdvgy7hme20v3xy5mkxcezea");
        let mainnet = encode_address(&"iov-mainnet-2".into(), &payload).unwrap();
        assert!(mainnet.as_ref().starts_with("iov1"));

        assert_eq!(decode_address(&"iov-lovenet".into(), &testnet).unwrap(), payload);
        assert_eq!(decode_address(&"iov-mainnet-2".into(), &mainnet).unwrap(), payload);
        assert!(is_valid_address(testnet.as_ref()));
        assert!(is_valid_address(mainnet.as_ref()));
    }

    #[test]
    fn it_rejects_foreign_prefixes() {
        let testnet: ChainId = "iov-lovenet".into();
        let mainnet: ChainId = "iov-mainnet".into();
        let cases: [(&ChainId, &str); 3] = [
            (&testnet, "cosmos1pkptre7fdkl6gfrzlesjjvhxhlc3r4gmmk8rs6"),
            (&mainnet, "tiov15nuhg3l8ma2mdmcdvgy7hme20v3xy5mkxcezea"),
            (&mainnet, "cosmos1pkptre7fdkl6gfrzlesjjvhxhlc3r4gmmk8rs6"),
        ];
        for (chain_id, address) in cases.iter() {
            match decode_address(chain_id, &(*address).into()) {
                Err(CodecError::Address(EncodingError::InvalidPrefix { .. })) => {}
                _ => assert!(false, "expected InvalidPrefix"),
            }
        }
        assert!(!is_valid_address("cosmos1pkptre7fdkl6gfrzlesjjvhxhlc3r4gmmk8rs6"));
    }

    #[test]
    fn it_derives_payloads_only_for_ed25519() {
        let ed = PubkeyBundle::ed25519(&[1u8; 32]);
        let mut preimage = b"sigs/ed25519/".to_vec();
        preimage.extend_from_slice(&[1u8; 32]);
        assert_eq!(pubkey_to_payload(&ed).unwrap(), sha256(&preimage)[..20].to_vec());

        let secp = PubkeyBundle::secp256k1(&[2u8; 33]);
        match pubkey_to_payload(&secp) {
            Err(CodecError::UnsupportedAlgorithm(Algorithm::Secp256k1)) => {}
            _ => assert!(false, "expected UnsupportedAlgorithm"),
        }
    }

    #[test]
    fn it_wraps_keys_in_protobuf() {
        let pubkey = PubkeyBundle::ed25519(&[0x11; 32]);
        let bin = encode_pubkey(&pubkey).unwrap().encode_to_vec();
        assert_eq!(bin[..2], [0x0a, 0x20]);
        let decoded = crypto::PublicKey::decode(bin.as_slice()).unwrap();
        assert_eq!(decode_pubkey(&decoded).unwrap(), pubkey);

        let privkey = PrivkeyBundle {
            algo: Algorithm::Ed25519,
            data: vec![0x22; 64].into(),
        };
        let bin = encode_privkey(&privkey).unwrap().encode_to_vec();
        let decoded = crypto::PrivateKey::decode(bin.as_slice()).unwrap();
        assert_eq!(decode_privkey(&decoded).unwrap(), privkey);
    }
}
