//! Cosmos bech32 addresses.
//!
//! Accounts, consensus keys and validator operators live in separate bech32 namespaces. All
//! three carry a 20-byte payload.

use k256::elliptic_curve::sec1::ToEncodedPoint;

use xchain_core::{
    enc::{decode_bech32, AddressEncoder, Bech32Encoder, EncodingError, NetworkParams},
    hashes::{hash160, sha256},
    Address, Algorithm, CodecError, CodecResult, PubkeyBundle,
};

/// Account addresses, `cosmos1...`
#[derive(Debug, Clone)]
pub struct CosmosAccount;

impl NetworkParams for CosmosAccount {
    const HRP: &'static str = "cosmos";
}

/// Consensus addresses, `cosmosvalcons1...`
#[derive(Debug, Clone)]
pub struct CosmosValcons;

impl NetworkParams for CosmosValcons {
    const HRP: &'static str = "cosmosvalcons";
}

/// Validator operator addresses, `cosmosvaloper1...`
#[derive(Debug, Clone)]
pub struct CosmosValoper;

impl NetworkParams for CosmosValoper {
    const HRP: &'static str = "cosmosvaloper";
}

/// Encoder for account addresses
pub type AccountEncoder = Bech32Encoder<CosmosAccount>;

/// Encoder for consensus addresses
pub type ValconsEncoder = Bech32Encoder<CosmosValcons>;

/// Encoder for validator operator addresses
pub type ValoperEncoder = Bech32Encoder<CosmosValoper>;

/// Every address namespace
pub const ADDRESS_PREFIXES: [&str; 3] = [CosmosAccount::HRP, CosmosValcons::HRP, CosmosValoper::HRP];

/// Decode an address of any namespace, returning its prefix and payload.
pub fn decode_cosmos_address(address: &Address) -> CodecResult<(String, Vec<u8>)> {
    let (prefix, data) = decode_bech32(address.as_ref())?;
    if !ADDRESS_PREFIXES.contains(&prefix.as_str()) {
        return Err(EncodingError::InvalidPrefix {
            got: prefix,
            expected: ADDRESS_PREFIXES.to_vec(),
        }
        .into());
    }
    if data.len() != 20 {
        return Err(EncodingError::InvalidLength {
            expected: 20,
            got: data.len(),
        }
        .into());
    }
    Ok((prefix, data))
}

/// True if `address` is well formed in any namespace.
pub fn is_valid_address(address: &str) -> bool {
    decode_cosmos_address(&address.into()).is_ok()
}

/// Hash a public key into its 20-byte address payload.
///
/// secp256k1 keys hash as `ripemd160(sha256(compressed key))`; uncompressed keys are
/// compressed first. Ed25519 keys hash as the first 20 bytes of `sha256(key)`.
pub fn pubkey_to_payload(pubkey: &PubkeyBundle) -> CodecResult<Vec<u8>> {
    match pubkey.algo {
        Algorithm::Secp256k1 => {
            let key = k256::PublicKey::from_sec1_bytes(pubkey.data.items())
                .map_err(|_| CodecError::MalformedEncoding("invalid secp256k1 public key".to_owned()))?;
            Ok(hash160(key.to_encoded_point(true).as_bytes()).to_vec())
        }
        Algorithm::Ed25519 => Ok(sha256(pubkey.data.items())[..20].to_vec()),
    }
}

/// The account address of a public key.
pub fn pubkey_to_address(pubkey: &PubkeyBundle) -> CodecResult<Address> {
    Ok(AccountEncoder::encode_address(&pubkey_to_payload(pubkey)?)?)
}
