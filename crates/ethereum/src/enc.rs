//! Ethereum addresses and public key recovery.
//!
//! An address is the last 20 bytes of `keccak256` over the uncompressed public key without its
//! `0x04` tag, written as `0x`-prefixed EIP-55 checksummed hex.

use alloy_primitives::Address as EthAddress;
use k256::{
    ecdsa::{RecoveryId, Signature, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
};

use xchain_core::{
    enc::{EncodingError, EncodingResult},
    hashes::keccak256,
    Address, Algorithm, CodecError, CodecResult, PubkeyBundle,
};

/// Length of an address payload
pub const ADDRESS_LENGTH: usize = 20;

/// Hash a secp256k1 public key, compressed or not, into its address payload.
pub fn pubkey_to_payload(pubkey: &PubkeyBundle) -> CodecResult<[u8; ADDRESS_LENGTH]> {
    if pubkey.algo != Algorithm::Secp256k1 {
        return Err(CodecError::UnsupportedAlgorithm(pubkey.algo));
    }
    let key = k256::PublicKey::from_sec1_bytes(pubkey.data.items())
        .map_err(|_| CodecError::MalformedEncoding("invalid secp256k1 public key".to_owned()))?;
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);

    let mut payload = [0u8; ADDRESS_LENGTH];
    payload.copy_from_slice(&hash[32 - ADDRESS_LENGTH..]);
    Ok(payload)
}

/// Render a payload with its EIP-55 checksum.
pub fn encode_address(payload: &[u8; ADDRESS_LENGTH]) -> Address {
    EthAddress::from(*payload).to_checksum(None).into()
}

/// The checksummed address of a public key.
pub fn pubkey_to_address(pubkey: &PubkeyBundle) -> CodecResult<Address> {
    Ok(encode_address(&pubkey_to_payload(pubkey)?))
}

/// Parse a `0x`-prefixed hex address.
///
/// All-lowercase and all-uppercase addresses carry no checksum and are accepted as they are.
/// Mixed case must match the EIP-55 checksum exactly.
pub fn decode_address(address: &Address) -> EncodingResult<[u8; ADDRESS_LENGTH]> {
    let s = address.as_ref();
    let body = s
        .strip_prefix("0x")
        .ok_or_else(|| EncodingError::MalformedHex(s.to_owned()))?;
    if body.len() != 2 * ADDRESS_LENGTH {
        return Err(EncodingError::InvalidLength {
            expected: ADDRESS_LENGTH,
            got: body.len() / 2,
        });
    }
    let decoded = hex::decode(body).map_err(|_| EncodingError::MalformedHex(s.to_owned()))?;
    let mut payload = [0u8; ADDRESS_LENGTH];
    payload.copy_from_slice(&decoded);

    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper && encode_address(&payload).as_ref() != s {
        return Err(EncodingError::InvalidChecksum);
    }
    Ok(payload)
}

/// True if `address` parses under `decode_address`.
pub fn is_valid_address(address: &str) -> bool {
    decode_address(&address.into()).is_ok()
}

/// Recover the uncompressed public key behind an `r || s || recovery` signature over `digest`.
pub fn recover_pubkey(digest: &[u8], signature: &[u8; 65]) -> CodecResult<PubkeyBundle> {
    let malformed = |e: k256::ecdsa::Error| CodecError::MalformedEncoding(e.to_string());
    let rs = Signature::from_slice(&signature[..64]).map_err(malformed)?;
    let recovery = RecoveryId::from_byte(signature[64]).ok_or_else(|| {
        CodecError::MalformedEncoding(format!("invalid recovery id {}", signature[64]))
    })?;
    let key = VerifyingKey::recover_from_prehash(digest, &rs, recovery).map_err(malformed)?;
    let point = k256::PublicKey::from(&key).to_encoded_point(false);
    Ok(PubkeyBundle::secp256k1(point.as_bytes()))
}

#[cfg(test)]
mod test {
    use super::*;
    use xchain_core::signer::{Secp256k1Signer, TxSigner};

    #[test]
    fn it_derives_addresses_from_keys() {
        let cases = [
            (
                "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
                "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23",
            ),
            (
                "0000000000000000000000000000000000000000000000000000000000000001",
                "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf",
            ),
            (
                "4646464646464646464646464646464646464646464646464646464646464646",
                "0x9d8A62f656a8d1615C1294fd71e9CFb3E4855A4F",
            ),
        ];
        for (secret, address) in cases.iter() {
            let signer = Secp256k1Signer::from_bytes(&hex::decode(secret).unwrap()).unwrap();
            let compressed = signer.pubkey();
            let uncompressed = signer.recoverable().pubkey();
            assert_eq!(uncompressed.data.len(), 65);
            assert_eq!(pubkey_to_address(&uncompressed).unwrap().as_ref(), *address);
            assert_eq!(pubkey_to_address(&compressed).unwrap().as_ref(), *address);
        }
    }

    #[test]
    fn it_checks_eip55_checksums() {
        let valid = [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            "0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED",
        ];
        for address in valid.iter() {
            assert!(is_valid_address(address), "{}", address);
        }
        let payload = decode_address(&valid[4].into()).unwrap();
        assert_eq!(encode_address(&payload).as_ref(), valid[0]);

        match decode_address(&"0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD".into()) {
            Err(EncodingError::InvalidChecksum) => {}
            _ => assert!(false, "expected InvalidChecksum"),
        }
    }

    #[test]
    fn it_rejects_malformed_addresses() {
        let cases = [
            "5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAe",
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAedaa",
            "0xgaaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            "tiov15nuhg3l8ma2mdmcdvgy7hme20v3xy5mkxcezea",
            "",
        ];
        for address in cases.iter() {
            assert!(!is_valid_address(address), "{}", address);
        }
    }

    #[test]
    fn it_refuses_ed25519_keys() {
        match pubkey_to_address(&PubkeyBundle::ed25519(&[1u8; 32])) {
            Err(CodecError::UnsupportedAlgorithm(Algorithm::Ed25519)) => {}
            _ => assert!(false, "expected UnsupportedAlgorithm"),
        }
    }
}
