//! Address encoding. Contains the `AddressEncoder` trait, bech32 helpers, and a bech32 encoder
//! parameterized by a `NetworkParams` type, which backends use to declare their address
//! namespaces.

use std::marker::PhantomData;

use bech32::{FromBase32, ToBase32, Variant};
use thiserror::Error;

use crate::types::Address;

/// Length of the hashed-pubkey payload inside every address this crate handles.
pub const ADDRESS_PAYLOAD_LENGTH: usize = 20;

/// Errors that can be returned by the address encoders.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// Returned when the bech32 checksum or character set is invalid.
    #[error(transparent)]
    BechError(#[from] bech32::Error),

    /// Returned when a bech32 string carries a prefix outside the allowed set.
    #[error("Invalid address prefix. Got {got}. Expected one of {expected:?}.")]
    InvalidPrefix {
        /// The prefix found in the string
        got: String,
        /// The prefixes that were acceptable here
        expected: Vec<&'static str>,
    },

    /// Returned when a decoded payload has the wrong length.
    #[error("Invalid address payload length. Expected {expected}, got {got}.")]
    InvalidLength {
        /// Required payload length
        expected: usize,
        /// Actual payload length
        got: usize,
    },

    /// Returned when a mixed-case hex address does not match its checksum.
    #[error("Invalid address checksum")]
    InvalidChecksum,

    /// Returned when a hex address is not well-formed.
    #[error("Malformed hex address: {0}")]
    MalformedHex(String),
}

/// A simple result type alias
pub type EncodingResult<T> = Result<T, EncodingError>;

/// Encode `data` as a bech32 string with the given human-readable prefix.
pub fn encode_bech32(hrp: &str, data: &[u8]) -> EncodingResult<String> {
    Ok(bech32::encode(hrp, data.to_base32(), Variant::Bech32)?)
}

/// Decode a bech32 string, returning its prefix and payload. Any bech32m string is rejected.
pub fn decode_bech32(s: &str) -> EncodingResult<(String, Vec<u8>)> {
    let (hrp, data, variant) = bech32::decode(s)?;
    if variant != Variant::Bech32 {
        return Err(bech32::Error::InvalidChecksum.into());
    }
    let data = Vec::<u8>::from_base32(&data)?;
    Ok((hrp, data))
}

/// Decode a bech32 address string, requiring its prefix to be one of `allowed` and its payload
/// to be `ADDRESS_PAYLOAD_LENGTH` bytes.
pub fn decode_bech32_address(allowed: &[&'static str], s: &str) -> EncodingResult<Vec<u8>> {
    let (hrp, data) = decode_bech32(s)?;
    if !allowed.contains(&hrp.as_str()) {
        return Err(EncodingError::InvalidPrefix {
            got: hrp,
            expected: allowed.to_vec(),
        });
    }
    if data.len() != ADDRESS_PAYLOAD_LENGTH {
        return Err(EncodingError::InvalidLength {
            expected: ADDRESS_PAYLOAD_LENGTH,
            got: data.len(),
        });
    }
    Ok(data)
}

/// An AddressEncoder encodes and decodes addresses. This trait is intended to be parameterized
/// by a network description, so that the same implementation can serve several namespaces.
pub trait AddressEncoder {
    /// Encode an address payload (usually a hashed public key) as an address.
    fn encode_address(payload: &[u8]) -> EncodingResult<Address>;

    /// Decode the payload from an address.
    fn decode_address(addr: &Address) -> EncodingResult<Vec<u8>>;

    /// Convert a string to an address, checking that it is well formed for this encoder.
    fn string_to_address(s: &str) -> EncodingResult<Address> {
        let addr = Address::from(s);
        Self::decode_address(&addr)?;
        Ok(addr)
    }

    /// Return true if `s` decodes under this encoder. Never panics.
    fn is_valid_address(s: &str) -> bool {
        Self::string_to_address(s).is_ok()
    }
}

/// NetworkParams holds the encoding parameters for a bech32 address namespace.
pub trait NetworkParams {
    /// The bech32 human-readable prefix.
    const HRP: &'static str;
}

/// A bech32 encoder parameterized by a `NetworkParams` type. Decoding rejects any prefix other
/// than `P::HRP`, and any payload that is not 20 bytes long.
#[derive(Debug, Clone, PartialEq)]
pub struct Bech32Encoder<P: NetworkParams>(PhantomData<fn(P) -> P>);

impl<P: NetworkParams> AddressEncoder for Bech32Encoder<P> {
    fn encode_address(payload: &[u8]) -> EncodingResult<Address> {
        if payload.len() != ADDRESS_PAYLOAD_LENGTH {
            return Err(EncodingError::InvalidLength {
                expected: ADDRESS_PAYLOAD_LENGTH,
                got: payload.len(),
            });
        }
        Ok(encode_bech32(P::HRP, payload)?.into())
    }

    fn decode_address(addr: &Address) -> EncodingResult<Vec<u8>> {
        decode_bech32_address(&[P::HRP], addr.as_ref())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Cosmos;
    impl NetworkParams for Cosmos {
        const HRP: &'static str = "cosmos";
    }
    type CosmosEncoder = Bech32Encoder<Cosmos>;

    #[test]
    fn it_encodes_and_decodes_bech32_addresses() {
        let payload = hex::decode("0d82b1e7c96dbfa42462fe612932e6bff111d51b").unwrap();
        let addr = CosmosEncoder::encode_address(&payload).unwrap();
        assert_eq!(addr.as_ref(), "cosmos1pkptre7fdkl6gfrzlesjjvhxhlc3r4gmmk8rs6");
        assert_eq!(CosmosEncoder::decode_address(&addr).unwrap(), payload);
    }

    #[test]
    fn it_errors_on_wrong_prefix_and_bad_payloads() {
        match CosmosEncoder::string_to_address("cosmot10q82zkzzmaku5lazhsvxv7hsg4ntpuhd8j5266") {
            Err(EncodingError::InvalidPrefix { got, expected: _ }) => assert_eq!(got, "cosmot"),
            _ => assert!(false, "expected InvalidPrefix"),
        }
        match CosmosEncoder::string_to_address("cosmos1pkptre7fdkl6gfrzlesjjvhxhlc3r4gmmk8rs7") {
            Err(EncodingError::BechError(_)) => {}
            _ => assert!(false, "expected a checksum error"),
        }
        match CosmosEncoder::encode_address(&[0u8; 19]) {
            Err(EncodingError::InvalidLength {
                expected: 20,
                got: 19,
            }) => {}
            _ => assert!(false, "expected InvalidLength"),
        }
    }

    #[test]
    fn it_never_panics_on_garbage() {
        let cases = ["", "1", "cosmos1", "🦀", "cosmos1pkptre7fdkl6gfrzlesjjvhxhlc3r4gmmk8rs6 "];
        for case in cases.iter() {
            assert!(!CosmosEncoder::is_valid_address(case));
        }
    }
}
