//! Contract call data.
//!
//! A call is a 4-byte method id, `keccak256(signature)[..4]`, followed by one 32-byte word per
//! argument in declared order. Addresses and integers are left-padded with zeros. `bytes32`
//! arguments are copied as-is.

use alloy_primitives::U256;
use once_cell::sync::Lazy;

use xchain_core::{hashes::keccak256, CodecError, CodecResult};

/// `transfer(address,uint256)`, on ERC20 token contracts
pub static TRANSFER: Lazy<[u8; 4]> = Lazy::new(|| method_id("transfer(address,uint256)"));

/// `approve(address,uint256)`, on ERC20 token contracts
pub static APPROVE: Lazy<[u8; 4]> = Lazy::new(|| method_id("approve(address,uint256)"));

/// `open(bytes32,address,bytes32,uint256)`, on the ether swap contract
pub static OPEN_ETHER_SWAP: Lazy<[u8; 4]> =
    Lazy::new(|| method_id("open(bytes32,address,bytes32,uint256)"));

/// `open(bytes32,address,bytes32,uint256,address,uint256)`, on the ERC20 swap contract
pub static OPEN_ERC20_SWAP: Lazy<[u8; 4]> =
    Lazy::new(|| method_id("open(bytes32,address,bytes32,uint256,address,uint256)"));

/// `claim(bytes32,bytes32)`, on either swap contract
pub static CLAIM_SWAP: Lazy<[u8; 4]> = Lazy::new(|| method_id("claim(bytes32,bytes32)"));

/// `abort(bytes32)`, on either swap contract
pub static ABORT_SWAP: Lazy<[u8; 4]> = Lazy::new(|| method_id("abort(bytes32)"));

/// Width of every argument slot
pub const WORD_LENGTH: usize = 32;

/// The 4-byte id of a canonical method signature such as `transfer(address,uint256)`.
pub fn method_id(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Left-pad a 20-byte address into a word.
pub fn encode_address(payload: &[u8; 20]) -> [u8; WORD_LENGTH] {
    let mut word = [0u8; WORD_LENGTH];
    word[12..].copy_from_slice(payload);
    word
}

/// Big-endian `uint256` word.
pub fn encode_uint256(value: U256) -> [u8; WORD_LENGTH] {
    value.to_be_bytes::<WORD_LENGTH>()
}

/// Builds call data one argument at a time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CallData(Vec<u8>);

impl CallData {
    /// Start a call to `method`
    pub fn new(method: &[u8; 4]) -> Self {
        Self(method.to_vec())
    }

    /// Append a raw word, e.g. a `bytes32`
    pub fn word(mut self, word: [u8; WORD_LENGTH]) -> Self {
        self.0.extend_from_slice(&word);
        self
    }

    /// Append an `address`
    pub fn address(self, payload: &[u8; 20]) -> Self {
        self.word(encode_address(payload))
    }

    /// Append a `uint256`
    pub fn uint256(self, value: U256) -> Self {
        self.word(encode_uint256(value))
    }

    /// The finished call data
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Split `transfer(address,uint256)` call data into its recipient and amount.
///
/// Other methods are `UnsupportedMessageType`. Wrong lengths and dirty address padding are
/// `MalformedEncoding`.
pub fn decode_transfer(data: &[u8]) -> CodecResult<([u8; 20], U256)> {
    if data.len() < 4 || data[..4] != TRANSFER[..] {
        return Err(CodecError::UnsupportedMessageType(format!(
            "contract call 0x{}",
            hex::encode(&data[..data.len().min(4)])
        )));
    }
    let args = &data[4..];
    if args.len() != 2 * WORD_LENGTH {
        return Err(CodecError::MalformedEncoding(format!(
            "transfer arguments must be {} bytes, got {}",
            2 * WORD_LENGTH,
            args.len()
        )));
    }
    let (address_word, amount_word) = args.split_at(WORD_LENGTH);
    if address_word[..12].iter().any(|b| *b != 0) {
        return Err(CodecError::MalformedEncoding(
            "address argument has non-zero padding".to_owned(),
        ));
    }
    let mut recipient = [0u8; 20];
    recipient.copy_from_slice(&address_word[12..]);
    Ok((recipient, U256::from_be_slice(amount_word)))
}
