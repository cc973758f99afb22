//! Hash-locked atomic swap primitives.
//!
//! A swap is offered with a `SwapHash`, which locks funds until either the recipient claims
//! them by revealing the matching `Preimage`, or the `Timeout` passes and the offerer aborts.
//! The offerer picks the `SwapId`; claims and aborts refer back to it, and nothing re-derives it.

use serde::{Deserialize, Serialize};

use crate::hashes::sha256;

fixed_byte_array!(
    /// A 32-byte swap identifier, chosen by the offering party and unique per chain.
    SwapId,
    32,
    "swap_id"
);

fixed_byte_array!(
    /// The 32-byte hash lock of a swap offer.
    SwapHash,
    32,
    "hash"
);

fixed_byte_array!(
    /// The 32-byte secret that unlocks a swap.
    Preimage,
    32,
    "preimage"
);

impl Preimage {
    /// The hash lock matching this preimage: `sha256(preimage)`.
    pub fn hash(&self) -> SwapHash {
        SwapHash::from(sha256(&self.0))
    }
}

impl SwapHash {
    /// True if `preimage` unlocks this hash.
    pub fn is_unlocked_by(&self, preimage: &Preimage) -> bool {
        preimage.hash() == *self
    }
}

/// When a swap offer or escrow expires.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeout {
    /// Expires at a block height
    BlockHeight(u64),
    /// Expires at a unix timestamp, in seconds
    Timestamp(i64),
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ser::{ByteFormat, SerError};

    #[test]
    fn it_enforces_32_bytes_with_field_names() {
        let cases = [
            (SwapId::from_slice(&[0u8; 31]).map(|_| ()), "swap_id"),
            (SwapHash::from_slice(&[0u8; 33]).map(|_| ()), "hash"),
            (Preimage::from_slice(&[]).map(|_| ()), "preimage"),
        ];
        for (result, name) in cases.iter() {
            match result {
                Err(SerError::InvalidLength {
                    field,
                    expected: 32,
                    got: _,
                }) => assert_eq!(field, name),
                _ => assert!(false, "expected InvalidLength"),
            }
        }
    }

    #[test]
    fn it_locks_and_unlocks() {
        let preimage = Preimage::from([0x42; 32]);
        let hash = preimage.hash();
        assert!(hash.is_unlocked_by(&preimage));
        assert!(!hash.is_unlocked_by(&Preimage::from([0x43; 32])));
        assert_eq!(
            hash.serialize_hex().unwrap(),
            hex::encode(sha256(&[0x42; 32]))
        );
    }

    #[test]
    fn it_round_trips_through_hex_serde() {
        let id = SwapId::random();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(serde_json::from_str::<SwapId>(&json).unwrap(), id);

        let short = format!("\"{}\"", hex::encode([1u8; 16]));
        assert!(serde_json::from_str::<SwapId>(&short).is_err());
        let long = format!("\"{}\"", hex::encode([1u8; 33]));
        assert!(serde_json::from_str::<SwapId>(&long).is_err());
    }

    #[test]
    fn it_serializes_timeouts() {
        let cases = [
            (Timeout::BlockHeight(7), r#"{"block_height":7}"#),
            (Timeout::Timestamp(-3), r#"{"timestamp":-3}"#),
        ];
        for (timeout, json) in cases.iter() {
            assert_eq!(serde_json::to_string(timeout).unwrap(), *json);
        }
    }
}
