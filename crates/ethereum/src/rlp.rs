//! Legacy transaction framing.
//!
//! Unsigned EIP-155 transactions are `[nonce, gas_price, gas_limit, to, value, data, chain_id,
//! "", ""]`. Before EIP-155 the signer hashes only the first six fields. Signed transactions
//! always carry nine, with `v`, `r` and `s` in the last three slots.
//!
//! Every number is a minimal big-endian byte string, so zero is the empty string.

use alloy_primitives::U256;
use alloy_rlp::{Decodable, Encodable, Header, PayloadView};

use xchain_core::{ser::fixed_length, CodecError, CodecResult, Nonce, Quantity};

fn malformed(e: alloy_rlp::Error) -> CodecError {
    CodecError::MalformedEncoding(e.to_string())
}

/// How `v` binds a signature to a chain.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ForkState {
    /// Chain id 0. `v = recovery + 27`
    PreFork,
    /// `v = recovery + chain_id * 2 + 35`
    Eip155(u64),
}

impl ForkState {
    /// The fork state of a numeric chain id
    pub fn from_chain_id(chain_id: u64) -> Self {
        if chain_id == 0 {
            ForkState::PreFork
        } else {
            ForkState::Eip155(chain_id)
        }
    }

    fn v_offset(&self) -> U256 {
        match self {
            ForkState::PreFork => U256::from(27u64),
            ForkState::Eip155(chain_id) => U256::from(*chain_id) * U256::from(2u64) + U256::from(35u64),
        }
    }

    /// `v` for a recovery id
    pub fn v(&self, recovery: u8) -> U256 {
        self.v_offset() + U256::from(recovery)
    }

    /// The recovery id behind `v`, if `v` belongs to this fork state.
    pub fn recovery(&self, v: U256) -> Option<u8> {
        let offset = v.checked_sub(self.v_offset())?;
        if offset.is_zero() {
            Some(0)
        } else if offset == U256::from(1u64) {
            Some(1)
        } else {
            None
        }
    }
}

/// The signature slots of a signed transaction.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RlpSignature {
    /// Recovery id, offset by the fork state
    pub v: U256,
    /// ECDSA `r`
    pub r: U256,
    /// ECDSA `s`
    pub s: U256,
}

impl RlpSignature {
    /// Split a 65-byte `r || s || recovery` signature.
    pub fn from_recoverable(signature: &[u8], fork: ForkState) -> CodecResult<Self> {
        let signature: [u8; 65] = fixed_length("signature", signature)?;
        if signature[64] > 1 {
            return Err(CodecError::MalformedEncoding(format!(
                "invalid recovery id {}",
                signature[64]
            )));
        }
        Ok(Self {
            v: fork.v(signature[64]),
            r: U256::from_be_slice(&signature[..32]),
            s: U256::from_be_slice(&signature[32..64]),
        })
    }

    /// Join back into `r || s || recovery`.
    pub fn to_recoverable(&self, fork: ForkState) -> CodecResult<[u8; 65]> {
        let recovery = fork.recovery(self.v).ok_or_else(|| {
            CodecError::MalformedEncoding(format!("v {} does not match {:?}", self.v, fork))
        })?;
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r.to_be_bytes::<32>());
        out[32..64].copy_from_slice(&self.s.to_be_bytes::<32>());
        out[64] = recovery;
        Ok(out)
    }

    fn length(&self) -> usize {
        self.v.length() + self.r.length() + self.s.length()
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.v.encode(out);
        self.r.encode(out);
        self.s.encode(out);
    }
}

/// The six payload fields of a legacy transaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LegacyTx {
    /// Sender nonce
    pub nonce: Nonce,
    /// Wei per unit of gas
    pub gas_price: U256,
    /// Gas limit
    pub gas_limit: U256,
    /// Recipient or contract address
    pub to: [u8; 20],
    /// Wei transferred
    pub value: U256,
    /// Call data, or the memo of a native send
    pub data: Vec<u8>,
}

impl LegacyTx {
    fn fields_length(&self) -> usize {
        self.nonce.length()
            + self.gas_price.length()
            + self.gas_limit.length()
            + Encodable::length(&self.to[..])
            + self.value.length()
            + Encodable::length(&self.data[..])
    }

    fn encode_list(&self, signature: Option<&RlpSignature>) -> Vec<u8> {
        let payload_length =
            self.fields_length() + signature.map(RlpSignature::length).unwrap_or_default();
        let mut out = Vec::with_capacity(payload_length + 9);
        Header {
            list: true,
            payload_length,
        }
        .encode(&mut out);
        self.nonce.encode(&mut out);
        self.gas_price.encode(&mut out);
        self.gas_limit.encode(&mut out);
        Encodable::encode(&self.to[..], &mut out);
        self.value.encode(&mut out);
        Encodable::encode(&self.data[..], &mut out);
        if let Some(signature) = signature {
            signature.encode(&mut out);
        }
        out
    }

    /// The bytes a signer hashes.
    pub fn signing_bytes(&self, fork: ForkState) -> Vec<u8> {
        match fork {
            ForkState::PreFork => self.encode_list(None),
            ForkState::Eip155(chain_id) => self.encode_list(Some(&RlpSignature {
                v: U256::from(chain_id),
                r: U256::ZERO,
                s: U256::ZERO,
            })),
        }
    }

    /// The signed nine-element list.
    pub fn signed_bytes(&self, signature: &RlpSignature) -> Vec<u8> {
        self.encode_list(Some(signature))
    }

    /// Decode a six- or nine-element list. Six elements carry no signature.
    ///
    /// Trailing bytes, non-minimal integers and any other list length are
    /// `MalformedEncoding`.
    pub fn decode(bytes: &[u8]) -> CodecResult<(Self, Option<RlpSignature>)> {
        let mut buf = bytes;
        let items = match Header::decode_raw(&mut buf).map_err(malformed)? {
            PayloadView::List(items) => items,
            PayloadView::String(_) => {
                return Err(CodecError::MalformedEncoding(
                    "expected an RLP list".to_owned(),
                ))
            }
        };
        if !buf.is_empty() {
            return Err(CodecError::MalformedEncoding(format!(
                "{} trailing bytes",
                buf.len()
            )));
        }
        if items.len() != 6 && items.len() != 9 {
            return Err(CodecError::MalformedEncoding(format!(
                "expected 6 or 9 fields, got {}",
                items.len()
            )));
        }

        let tx = Self {
            nonce: decode_item(items[0])?,
            gas_price: decode_item(items[1])?,
            gas_limit: decode_item(items[2])?,
            to: fixed_length("to", decode_string(items[3])?)?,
            value: decode_item(items[4])?,
            data: decode_string(items[5])?.to_vec(),
        };
        let signature = if items.len() == 9 {
            Some(RlpSignature {
                v: decode_item(items[6])?,
                r: decode_item(items[7])?,
                s: decode_item(items[8])?,
            })
        } else {
            None
        };
        Ok((tx, signature))
    }
}

fn decode_item<T: Decodable>(mut item: &[u8]) -> CodecResult<T> {
    T::decode(&mut item).map_err(malformed)
}

fn decode_string(mut item: &[u8]) -> CodecResult<&[u8]> {
    Header::decode_bytes(&mut item, false).map_err(malformed)
}

/// Parse a decimal quantity into a 256-bit integer.
pub fn to_uint(quantity: &Quantity) -> CodecResult<U256> {
    U256::from_str_radix(quantity.as_str(), 10)
        .map_err(|_| CodecError::InvalidQuantity(quantity.to_string()))
}

/// Render a 256-bit integer as a decimal quantity.
pub fn to_quantity(value: U256) -> CodecResult<Quantity> {
    value.to_string().parse()
}
