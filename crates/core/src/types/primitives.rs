//! Scalar building blocks of the transaction model: addresses, chain ids, token quantities,
//! amounts, fees and transaction ids.

use std::{convert::TryFrom, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// A per-account counter used for replay protection. Weave calls it a sequence.
pub type Nonce = u64;

/// A chain-specific address string. Addresses are always derived from public keys by a codec,
/// never stored on an `Identity`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chain identifier, e.g. `iov-mainnet`, `cosmoshub-3` or `ethereum-eip155-1`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    /// Return the chain id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ChainId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChainId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ChainId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A non-negative base-10 integer string, in the smallest unit of its token. No sign, no
/// leading zeros (other than the literal `"0"`).
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Quantity(String);

impl Quantity {
    /// Return the quantity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the quantity is zero
    pub fn is_zero(&self) -> bool {
        self.0 == "0"
    }
}

impl FromStr for Quantity {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits_only = !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        let canonical = s == "0" || !s.starts_with('0');
        if !digits_only || !canonical {
            return Err(CodecError::InvalidQuantity(s.to_owned()));
        }
        Ok(Self(s.to_owned()))
    }
}

impl TryFrom<String> for Quantity {
    type Error = CodecError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Quantity> for String {
    fn from(q: Quantity) -> String {
        q.0
    }
}

impl From<u64> for Quantity {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<u128> for Quantity {
    fn from(n: u128) -> Self {
        Self(n.to_string())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An amount of some token.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Amount {
    /// The amount in atomic units
    pub quantity: Quantity,
    /// How many of the quantity's digits are after the decimal point
    pub fractional_digits: u32,
    /// The token ticker, e.g. `ETH` or `IOV`
    pub ticker: String,
}

impl Amount {
    /// Build an amount, validating `quantity`.
    pub fn new(quantity: &str, fractional_digits: u32, ticker: &str) -> Result<Self, CodecError> {
        Ok(Self {
            quantity: quantity.parse()?,
            fractional_digits,
            ticker: ticker.to_owned(),
        })
    }
}

/// A transaction fee. Backends decide which fields they require.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Fee {
    /// A flat token fee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Amount>,
    /// Price per unit of gas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<Amount>,
    /// Maximum gas, as a decimal string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<Quantity>,
}

impl Fee {
    /// A fee consisting only of tokens
    pub fn tokens(amount: Amount) -> Self {
        Self {
            tokens: Some(amount),
            ..Default::default()
        }
    }
}

/// A transaction identifier: the uppercase hex of a 32-byte content hash over the posted bytes.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Render a digest as an identifier
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        Self(hex::encode_upper(digest))
    }

    /// Return the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
