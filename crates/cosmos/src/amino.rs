//! Amino JSON envelope types, and their translation to and from the transaction model.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use xchain_core::{
    enc::{AddressEncoder, EncodingError},
    Address, Algorithm, Amount, CodecError, CodecResult, Fee, FullSignature, PubkeyBundle,
    SendTx,
};

use crate::enc::AccountEncoder;

/// Envelope type of a standard transaction
pub const STD_TX_TYPE: &str = "auth/StdTx";

/// Message type of a bank send
pub const MSG_SEND_TYPE: &str = "cosmos-sdk/MsgSend";

/// Amino type of a secp256k1 public key
pub const SECP256K1_PUBKEY_TYPE: &str = "tendermint/PubKeySecp256k1";

/// Amino type of an Ed25519 public key
pub const ED25519_PUBKEY_TYPE: &str = "tendermint/PubKeyEd25519";

/// A token amount.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    /// Token ticker
    pub denom: String,
    /// Atomic units, as a decimal string
    pub amount: String,
}

/// A fee with its gas limit.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StdFee {
    /// Fee tokens
    pub amount: Vec<Coin>,
    /// Gas limit, as a decimal string
    pub gas: String,
}

/// The value of a `cosmos-sdk/MsgSend`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MsgSend {
    /// Sender account
    pub from_address: String,
    /// Recipient account
    pub to_address: String,
    /// Amounts sent
    pub amount: Vec<Coin>,
}

/// A message of any type. The value is left as JSON until the type is known.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AminoMsg {
    /// Message type, e.g. `cosmos-sdk/MsgSend`
    #[serde(rename = "type")]
    pub kind: String,
    /// Message content
    pub value: Value,
}

/// A typed, base64-encoded public key.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AminoPubKey {
    /// Key type, e.g. `tendermint/PubKeySecp256k1`
    #[serde(rename = "type")]
    pub kind: String,
    /// Base64 key bytes
    pub value: String,
}

/// A signature with its public key. `sequence` carries the signer's nonce; signatures
/// returned by a node leave it out.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StdSignature {
    /// The signer's public key
    pub pub_key: AminoPubKey,
    /// Base64 signature bytes
    pub signature: String,
    /// The signer's nonce, as a decimal string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
}

/// The content of a standard transaction. Every field may be absent on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StdTx {
    /// Messages
    #[serde(default)]
    pub msg: Option<Vec<AminoMsg>>,
    /// Fee
    #[serde(default)]
    pub fee: Option<StdFee>,
    /// Signatures, primary first
    #[serde(default)]
    pub signatures: Option<Vec<StdSignature>>,
    /// Memo. Empty means none.
    #[serde(default)]
    pub memo: String,
}

/// The outer envelope, `{"type": "auth/StdTx", "value": {...}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AminoTx {
    /// Envelope type
    #[serde(rename = "type")]
    pub kind: String,
    /// Envelope content
    pub value: StdTx,
}

/// A coin for an amount, as `{denom: ticker, amount: quantity}`.
pub fn encode_amount(amount: &Amount, fractional_digits: u32) -> CodecResult<Coin> {
    if amount.fractional_digits != fractional_digits {
        return Err(CodecError::UnsupportedShape(format!(
            "amounts need {} fractional digits, got {}",
            fractional_digits, amount.fractional_digits
        )));
    }
    Ok(Coin {
        denom: amount.ticker.clone(),
        amount: amount.quantity.to_string(),
    })
}

/// An amount for a coin.
pub fn decode_amount(coin: &Coin, fractional_digits: u32) -> CodecResult<Amount> {
    Amount::new(&coin.amount, fractional_digits, &coin.denom)
}

/// A fee needs both tokens and a gas limit. Gas prices are not expressible.
pub fn encode_fee(fee: &Fee, fractional_digits: u32) -> CodecResult<StdFee> {
    if fee.gas_price.is_some() {
        return Err(CodecError::UnsupportedShape(
            "amino fees have no gas price".to_owned(),
        ));
    }
    let tokens = fee.tokens.as_ref().ok_or(CodecError::MissingField("fee.tokens"))?;
    let gas = fee.gas_limit.as_ref().ok_or(CodecError::MissingField("fee.gas_limit"))?;
    Ok(StdFee {
        amount: vec![encode_amount(tokens, fractional_digits)?],
        gas: gas.to_string(),
    })
}

/// Read a fee. Exactly one fee coin is supported.
pub fn decode_fee(fee: &StdFee, fractional_digits: u32) -> CodecResult<Fee> {
    if fee.amount.len() != 1 {
        return Err(CodecError::UnsupportedShape(format!(
            "fees with {} coins",
            fee.amount.len()
        )));
    }
    Ok(Fee {
        tokens: Some(decode_amount(&fee.amount[0], fractional_digits)?),
        gas_price: None,
        gas_limit: Some(fee.gas.parse()?),
    })
}

/// The message for a send.
pub fn encode_send(send: &SendTx, fractional_digits: u32) -> CodecResult<AminoMsg> {
    let value = MsgSend {
        from_address: send.sender.to_string(),
        to_address: send.recipient.to_string(),
        amount: vec![encode_amount(&send.amount, fractional_digits)?],
    };
    Ok(AminoMsg {
        kind: MSG_SEND_TYPE.to_owned(),
        value: serde_json::to_value(value)
            .map_err(|e| CodecError::MalformedEncoding(e.to_string()))?,
    })
}

/// Read an account address off the wire. Other namespaces keep their prefix error.
fn decode_account(field: &str, address: String) -> CodecResult<Address> {
    let address = Address::from(address);
    match AccountEncoder::decode_address(&address) {
        Ok(_) => Ok(address),
        Err(e @ EncodingError::InvalidPrefix { .. }) => Err(e.into()),
        Err(e) => Err(CodecError::MalformedEncoding(format!("{}: {}", field, e))),
    }
}

/// Read a send. The memo lives on the envelope, so it is left empty here.
pub fn decode_send(msg: &AminoMsg, fractional_digits: u32) -> CodecResult<SendTx> {
    if msg.kind != MSG_SEND_TYPE {
        return Err(CodecError::UnsupportedMessageType(msg.kind.clone()));
    }
    let value: MsgSend = serde_json::from_value(msg.value.clone())
        .map_err(|e| CodecError::MalformedEncoding(e.to_string()))?;
    if value.amount.len() != 1 {
        return Err(CodecError::UnsupportedShape(format!(
            "sends with {} amounts",
            value.amount.len()
        )));
    }
    Ok(SendTx {
        amount: decode_amount(&value.amount[0], fractional_digits)?,
        sender: decode_account("from_address", value.from_address)?,
        recipient: decode_account("to_address", value.to_address)?,
        memo: None,
    })
}

/// Wrap a public key in its amino type.
pub fn encode_pubkey(pubkey: &PubkeyBundle) -> AminoPubKey {
    let kind = match pubkey.algo {
        Algorithm::Secp256k1 => SECP256K1_PUBKEY_TYPE,
        Algorithm::Ed25519 => ED25519_PUBKEY_TYPE,
    };
    AminoPubKey {
        kind: kind.to_owned(),
        value: BASE64.encode(pubkey.data.items()),
    }
}

fn decode_base64(field: &str, value: &str) -> CodecResult<Vec<u8>> {
    BASE64
        .decode(value)
        .map_err(|e| CodecError::MalformedEncoding(format!("{}: {}", field, e)))
}

/// Unwrap a typed public key.
pub fn decode_pubkey(pubkey: &AminoPubKey) -> CodecResult<PubkeyBundle> {
    let data = decode_base64("pub_key", &pubkey.value)?;
    match pubkey.kind.as_str() {
        SECP256K1_PUBKEY_TYPE => Ok(PubkeyBundle::secp256k1(&data)),
        ED25519_PUBKEY_TYPE => Ok(PubkeyBundle::ed25519(&data)),
        other => Err(CodecError::UnsupportedShape(format!("pubkey type {}", other))),
    }
}

/// Wrap a full signature.
pub fn encode_signature(signature: &FullSignature) -> StdSignature {
    StdSignature {
        pub_key: encode_pubkey(&signature.pubkey),
        signature: BASE64.encode(signature.signature.items()),
        sequence: Some(signature.nonce.to_string()),
    }
}

/// Unwrap a full signature. A missing sequence reads as nonce 0.
pub fn decode_signature(signature: &StdSignature) -> CodecResult<FullSignature> {
    let nonce = match &signature.sequence {
        Some(sequence) => sequence
            .parse()
            .map_err(|_| CodecError::MalformedEncoding(format!("sequence {:?}", sequence)))?,
        None => 0,
    };
    Ok(FullSignature {
        nonce,
        pubkey: decode_pubkey(&signature.pub_key)?,
        signature: decode_base64("signature", &signature.signature)?.into(),
    })
}
