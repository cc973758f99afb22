//! # xchain Cosmos
//!
//! A `TxCodec` for Cosmos SDK chains speaking Amino JSON. Only `cosmos-sdk/MsgSend` is
//! modeled; every other message kind is rejected.
//!
//! Signers sign `sha256` of a sign doc: compact JSON with recursively sorted keys over the
//! account number, chain id, fee, memo, messages and sequence.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod amino;
pub mod codec;
pub mod enc;

pub use codec::*;
