//! # xchain Weave
//!
//! A `TxCodec` for weave chains (the grafain and BNS family). Transactions travel as
//! protobuf envelopes, declared with `prost` derives in the `proto` module.
//!
//! ## Crate Layout
//!
//! - `proto` holds the wire messages.
//! - `enc` derives `iov`/`tiov` bech32 addresses and wraps keys.
//! - `encode` and `decode` translate between the transaction model and the messages.
//! - `codec` ties them together as `WeaveCodec`, configured by `WeaveConfig`.
//!
//! Signers sign `sha512(00 CA FE 00 || len(chain_id) || chain_id || nonce || unsigned tx)`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod codec;
pub mod decode;
pub mod enc;
pub mod encode;
pub mod proto;

pub use codec::*;
