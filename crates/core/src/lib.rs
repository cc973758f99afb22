//! # xchain Core
//!
//! `xchain-core` contains the chain-agnostic transaction model and the traits
//! shared by the `xchain-weave`, `xchain-cosmos` and `xchain-ethereum`
//! backends.
//!
//! ## Crate Layout
//!
//! ### Types
//!
//! The `types` module holds the transaction model. A `Transaction` is a
//! `creator` identity, an optional `Fee`, and a `TxBody`, which is a closed
//! sum type tagged by a `kind` string (`bcp/send`, `bcp/swap_offer`,
//! `grafain/create_escrow`, ...). Swap identifiers, hash locks and preimages
//! are fixed 32-byte newtypes that share one length validator.
//!
//! ### ByteFormat trait
//!
//! The `ByteFormat` trait is a simple serialization API using
//! `std::io::{Read, Write}`. The fixed-length byte types and the raw byte
//! wrappers (`PubkeyBytes`, `SignatureBytes`) implement it, and get hex serde
//! for free via `impl_hex_serde!`.
//!
//! ### Enc
//!
//! The `enc` module provides the `AddressEncoder` trait and a bech32 encoder
//! parameterized by a `NetworkParams` type, which is how backends describe
//! their address namespaces.
//!
//! ### Codec
//!
//! `TxCodec` is the contract every backend implements: `bytes_to_sign`,
//! `bytes_to_post`, `parse_bytes`, `identifier` and `identity_to_address`.
//! The `signer` module connects a codec to an asynchronous `TxSigner`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

#[macro_use]
pub mod macros;

pub mod codec;
pub mod enc;
pub mod error;
pub mod hashes;
pub mod ser;
pub mod signer;
pub mod types;

pub use codec::*;
pub use error::*;
pub use types::*;
