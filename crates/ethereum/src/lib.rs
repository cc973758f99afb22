//! # xchain Ethereum
//!
//! A `TxCodec` for Ethereum chains. Transactions travel as legacy 9-element RLP lists,
//! `[nonce, gas_price, gas_limit, to, value, data, v, r, s]`, with EIP-155 replay protection.
//!
//! Native sends move ether directly. Everything else is a contract call: ERC20 transfers and
//! approvals target the token contract, and atomic swaps target one of the two swap contracts
//! named in `EthereumConfig`.
//!
//! ## Crate Layout
//!
//! - `abi` builds contract call data.
//! - `enc` derives and checks EIP-55 addresses.
//! - `rlp` frames transactions and computes `v`.
//! - `codec` ties them together as `EthereumCodec`.
//!
//! Parsing only reconstructs sends, native or ERC20. Swap and approval calls are encoded but
//! never decoded.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod abi;
pub mod codec;
pub mod enc;
pub mod rlp;

pub use codec::*;
