//! The chain-agnostic transaction model.

pub mod governance;
pub mod keys;
pub mod primitives;
pub mod swap;
pub mod tx;

pub use governance::*;
pub use keys::*;
pub use primitives::*;
pub use swap::*;
pub use tx::*;
