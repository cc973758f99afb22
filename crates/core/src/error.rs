//! Codec errors.

use thiserror::Error;

use crate::{enc::EncodingError, ser::SerError, signer::SignerError, types::Algorithm};

/// Errors returned by `TxCodec` implementations. Every codec call either fully succeeds or
/// returns one of these; nothing is partially built.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The input bytes are not a valid encoding (truncated, corrupted, non-canonical).
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// The transaction carries no signature, so it cannot be attributed to a signer.
    #[error("Transaction has no signature")]
    MissingSignature,

    /// A required envelope field is absent.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// The message kind is not one this codec understands.
    #[error("Unsupported message type: {0}")]
    UnsupportedMessageType(String),

    /// The message is understood but its shape is not supported, e.g. multiple amounts where
    /// exactly one is required.
    #[error("Unsupported shape: {0}")]
    UnsupportedShape(String),

    /// A fixed-size field has the wrong number of bytes.
    #[error("Invalid length for {field}. Expected {expected} bytes, got {got}.")]
    InvalidLength {
        /// The field name
        field: &'static str,
        /// Required byte length
        expected: usize,
        /// Actual byte length
        got: usize,
    },

    /// An address could not be encoded or decoded.
    #[error(transparent)]
    Address(#[from] EncodingError),

    /// No token contract is configured for this ticker.
    #[error("Unknown token: {0}")]
    UnknownToken(String),

    /// Both swap contracts are configured, so the target contract is ambiguous.
    #[error("Atomic swap transactions require exactly one swap contract, but both are configured")]
    AmbiguousContract,

    /// Neither swap contract is configured.
    #[error("Atomic swap transactions require exactly one swap contract, but none is configured")]
    NoContractConfigured,

    /// A memo was given for a transaction that cannot carry one.
    #[error("Memo cannot be serialized in a contract call")]
    MemoNotSupported,

    /// The timeout kind is not the one this chain uses.
    #[error("Unsupported timeout kind")]
    UnsupportedTimeoutKind,

    /// Swap offers here carry exactly one amount.
    #[error("Swap offers support exactly one amount")]
    MultiAmountUnsupported,

    /// The amount is denominated in the wrong token.
    #[error("Wrong ticker. Expected {expected}, got {got}.")]
    WrongTicker {
        /// The ticker required here
        expected: String,
        /// The ticker given
        got: String,
    },

    /// The key algorithm is not supported by this chain.
    #[error("Unsupported algorithm: {0:?}")]
    UnsupportedAlgorithm(Algorithm),

    /// A token quantity is not a canonical non-negative integer string.
    #[error("Invalid quantity: {0:?}")]
    InvalidQuantity(String),

    /// The chain id cannot be used with this codec.
    #[error("Invalid chain id: {0}")]
    InvalidChainId(String),

    /// A proposal batch has no messages.
    #[error("Proposal batch must not be empty")]
    EmptyProposalBatch,

    /// Proposal batches nest deeper than allowed.
    #[error("Proposal batches nest deeper than {max}")]
    ProposalBatchTooDeep {
        /// The configured maximum
        max: usize,
    },

    /// The signer failed.
    #[error(transparent)]
    Signer(#[from] SignerError),
}

impl From<SerError> for CodecError {
    fn from(e: SerError) -> Self {
        match e {
            SerError::InvalidLength {
                field,
                expected,
                got,
            } => CodecError::InvalidLength {
                field,
                expected,
                got,
            },
            other => CodecError::MalformedEncoding(other.to_string()),
        }
    }
}

/// Type alias for codec results
pub type CodecResult<T> = Result<T, CodecError>;
