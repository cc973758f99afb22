//! A simple trait for binary (de)Serialization using std `Read` and `Write` traits.

use std::{
    convert::TryInto,
    io::{Cursor, Error as IOError, Read, Write},
};

use hex::FromHexError;
use thiserror::Error;

/// Errors related to serialization of types.
#[derive(Debug, Error)]
pub enum SerError {
    /// A fixed-length field got the wrong number of bytes.
    #[error("Invalid length for {field}. Expected {expected} bytes, got {got}.")]
    InvalidLength {
        /// The name of the field being read
        field: &'static str,
        /// The required byte length
        expected: usize,
        /// The byte length we actually got
        got: usize,
    },

    /// Input continued after a complete value was read.
    #[error("Unexpected trailing bytes. {0} bytes left unread.")]
    TrailingBytes(usize),

    /// IOError bubbled up from a `Write` passed to a `ByteFormat::write_to` implementation.
    #[error(transparent)]
    IOError(#[from] IOError),

    /// `deserialize_hex` encountered an error on its input.
    #[error(transparent)]
    FromHexError(#[from] FromHexError),
}

/// Type alias for serialization errors
pub type SerResult<T> = Result<T, SerError>;

/// Check that `bytes` is exactly `N` long and copy it into an array. This is the only place
/// fixed-size byte invariants are enforced, so every backend reports them the same way.
///
/// ```
/// use xchain_core::ser::{fixed_length, SerError};
///
/// let arr: [u8; 4] = fixed_length("nonce", &[1, 2, 3, 4]).unwrap();
/// assert_eq!(arr, [1, 2, 3, 4]);
///
/// match fixed_length::<32>("swap_id", &[0u8; 31]) {
///     Err(SerError::InvalidLength { expected: 32, got: 31, .. }) => {}
///     _ => panic!("expected a length error"),
/// }
/// ```
pub fn fixed_length<const N: usize>(field: &'static str, bytes: &[u8]) -> SerResult<[u8; N]> {
    bytes.try_into().map_err(|_| SerError::InvalidLength {
        field,
        expected: N,
        got: bytes.len(),
    })
}

/// A simple trait for deserializing from `std::io::Read` and serializing to `std::io::Write`.
///
/// `ByteFormat` is used for the fixed-length byte types of the model, for key and signature
/// wrappers, and by backends to lay out their signable byte strings.
pub trait ByteFormat {
    /// An associated error type
    type Error: From<SerError> + From<IOError> + std::error::Error;

    /// Returns the byte-length of the serialized data structure.
    fn serialized_length(&self) -> usize;

    /// Deserializes an instance of `Self` from a `std::io::Read`.
    /// The `limit` argument is used only when deserializing collections, and specifies a maximum
    /// number of instances of the underlying type to read.
    fn read_from<R>(reader: &mut R, limit: usize) -> Result<Self, Self::Error>
    where
        R: Read,
        Self: std::marker::Sized;

    /// Serializes `self` to a `std::io::Write`. Following `Write` trait conventions, its `Ok`
    /// type is a `usize` denoting the number of bytes written.
    fn write_to<W>(&self, writer: &mut W) -> Result<usize, Self::Error>
    where
        W: Write;

    /// Decodes a hex string to a `Vec<u8>`, deserializes an instance of `Self` from that vector.
    /// Fails if any input is left over.
    fn deserialize_hex(s: &str) -> Result<Self, Self::Error>
    where
        Self: std::marker::Sized,
    {
        let v: Vec<u8> = hex::decode(s).map_err(SerError::from)?;
        let len = v.len();
        let mut cursor = Cursor::new(v);
        let result = Self::read_from(&mut cursor, 0)?;
        let read = cursor.position() as usize;
        if read != len {
            return Err(SerError::TrailingBytes(len - read).into());
        }
        Ok(result)
    }

    /// Serializes `self` to a vector.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        let mut v: Vec<u8> = Vec::with_capacity(self.serialized_length());
        self.write_to(&mut v)?;
        Ok(v)
    }

    /// Serializes `self` to a vector, returns the hex-encoded vector
    fn serialize_hex(&self) -> Result<String, Self::Error> {
        Ok(hex::encode(self.to_bytes()?))
    }
}
