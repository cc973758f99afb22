//! Hash functions used by the backends, and the `PrehashType` that codecs hand to signers.

use std::io::{Result as IOResult, Write};

use digest::Digest;
use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha512};
use sha3::Keccak256;

/// The hash a signer must apply to the bytes produced by `TxCodec::bytes_to_sign` before
/// signing them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrehashType {
    /// sha2-256. Used by Amino chains.
    Sha256,
    /// sha2-512. Used by weave chains.
    Sha512,
    /// The original Keccak-256 (not NIST sha3). Used by Ethereum.
    Keccak256,
}

impl PrehashType {
    /// Hash `data` with this prehash function.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            PrehashType::Sha256 => sha256(data).to_vec(),
            PrehashType::Sha512 => Sha512::digest(data).to_vec(),
            PrehashType::Keccak256 => keccak256(data).to_vec(),
        }
    }
}

/// A `Write` that feeds everything written to it into a digest. Lets `ByteFormat` types be
/// hashed without building an intermediate buffer.
#[derive(Default)]
pub struct DigestWriter<D: Digest> {
    internal: D,
}

impl<D: Digest> Write for DigestWriter<D> {
    fn write(&mut self, buf: &[u8]) -> IOResult<usize> {
        self.internal.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> IOResult<()> {
        Ok(())
    }
}

impl<D: Digest> DigestWriter<D> {
    /// Consume the writer, producing the digest bytes.
    pub fn finish(self) -> Vec<u8> {
        self.internal.finalize().to_vec()
    }
}

/// sha2-256 of `data`
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Keccak-256 of `data`
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// `ripemd160(sha256(data))`
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(sha256(data)).into()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_digests_with_each_prehash() {
        let cases = [
            (
                PrehashType::Sha256,
                "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            ),
            (
                PrehashType::Keccak256,
                "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470",
            ),
            (
                PrehashType::Sha512,
                "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e",
            ),
        ];
        for (prehash, expected) in cases.iter() {
            assert_eq!(hex::encode(prehash.digest(&[])), *expected);
        }
    }

    #[test]
    fn it_matches_direct_hashing_when_streamed() {
        let mut w = DigestWriter::<Sha256>::default();
        w.write_all(b"hello ").unwrap();
        w.write_all(b"world").unwrap();
        assert_eq!(w.finish(), sha256(b"hello world").to_vec());
    }
}
