//! Useful macros for declaring byte-oriented model types

#[macro_export]
/// Implement `serde::Serialize` and `serde::Deserialize` by passing through to the hex
macro_rules! impl_hex_serde {
    ($item:ty) => {
        impl serde::Serialize for $item {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                let s = $crate::ser::ByteFormat::serialize_hex(self)
                    .map_err(|e| serde::ser::Error::custom(e.to_string()))?;
                serializer.serialize_str(&s)
            }
        }

        impl<'de> serde::Deserialize<'de> for $item {
            fn deserialize<D>(deserializer: D) -> Result<$item, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s: String = serde::Deserialize::deserialize(deserializer)?;
                <$item as $crate::ser::ByteFormat>::deserialize_hex(&s)
                    .map_err(|e| serde::de::Error::custom(e.to_string()))
            }
        }
    };
}

#[macro_export]
/// Wrap an unprefixed vector of bytes (`u8`) in a newtype, and implement convenience functions
/// for it.
macro_rules! wrap_byte_vector {
    (
        $(#[$outer:meta])*
        $wrapper_name:ident
    ) => {
        $(#[$outer])*
        #[derive(Clone, Debug, Eq, PartialEq, Default, Hash, PartialOrd, Ord)]
        pub struct $wrapper_name(Vec<u8>);

        impl $crate::ser::ByteFormat for $wrapper_name {
            type Error = $crate::ser::SerError;

            fn serialized_length(&self) -> usize {
                self.0.len()
            }

            fn read_from<R>(reader: &mut R, _limit: usize) -> Result<Self, Self::Error>
            where
                R: std::io::Read
            {
                let mut v = vec![];
                reader.read_to_end(&mut v)?;
                Ok(Self(v))
            }

            fn write_to<W>(&self, writer: &mut W) -> Result<usize, Self::Error>
            where
                W: std::io::Write
            {
                writer.write_all(&self.0)?;
                Ok(self.0.len())
            }
        }

        impl_hex_serde!($wrapper_name);

        impl std::convert::AsRef<[u8]> for $wrapper_name {
            fn as_ref(&self) -> &[u8] {
                &self.0[..]
            }
        }

        impl $wrapper_name {
            /// Instantiate a new wrapped vector
            pub fn new(v: Vec<u8>) -> Self {
                Self(v)
            }

            /// Return a reference to the underlying bytes
            pub fn items(&self) -> &[u8] {
                &self.0
            }

            /// Return the length of the item vector.
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Return true if the length of the item vector is 0.
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }
        }

        impl From<&[u8]> for $wrapper_name {
            fn from(v: &[u8]) -> Self {
                Self(v.to_vec())
            }
        }

        impl From<Vec<u8>> for $wrapper_name {
            fn from(v: Vec<u8>) -> Self {
                Self(v)
            }
        }
    }
}

#[macro_export]
/// Make a new fixed-length byte type. Construction from a slice goes through
/// `ser::fixed_length`, so length errors carry the field name given here.
macro_rules! fixed_byte_array {
    (
        $(#[$outer:meta])*
        $name:ident, $len:expr, $field:expr
    ) => {
        $(#[$outer])*
        #[derive(Hash, Copy, Clone, Default, Debug, Eq, PartialEq, PartialOrd, Ord)]
        pub struct $name([u8; $len]);

        impl $name {
            /// The byte length of this type
            pub const LENGTH: usize = $len;

            /// Build from a slice, failing with `InvalidLength` on any other length.
            pub fn from_slice(bytes: &[u8]) -> $crate::ser::SerResult<Self> {
                Ok(Self($crate::ser::fixed_length::<$len>($field, bytes)?))
            }

            /// Return a copy of the underlying array
            pub fn bytes(&self) -> [u8; $len] {
                self.0
            }

            /// Generate a uniformly random value
            pub fn random() -> Self {
                Self(rand::random())
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl std::convert::TryFrom<&[u8]> for $name {
            type Error = $crate::ser::SerError;

            fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
                Self::from_slice(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0[..]
            }
        }

        impl $crate::ser::ByteFormat for $name {
            type Error = $crate::ser::SerError;

            fn serialized_length(&self) -> usize {
                $len
            }

            fn read_from<R>(reader: &mut R, _limit: usize) -> $crate::ser::SerResult<Self>
            where
                R: std::io::Read,
                Self: std::marker::Sized
            {
                let mut buf = [0u8; $len];
                reader.read_exact(&mut buf)?;
                Ok(Self(buf))
            }

            fn write_to<W>(&self, writer: &mut W) -> $crate::ser::SerResult<usize>
            where
                W: std::io::Write
            {
                writer.write_all(&self.0)?;
                Ok($len)
            }
        }

        impl_hex_serde!($name);
    }
}
