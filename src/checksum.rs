//! Checksum types (§3.1, §4.5): fixed-size raw byte arrays with no length prefix on the
//! wire, plus the digest helper functions the domain uses to compute them
//! (`chain.Checksum160Digest`/`Checksum256Digest`/`Checksum512Digest` in
//! `original_source/chain/checksum.go`).

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

use crate::abi::{Decode, Decoder, Encode, Encoder};
use crate::error::{Error, Result};

macro_rules! impl_checksum {
    ($name:ident, $size:expr) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub [u8; $size]);

        impl $name {
            pub const SIZE: usize = $size;

            pub fn from_bytes(bytes: [u8; $size]) -> Self {
                $name(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; $size] {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name([0u8; $size])
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), hex::encode(self.0))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", hex::encode(self.0))
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let bytes = hex::decode(s)
                    .map_err(|_| Error::InvalidKey(concat!("invalid hex for ", stringify!($name))))?;
                let array: [u8; $size] = bytes
                    .try_into()
                    .map_err(|_| Error::InvalidKey(concat!(stringify!($name), " has the wrong length")))?;
                Ok($name(array))
            }
        }

        impl Encode for $name {
            fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
                enc.write_raw(&self.0)
            }
        }

        impl Decode for $name {
            const MIN_SIZE: usize = $size;

            fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
                let bytes = dec.read_raw($size)?;
                Ok($name(bytes.try_into().expect("read_raw returns exactly $size bytes")))
            }
        }
    };
}

impl_checksum!(Checksum160, 20);
impl_checksum!(Checksum256, 32);
impl_checksum!(Checksum512, 64);

/// RIPEMD-160 digest of `message`, truncated to 20 bytes (the hash's native output size).
pub fn ripemd160(message: &[u8]) -> Checksum160 {
    let mut hasher = Ripemd160::new();
    hasher.update(message);
    let digest = hasher.finalize();
    Checksum160(digest.into())
}

/// SHA-256 digest of `message`.
pub fn sha256(message: &[u8]) -> Checksum256 {
    let mut hasher = Sha256::new();
    hasher.update(message);
    let digest = hasher.finalize();
    Checksum256(digest.into())
}

/// SHA-512 digest of `message`.
pub fn sha512(message: &[u8]) -> Checksum512 {
    let mut hasher = Sha512::new();
    hasher.update(message);
    let digest = hasher.finalize();
    Checksum512(digest.into())
}
