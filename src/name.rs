//! `Name` (§3.1, §4.4): a 64-bit identifier packing up to 13 characters from a restricted
//! alphabet. Used throughout the domain layer for account, action, permission, and table
//! names (`chain.N("eosio")` in the reference fixtures is this crate's `Name::from_str`).

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::abi::{Decode, Decoder, Encode, Encoder};
use crate::error::{Error, Result};

const ALPHABET: &[u8] = b".12345abcdefghijklmnopqrstuvwxyz";

fn char_index(c: u8) -> Result<u8> {
    ALPHABET
        .iter()
        .position(|&a| a == c)
        .map(|i| i as u8)
        .ok_or(Error::InvalidName(
            "character outside the name alphabet `.12345abcdefghijklmnopqrstuvwxyz`",
        ))
}

/// A 64-bit packed name. Prefer [`Name::from_str`](std::str::FromStr) over constructing
/// the wrapped `u64` directly unless you already have the packed bits (e.g. off the
/// wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Name(pub u64);

impl Name {
    pub const fn from_u64(value: u64) -> Self {
        Name(value)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Convenience alias for `Name::from_str` that returns this crate's `Result` instead
    /// of going through `FromStr`'s associated `Err` type directly.
    pub fn from_str_lossy(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() > 13 {
            return Err(Error::InvalidName("longer than 13 characters"));
        }
        let bytes = s.as_bytes();
        let mut result: u64 = 0;
        for i in 0..12usize {
            let c = bytes.get(i).copied().unwrap_or(b'.');
            result |= (char_index(c)? as u64 & 0x1f) << (64 - 5 * (i + 1));
        }
        if bytes.len() >= 13 {
            let c13 = char_index(bytes[12])?;
            if c13 > 0x0f {
                return Err(Error::InvalidName(
                    "13th character must be one of `.12345abcdefghij`",
                ));
            }
            result |= c13 as u64 & 0x0f;
        }
        Ok(Name(result))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = [b'.'; 13];
        let mut value = self.0;
        for i in (0..12usize).rev() {
            chars[i] = ALPHABET[(value & 0x1f) as usize];
            value >>= 5;
        }
        chars[12] = ALPHABET[(self.0 & 0x0f) as usize];
        let s = std::str::from_utf8(&chars).unwrap();
        write!(f, "{}", s.trim_end_matches('.'))
    }
}

impl Encode for Name {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_u64(self.0)
    }
}

impl Decode for Name {
    const MIN_SIZE: usize = 8;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(Name(dec.read_u64()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eosio_round_trips_to_known_bits() {
        let name: Name = "eosio".parse().unwrap();
        assert_eq!(name.as_u64(), 0x5530EA0000000000);
        assert_eq!(name.to_string(), "eosio");
    }

    #[test]
    fn eosio_token_round_trips_to_known_bits() {
        let name: Name = "eosio.token".parse().unwrap();
        assert_eq!(name.as_u64(), 0x5530EA3303EA6855);
        assert_eq!(name.to_string(), "eosio.token");
    }

    #[test]
    fn empty_string_is_zero() {
        let name: Name = "".parse().unwrap();
        assert_eq!(name.as_u64(), 0);
        assert_eq!(name.to_string(), "");
    }

    #[test]
    fn trailing_dots_are_canonical() {
        let with_dots: Name = "a...".parse().unwrap();
        let without: Name = "a".parse().unwrap();
        assert_eq!(with_dots, without);
        assert_eq!(with_dots.to_string(), "a");
    }

    #[test]
    fn rejects_disallowed_characters() {
        assert!(matches!("EOSIO".parse::<Name>(), Err(Error::InvalidName(_))));
        assert!(matches!("foo bar".parse::<Name>(), Err(Error::InvalidName(_))));
    }

    #[test]
    fn rejects_too_long() {
        assert!(matches!(
            "toolongaccountname".parse::<Name>(),
            Err(Error::InvalidName(_))
        ));
    }

    #[test]
    fn wire_round_trip() {
        let name: Name = "eosio.token".parse().unwrap();
        let mut enc = Encoder::new(Vec::new());
        enc.encode(&name).unwrap();
        let bytes = enc.into_inner();
        let mut dec = Decoder::new(&bytes);
        let decoded: Name = dec.decode().unwrap();
        assert_eq!(decoded, name);
    }
}
