//! `Symbol` / `SymbolCode` / `Asset` (§3.1): the 8-byte precision+ticker pair, the
//! 8-byte bare ticker, and the 16-byte signed-amount-plus-symbol pair used throughout
//! the domain layer for token balances and transfers.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::abi::{Decode, Decoder, Encode, Encoder};
use crate::error::{Error, Result};

const MAX_PRECISION: u8 = 18;

fn validate_ticker(ticker: &str) -> Result<()> {
    if ticker.is_empty() || ticker.len() > 7 {
        return Err(Error::InvalidKey("symbol ticker must be 1-7 characters"));
    }
    if !ticker.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(Error::InvalidKey("symbol ticker must be uppercase ASCII"));
    }
    Ok(())
}

/// `SymbolCode` (§3.1): 8 bytes, uppercase ASCII ticker only, nul-padded, no precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolCode(pub u64);

impl SymbolCode {
    pub fn new(ticker: &str) -> Result<Self> {
        validate_ticker(ticker)?;
        let mut bytes = [0u8; 8];
        bytes[..ticker.len()].copy_from_slice(ticker.as_bytes());
        Ok(SymbolCode(u64::from_le_bytes(bytes)))
    }

    pub fn ticker(&self) -> String {
        let bytes = self.0.to_le_bytes();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(8);
        String::from_utf8_lossy(&bytes[..end]).into_owned()
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ticker())
    }
}

impl FromStr for SymbolCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SymbolCode::new(s)
    }
}

impl Encode for SymbolCode {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_u64(self.0)
    }
}

impl Decode for SymbolCode {
    const MIN_SIZE: usize = 8;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(SymbolCode(dec.read_u64()?))
    }
}

/// `Symbol` (§3.1): low byte is precision (0-18), upper 7 bytes are the uppercase ASCII
/// ticker, nul-padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(pub u64);

impl Symbol {
    pub fn new(precision: u8, ticker: &str) -> Result<Self> {
        if precision > MAX_PRECISION {
            return Err(Error::InvalidKey("symbol precision must be <= 18"));
        }
        validate_ticker(ticker)?;
        let mut bytes = [0u8; 8];
        bytes[0] = precision;
        bytes[1..1 + ticker.len()].copy_from_slice(ticker.as_bytes());
        Ok(Symbol(u64::from_le_bytes(bytes)))
    }

    pub fn precision(&self) -> u8 {
        (self.0 & 0xff) as u8
    }

    pub fn ticker(&self) -> String {
        let bytes = self.0.to_le_bytes();
        let tail = &bytes[1..];
        let end = tail.iter().position(|&b| b == 0).unwrap_or(7);
        String::from_utf8_lossy(&tail[..end]).into_owned()
    }

    pub fn code(&self) -> SymbolCode {
        SymbolCode::new(&self.ticker()).expect("symbol ticker is always valid")
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision(), self.ticker())
    }
}

impl FromStr for Symbol {
    type Err = Error;

    /// Parses the conventional `"<precision>,<TICKER>"` string form, e.g. `"4,EOS"`.
    fn from_str(s: &str) -> Result<Self> {
        let (precision, ticker) = s
            .split_once(',')
            .ok_or(Error::InvalidKey("symbol string must be \"precision,TICKER\""))?;
        let precision: u8 = precision
            .parse()
            .map_err(|_| Error::InvalidKey("symbol precision is not a valid u8"))?;
        Symbol::new(precision, ticker)
    }
}

impl Encode for Symbol {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_u64(self.0)
    }
}

impl Decode for Symbol {
    const MIN_SIZE: usize = 8;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        Ok(Symbol(dec.read_u64()?))
    }
}

/// `Asset` (§3.1): a 16-byte struct, `i64` amount followed by `Symbol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Asset {
    pub amount: i64,
    pub symbol: Symbol,
}

impl Asset {
    pub fn new(amount: i64, symbol: Symbol) -> Self {
        Asset { amount, symbol }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = self.symbol.precision() as usize;
        let negative = self.amount < 0;
        let magnitude = self.amount.unsigned_abs();
        let digits = magnitude.to_string();
        let s = if precision == 0 {
            digits
        } else {
            let digits = format!("{:0>width$}", digits, width = precision + 1);
            let split = digits.len() - precision;
            format!("{}.{}", &digits[..split], &digits[split..])
        };
        write!(
            f,
            "{}{} {}",
            if negative { "-" } else { "" },
            s,
            self.symbol.ticker()
        )
    }
}

impl Encode for Asset {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        enc.write_i64(self.amount)?;
        self.symbol.encode(enc)
    }
}

impl Decode for Asset {
    const MIN_SIZE: usize = 16;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        let amount = dec.read_i64()?;
        let symbol = Symbol::decode(dec)?;
        Ok(Asset { amount, symbol })
    }
}
