//! Keys and signatures (§3.1, §4.5): `PublicKey`/`PrivateKey`/`Signature`, each a 1-byte
//! curve tag followed by a curve-shaped payload, with a Base58-with-checksum string form
//! (`PUB_K1_...`, `SIG_K1_...`, the legacy `EOS...` public-key form) on top of the binary
//! layout. Only the byte layout is implemented here — point/signature math is an external
//! collaborator per §1.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::abi::{Decode, Decoder, Encode, Encoder};
use crate::checksum::ripemd160;
use crate::error::{Error, Result};

const K1_TAG: u8 = 0;
const R1_TAG: u8 = 1;
const WA_TAG: u8 = 2;

const K1_KEY_LEN: usize = 33;
const R1_KEY_LEN: usize = 33;
const WA_KEY_LEN: usize = 33;
const K1_SIG_LEN: usize = 65;
const R1_SIG_LEN: usize = 65;
const K1_PRIV_LEN: usize = 32;
const R1_PRIV_LEN: usize = 32;

fn curve_suffix(tag: u8) -> &'static str {
    match tag {
        K1_TAG => "K1",
        R1_TAG => "R1",
        WA_TAG => "WA",
        _ => unreachable!("curve tag validated before use"),
    }
}

/// `payload || checksum4`, where `checksum4` is the first 4 bytes of
/// `ripemd160(payload || curve_suffix_ascii)` (§4.5).
fn checksum4(payload: &[u8], suffix: &str) -> [u8; 4] {
    let mut message = payload.to_vec();
    message.extend_from_slice(suffix.as_bytes());
    let digest = ripemd160(&message);
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest.0[..4]);
    out
}

/// Legacy `EOS...` checksum: `ripemd160(payload)[0:4]`, no curve suffix mixed in.
fn legacy_checksum4(payload: &[u8]) -> [u8; 4] {
    let digest = ripemd160(payload);
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest.0[..4]);
    out
}

fn encode_base58_check(payload: &[u8], suffix: &str) -> String {
    let mut buf = payload.to_vec();
    buf.extend_from_slice(&checksum4(payload, suffix));
    bs58::encode(buf).into_string()
}

fn decode_base58_check(s: &str, suffix: &str) -> Result<Vec<u8>> {
    let raw = bs58::decode(s)
        .into_vec()
        .map_err(|_| Error::InvalidKey("invalid base58"))?;
    if raw.len() < 4 {
        return Err(Error::InvalidKey("base58 payload too short for checksum"));
    }
    let (payload, checksum) = raw.split_at(raw.len() - 4);
    if checksum4(payload, suffix) != checksum {
        return Err(Error::InvalidKey("base58 checksum mismatch"));
    }
    Ok(payload.to_vec())
}

fn decode_legacy_base58_check(s: &str) -> Result<Vec<u8>> {
    let raw = bs58::decode(s)
        .into_vec()
        .map_err(|_| Error::InvalidKey("invalid base58"))?;
    if raw.len() < 4 {
        return Err(Error::InvalidKey("base58 payload too short for checksum"));
    }
    let (payload, checksum) = raw.split_at(raw.len() - 4);
    if legacy_checksum4(payload) != checksum {
        return Err(Error::InvalidKey("legacy base58 checksum mismatch"));
    }
    Ok(payload.to_vec())
}

/// `PublicKey` (§3.1): curve tag + compressed point (K1/R1), or WA's point-plus-metadata
/// payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    K1([u8; K1_KEY_LEN]),
    R1([u8; R1_KEY_LEN]),
    Wa { key: [u8; WA_KEY_LEN], metadata: Vec<u8> },
}

impl PublicKey {
    pub fn from_string(s: &str) -> Result<Self> {
        if let Some(rest) = s.strip_prefix("PUB_K1_") {
            let payload = decode_base58_check(rest, "K1")?;
            let key: [u8; K1_KEY_LEN] = payload
                .try_into()
                .map_err(|_| Error::InvalidKey("K1 public key has the wrong length"))?;
            return Ok(PublicKey::K1(key));
        }
        if let Some(rest) = s.strip_prefix("PUB_R1_") {
            let payload = decode_base58_check(rest, "R1")?;
            let key: [u8; R1_KEY_LEN] = payload
                .try_into()
                .map_err(|_| Error::InvalidKey("R1 public key has the wrong length"))?;
            return Ok(PublicKey::R1(key));
        }
        if let Some(rest) = s.strip_prefix("PUB_WA_") {
            let payload = decode_base58_check(rest, "WA")?;
            if payload.len() < WA_KEY_LEN {
                return Err(Error::InvalidKey("WA public key payload too short"));
            }
            let (key, metadata) = payload.split_at(WA_KEY_LEN);
            return Ok(PublicKey::Wa {
                key: key.try_into().expect("split_at guarantees WA_KEY_LEN"),
                metadata: metadata.to_vec(),
            });
        }
        if let Some(rest) = s.strip_prefix("EOS") {
            let payload = decode_legacy_base58_check(rest)?;
            let key: [u8; K1_KEY_LEN] = payload
                .try_into()
                .map_err(|_| Error::InvalidKey("legacy public key has the wrong length"))?;
            return Ok(PublicKey::K1(key));
        }
        Err(Error::InvalidKey("unrecognized public key prefix"))
    }

    pub fn to_legacy_string(&self) -> Result<String> {
        match self {
            PublicKey::K1(key) => {
                let mut buf = key.to_vec();
                buf.extend_from_slice(&legacy_checksum4(key));
                Ok(format!("EOS{}", bs58::encode(buf).into_string()))
            }
            _ => Err(Error::InvalidKey("only K1 keys have a legacy string form")),
        }
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicKey::K1(key) => write!(f, "PUB_K1_{}", encode_base58_check(key, "K1")),
            PublicKey::R1(key) => write!(f, "PUB_R1_{}", encode_base58_check(key, "R1")),
            PublicKey::Wa { key, metadata } => {
                let mut payload = key.to_vec();
                payload.extend_from_slice(metadata);
                write!(f, "PUB_WA_{}", encode_base58_check(&payload, "WA"))
            }
        }
    }
}

impl FromStr for PublicKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PublicKey::from_string(s)
    }
}

impl Encode for PublicKey {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        match self {
            PublicKey::K1(key) => {
                enc.write_u8(K1_TAG)?;
                enc.write_raw(key)
            }
            PublicKey::R1(key) => {
                enc.write_u8(R1_TAG)?;
                enc.write_raw(key)
            }
            PublicKey::Wa { key, metadata } => {
                enc.write_u8(WA_TAG)?;
                enc.write_raw(key)?;
                enc.write_bytes(metadata)
            }
        }
    }
}

impl Decode for PublicKey {
    const MIN_SIZE: usize = 1 + K1_KEY_LEN;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        match dec.read_u8()? {
            K1_TAG => Ok(PublicKey::K1(
                dec.read_raw(K1_KEY_LEN)?
                    .try_into()
                    .expect("read_raw returns exactly K1_KEY_LEN bytes"),
            )),
            R1_TAG => Ok(PublicKey::R1(
                dec.read_raw(R1_KEY_LEN)?
                    .try_into()
                    .expect("read_raw returns exactly R1_KEY_LEN bytes"),
            )),
            WA_TAG => {
                let key: [u8; WA_KEY_LEN] = dec
                    .read_raw(WA_KEY_LEN)?
                    .try_into()
                    .expect("read_raw returns exactly WA_KEY_LEN bytes");
                let metadata = dec.read_bytes()?;
                Ok(PublicKey::Wa { key, metadata })
            }
            _ => Err(Error::InvalidKey("unknown public key curve tag")),
        }
    }
}

/// `PrivateKey` (§3.1): curve tag + 32-byte scalar (K1/R1), or a WA-specific payload.
#[derive(Clone, PartialEq, Eq)]
pub enum PrivateKey {
    K1([u8; K1_PRIV_LEN]),
    R1([u8; R1_PRIV_LEN]),
    Wa(Vec<u8>),
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({})", curve_suffix(self.curve_tag()))
    }
}

impl PrivateKey {
    fn curve_tag(&self) -> u8 {
        match self {
            PrivateKey::K1(_) => K1_TAG,
            PrivateKey::R1(_) => R1_TAG,
            PrivateKey::Wa(_) => WA_TAG,
        }
    }

    pub fn from_string(s: &str) -> Result<Self> {
        if let Some(rest) = s.strip_prefix("PVT_K1_") {
            let payload = decode_base58_check(rest, "K1")?;
            let key: [u8; K1_PRIV_LEN] = payload
                .try_into()
                .map_err(|_| Error::InvalidKey("K1 private key has the wrong length"))?;
            return Ok(PrivateKey::K1(key));
        }
        if let Some(rest) = s.strip_prefix("PVT_R1_") {
            let payload = decode_base58_check(rest, "R1")?;
            let key: [u8; R1_PRIV_LEN] = payload
                .try_into()
                .map_err(|_| Error::InvalidKey("R1 private key has the wrong length"))?;
            return Ok(PrivateKey::R1(key));
        }
        Err(Error::InvalidKey("unrecognized private key prefix"))
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivateKey::K1(key) => write!(f, "PVT_K1_{}", encode_base58_check(key, "K1")),
            PrivateKey::R1(key) => write!(f, "PVT_R1_{}", encode_base58_check(key, "R1")),
            PrivateKey::Wa(payload) => write!(f, "PVT_WA_{}", encode_base58_check(payload, "WA")),
        }
    }
}

impl FromStr for PrivateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PrivateKey::from_string(s)
    }
}

impl Encode for PrivateKey {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        match self {
            PrivateKey::K1(key) => {
                enc.write_u8(K1_TAG)?;
                enc.write_raw(key)
            }
            PrivateKey::R1(key) => {
                enc.write_u8(R1_TAG)?;
                enc.write_raw(key)
            }
            PrivateKey::Wa(payload) => {
                enc.write_u8(WA_TAG)?;
                enc.write_bytes(payload)
            }
        }
    }
}

impl Decode for PrivateKey {
    const MIN_SIZE: usize = 1 + K1_PRIV_LEN;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        match dec.read_u8()? {
            K1_TAG => Ok(PrivateKey::K1(
                dec.read_raw(K1_PRIV_LEN)?
                    .try_into()
                    .expect("read_raw returns exactly K1_PRIV_LEN bytes"),
            )),
            R1_TAG => Ok(PrivateKey::R1(
                dec.read_raw(R1_PRIV_LEN)?
                    .try_into()
                    .expect("read_raw returns exactly R1_PRIV_LEN bytes"),
            )),
            WA_TAG => Ok(PrivateKey::Wa(dec.read_bytes()?)),
            _ => Err(Error::InvalidKey("unknown private key curve tag")),
        }
    }
}

/// `Signature` (§3.1): curve tag + 65-byte recoverable signature (K1/R1), or a WA payload.
#[derive(Clone, PartialEq, Eq)]
pub enum Signature {
    K1([u8; K1_SIG_LEN]),
    R1([u8; R1_SIG_LEN]),
    Wa(Vec<u8>),
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl Signature {
    pub fn from_string(s: &str) -> Result<Self> {
        if let Some(rest) = s.strip_prefix("SIG_K1_") {
            let payload = decode_base58_check(rest, "K1")?;
            let sig: [u8; K1_SIG_LEN] = payload
                .try_into()
                .map_err(|_| Error::InvalidKey("K1 signature has the wrong length"))?;
            return Ok(Signature::K1(sig));
        }
        if let Some(rest) = s.strip_prefix("SIG_R1_") {
            let payload = decode_base58_check(rest, "R1")?;
            let sig: [u8; R1_SIG_LEN] = payload
                .try_into()
                .map_err(|_| Error::InvalidKey("R1 signature has the wrong length"))?;
            return Ok(Signature::R1(sig));
        }
        if let Some(rest) = s.strip_prefix("SIG_WA_") {
            let payload = decode_base58_check(rest, "WA")?;
            return Ok(Signature::Wa(payload));
        }
        Err(Error::InvalidKey("unrecognized signature prefix"))
    }

    pub fn must_from_string(s: &str) -> Self {
        Signature::from_string(s).expect("valid signature string")
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signature::K1(sig) => write!(f, "SIG_K1_{}", encode_base58_check(sig, "K1")),
            Signature::R1(sig) => write!(f, "SIG_R1_{}", encode_base58_check(sig, "R1")),
            Signature::Wa(payload) => write!(f, "SIG_WA_{}", encode_base58_check(payload, "WA")),
        }
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Signature::from_string(s)
    }
}

impl Encode for Signature {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        match self {
            Signature::K1(sig) => {
                enc.write_u8(K1_TAG)?;
                enc.write_raw(sig)
            }
            Signature::R1(sig) => {
                enc.write_u8(R1_TAG)?;
                enc.write_raw(sig)
            }
            Signature::Wa(payload) => {
                enc.write_u8(WA_TAG)?;
                enc.write_bytes(payload)
            }
        }
    }
}

impl Decode for Signature {
    const MIN_SIZE: usize = 1 + K1_SIG_LEN;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        match dec.read_u8()? {
            K1_TAG => Ok(Signature::K1(
                dec.read_raw(K1_SIG_LEN)?
                    .try_into()
                    .expect("read_raw returns exactly K1_SIG_LEN bytes"),
            )),
            R1_TAG => Ok(Signature::R1(
                dec.read_raw(R1_SIG_LEN)?
                    .try_into()
                    .expect("read_raw returns exactly R1_SIG_LEN bytes"),
            )),
            WA_TAG => Ok(Signature::Wa(dec.read_bytes()?)),
            _ => Err(Error::InvalidKey("unknown signature curve tag")),
        }
    }
}
