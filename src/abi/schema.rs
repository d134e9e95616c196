//! Dynamic (runtime) schema binding (§4.3): an `Abi` loaded from a JSON document and the
//! generic tagged `AbiValue` it can encode/decode without either side needing a
//! compile-time Rust type for the domain entity in question.

use std::collections::HashSet;
use std::io::Write;

use serde::Deserialize;

use crate::abi::decoder::Decoder;
use crate::abi::encoder::Encoder;
use crate::checksum::{Checksum160, Checksum256, Checksum512};
use crate::crypto::{PrivateKey, PublicKey, Signature};
use crate::error::{Error, Result};
use crate::name::Name;
use crate::symbol::{Asset, Symbol, SymbolCode};
use crate::time::{BlockTimestamp, TimePoint, TimePointSec};

const PRIMITIVES: &[&str] = &[
    "bool",
    "int8",
    "uint8",
    "int16",
    "uint16",
    "int32",
    "uint32",
    "int64",
    "uint64",
    "int128",
    "uint128",
    "float32",
    "float64",
    "varint32",
    "varuint32",
    "bytes",
    "string",
    "name",
    "symbol",
    "symbol_code",
    "asset",
    "time_point",
    "time_point_sec",
    "block_timestamp_type",
    "checksum160",
    "checksum256",
    "checksum512",
    "public_key",
    "private_key",
    "signature",
];

#[derive(Debug, Clone, Deserialize)]
struct AbiTypeAlias {
    new_type_name: String,
    #[serde(rename = "type")]
    type_: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbiField {
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbiStruct {
    pub name: String,
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub fields: Vec<AbiField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbiVariant {
    pub name: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbiTable {
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(default)]
    pub index_type: String,
    #[serde(default)]
    pub key_names: Vec<String>,
    #[serde(default)]
    pub key_types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbiAction {
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(default)]
    pub ricardian_contract: String,
}

/// A JSON-described schema (§4.3): aliases, structs (with single-parent inheritance),
/// variants, tables, and actions. Resolved lazily — there is no validate-at-load pass;
/// an unknown or cyclic type surfaces as an error at the first `encode`/`decode` call
/// that actually needs it (§7 "Propagation").
#[derive(Debug, Clone, Deserialize)]
pub struct Abi {
    #[serde(default)]
    pub version: String,
    #[serde(default, rename = "types")]
    types: Vec<AbiTypeAlias>,
    #[serde(default)]
    pub structs: Vec<AbiStruct>,
    #[serde(default)]
    pub variants: Vec<AbiVariant>,
    #[serde(default)]
    pub tables: Vec<AbiTable>,
    #[serde(default)]
    pub actions: Vec<AbiAction>,
}

/// A generic tagged value produced/consumed by `Abi::decode`/`Abi::encode`. Structs carry
/// their fields as an ordered name/value list (declaration order, base-struct fields
/// first); variants carry the selected arm's type name alongside its value.
#[derive(Debug, Clone, PartialEq)]
pub enum AbiValue {
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    I128(i128),
    U128(u128),
    F32(f32),
    F64(f64),
    VarInt32(i32),
    VarUint32(u32),
    Bytes(Vec<u8>),
    String(String),
    Name(Name),
    Symbol(Symbol),
    SymbolCode(SymbolCode),
    Asset(Asset),
    TimePoint(TimePoint),
    TimePointSec(TimePointSec),
    BlockTimestamp(BlockTimestamp),
    Checksum160(Checksum160),
    Checksum256(Checksum256),
    Checksum512(Checksum512),
    PublicKey(PublicKey),
    PrivateKey(PrivateKey),
    Signature(Signature),
    Array(Vec<AbiValue>),
    Optional(Option<Box<AbiValue>>),
    Extension(Option<Box<AbiValue>>),
    Struct(Vec<(String, AbiValue)>),
    Variant(String, Box<AbiValue>),
}

/// A type-name expression after suffix resolution (§4.3: `[]`, `?`, `$`, applied
/// right-to-left).
#[derive(Debug, Clone, PartialEq, Eq)]
enum TypeExpr {
    Array(Box<TypeExpr>),
    Optional(Box<TypeExpr>),
    Extension(Box<TypeExpr>),
    Named(String),
}

fn parse_type_expr(name: &str) -> TypeExpr {
    if let Some(inner) = name.strip_suffix("[]") {
        TypeExpr::Array(Box::new(parse_type_expr(inner)))
    } else if let Some(inner) = name.strip_suffix('?') {
        TypeExpr::Optional(Box::new(parse_type_expr(inner)))
    } else if let Some(inner) = name.strip_suffix('$') {
        TypeExpr::Extension(Box::new(parse_type_expr(inner)))
    } else {
        TypeExpr::Named(name.to_string())
    }
}

impl Abi {
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let abi: Abi = serde_json::from_slice(bytes)?;
        Ok(abi)
    }

    /// Resolves `name` to a fully suffix-parsed `TypeExpr`, unwinding alias chains
    /// (`types`) and erroring on a cycle or an unresolvable leaf name.
    fn resolve(&self, name: &str) -> Result<TypeExpr> {
        self.resolve_with_visited(name, &mut HashSet::new())
    }

    fn resolve_with_visited(&self, name: &str, visited: &mut HashSet<String>) -> Result<TypeExpr> {
        let expr = parse_type_expr(name);
        self.resolve_expr(expr, visited)
    }

    fn resolve_expr(&self, expr: TypeExpr, visited: &mut HashSet<String>) -> Result<TypeExpr> {
        match expr {
            TypeExpr::Array(inner) => Ok(TypeExpr::Array(Box::new(
                self.resolve_expr(*inner, visited)?,
            ))),
            TypeExpr::Optional(inner) => Ok(TypeExpr::Optional(Box::new(
                self.resolve_expr(*inner, visited)?,
            ))),
            TypeExpr::Extension(inner) => Ok(TypeExpr::Extension(Box::new(
                self.resolve_expr(*inner, visited)?,
            ))),
            TypeExpr::Named(name) => {
                if PRIMITIVES.contains(&name.as_str())
                    || self.structs.iter().any(|s| s.name == name)
                    || self.variants.iter().any(|v| v.name == name)
                {
                    return Ok(TypeExpr::Named(name));
                }
                if let Some(alias) = self.types.iter().find(|t| t.new_type_name == name) {
                    if !visited.insert(name.clone()) {
                        return Err(Error::CyclicAlias(name));
                    }
                    return self.resolve_with_visited(&alias.type_, visited);
                }
                Err(Error::UnknownType(name))
            }
        }
    }

    fn all_fields(&self, st: &AbiStruct) -> Result<Vec<AbiField>> {
        self.all_fields_with_visited(st, &mut HashSet::new())
    }

    fn all_fields_with_visited(
        &self,
        st: &AbiStruct,
        visited: &mut HashSet<String>,
    ) -> Result<Vec<AbiField>> {
        if !visited.insert(st.name.clone()) {
            return Err(Error::CyclicAlias(st.name.clone()));
        }
        let mut fields = Vec::new();
        if !st.base.is_empty() {
            let base = self
                .structs
                .iter()
                .find(|s| s.name == st.base)
                .ok_or_else(|| Error::UnknownType(st.base.clone()))?;
            fields.extend(self.all_fields_with_visited(base, visited)?);
        }
        fields.extend(st.fields.iter().cloned());
        Ok(fields)
    }

    fn min_size_of(&self, expr: &TypeExpr) -> usize {
        match expr {
            TypeExpr::Array(_) | TypeExpr::Optional(_) => 1,
            TypeExpr::Extension(_) => 0,
            TypeExpr::Named(name) => match name.as_str() {
                "bool" | "int8" | "uint8" | "bytes" | "string" => 1,
                "int16" | "uint16" => 2,
                "int32" | "uint32" | "float32" | "varint32" | "varuint32" | "time_point_sec"
                | "block_timestamp_type" => 1,
                "int64" | "uint64" | "float64" | "time_point" | "name" | "symbol"
                | "symbol_code" => 8,
                "int128" | "uint128" | "asset" => 16,
                "checksum160" => 20,
                "checksum256" => 32,
                "checksum512" => 64,
                "public_key" | "private_key" | "signature" => 33,
                _ => 1,
            },
        }
    }

    /// Encodes `value` as `type_name` (§4.3, §6 `Abi::encode`).
    pub fn encode<W: Write>(
        &self,
        type_name: &str,
        value: &AbiValue,
        enc: &mut Encoder<W>,
    ) -> Result<()> {
        let expr = self.resolve(type_name)?;
        self.encode_expr(&expr, value, enc)
    }

    fn encode_expr<W: Write>(
        &self,
        expr: &TypeExpr,
        value: &AbiValue,
        enc: &mut Encoder<W>,
    ) -> Result<()> {
        match expr {
            TypeExpr::Array(inner) => {
                let items = match value {
                    AbiValue::Array(items) => items,
                    _ => return Err(Error::UnsupportedValue("expected an array value")),
                };
                enc.write_varuint32(
                    u32::try_from(items.len())
                        .map_err(|_| Error::UnsupportedValue("array length exceeds u32"))?,
                )?;
                for item in items {
                    self.encode_expr(inner, item, enc)?;
                }
                Ok(())
            }
            TypeExpr::Optional(inner) => match value {
                AbiValue::Optional(Some(v)) => {
                    enc.write_bool(true)?;
                    self.encode_expr(inner, v, enc)
                }
                AbiValue::Optional(None) => enc.write_bool(false),
                _ => Err(Error::UnsupportedValue("expected an optional value")),
            },
            TypeExpr::Extension(inner) => match value {
                AbiValue::Extension(Some(v)) => self.encode_expr(inner, v, enc),
                AbiValue::Extension(None) => Ok(()),
                _ => Err(Error::UnsupportedValue("expected an extension value")),
            },
            TypeExpr::Named(name) => self.encode_named(name, value, enc),
        }
    }

    fn encode_named<W: Write>(
        &self,
        name: &str,
        value: &AbiValue,
        enc: &mut Encoder<W>,
    ) -> Result<()> {
        if let Some(result) = self.try_encode_primitive(name, value, enc) {
            return result;
        }
        if let Some(st) = self.structs.iter().find(|s| s.name == name) {
            return self.encode_struct(st, value, enc);
        }
        if let Some(variant) = self.variants.iter().find(|v| v.name == name) {
            return self.encode_variant(variant, value, enc);
        }
        Err(Error::UnknownType(name.to_string()))
    }

    fn try_encode_primitive<W: Write>(
        &self,
        name: &str,
        value: &AbiValue,
        enc: &mut Encoder<W>,
    ) -> Option<Result<()>> {
        Some(match (name, value) {
            ("bool", AbiValue::Bool(v)) => enc.write_bool(*v),
            ("int8", AbiValue::I8(v)) => enc.write_i8(*v),
            ("uint8", AbiValue::U8(v)) => enc.write_u8(*v),
            ("int16", AbiValue::I16(v)) => enc.write_i16(*v),
            ("uint16", AbiValue::U16(v)) => enc.write_u16(*v),
            ("int32", AbiValue::I32(v)) => enc.write_i32(*v),
            ("uint32", AbiValue::U32(v)) => enc.write_u32(*v),
            ("int64", AbiValue::I64(v)) => enc.write_i64(*v),
            ("uint64", AbiValue::U64(v)) => enc.write_u64(*v),
            ("int128", AbiValue::I128(v)) => enc.write_i128(*v),
            ("uint128", AbiValue::U128(v)) => enc.write_u128(*v),
            ("float32", AbiValue::F32(v)) => enc.write_f32(*v),
            ("float64", AbiValue::F64(v)) => enc.write_f64(*v),
            ("varint32", AbiValue::VarInt32(v)) => enc.write_varint32(*v),
            ("varuint32", AbiValue::VarUint32(v)) => enc.write_varuint32(*v),
            ("bytes", AbiValue::Bytes(v)) => enc.write_bytes(v),
            ("string", AbiValue::String(v)) => enc.write_string(v),
            ("name", AbiValue::Name(v)) => enc.encode(v),
            ("symbol", AbiValue::Symbol(v)) => enc.encode(v),
            ("symbol_code", AbiValue::SymbolCode(v)) => enc.encode(v),
            ("asset", AbiValue::Asset(v)) => enc.encode(v),
            ("time_point", AbiValue::TimePoint(v)) => enc.encode(v),
            ("time_point_sec", AbiValue::TimePointSec(v)) => enc.encode(v),
            ("block_timestamp_type", AbiValue::BlockTimestamp(v)) => enc.encode(v),
            ("checksum160", AbiValue::Checksum160(v)) => enc.encode(v),
            ("checksum256", AbiValue::Checksum256(v)) => enc.encode(v),
            ("checksum512", AbiValue::Checksum512(v)) => enc.encode(v),
            ("public_key", AbiValue::PublicKey(v)) => enc.encode(v),
            ("private_key", AbiValue::PrivateKey(v)) => enc.encode(v),
            ("signature", AbiValue::Signature(v)) => enc.encode(v),
            (other, _) if PRIMITIVES.contains(&other) => {
                return Some(Err(Error::UnsupportedValue(
                    "value does not match its declared primitive type",
                )))
            }
            _ => return None,
        })
    }

    fn encode_struct<W: Write>(
        &self,
        st: &AbiStruct,
        value: &AbiValue,
        enc: &mut Encoder<W>,
    ) -> Result<()> {
        let fields = self.all_fields(st)?;
        let entries = match value {
            AbiValue::Struct(entries) => entries,
            _ => return Err(Error::UnsupportedValue("expected a struct value")),
        };
        for field in &fields {
            let (_, field_value) = entries
                .iter()
                .find(|(name, _)| name == &field.name)
                .ok_or(Error::UnsupportedValue("missing struct field"))?;
            let field_expr = self.resolve(&field.r#type)?;
            self.encode_expr(&field_expr, field_value, enc)?;
        }
        Ok(())
    }

    fn encode_variant<W: Write>(
        &self,
        variant: &AbiVariant,
        value: &AbiValue,
        enc: &mut Encoder<W>,
    ) -> Result<()> {
        let (arm_type, inner) = match value {
            AbiValue::Variant(arm_type, inner) => (arm_type, inner),
            _ => return Err(Error::UnsupportedValue("expected a variant value")),
        };
        let index = variant
            .types
            .iter()
            .position(|t| t == arm_type)
            .ok_or(Error::UnsupportedValue("variant arm not declared in ABI"))?;
        enc.write_varuint32(index as u32)?;
        let arm_expr = self.resolve(arm_type)?;
        self.encode_expr(&arm_expr, inner, enc)
    }

    /// Decodes a value of `type_name` (§4.3, §6 `Abi::decode`).
    pub fn decode(&self, type_name: &str, dec: &mut Decoder<'_>) -> Result<AbiValue> {
        let expr = self.resolve(type_name)?;
        self.decode_expr(&expr, dec)
    }

    fn decode_expr(&self, expr: &TypeExpr, dec: &mut Decoder<'_>) -> Result<AbiValue> {
        match expr {
            TypeExpr::Array(inner) => self.decode_array(inner, dec),
            TypeExpr::Optional(inner) => {
                if dec.read_bool()? {
                    Ok(AbiValue::Optional(Some(Box::new(
                        self.decode_expr(inner, dec)?,
                    ))))
                } else {
                    Ok(AbiValue::Optional(None))
                }
            }
            TypeExpr::Extension(inner) => {
                if dec.remaining() == 0 {
                    Ok(AbiValue::Extension(None))
                } else {
                    Ok(AbiValue::Extension(Some(Box::new(
                        self.decode_expr(inner, dec)?,
                    ))))
                }
            }
            TypeExpr::Named(name) => self.decode_named(name, dec),
        }
    }

    fn decode_array(&self, inner: &TypeExpr, dec: &mut Decoder<'_>) -> Result<AbiValue> {
        let count = dec.read_varuint32()? as usize;
        let min_size = self.min_size_of(inner).max(1);
        if count > dec.remaining() / min_size {
            return Err(Error::UnexpectedEof {
                needed: count * min_size,
                available: dec.remaining(),
            });
        }
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.decode_expr(inner, dec)?);
        }
        Ok(AbiValue::Array(items))
    }

    fn decode_named(&self, name: &str, dec: &mut Decoder<'_>) -> Result<AbiValue> {
        if let Some(result) = self.try_decode_primitive(name, dec) {
            return result;
        }
        if let Some(st) = self.structs.iter().find(|s| s.name == name) {
            return self.decode_struct(st, dec);
        }
        if let Some(variant) = self.variants.iter().find(|v| v.name == name) {
            return self.decode_variant(variant, dec);
        }
        Err(Error::UnknownType(name.to_string()))
    }

    fn try_decode_primitive(&self, name: &str, dec: &mut Decoder<'_>) -> Option<Result<AbiValue>> {
        Some(match name {
            "bool" => dec.read_bool().map(AbiValue::Bool),
            "int8" => dec.read_i8().map(AbiValue::I8),
            "uint8" => dec.read_u8().map(AbiValue::U8),
            "int16" => dec.read_i16().map(AbiValue::I16),
            "uint16" => dec.read_u16().map(AbiValue::U16),
            "int32" => dec.read_i32().map(AbiValue::I32),
            "uint32" => dec.read_u32().map(AbiValue::U32),
            "int64" => dec.read_i64().map(AbiValue::I64),
            "uint64" => dec.read_u64().map(AbiValue::U64),
            "int128" => dec.read_i128().map(AbiValue::I128),
            "uint128" => dec.read_u128().map(AbiValue::U128),
            "float32" => dec.read_f32().map(AbiValue::F32),
            "float64" => dec.read_f64().map(AbiValue::F64),
            "varint32" => dec.read_varint32().map(AbiValue::VarInt32),
            "varuint32" => dec.read_varuint32().map(AbiValue::VarUint32),
            "bytes" => dec.read_bytes().map(AbiValue::Bytes),
            "string" => dec.read_string().map(AbiValue::String),
            "name" => dec.decode::<Name>().map(AbiValue::Name),
            "symbol" => dec.decode::<Symbol>().map(AbiValue::Symbol),
            "symbol_code" => dec.decode::<SymbolCode>().map(AbiValue::SymbolCode),
            "asset" => dec.decode::<Asset>().map(AbiValue::Asset),
            "time_point" => dec.decode::<TimePoint>().map(AbiValue::TimePoint),
            "time_point_sec" => dec.decode::<TimePointSec>().map(AbiValue::TimePointSec),
            "block_timestamp_type" => dec.decode::<BlockTimestamp>().map(AbiValue::BlockTimestamp),
            "checksum160" => dec.decode::<Checksum160>().map(AbiValue::Checksum160),
            "checksum256" => dec.decode::<Checksum256>().map(AbiValue::Checksum256),
            "checksum512" => dec.decode::<Checksum512>().map(AbiValue::Checksum512),
            "public_key" => dec.decode::<PublicKey>().map(AbiValue::PublicKey),
            "private_key" => dec.decode::<PrivateKey>().map(AbiValue::PrivateKey),
            "signature" => dec.decode::<Signature>().map(AbiValue::Signature),
            _ => return None,
        })
    }

    fn decode_struct(&self, st: &AbiStruct, dec: &mut Decoder<'_>) -> Result<AbiValue> {
        let fields = self.all_fields(st)?;
        let mut entries = Vec::with_capacity(fields.len());
        for field in &fields {
            let field_expr = self.resolve(&field.r#type)?;
            let value = self.decode_expr(&field_expr, dec)?;
            entries.push((field.name.clone(), value));
        }
        Ok(AbiValue::Struct(entries))
    }

    fn decode_variant(&self, variant: &AbiVariant, dec: &mut Decoder<'_>) -> Result<AbiValue> {
        let index = dec.read_varuint32()? as usize;
        let arm_type = variant.types.get(index).ok_or(Error::VariantOutOfRange {
            discriminant: index as u32,
            arm_count: variant.types.len() as u32,
        })?;
        let arm_expr = self.resolve(arm_type)?;
        let inner = self.decode_expr(&arm_expr, dec)?;
        Ok(AbiValue::Variant(arm_type.clone(), Box::new(inner)))
    }
}
