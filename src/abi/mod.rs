//! The ABI sub-system: the engine (`Encoder`/`Decoder`), the `Encode`/`Decode`
//! capability traits domain types implement, and the runtime JSON-described schema
//! (`Abi`/`AbiValue`) for dynamic binding (§4.3).

mod decoder;
mod encoder;
mod marshal;
mod schema;

pub use decoder::{DecodeHookFn, Decoder};
pub use encoder::{EncodeHookFn, Encoder};
pub use marshal::{Decode, Encode, Extension};
pub use schema::{Abi, AbiAction, AbiField, AbiStruct, AbiTable, AbiVariant, AbiValue};
