//! `Action` and `PermissionLevel` (§3.3): the unit of chain execution and the
//! actor/permission pair that authorizes it. Grounded on `chain.Action`/
//! `chain.PermissionLevel` in `original_source/ship/result_test.go`'s `onblock`/
//! `transfer` action fixtures.

use std::io::Write;

use crate::abi::{Decode, Decoder, Encode, Encoder};
use crate::error::Result;
use crate::name::Name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PermissionLevel {
    pub actor: Name,
    pub permission: Name,
}

impl Encode for PermissionLevel {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.actor.encode(enc)?;
        self.permission.encode(enc)
    }
}

impl Decode for PermissionLevel {
    const MIN_SIZE: usize = 16;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        let actor = Name::decode(dec)?;
        let permission = Name::decode(dec)?;
        Ok(PermissionLevel { actor, permission })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub account: Name,
    pub name: Name,
    pub authorization: Vec<PermissionLevel>,
    pub data: Vec<u8>,
}

impl Encode for Action {
    fn encode<W: Write>(&self, enc: &mut Encoder<W>) -> Result<()> {
        self.account.encode(enc)?;
        self.name.encode(enc)?;
        self.authorization.encode(enc)?;
        self.data.encode(enc)
    }
}

impl Decode for Action {
    const MIN_SIZE: usize = 17;

    fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        let account = Name::decode(dec)?;
        let name = Name::decode(dec)?;
        let authorization = dec.read_array::<PermissionLevel>()?;
        let data = dec.read_bytes()?;
        Ok(Action {
            account,
            name,
            authorization,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_round_trip() {
        let action = Action {
            account: "eosio.token".parse().unwrap(),
            name: "transfer".parse().unwrap(),
            authorization: vec![PermissionLevel {
                actor: "alice".parse().unwrap(),
                permission: "active".parse().unwrap(),
            }],
            data: vec![1, 2, 3],
        };
        let mut enc = Encoder::new(Vec::new());
        enc.encode(&action).unwrap();
        let bytes = enc.into_inner();
        let mut dec = Decoder::new(&bytes);
        let decoded: Action = dec.decode().unwrap();
        assert_eq!(decoded, action);
    }
}
