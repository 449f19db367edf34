use serde::{Deserialize, Serialize};
use wormhole_wire::{ByteCursor, Decode, Encode, Error, Writer};

use crate::{
    consts::{VAA_KEY_EMITTER_SEQUENCE, VAA_KEY_HASH, VAA_KEY_VERSION},
    relayer::read_tag,
    Address, Vaa,
};

/// A reference to a specific VAA.
///
/// On the wire: `version:u8 = 1 | tag:u8 | fields`, where tag 0 is followed by
/// `chain:u16 | emitter_address:[u8; 32] | sequence:u64` and tag 1 by `hash:[u8; 32]`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum VaaKey {
    EmitterSequence {
        chain: u16,
        emitter_address: Address,
        sequence: u64,
    },
    VaaHash {
        hash: [u8; 32],
    },
}

impl VaaKey {
    /// Checks whether `vaa` is the VAA this key refers to. Hash keys are compared against the
    /// double Keccak256 of the body.
    pub fn matches(&self, vaa: &Vaa) -> bool {
        match self {
            VaaKey::EmitterSequence {
                chain,
                emitter_address,
                sequence,
            } => {
                *chain == vaa.emitter_chain
                    && *emitter_address == vaa.emitter_address
                    && *sequence == vaa.sequence
            }
            VaaKey::VaaHash { hash } => *hash == vaa.digest().secp256k_hash,
        }
    }
}

impl Decode for VaaKey {
    fn decode_at(c: &ByteCursor<'_>, offset: usize) -> Result<(Self, usize), Error> {
        let offset = read_tag(c, offset, "VaaKey version", VAA_KEY_VERSION)?;
        let (tag, offset) = c.read_u8(offset)?;

        match tag {
            VAA_KEY_EMITTER_SEQUENCE => {
                let (chain, offset) = c.read_u16(offset)?;
                let (emitter_address, offset) = c.read_bytes32(offset)?;
                let (sequence, offset) = c.read_u64(offset)?;

                Ok((
                    VaaKey::EmitterSequence {
                        chain,
                        emitter_address: Address(emitter_address),
                        sequence,
                    },
                    offset,
                ))
            }
            VAA_KEY_HASH => {
                let (hash, offset) = c.read_bytes32(offset)?;
                Ok((VaaKey::VaaHash { hash }, offset))
            }
            tag => Err(Error::InvalidVariant {
                what: "VaaKey",
                tag,
            }),
        }
    }
}

impl Encode for VaaKey {
    fn encode_to(&self, w: &mut Writer) -> Result<(), Error> {
        w.put_u8(VAA_KEY_VERSION);
        match self {
            VaaKey::EmitterSequence {
                chain,
                emitter_address,
                sequence,
            } => {
                w.put_u8(VAA_KEY_EMITTER_SEQUENCE);
                w.put_u16(*chain);
                w.put_bytes(&emitter_address.0);
                w.put_u64(*sequence);
            }
            VaaKey::VaaHash { hash } => {
                w.put_u8(VAA_KEY_HASH);
                w.put_bytes(hash);
            }
        }

        Ok(())
    }
}
