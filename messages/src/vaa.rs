//! VAA's represent a collection of signatures combined with a message and its metadata. VAA's are
//! used as a form of proof; by submitting a VAA to a target contract, the receiving contract can
//! make assumptions about the validity of state on the source chain.
//!
//! The wire layout of a VAA is:
//!
//! ```markdown
//! header:
//! 0   uint8       version
//! 1   uint32      guardian set index
//! 5   uint8       number of signatures (at most 19)
//!
//! per signature (66 bytes):
//! 0   uint8       index of the signer in the guardian set
//! 1   [32]uint8   r
//! 33  [32]uint8   s
//! 65  uint8       recovery id
//!
//! body:
//! 0   uint32      timestamp (unix in seconds)
//! 4   uint32      nonce
//! 8   uint16      emitter chain
//! 10  [32]uint8   emitter address
//! 42  uint64      sequence
//! 50  uint8       consistency level
//! 51  []uint8     payload, running to the end of the input
//! ```
//!
//! Only the body is hashed and signed. Because the payload is not length-prefixed, a VAA can
//! never carry trailing data: everything after the fixed body fields belongs to the payload.

use serde::{Deserialize, Serialize};
use sha3::{Digest as Sha3Digest, Keccak256};
use wormhole_wire::{ByteCursor, Decode, Encode, Error, Writer};

use crate::{
    consts::{MAX_SIGNATURES, SIGNATURE_LEN, VAA_BODY_FIXED_LEN, VAA_HEADER_LEN},
    verify::{RecoverSigner, VerifyError},
    Address, GuardianSetInfo,
};

/// A guardian's ECDSA signature over the VAA digest, prefixed with the guardian's position in the
/// set.
#[derive(
    Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Signature {
    pub index: u8,
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub recovery_id: u8,
}

impl Signature {
    /// The 64-byte `r || s` form expected by ECDSA libraries.
    pub fn rs(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }
}

impl Decode for Signature {
    fn decode_at(c: &ByteCursor<'_>, offset: usize) -> Result<(Self, usize), Error> {
        let (index, offset) = c.read_u8(offset)?;
        let (r, offset) = c.read_bytes32(offset)?;
        let (s, offset) = c.read_bytes32(offset)?;
        let (recovery_id, offset) = c.read_u8(offset)?;

        Ok((
            Signature {
                index,
                r,
                s,
                recovery_id,
            },
            offset,
        ))
    }
}

impl Encode for Signature {
    fn encode_to(&self, w: &mut Writer) -> Result<(), Error> {
        w.put_u8(self.index);
        w.put_bytes(&self.r);
        w.put_bytes(&self.s);
        w.put_u8(self.recovery_id);
        Ok(())
    }
}

/// The core VAA itself. This structure is what is received by a contract on the receiving side of
/// a wormhole message passing flow.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Vaa {
    pub version: u8,
    pub guardian_set_index: u32,
    pub signatures: Vec<Signature>,
    pub timestamp: u32,
    pub nonce: u32,
    pub emitter_chain: u16,
    pub emitter_address: Address,
    pub sequence: u64,
    pub consistency_level: u8,
    #[serde(with = "serde_bytes")]
    #[cfg_attr(feature = "schemars", schemars(with = "Vec<u8>"))]
    pub payload: Vec<u8>,
}

/// The header for a VAA.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Header {
    pub version: u8,
    pub guardian_set_index: u32,
    pub signatures: Vec<Signature>,
}

/// The body for a VAA. This is the part guardians observe and sign.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Body {
    /// Seconds since UNIX epoch.
    pub timestamp: u32,
    pub nonce: u32,
    pub emitter_chain: u16,
    pub emitter_address: Address,
    pub sequence: u64,
    pub consistency_level: u8,
    #[serde(with = "serde_bytes")]
    #[cfg_attr(feature = "schemars", schemars(with = "Vec<u8>"))]
    pub payload: Vec<u8>,
}

/// Digest data for the Body.
#[derive(
    Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Digest {
    /// Guardians don't hash the VAA body directly, instead they hash the VAA and sign the hash.
    /// This means when submitting a VAA on-chain only the hash has to be submitted.
    pub hash: [u8; 32],

    /// The hash of `hash`. secp256k1 signing hashes its payload before signing, so guardians end
    /// up signing the hash of the hash of the body and `ecrecover` expects this value. It is also
    /// the identifier EVM contracts expose as the VAA hash, which is what relayer messages use to
    /// refer to a VAA.
    pub secp256k_hash: [u8; 32],
}

/// Calculates and returns the digest for the encoded `body` of a VAA.
pub fn digest(body: &[u8]) -> Digest {
    let hash: [u8; 32] = Keccak256::digest(body).into();
    let secp256k_hash: [u8; 32] = Keccak256::digest(hash).into();

    Digest {
        hash,
        secp256k_hash,
    }
}

impl Vaa {
    /// Parses a VAA envelope. The payload is everything after the fixed body fields.
    pub fn parse(buf: &[u8]) -> Result<Self, Error> {
        Self::decode(buf)
    }

    /// The header half of the VAA.
    pub fn header(&self) -> Header {
        Header {
            version: self.version,
            guardian_set_index: self.guardian_set_index,
            signatures: self.signatures.clone(),
        }
    }

    /// The body half of the VAA.
    pub fn body(&self) -> Body {
        Body {
            timestamp: self.timestamp,
            nonce: self.nonce,
            emitter_chain: self.emitter_chain,
            emitter_address: self.emitter_address,
            sequence: self.sequence,
            consistency_level: self.consistency_level,
            payload: self.payload.clone(),
        }
    }

    /// The bytes guardians hash and sign.
    pub fn body_bytes(&self) -> Vec<u8> {
        let mut w = Writer::with_capacity(VAA_BODY_FIXED_LEN + self.payload.len());
        write_body_fields(
            &mut w,
            self.timestamp,
            self.nonce,
            self.emitter_chain,
            &self.emitter_address,
            self.sequence,
            self.consistency_level,
            &self.payload,
        );
        w.into_inner()
    }

    pub fn digest(&self) -> Digest {
        digest(&self.body_bytes())
    }

    /// Checks the guardian signatures on this VAA against `guardian_set` using secp256k1
    /// public key recovery.
    #[cfg(feature = "secp256k1")]
    pub fn verify(&self, guardian_set: &GuardianSetInfo) -> Result<Digest, VerifyError> {
        crate::verify::verify(self, guardian_set, &crate::verify::Secp256k1)
    }

    /// Like [`Vaa::verify`] but with a caller-provided signature recovery.
    pub fn verify_with<R>(
        &self,
        guardian_set: &GuardianSetInfo,
        recover: &R,
    ) -> Result<Digest, VerifyError>
    where
        R: RecoverSigner + ?Sized,
    {
        crate::verify::verify(self, guardian_set, recover)
    }
}

impl Decode for Vaa {
    fn decode_at(c: &ByteCursor<'_>, offset: usize) -> Result<(Self, usize), Error> {
        let (header, offset) = Header::decode_at(c, offset)?;
        let (body, offset) = Body::decode_at(c, offset)?;

        Ok(((header, body).into(), offset))
    }
}

impl Encode for Vaa {
    fn encode_to(&self, w: &mut Writer) -> Result<(), Error> {
        write_header_fields(w, self.version, self.guardian_set_index, &self.signatures)?;
        write_body_fields(
            w,
            self.timestamp,
            self.nonce,
            self.emitter_chain,
            &self.emitter_address,
            self.sequence,
            self.consistency_level,
            &self.payload,
        );
        Ok(())
    }
}

impl Decode for Header {
    fn decode_at(c: &ByteCursor<'_>, offset: usize) -> Result<(Self, usize), Error> {
        let (version, offset) = c.read_u8(offset)?;
        let (guardian_set_index, offset) = c.read_u32(offset)?;
        let (count, mut offset) = c.read_u8(offset)?;

        let count = usize::from(count);
        if count > MAX_SIGNATURES {
            return Err(Error::TooManySignatures {
                count,
                max: MAX_SIGNATURES,
            });
        }

        let mut signatures = Vec::with_capacity(count);
        for _ in 0..count {
            let (sig, next) = Signature::decode_at(c, offset)?;
            signatures.push(sig);
            offset = next;
        }

        Ok((
            Header {
                version,
                guardian_set_index,
                signatures,
            },
            offset,
        ))
    }
}

impl Encode for Header {
    fn encode_to(&self, w: &mut Writer) -> Result<(), Error> {
        write_header_fields(w, self.version, self.guardian_set_index, &self.signatures)
    }
}

impl Body {
    pub fn digest(&self) -> Digest {
        let mut w = Writer::with_capacity(VAA_BODY_FIXED_LEN + self.payload.len());
        write_body_fields(
            &mut w,
            self.timestamp,
            self.nonce,
            self.emitter_chain,
            &self.emitter_address,
            self.sequence,
            self.consistency_level,
            &self.payload,
        );
        digest(&w.into_inner())
    }
}

impl Decode for Body {
    fn decode_at(c: &ByteCursor<'_>, offset: usize) -> Result<(Self, usize), Error> {
        let (timestamp, offset) = c.read_u32(offset)?;
        let (nonce, offset) = c.read_u32(offset)?;
        let (emitter_chain, offset) = c.read_u16(offset)?;
        let (emitter_address, offset) = c.read_bytes32(offset)?;
        let (sequence, offset) = c.read_u64(offset)?;
        let (consistency_level, offset) = c.read_u8(offset)?;
        let (payload, offset) = c.read_remaining(offset)?;

        Ok((
            Body {
                timestamp,
                nonce,
                emitter_chain,
                emitter_address: Address(emitter_address),
                sequence,
                consistency_level,
                payload: payload.to_vec(),
            },
            offset,
        ))
    }
}

impl Encode for Body {
    fn encode_to(&self, w: &mut Writer) -> Result<(), Error> {
        write_body_fields(
            w,
            self.timestamp,
            self.nonce,
            self.emitter_chain,
            &self.emitter_address,
            self.sequence,
            self.consistency_level,
            &self.payload,
        );
        Ok(())
    }
}

fn write_header_fields(
    w: &mut Writer,
    version: u8,
    guardian_set_index: u32,
    signatures: &[Signature],
) -> Result<(), Error> {
    if signatures.len() > MAX_SIGNATURES {
        return Err(Error::TooManySignatures {
            count: signatures.len(),
            max: MAX_SIGNATURES,
        });
    }

    w.put_u8(version);
    w.put_u32(guardian_set_index);
    // Bounded by MAX_SIGNATURES above.
    w.put_u8(signatures.len() as u8);
    for sig in signatures {
        sig.encode_to(w)?;
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn write_body_fields(
    w: &mut Writer,
    timestamp: u32,
    nonce: u32,
    emitter_chain: u16,
    emitter_address: &Address,
    sequence: u64,
    consistency_level: u8,
    payload: &[u8],
) {
    w.put_u32(timestamp);
    w.put_u32(nonce);
    w.put_u16(emitter_chain);
    w.put_bytes(&emitter_address.0);
    w.put_u64(sequence);
    w.put_u8(consistency_level);
    w.put_bytes(payload);
}

/// Size of an encoded envelope with `signatures` signatures and an empty payload.
pub const fn envelope_len(signatures: usize) -> usize {
    VAA_HEADER_LEN + SIGNATURE_LEN * signatures + VAA_BODY_FIXED_LEN
}

impl From<Vaa> for (Header, Body) {
    fn from(v: Vaa) -> Self {
        (
            Header {
                version: v.version,
                guardian_set_index: v.guardian_set_index,
                signatures: v.signatures,
            },
            Body {
                timestamp: v.timestamp,
                nonce: v.nonce,
                emitter_chain: v.emitter_chain,
                emitter_address: v.emitter_address,
                sequence: v.sequence,
                consistency_level: v.consistency_level,
                payload: v.payload,
            },
        )
    }
}

impl From<(Header, Body)> for Vaa {
    fn from((hdr, body): (Header, Body)) -> Self {
        Vaa {
            version: hdr.version,
            guardian_set_index: hdr.guardian_set_index,
            signatures: hdr.signatures,
            timestamp: body.timestamp,
            nonce: body.nonce,
            emitter_chain: body.emitter_chain,
            emitter_address: body.emitter_address,
            sequence: body.sequence,
            consistency_level: body.consistency_level,
            payload: body.payload,
        }
    }
}
