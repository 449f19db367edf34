//! Pure Rust primitives for the Wormhole relayer message layer.
//!
//! This crate provides chain-agnostic types for consumption by off-chain relayers and by other
//! chain-specific Wormhole Rust SDK's. It includes:
//!
//! - Parsers and serializers for VAA envelopes.
//! - Guardian signature and quorum verification.
//! - Codecs for the standardized relayer's delivery and redelivery instructions.
//! - Interpretation of delivery events emitted on the target chain.
//!
//! Every decoder is strict: unknown versions, unknown tags and trailing bytes are errors.

#![deny(warnings)]
#![deny(unused_results)]

use std::fmt;

use serde::{Deserialize, Serialize};
use sha3::{Digest as Sha3Digest, Keccak256};

pub mod consts;
pub mod event;
pub mod relayer;
pub mod status;
pub mod vaa;
pub mod verify;

pub use relayer::{
    DeliveryInstruction, DeliveryOverride, ExecutionParameters, ForwardFailure,
    RedeliveryInstruction, RelayerPayload, VaaKey,
};
pub use status::{interpret, DeliveryInfo, DeliveryOutcome, DeliveryStatus, RefundStatus};
pub use vaa::Vaa;
pub use verify::{verify, RecoverSigner, VerifyError};
pub use wormhole_wire::Error;

#[cfg(feature = "secp256k1")]
pub use verify::Secp256k1;

/// The 20-byte address of a guardian: the last 20 bytes of the Keccak256 hash of its
/// uncompressed secp256k1 public key.
#[derive(
    Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct GuardianAddress(pub [u8; 20]);

impl GuardianAddress {
    /// Derives the address from the 64-byte `x || y` encoding of a public key.
    pub fn from_public_key(xy: &[u8; 64]) -> Self {
        let hash: [u8; 32] = Keccak256::digest(xy).into();
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&hash[12..]);
        GuardianAddress(addr)
    }
}

impl fmt::Display for GuardianAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }

        Ok(())
    }
}

/// Wormhole specifies addresses as 32 bytes. Addresses that are shorter, for example 20 byte
/// Ethereum addresses, are left zero padded to 32.
#[derive(
    Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Address(pub [u8; 32]);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }

        Ok(())
    }
}

impl From<GuardianAddress> for Address {
    fn from(a: GuardianAddress) -> Self {
        let mut out = [0u8; 32];
        out[12..].copy_from_slice(&a.0);
        Address(out)
    }
}

/// A `GuardianSet` is a versioned set of keys that can sign Wormhole messages.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct GuardianSetInfo {
    /// The index VAAs signed by this set carry in their header.
    pub index: u32,

    /// The guardian addresses, ordered by guardian index.
    pub addresses: Vec<GuardianAddress>,
}

impl GuardianSetInfo {
    /// Minimum number of distinct guardian signatures needed to accept a VAA.
    pub fn quorum(&self) -> usize {
        consts::quorum(self.addresses.len())
    }
}
