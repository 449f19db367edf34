//! Guardian signature and quorum verification.
//!
//! A VAA is only trusted once a quorum of the guardian set that signed it can be shown to have
//! signed its digest. Verification is a pure read-only check: the guardian set is supplied by the
//! caller on every call and nothing is cached.
//!
//! Public key recovery is delegated to a [`RecoverSigner`] so the ordering, deduplication and
//! quorum rules can be exercised without a particular elliptic curve implementation. With the
//! `secp256k1` feature enabled, [`Secp256k1`] provides the recovery guardians actually use.

use log::{debug, trace};
use thiserror::Error as ThisError;

use crate::{
    vaa::{Digest, Signature, Vaa},
    GuardianAddress, GuardianSetInfo,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum VerifyError {
    #[error("guardian index {index} does not follow guardian index {previous}")]
    DuplicateOrOutOfOrderGuardian { index: u8, previous: u8 },
    #[error("signature at guardian index {index} was not produced by that guardian")]
    UnknownSigner { index: u8 },
    #[error("{signatures} valid signatures do not meet the quorum of {quorum}")]
    QuorumNotMet { signatures: usize, quorum: usize },
    #[error("VAA was signed by guardian set {found}, expected guardian set {expected}")]
    WrongGuardianSet { expected: u32, found: u32 },
}

/// Recovers the address of the guardian that produced a signature.
pub trait RecoverSigner {
    /// Returns the address whose key produced `signature` over `prehash`, or `None` if the
    /// signature is malformed or no key can be recovered.
    fn recover(&self, prehash: &[u8; 32], signature: &Signature) -> Option<GuardianAddress>;
}

impl<F> RecoverSigner for F
where
    F: Fn(&[u8; 32], &Signature) -> Option<GuardianAddress>,
{
    fn recover(&self, prehash: &[u8; 32], signature: &Signature) -> Option<GuardianAddress> {
        self(prehash, signature)
    }
}

/// secp256k1 public key recovery, as done by `ecrecover`.
#[cfg(feature = "secp256k1")]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1;

#[cfg(feature = "secp256k1")]
impl RecoverSigner for Secp256k1 {
    fn recover(&self, prehash: &[u8; 32], signature: &Signature) -> Option<GuardianAddress> {
        use k256::{
            ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey},
            elliptic_curve::sec1::ToEncodedPoint,
        };

        let sig = EcdsaSignature::from_slice(&signature.rs()).ok()?;
        let id = RecoveryId::from_byte(signature.recovery_id)?;
        let key = VerifyingKey::recover_from_prehash(prehash, &sig, id).ok()?;

        let point = key.as_affine().to_encoded_point(false);
        let mut xy = [0u8; 64];
        // Uncompressed points are 0x04 || x || y.
        xy.copy_from_slice(point.as_bytes().get(1..65)?);

        Some(GuardianAddress::from_public_key(&xy))
    }
}

/// Checks that `vaa` carries a quorum of valid signatures from `guardian_set`.
///
/// Signatures must appear in strictly increasing guardian index order, which rules out counting
/// the same guardian twice. The first violation aborts verification. On success the digest that
/// was verified is returned.
pub fn verify<R>(
    vaa: &Vaa,
    guardian_set: &GuardianSetInfo,
    recover: &R,
) -> Result<Digest, VerifyError>
where
    R: RecoverSigner + ?Sized,
{
    check(vaa, guardian_set, recover).map_err(|e| {
        debug!(
            "rejecting VAA {}/{}/{}: {e}",
            vaa.emitter_chain, vaa.emitter_address, vaa.sequence
        );
        e
    })
}

fn check<R>(vaa: &Vaa, guardian_set: &GuardianSetInfo, recover: &R) -> Result<Digest, VerifyError>
where
    R: RecoverSigner + ?Sized,
{
    if vaa.guardian_set_index != guardian_set.index {
        return Err(VerifyError::WrongGuardianSet {
            expected: guardian_set.index,
            found: vaa.guardian_set_index,
        });
    }

    let quorum = guardian_set.quorum();
    if vaa.signatures.len() < quorum {
        return Err(VerifyError::QuorumNotMet {
            signatures: vaa.signatures.len(),
            quorum,
        });
    }

    let digest = vaa.digest();

    let mut previous: Option<u8> = None;
    let mut valid = 0usize;
    for sig in &vaa.signatures {
        if let Some(previous) = previous {
            if sig.index <= previous {
                return Err(VerifyError::DuplicateOrOutOfOrderGuardian {
                    index: sig.index,
                    previous,
                });
            }
        }
        previous = Some(sig.index);

        let expected = guardian_set
            .addresses
            .get(usize::from(sig.index))
            .ok_or(VerifyError::UnknownSigner { index: sig.index })?;

        match recover.recover(&digest.secp256k_hash, sig) {
            Some(signer) if signer == *expected => valid += 1,
            _ => return Err(VerifyError::UnknownSigner { index: sig.index }),
        }
    }

    if valid < quorum {
        return Err(VerifyError::QuorumNotMet {
            signatures: valid,
            quorum,
        });
    }

    trace!(
        "verified VAA {}/{}/{} with {valid} of {} guardians",
        vaa.emitter_chain,
        vaa.emitter_address,
        vaa.sequence,
        guardian_set.addresses.len()
    );

    Ok(digest)
}
