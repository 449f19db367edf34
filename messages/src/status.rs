//! Turns a raw delivery event into a typed report of what happened to a delivery.

use bstr::BString;
use log::{debug, warn};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use wormhole_wire::Decode;

use crate::{event::DeliveryEvent, Address, DeliveryOverride, ForwardFailure};

/// The `status` code of a delivery event.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum DeliveryStatus {
    Success,
    ReceiverFailure,
    ForwardRequestFailure,
    ForwardRequestSuccess,
    Unknown(u8),
}

impl From<u8> for DeliveryStatus {
    fn from(code: u8) -> Self {
        match code {
            0 => DeliveryStatus::Success,
            1 => DeliveryStatus::ReceiverFailure,
            2 => DeliveryStatus::ForwardRequestFailure,
            3 => DeliveryStatus::ForwardRequestSuccess,
            c => DeliveryStatus::Unknown(c),
        }
    }
}

/// The `refund_status` code of a delivery event.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum RefundStatus {
    RefundSent,
    RefundFail,
    CrossChainRefundSent,
    CrossChainRefundSentMaximumBudget,
    CrossChainRefundFailProviderNotSupported,
    CrossChainRefundFailNotEnough,
    Unknown(u8),
}

impl From<u8> for RefundStatus {
    fn from(code: u8) -> Self {
        match code {
            0 => RefundStatus::RefundSent,
            1 => RefundStatus::RefundFail,
            2 => RefundStatus::CrossChainRefundSent,
            3 => RefundStatus::CrossChainRefundSentMaximumBudget,
            4 => RefundStatus::CrossChainRefundFailProviderNotSupported,
            5 => RefundStatus::CrossChainRefundFailNotEnough,
            c => RefundStatus::Unknown(c),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum DeliveryOutcome {
    DeliverySuccess,
    ReceiverFailure {
        #[cfg_attr(feature = "schemars", schemars(with = "String"))]
        revert_string: BString,
    },
    /// `reason` is `None` when `data` is not a well-formed [`ForwardFailure`].
    ForwardRequestFailure {
        reason: Option<ForwardFailure>,
        #[serde(with = "serde_bytes")]
        #[cfg_attr(feature = "schemars", schemars(with = "Vec<u8>"))]
        data: Vec<u8>,
    },
    ForwardRequestSuccess {
        #[cfg_attr(feature = "schemars", schemars(with = "String"))]
        leftover_fee: U256,
    },
    Unknown {
        status: u8,
    },
}

/// Everything a delivery event says about one delivery attempt.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct DeliveryInfo {
    pub transaction_hash: [u8; 32],
    pub vaa_hash: [u8; 32],
    pub source_chain: u16,
    pub source_sequence: u64,
    pub recipient_contract: Address,
    #[cfg_attr(feature = "schemars", schemars(with = "String"))]
    pub gas_used: U256,
    pub refund_status: RefundStatus,
    pub override_info: Option<DeliveryOverride>,
    pub outcome: DeliveryOutcome,
}

/// Interprets the delivery event emitted in transaction `transaction_hash`.
///
/// This never fails. Fields that cannot be decoded are logged and reported in their raw form (or
/// left out, for the override) so the rest of the event is still available. A leftover fee wider
/// than 256 bits saturates to `U256::MAX`.
pub fn interpret(transaction_hash: [u8; 32], event: &DeliveryEvent) -> DeliveryInfo {
    let outcome = match DeliveryStatus::from(event.status) {
        DeliveryStatus::Success => DeliveryOutcome::DeliverySuccess,
        DeliveryStatus::ReceiverFailure => DeliveryOutcome::ReceiverFailure {
            revert_string: BString::from(event.additional_status_info.as_slice()),
        },
        DeliveryStatus::ForwardRequestFailure => {
            let reason = match ForwardFailure::decode(&event.additional_status_info) {
                Ok(r) => Some(r),
                Err(e) => {
                    debug!(
                        "undecodable forward failure reason for delivery {}/{}: {e}",
                        event.source_chain, event.sequence
                    );
                    None
                }
            };

            DeliveryOutcome::ForwardRequestFailure {
                reason,
                data: event.additional_status_info.clone(),
            }
        }
        DeliveryStatus::ForwardRequestSuccess => DeliveryOutcome::ForwardRequestSuccess {
            leftover_fee: leftover_fee(event),
        },
        DeliveryStatus::Unknown(status) => {
            warn!(
                "unknown status {status} for delivery {}/{}",
                event.source_chain, event.sequence
            );
            DeliveryOutcome::Unknown { status }
        }
    };

    DeliveryInfo {
        transaction_hash,
        vaa_hash: event.delivery_vaa_hash,
        source_chain: event.source_chain,
        source_sequence: event.sequence,
        recipient_contract: event.recipient_contract,
        gas_used: event.gas_used,
        refund_status: RefundStatus::from(event.refund_status),
        override_info: override_info(event),
        outcome,
    }
}

fn leftover_fee(event: &DeliveryEvent) -> U256 {
    let raw = event.additional_status_info.as_slice();
    if raw.len() <= 32 {
        return U256::from_big_endian(raw);
    }

    let (high, low) = raw.split_at(raw.len() - 32);
    if high.iter().all(|b| *b == 0) {
        return U256::from_big_endian(low);
    }

    warn!(
        "leftover fee for delivery {}/{} does not fit in 256 bits ({} bytes), saturating",
        event.source_chain,
        event.sequence,
        raw.len()
    );
    U256::MAX
}

fn override_info(event: &DeliveryEvent) -> Option<DeliveryOverride> {
    if event.overrides_info.is_empty() {
        return None;
    }

    match DeliveryOverride::decode(&event.overrides_info) {
        Ok(ov) => Some(ov),
        Err(e) => {
            warn!(
                "malformed override info for delivery {}/{}: {e}",
                event.source_chain, event.sequence
            );
            None
        }
    }
}
