//! Typed forms of the events the core bridge and the relayer contracts emit.
//!
//! These are the tuples a chain watcher hands to this crate after decoding a log. Neither type
//! carries chain specific encoding; whoever reads the log is responsible for filling the fields.

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::{vaa::Body, Address, VaaKey};

/// A message published through the core bridge, before the guardians have signed it.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct MessagePublished {
    pub sender: Address,
    pub sequence: u64,
    pub nonce: u32,
    #[serde(with = "serde_bytes")]
    #[cfg_attr(feature = "schemars", schemars(with = "Vec<u8>"))]
    pub payload: Vec<u8>,
    pub consistency_level: u8,
}

impl MessagePublished {
    /// The key that names the VAA the guardians will produce for this message.
    pub fn vaa_key(&self, emitter_chain: u16) -> VaaKey {
        VaaKey::EmitterSequence {
            chain: emitter_chain,
            emitter_address: self.sender,
            sequence: self.sequence,
        }
    }

    /// The body the guardians will sign, given the chain the message was emitted on and the
    /// timestamp of the block that contains it.
    pub fn body(&self, emitter_chain: u16, timestamp: u32) -> Body {
        Body {
            timestamp,
            nonce: self.nonce,
            emitter_chain,
            emitter_address: self.sender,
            sequence: self.sequence,
            consistency_level: self.consistency_level,
            payload: self.payload.clone(),
        }
    }
}

/// The event a relayer contract emits on the target chain once it has attempted a delivery.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct DeliveryEvent {
    pub recipient_contract: Address,
    pub source_chain: u16,
    pub sequence: u64,
    pub delivery_vaa_hash: [u8; 32],
    pub status: u8,
    #[cfg_attr(feature = "schemars", schemars(with = "String"))]
    pub gas_used: U256,
    pub refund_status: u8,
    #[serde(with = "serde_bytes")]
    #[cfg_attr(feature = "schemars", schemars(with = "Vec<u8>"))]
    pub additional_status_info: Vec<u8>,
    #[serde(with = "serde_bytes")]
    #[cfg_attr(feature = "schemars", schemars(with = "Vec<u8>"))]
    pub overrides_info: Vec<u8>,
}

impl DeliveryEvent {
    /// The key of the delivery VAA this event reports on.
    pub fn delivery_vaa_key(&self) -> VaaKey {
        VaaKey::VaaHash {
            hash: self.delivery_vaa_hash,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{vaa::Header, Vaa};

    use super::*;

    fn published() -> MessagePublished {
        MessagePublished {
            sender: Address([0x27; 32]),
            sequence: 1_234,
            nonce: 9,
            payload: b"relay this".to_vec(),
            consistency_level: 15,
        }
    }

    #[test]
    fn body_names_the_message() {
        let msg = published();
        let body = msg.body(2, 1_700_000_000);

        assert_eq!(2, body.emitter_chain);
        assert_eq!(msg.sender, body.emitter_address);
        assert_eq!(msg.sequence, body.sequence);
        assert_eq!(msg.nonce, body.nonce);
        assert_eq!(msg.consistency_level, body.consistency_level);
        assert_eq!(msg.payload, body.payload);
        assert_eq!(1_700_000_000, body.timestamp);
    }

    #[test]
    fn key_matches_signed_vaa() {
        let msg = published();
        let vaa = Vaa::from((Header::default(), msg.body(2, 1)));

        assert!(msg.vaa_key(2).matches(&vaa));
        assert!(!msg.vaa_key(4).matches(&vaa));
    }

    #[test]
    fn delivery_vaa_key() {
        let vaa = Vaa {
            payload: vec![1, 2, 3],
            ..Default::default()
        };
        let event = DeliveryEvent {
            delivery_vaa_hash: vaa.digest().secp256k_hash,
            ..Default::default()
        };

        assert!(event.delivery_vaa_key().matches(&vaa));
    }

    #[test]
    fn json() {
        let event = DeliveryEvent {
            recipient_contract: Address([1; 32]),
            source_chain: 6,
            sequence: 77,
            delivery_vaa_hash: [2; 32],
            status: 2,
            gas_used: U256::from(21_000u64),
            refund_status: 0,
            additional_status_info: vec![2, 0, 5],
            overrides_info: Vec::new(),
        };

        let encoded = serde_json::to_string(&event).unwrap();
        assert_eq!(event, serde_json::from_str(&encoded).unwrap());

        let msg = published();
        let encoded = serde_json::to_string(&msg).unwrap();
        assert_eq!(msg, serde_json::from_str(&encoded).unwrap());
    }
}
