//! Protocol constants shared by the codecs and the verifier.

/// The largest guardian set the network runs with, and so the most signatures a VAA can carry.
pub const MAX_SIGNATURES: usize = 19;

/// `version:u8 | guardian_set_index:u32 | signature_count:u8`
pub const VAA_HEADER_LEN: usize = 6;

/// `guardian_index:u8 | r:[u8; 32] | s:[u8; 32] | recovery_id:u8`
pub const SIGNATURE_LEN: usize = 66;

/// Length of the fixed-width body fields that precede the payload.
pub const VAA_BODY_FIXED_LEN: usize = 51;

pub const DELIVERY_INSTRUCTION_PAYLOAD_ID: u8 = 1;
pub const REDELIVERY_INSTRUCTION_PAYLOAD_ID: u8 = 2;

pub const VAA_KEY_VERSION: u8 = 1;
pub const VAA_KEY_EMITTER_SEQUENCE: u8 = 0;
pub const VAA_KEY_HASH: u8 = 1;

/// Most VAA keys a delivery instruction can reference; the count is a single byte on the wire.
pub const MAX_VAA_KEYS: usize = u8::MAX as usize;

pub const EXECUTION_PARAMETERS_VERSION: u8 = 1;
pub const DELIVERY_OVERRIDE_VERSION: u8 = 1;

pub const FORWARD_FAILURE_INSUFFICIENT_FUNDS: u8 = 1;
pub const FORWARD_FAILURE_UNSUPPORTED_TARGET_CHAIN: u8 = 2;
pub const FORWARD_FAILURE_REVERTED: u8 = 3;

/// `floor(2 * n / 3) + 1`.
///
/// A set with no guardians still needs one signature, so it can never be satisfied.
pub const fn quorum(guardians: usize) -> usize {
    (guardians * 2) / 3 + 1
}
