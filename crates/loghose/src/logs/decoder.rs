//! Decompression and decoding of a single batch record.
//!
//! Every record delivered by the stream carries a gzip-compressed JSON
//! document. Both stages fail loudly: a malformed record is a decode error
//! for the caller, never a silently defaulted envelope.

use std::io::Read;

use flate2::read::GzDecoder;
use serde::Deserialize;
use thiserror::Error;

/// Message type marking a transport health-check record. Carries no log
/// lines and is always skipped.
pub const CONTROL_MESSAGE: &str = "CONTROL_MESSAGE";

/// Errors raised while turning a raw record into an envelope.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to decompress record payload: {0}")]
    Decompress(#[from] std::io::Error),

    #[error("failed to decode record payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// One decompressed batch record.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnvelope {
    pub message_type: String,
    /// Slash-delimited hierarchical name of the producing log group.
    pub log_group: String,
    /// Stream name containing the bracketed function version token.
    pub log_stream: String,
    pub log_events: Vec<RawLogLine>,
}

/// A single raw log line within an envelope.
#[derive(Clone, Debug, Deserialize)]
pub struct RawLogLine {
    pub message: String,
}

impl RawEnvelope {
    #[must_use]
    pub fn is_control(&self) -> bool {
        self.message_type == CONTROL_MESSAGE
    }
}

/// Decompresses one record payload and decodes it into a [`RawEnvelope`].
pub fn decode(payload: &[u8]) -> Result<RawEnvelope, DecodeError> {
    let mut decoder = GzDecoder::new(payload);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;

    Ok(serde_json::from_slice(&decompressed)?)
}
