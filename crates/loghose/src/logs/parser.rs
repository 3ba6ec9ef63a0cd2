//! Batch parsing: decode every record, derive the producing function's
//! identity, and classify each line.

use bytes::Bytes;
use tracing::debug;

use crate::logs::classifier;
use crate::logs::decoder::{self, DecodeError};
use crate::logs::event::LogEvent;

/// One record of a delivery-stream batch, still compressed, tagged with the
/// region it arrived from.
#[derive(Clone, Debug)]
pub struct BatchRecord {
    pub payload: Bytes,
    pub region: String,
}

/// Parses a whole batch into a flat, ordered sequence of events.
///
/// Control records are skipped; per-line order within a record and record
/// order within the batch are preserved. A decode failure on any record
/// propagates — failure isolation happens one layer up, in the shipper.
pub fn parse_batch(records: &[BatchRecord]) -> Result<Vec<LogEvent>, DecodeError> {
    let mut events = Vec::new();

    for record in records {
        let envelope = decoder::decode(&record.payload)?;
        if envelope.is_control() {
            debug!("PARSER | Skipping control message");
            continue;
        }

        let function = function_name(&envelope.log_group);
        let version = function_version(&envelope.log_stream);

        for line in &envelope.log_events {
            if let Some(event) =
                classifier::classify(function, version, &record.region, &line.message)
            {
                events.push(event);
            }
        }
    }

    Ok(events)
}

/// Last segment of a slash-delimited log group name.
#[must_use]
pub fn function_name(log_group: &str) -> &str {
    log_group.rsplit('/').next().unwrap_or(log_group)
}

/// Text strictly between the first `[` and the first `]` of the log stream
/// name, or `""` when the brackets are missing.
#[must_use]
pub fn function_version(log_stream: &str) -> &str {
    let Some(start) = log_stream.find('[') else {
        return "";
    };
    let rest = &log_stream[start + 1..];
    match rest.find(']') {
        Some(end) => &rest[..end],
        None => "",
    }
}
