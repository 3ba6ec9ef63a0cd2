//! Top-level batch shipping with failure isolation.
//!
//! [`Shipper::ship`] is the sole failure-isolation boundary of the
//! ingestion pipeline: decode, parse, classify, and forward failures are
//! all reported as diagnostics and swallowed here, so a malformed batch
//! degrades to "no events shipped," never a failed invocation.

use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error as ThisError;
use tracing::{debug, error};

use crate::logs::event::LogEvent;
use crate::logs::parser::{parse_batch, BatchRecord};

/// Error returned when the sink rejects an event.
#[derive(ThisError, Debug)]
#[error("{message}")]
pub struct SinkError {
    pub message: String,
}

impl SinkError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Downstream sink structured events are forwarded to.
///
/// The shipper awaits the result but does not interpret it beyond logging
/// failures.
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn forward(&self, event: LogEvent) -> Result<(), SinkError>;
}

/// Drives one batch through parse, classify, and concurrent forwarding.
pub struct Shipper<S> {
    sink: S,
}

impl<S: LogSink> Shipper<S> {
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Read access to the underlying sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Ships one batch. Never fails from the transport's perspective.
    ///
    /// All events are forwarded concurrently and every forward is awaited
    /// before returning; a slow or failing forward neither blocks nor loses
    /// the others.
    pub async fn ship(&self, records: &[BatchRecord]) {
        let events = match parse_batch(records) {
            Ok(events) => events,
            Err(e) => {
                error!("SHIPPER | Dropping batch: {e}");
                return;
            }
        };

        if events.is_empty() {
            return;
        }

        debug!("SHIPPER | Forwarding {} events", events.len());
        let results = join_all(events.into_iter().map(|event| self.sink.forward(event))).await;
        for result in results {
            if let Err(e) = result {
                error!("SHIPPER | Failed to forward event: {e}");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::sync::Mutex;

    /// Sink that records forwarded events and can be told to fail.
    struct TestSink {
        forwarded: Mutex<Vec<LogEvent>>,
        fail: bool,
    }

    impl TestSink {
        fn new(fail: bool) -> Self {
            Self {
                forwarded: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl LogSink for TestSink {
        async fn forward(&self, event: LogEvent) -> Result<(), SinkError> {
            self.forwarded.lock().unwrap().push(event);
            if self.fail {
                Err(SinkError::new("sink unavailable"))
            } else {
                Ok(())
            }
        }
    }

    fn gzip_record(json: &str) -> BatchRecord {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(json.as_bytes()).unwrap();
        BatchRecord {
            payload: Bytes::from(encoder.finish().unwrap()),
            region: "us-east-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ship_forwards_classified_events() {
        let sink = TestSink::new(false);
        let shipper = Shipper::new(sink);

        let record = gzip_record(
            r#"{"messageType": "DATA_MESSAGE", "logGroup": "/aws/lambda/my-func", "logStream": "x[$LATEST]y", "logEvents": [{"message": "Hello world"}]}"#,
        );
        shipper.ship(&[record]).await;

        let forwarded = shipper.sink.forwarded.lock().unwrap();
        assert_eq!(forwarded.len(), 1);
        assert_eq!(forwarded[0].message, "Hello world");
    }

    #[tokio::test]
    async fn test_ship_swallows_decode_failure() {
        let sink = TestSink::new(false);
        let shipper = Shipper::new(sink);

        let bad = BatchRecord {
            payload: Bytes::from_static(b"not gzip"),
            region: "us-east-1".to_string(),
        };
        // Must not panic or propagate
        shipper.ship(&[bad]).await;

        assert!(shipper.sink.forwarded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ship_swallows_sink_failure() {
        let sink = TestSink::new(true);
        let shipper = Shipper::new(sink);

        let record = gzip_record(
            r#"{"messageType": "DATA_MESSAGE", "logGroup": "g", "logStream": "s[1]t", "logEvents": [{"message": "a"}, {"message": "b"}]}"#,
        );
        shipper.ship(&[record]).await;

        // Every forward was still attempted despite the failures
        assert_eq!(shipper.sink.forwarded.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ship_empty_batch_is_a_no_op() {
        let sink = TestSink::new(false);
        let shipper = Shipper::new(sink);
        shipper.ship(&[]).await;
        assert!(shipper.sink.forwarded.lock().unwrap().is_empty());
    }
}
