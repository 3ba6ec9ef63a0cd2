//! Log ingestion pipeline: from compressed batch records to structured
//! events at the sink.
//!
//! ```text
//!   Delivery stream batch
//!          │
//!          v
//!   ┌──────────────┐
//!   │   Decoder    │  (gzip + JSON envelope)
//!   └──────┬───────┘
//!          │
//!          v
//!   ┌──────────────┐
//!   │ Batch parser │  (skip control records, derive identity)
//!   └──────┬───────┘
//!          │
//!          v
//!   ┌──────────────┐
//!   │  Classifier  │  (suppress noise, split, error taxonomy)
//!   └──────┬───────┘
//!          │
//!          v
//!   ┌──────────────┐
//!   │   Shipper    │  (concurrent forward to the sink)
//!   └──────────────┘
//! ```
//!
//! Decode failures propagate up through the parser and are swallowed at the
//! shipper, which is the single failure-isolation boundary: one malformed
//! record costs the batch, never the invocation.

pub mod classifier;
pub mod decoder;
pub mod event;
pub mod parser;
pub mod shipper;
