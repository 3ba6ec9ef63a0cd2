//! # Loghose
//!
//! Ships AWS Lambda logs that CloudWatch routes into a delivery stream.
//!
//! The crate covers the two halves of that pipeline:
//! - **Ingestion** ([`logs`]): decode gzip-compressed batch records, derive
//!   the producing function's identity, classify every log line into a
//!   structured event with severity and error category, and forward the
//!   events to a sink.
//! - **Subscription management** ([`subscriptions`]): enumerate log groups
//!   under a name prefix, keep a subscription filter to the delivery stream
//!   installed on each of them (recreating it when it has drifted), and
//!   enforce a uniform retention policy.
//!
//! The delivery transport, the downstream sink, and the log-group
//! administration API are external collaborators reachable only through the
//! [`logs::shipper::LogSink`] and [`subscriptions::api::LogsAdmin`] traits.

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

/// Configuration sourced from environment variables
pub mod config;

/// Logging infrastructure and tracing setup
pub mod logger;

/// Log ingestion, classification, and forwarding
pub mod logs;

/// Subscription filter and retention policy reconciliation
pub mod subscriptions;
