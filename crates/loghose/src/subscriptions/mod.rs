//! Control-plane reconciliation: keeps every matching log group subscribed
//! to the delivery stream and under the configured retention policy.
//!
//! The pass is sequential per log group and isolates failures per group: a
//! bad group is logged and skipped, the rest of the pass continues.

pub mod api;
pub mod subscriber;
