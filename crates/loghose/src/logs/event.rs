//! Structured events produced by classification.

use std::fmt;

use serde::Serialize;

/// Platform tag carried by every event.
pub const PLATFORM_TYPE: &str = "Lambda";

/// Event severity. The derived ordering is meaningful:
/// `Information < Error < Critical`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Information,
    Error,
    Critical,
}

/// Error category assigned by the classification rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Runtime,
    Configuration,
    Timeout,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Runtime => write!(f, "Runtime"),
            ErrorKind::Configuration => write!(f, "Configuration"),
            ErrorKind::Timeout => write!(f, "Timeout"),
        }
    }
}

/// Minimal schema for an exception document embedded in a log line.
///
/// Decoded best-effort; any field may be absent and the stack trace is kept
/// as an opaque string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExceptionDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

/// Exception payload attached to runtime-error events.
///
/// When the embedded document does not parse as JSON the raw text is kept
/// instead of aborting classification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExceptionInfo {
    Structured(ExceptionDetail),
    Raw(String),
}

/// One classified log line, ready to forward to the sink.
///
/// Created once per surviving line and immediately forwarded; nothing is
/// retained across invocations.
#[derive(Clone, Debug, Serialize)]
pub struct LogEvent {
    pub message: String,
    /// Name of the function that produced the line.
    pub function: String,
    pub function_version: String,
    pub region: String,
    /// Always [`PLATFORM_TYPE`].
    #[serde(rename = "type")]
    pub platform: &'static str,
    pub severity: Severity,
    /// `None` means the line carried no recognizable error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Present exactly when `error_kind` is present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Unix seconds, parsed from the line or wall-clock fallback.
    pub timestamp: i64,
    /// Correlation id, present only for structured lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<ExceptionInfo>,
}
