//! Classification of a single log line into a structured event.
//!
//! Three steps, in order:
//! 1. **Suppression** — platform bookkeeping lines (`START RequestId`,
//!    `END RequestId`, `REPORT RequestId`) are dropped outright. This is
//!    the only point at which a line can be suppressed.
//! 2. **Structure detection** — lines opening with an ISO-8601-like
//!    timestamp and a UUID-shaped correlation id are split into timestamp,
//!    request id, and message; everything else is carried whole with a
//!    wall-clock timestamp.
//! 3. **Error taxonomy** — an ordered rule table is evaluated first match
//!    wins; survivors with no match stay at `Information` severity.
//!
//! Classification is total: every non-suppressed line yields an event.

use std::time::{SystemTime, UNIX_EPOCH};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::logs::event::{
    ErrorKind, ExceptionDetail, ExceptionInfo, LogEvent, Severity, PLATFORM_TYPE,
};

/// Prefixes of platform bookkeeping lines, matched case-insensitively.
pub const SUPPRESSED_PREFIXES: [&str; 3] =
    ["START RequestId", "END RequestId", "REPORT RequestId"];

/// Prefix of a line carrying an embedded exception document.
const EXCEPTION_STARTER: &str = "Exception: {";

/// One entry of the ordered classification table.
///
/// Rules with a `prefix` are evaluated against the raw line (prefix check
/// plus pattern) and attach the embedded exception payload on match; rules
/// without one are evaluated against the extracted message only.
pub struct ErrorRule {
    pub kind: ErrorKind,
    pub severity: Severity,
    pub pattern: Regex,
    pub prefix: Option<&'static str>,
}

lazy_static! {
    /// Leading timestamp (`YYYY-MM-DDThh:mm:ss.mmmZ`), separator, UUID-shaped
    /// correlation id, separator, free text. Captures the three fields.
    static ref STRUCTURED_LOG: Regex = Regex::new(
        r"^([0-9]{4}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[1-2][0-9]|3[0-1])T(?:2[0-3]|[01][0-9]):[0-5][0-9]:[0-5][0-9]\.[0-9]{3}Z)[ \t]([a-zA-Z0-9]{8}-[a-zA-Z0-9]{4}-[a-zA-Z0-9]{4}-[a-zA-Z0-9]{4}-[a-zA-Z0-9]{12})[ \t](.*)$"
    )
    .expect("structured log pattern is valid");

    /// Classification rules, evaluated in order. First match wins.
    pub static ref ERROR_RULES: Vec<ErrorRule> = vec![
        ErrorRule {
            kind: ErrorKind::Runtime,
            severity: Severity::Critical,
            pattern: Regex::new("(?i)exception").expect("exception pattern is valid"),
            prefix: Some(EXCEPTION_STARTER),
        },
        ErrorRule {
            kind: ErrorKind::Runtime,
            severity: Severity::Error,
            pattern: Regex::new("(?i)error").expect("error pattern is valid"),
            prefix: None,
        },
        ErrorRule {
            kind: ErrorKind::Configuration,
            severity: Severity::Error,
            pattern: Regex::new("(?i)module initialization error|unable to import module")
                .expect("configuration pattern is valid"),
            prefix: None,
        },
        ErrorRule {
            kind: ErrorKind::Timeout,
            severity: Severity::Error,
            pattern: Regex::new("(?i)task timed out|process exited before completing")
                .expect("timeout pattern is valid"),
            prefix: None,
        },
    ];
}

/// Classifies one raw log line.
///
/// Returns `None` only for suppressed bookkeeping lines.
#[must_use]
pub fn classify(
    function: &str,
    function_version: &str,
    region: &str,
    line: &str,
) -> Option<LogEvent> {
    if is_suppressed(line) {
        return None;
    }

    let (timestamp, request_id, message) = split_line(line);

    let mut event = LogEvent {
        message,
        function: function.to_string(),
        function_version: function_version.to_string(),
        region: region.to_string(),
        platform: PLATFORM_TYPE,
        severity: Severity::Information,
        error_kind: None,
        title: None,
        timestamp,
        request_id,
        exception: None,
    };

    apply_error_rules(line, &mut event);

    Some(event)
}

/// Whether the line is platform bookkeeping noise.
#[must_use]
pub fn is_suppressed(line: &str) -> bool {
    SUPPRESSED_PREFIXES
        .iter()
        .any(|prefix| starts_with_ignore_case(line, prefix))
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Splits a line into (timestamp, request id, message).
///
/// Unstructured lines are carried whole with a wall-clock timestamp. For
/// structured lines the first field is parsed as integer unix seconds,
/// falling back to wall clock when it does not parse (which is the common
/// case for ISO timestamps); the remainder is kept verbatim and may itself
/// contain tabs.
fn split_line(line: &str) -> (i64, Option<String>, String) {
    match STRUCTURED_LOG.captures(line) {
        None => (current_unix_seconds(), None, line.to_string()),
        Some(caps) => {
            let timestamp = caps[1]
                .parse::<i64>()
                .unwrap_or_else(|_| current_unix_seconds());
            (timestamp, Some(caps[2].to_string()), caps[3].to_string())
        }
    }
}

fn current_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

/// Walks the rule table, applying the first matching rule to the event.
fn apply_error_rules(line: &str, event: &mut LogEvent) {
    for rule in ERROR_RULES.iter() {
        let matched = match rule.prefix {
            Some(prefix) => starts_with_ignore_case(line, prefix) && rule.pattern.is_match(line),
            None => rule.pattern.is_match(&event.message),
        };
        if !matched {
            continue;
        }

        event.severity = rule.severity;
        event.error_kind = Some(rule.kind);
        event.title = Some(format!(
            "A {} error occurred in {}",
            rule.kind, event.function
        ));
        if rule.prefix.is_some() {
            event.exception = extract_exception(line);
        }
        return;
    }
}

/// Best-effort decode of the exception document embedded in the line.
///
/// The document starts at the first `{`. When it does not parse as JSON the
/// raw text is kept instead; classification never fails on a bad payload.
fn extract_exception(line: &str) -> Option<ExceptionInfo> {
    let start = line.find('{')?;
    let raw = &line[start..];

    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(document) => {
            let field = |keys: &[&str]| {
                keys.iter()
                    .find_map(|key| document.get(key))
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
            };
            Some(ExceptionInfo::Structured(ExceptionDetail {
                error_type: field(&["errorType", "type"]),
                error_message: field(&["errorMessage", "message"]),
                stack_trace: document
                    .get("stackTrace")
                    .map(serde_json::Value::to_string),
            }))
        }
        Err(e) => {
            debug!("CLASSIFIER | Exception payload is not valid JSON, keeping raw text: {e}");
            Some(ExceptionInfo::Raw(raw.to_string()))
        }
    }
}
