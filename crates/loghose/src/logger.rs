//! Custom tracing formatter for loghose diagnostics.
//!
//! Everything this crate logs is itself shipped through CloudWatch, so the
//! formatter prefixes every line with `LOGHOSE` to keep the shipper's own
//! output easy to filter (and to spot in the self-exclusion check):
//!
//! ```text
//! LOGHOSE | LEVEL | [span_name{span_fields}:] message {event_fields}
//! ```

use std::fmt;
use tracing_core::{Event, Subscriber};
use tracing_subscriber::fmt::{
    format::{self, FormatEvent, FormatFields},
    FmtContext, FormattedFields,
};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Log formatter that prefixes messages with `LOGHOSE`.
#[derive(Debug, Clone, Copy)]
pub struct Formatter;

impl<S, N> FormatEvent<S, N> for Formatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        write!(&mut writer, "LOGHOSE | {} | ", metadata.level())?;

        // Include the full span hierarchy, root first, for context
        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}", span.name())?;

                // Span fields were formatted during `new_span` and stored in
                // the span's extensions by the `fmt` layer
                let ext = span.extensions();
                let fields = &ext
                    .get::<FormattedFields<N>>()
                    .expect("will never be `None`");

                if !fields.is_empty() {
                    write!(writer, "{{{fields}}}")?;
                }
                write!(writer, ": ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Installs the global tracing subscriber.
///
/// The filter is taken from `RUST_LOG` when set, defaulting to `info`.
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .event_format(Formatter)
        .with_env_filter(filter)
        .try_init();
}
