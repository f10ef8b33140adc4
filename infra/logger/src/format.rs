use std::fmt;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields, format};
use tracing_subscriber::registry::LookupSpan;

// Keeps the source column narrow enough for terminal scanning.
const MAX_FILE_CHARS: usize = 20;

/// Single-line event format rendering the span scope explicitly:
///
/// ```text
/// INFO my_app::worker: worker.rs:42 -> request{id=7}: connected
/// ```
///
/// Used by [`Style::Scoped`](crate::Style). The filename is reduced to its
/// base name and truncated to at most 20 characters.
#[derive(Debug, Default)]
pub struct ScopedFormat;

impl<S, N> FormatEvent<S, N> for ScopedFormat
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
        write!(writer, "{} {}: ", metadata.level(), metadata.target())?;

        let line = metadata.line().unwrap_or(0);
        let file = metadata.file().map_or("unknown", base_name);
        write!(writer, "{}:{line} -> ", truncate_chars(file, MAX_FILE_CHARS))?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}", span.name())?;

                // Span fields were rendered by the fmt layer's field formatter
                // on `new_span` and stashed in the span's extensions.
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>()
                    && !fields.is_empty()
                {
                    write!(writer, "{{{fields}}}")?;
                }
                write!(writer, ": ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn truncate_chars(value: &str, max: usize) -> &str {
    value.char_indices().nth(max).map_or(value, |(idx, _)| &value[..idx])
}

#[cfg(test)]
mod tests {
    use super::{base_name, truncate_chars};

    #[test]
    fn base_name_strips_directories() {
        assert_eq!(base_name("src/format.rs"), "format.rs");
        assert_eq!(base_name("infra\\logger\\src\\lib.rs"), "lib.rs");
        assert_eq!(base_name("lib.rs"), "lib.rs");
    }

    #[test]
    fn truncate_chars_is_boundary_safe() {
        assert_eq!(truncate_chars("short.rs", 20), "short.rs");
        assert_eq!(truncate_chars("a_very_long_module_name.rs", 10), "a_very_lon");
        // Multi-byte characters must not be split mid-codepoint.
        assert_eq!(truncate_chars("módulo_largo.rs", 7), "módulo_");
    }
}
