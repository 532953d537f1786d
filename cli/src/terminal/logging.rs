use colored::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::registry::LookupSpan;

use crate::terminal::spinner::SpinnerWriter;

pub struct AmbitFormatter;

impl<S, N> FormatEvent<S, N> for AmbitFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        let symbol: ColoredString = if meta.target().ends_with("::success") {
            "[✓]".green().bold()
        } else {
            match *meta.level() {
                Level::TRACE => "[ ]".dimmed(),
                Level::DEBUG => "[?]".blue(),
                Level::INFO => "[+]".cyan().bold(),
                Level::WARN => "[*]".yellow().bold(),
                Level::ERROR => "[-]".red().bold(),
            }
        };

        write!(writer, "{} ", symbol)?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Installs the subscriber. Log lines route through the spinner so they
/// print above it instead of tearing the tick line.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .event_format(AmbitFormatter)
        .with_env_filter(filter)
        .with_writer(|| SpinnerWriter)
        .init();
}
