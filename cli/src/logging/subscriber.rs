//! Tracing subscriber setup: console formatter, file layer, and initialisation.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// Target for stage headers.
pub(super) const STAGE_TARGET: &str = "dotlink::stage";
/// Target for actions that were only planned.
pub(super) const DRY_RUN_TARGET: &str = "dotlink::dry_run";
/// Target for actions that were applied.
pub(super) const ACTION_TARGET: &str = "dotlink::action";

/// Width the action label is padded to so paths line up.
const KIND_WIDTH: usize = 8;

/// Fields recorded on a dotlink event.
///
/// Plain messages only carry `message`. Events from
/// [`Logger::action`](super::logger::Logger::action) also carry `kind`,
/// `path`, and optionally `dest` and `reason`; those are rendered from the
/// fields rather than the pre-formatted message.
#[derive(Debug, Default)]
struct EventFields {
    message: String,
    kind: Option<String>,
    path: String,
    dest: String,
    reason: String,
}

impl EventFields {
    fn from_event(event: &tracing::Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }

    /// Plain text of the event.
    fn text(&self) -> String {
        match &self.kind {
            Some(kind) => self.action_line(kind, str::to_owned),
            None => self.message.clone(),
        }
    }

    /// `KIND     path -> dest (reason)`, with `paint` applied to the padded
    /// label only.
    fn action_line(&self, kind: &str, paint: impl Fn(&str) -> String) -> String {
        let mut line = format!("{} {}", paint(&format!("{kind:<KIND_WIDTH$}")), self.path);
        if !self.dest.is_empty() {
            line.push_str(" -> ");
            line.push_str(&self.dest);
        }
        if !self.reason.is_empty() {
            line.push_str(&format!(" ({})", self.reason));
        }
        line
    }
}

impl tracing::field::Visit for EventFields {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.record_str(field, &format!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        let slot = match field.name() {
            "message" => &mut self.message,
            "path" => &mut self.path,
            "dest" => &mut self.dest,
            "reason" => &mut self.reason,
            "kind" => {
                self.kind = Some(value.to_string());
                return;
            }
            _ => return,
        };
        *slot = value.to_string();
    }
}

/// ANSI colour for an action label on the console.
fn kind_colour(kind: &str) -> &'static str {
    match kind {
        "CONFLICT" => "31",
        "SKIP" => "2",
        "BACKUP" | "MOVE" => "33",
        "LINK" => "32",
        _ => "36",
    }
}

fn paint(colour: &str, text: &str) -> String {
    format!("\x1b[{colour}m{text}\x1b[0m")
}

/// A [`tracing_subscriber::Layer`] that appends all events to the persistent
/// log file with timestamps and ANSI codes stripped.
///
/// Always captures events at `DEBUG` level and above regardless of the
/// console verbosity setting.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open the log file for `command` under the cache directory.
    ///
    /// Returns `None` if the cache directory cannot be created or the file
    /// cannot be opened.
    pub(super) fn new(command: &str) -> Option<Self> {
        Self::open(&log_file_path(command)?)
    }

    /// Truncate `path`, write a run header, and return a layer appending to it.
    pub(super) fn open(path: &Path) -> Option<Self> {
        let version =
            option_env!("DOTLINK_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let header = format!(
            "==========================================\n\
             Dotlink {version} {}\n\
             ==========================================\n",
            format_utc_datetime(),
        );
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let level = *metadata.level();
        let target = metadata.target();

        let msg = strip_ansi(&EventFields::from_event(event).text());
        let ts = format_utc_time();

        let line = match (level, target) {
            (tracing::Level::INFO, STAGE_TARGET) => format!("[{ts}] ==> {msg}"),
            (tracing::Level::INFO, DRY_RUN_TARGET) => format!("[{ts}]     [dry run] {msg}"),
            (tracing::Level::ERROR, _) => format!("[{ts}]     [error] {msg}"),
            (tracing::Level::WARN, _) => format!("[{ts}]     [warn] {msg}"),
            (tracing::Level::DEBUG, _) => format!("[{ts}]     [debug] {msg}"),
            _ => format!("[{ts}]     {msg}"),
        };

        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that emits dotlink-style
/// console output.
struct DotlinkFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for DotlinkFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let level = *metadata.level();
        let target = metadata.target();

        let fields = EventFields::from_event(event);
        if let Some(kind) = &fields.kind {
            let line = fields.action_line(kind, |label| paint(kind_colour(kind), label));
            return if target == DRY_RUN_TARGET {
                writeln!(writer, "  \x1b[33m[DRY RUN]\x1b[0m {line}")
            } else {
                writeln!(writer, "  {line}")
            };
        }
        let msg = &fields.message;

        match level {
            tracing::Level::ERROR => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
            tracing::Level::WARN => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            tracing::Level::INFO if target == STAGE_TARGET => {
                writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m")
            }
            tracing::Level::INFO if target == DRY_RUN_TARGET => {
                writeln!(writer, "  \x1b[33m[DRY RUN]\x1b[0m {msg}")
            }
            tracing::Level::INFO => writeln!(writer, "  {msg}"),
            _ => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Sets up a console subscriber that formats events in the dotlink style and
/// a file subscriber that writes all events (including `debug`) to
/// `$XDG_CACHE_HOME/dotlink/<command>.log`. `RUST_LOG` overrides the console
/// level when set. Must be called once at program startup, before any
/// logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let console_filter = EnvFilter::builder()
        .with_default_directive(console_level.into())
        .from_env_lossy();

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let console_layer = fmt::layer()
        .event_format(DotlinkFormatter)
        .with_writer(make_writer)
        .with_filter(console_filter);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    // A second call (e.g. from tests) leaves the first subscriber in place.
    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .ok();
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt as _;

    fn action(kind: &str, path: &str, dest: &str, reason: &str) -> EventFields {
        EventFields {
            message: "ignored when kind is set".to_string(),
            kind: Some(kind.to_string()),
            path: path.to_string(),
            dest: dest.to_string(),
            reason: reason.to_string(),
        }
    }

    #[test]
    fn plain_event_renders_message() {
        let fields = EventFields {
            message: "3 linked, 0 already ok".to_string(),
            ..EventFields::default()
        };
        assert_eq!(fields.text(), "3 linked, 0 already ok");
    }

    #[test]
    fn action_labels_are_padded_and_optional_parts_omitted() {
        assert_eq!(
            action("LINK", "/h/.bashrc", "/r/bashrc", "").text(),
            "LINK     /h/.bashrc -> /r/bashrc"
        );
        assert_eq!(action("MKDIR", "/h/.config", "", "").text(), "MKDIR    /h/.config");
        assert_eq!(
            action("CONFLICT", "/h/.vimrc", "", "occupied").text(),
            "CONFLICT /h/.vimrc (occupied)"
        );
    }

    #[test]
    fn console_paints_only_the_label() {
        let fields = action("CONFLICT", "/h/.vimrc", "", "occupied");
        let line = fields.action_line("CONFLICT", |label| paint(kind_colour("CONFLICT"), label));
        assert_eq!(line, "\x1b[31mCONFLICT\x1b[0m /h/.vimrc (occupied)");
        assert_eq!(strip_ansi(&line), fields.text());
    }

    #[test]
    fn kinds_get_distinct_colours() {
        assert_eq!(kind_colour("LINK"), "32");
        assert_eq!(kind_colour("SKIP"), "2");
        assert_eq!(kind_colour("BACKUP"), "33");
        assert_eq!(kind_colour("UNLINK"), "36");
    }

    #[test]
    fn file_layer_renders_action_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("test.log");
        let layer = FileLayer::open(&path).unwrap();
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(
                target: DRY_RUN_TARGET,
                kind = "BACKUP",
                path = %"/h/.vimrc",
                dest = %"/h/.vimrc.bak.20260101-000000",
                reason = %"",
                "unused"
            );
            tracing::warn!("plain warning");
        });

        let contents = fs::read_to_string(&path).unwrap();
        assert!(
            contents.contains("[dry run] BACKUP   /h/.vimrc -> /h/.vimrc.bak.20260101-000000\n"),
            "{contents}"
        );
        assert!(!contents.contains("unused"));
        assert!(contents.contains("[warn] plain warning"));
    }
}
