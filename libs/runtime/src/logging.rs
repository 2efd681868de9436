//! Subscriber setup for userdesk processes.
//!
//! Two layers are installed: human-readable lines on stderr (stdout belongs to
//! the interactive screen) and JSON lines in rotating files under the home
//! directory. Both are routed per subsystem, where a subsystem is a target
//! prefix such as `users_console` or `users_console::screen`. The longest
//! matching prefix wins; the `default` section catches everything else.

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use file_rotate::compression::Compression;
use file_rotate::suffix::{AppendTimestamp, FileLimit};
use file_rotate::{ContentLimit, FileRotate};
use tracing::{Level, Metadata};
use tracing_subscriber::filter::FilterFn;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

use crate::config::{LoggingConfig, Section};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;

/// `None` means the output is switched off. Unknown names fall back to info.
fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "off" | "none" | "" => None,
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => Some(Level::INFO),
    }
}

/// `target` is `prefix` itself or lives below it (`prefix::...`).
fn is_under(target: &str, prefix: &str) -> bool {
    target
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

// ---- rotating files ----

type LogFile = Arc<Mutex<FileRotate<AppendTimestamp>>>;

fn retention(section: &Section) -> FileLimit {
    match (section.max_backups, section.max_age_days) {
        (Some(n), _) => FileLimit::MaxFiles(n.max(1)),
        (None, Some(days)) => FileLimit::Age(chrono::Duration::days(i64::from(days.max(1)))),
        (None, None) => FileLimit::Age(chrono::Duration::days(1)),
    }
}

fn log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_log_file(path: &Path, max_bytes: usize, limit: FileLimit) -> std::io::Result<LogFile> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let rotate = FileRotate::new(
        path,
        AppendTimestamp::default(limit),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(Arc::new(Mutex::new(rotate)))
}

/// Open the section's file. Failures are reported on stderr and leave the
/// subsystem without a file of its own; logging must never stop the process.
fn section_file(name: &str, section: &Section, base_dir: &Path) -> Option<LogFile> {
    if section.file.trim().is_empty() {
        return None;
    }
    let path = log_path(&section.file, base_dir);
    let max_mb = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB);
    let max_bytes = usize::try_from(max_mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX);

    match open_log_file(&path, max_bytes, retention(section)) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("userdesk: cannot open log file for '{name}' at {}: {e}", path.display());
            None
        }
    }
}

// ---- per-subsystem routing ----

struct Subsystem {
    prefix: String,
    console: Option<Level>,
    file_level: Option<Level>,
    file: Option<LogFile>,
}

impl Subsystem {
    fn from_section(prefix: &str, section: &Section, base_dir: &Path) -> Self {
        Self {
            prefix: prefix.to_string(),
            console: parse_level(&section.console_level),
            file_level: parse_level(&section.file_level),
            file: section_file(prefix, section, base_dir),
        }
    }

    fn silent(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            console: None,
            file_level: None,
            file: None,
        }
    }
}

fn allows(level: Option<Level>, meta: &Metadata<'_>) -> bool {
    level.is_some_and(|max| *meta.level() <= max)
}

struct Routes {
    // Longest prefix first.
    named: Vec<Subsystem>,
    fallback: Subsystem,
}

impl Routes {
    fn from_config(cfg: &LoggingConfig, base_dir: &Path) -> Self {
        let fallback = cfg
            .get(DEFAULT_SECTION)
            .map(|s| Subsystem::from_section(DEFAULT_SECTION, s, base_dir))
            .unwrap_or_else(|| Subsystem::silent(DEFAULT_SECTION));

        let mut named: Vec<Subsystem> = cfg
            .iter()
            .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
            .map(|(name, s)| Subsystem::from_section(name, s, base_dir))
            .collect();
        named.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));

        Self { named, fallback }
    }

    fn subsystem_for(&self, target: &str) -> &Subsystem {
        self.named
            .iter()
            .find(|s| is_under(target, &s.prefix))
            .unwrap_or(&self.fallback)
    }

    /// A subsystem without a file of its own writes into the default file.
    fn file_for(&self, target: &str) -> Option<&LogFile> {
        self.subsystem_for(target)
            .file
            .as_ref()
            .or(self.fallback.file.as_ref())
    }

    fn console_enabled(&self, meta: &Metadata<'_>) -> bool {
        allows(self.subsystem_for(meta.target()).console, meta)
    }

    fn file_enabled(&self, meta: &Metadata<'_>) -> bool {
        self.file_for(meta.target()).is_some()
            && allows(self.subsystem_for(meta.target()).file_level, meta)
    }

    fn has_files(&self) -> bool {
        self.fallback.file.is_some() || self.named.iter().any(|s| s.file.is_some())
    }
}

/// Writer for one event: the subsystem's file, or nothing.
struct FileSink(Option<LogFile>);

impl FileSink {
    fn with<R>(
        &self,
        f: impl FnOnce(&mut FileRotate<AppendTimestamp>) -> std::io::Result<R>,
        none: R,
    ) -> std::io::Result<R> {
        match &self.0 {
            Some(file) => {
                let mut guard = file
                    .lock()
                    .map_err(|_| std::io::Error::other("log file lock poisoned"))?;
                f(&mut guard)
            }
            None => Ok(none),
        }
    }
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.with(|w| w.write(buf), buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.with(|w| w.flush(), ())
    }
}

#[derive(Clone)]
struct FileRouter(Arc<Routes>);

impl<'a> MakeWriter<'a> for FileRouter {
    type Writer = FileSink;

    fn make_writer(&'a self) -> Self::Writer {
        FileSink(self.0.fallback.file.clone())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        FileSink(self.0.file_for(meta.target()).cloned())
    }
}

// ---- init ----

/// Install the global subscriber. `base_dir` (normally `app.home_dir`)
/// anchors relative log file paths. Calling it twice is a no-op.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // `log` records from dependencies go through tracing as well.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = tracing_subscriber::fmt()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let routes = Arc::new(Routes::from_config(cfg, base_dir));

    let console_routes = routes.clone();
    let console = fmt::layer()
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(FilterFn::new(move |meta| console_routes.console_enabled(meta)));

    let files = routes.has_files().then(|| {
        let file_routes = routes.clone();
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(FileRouter(routes.clone()))
            .with_filter(FilterFn::new(move |meta| file_routes.file_enabled(meta)))
    });

    let _ = Registry::default().with(console).with(files).try_init();
}
