//! Logging bootstrap.
//!
//! Every configured section gets a console layer and, when `file` is set, a
//! JSON file layer backed by a size-rotated file. The `default` section
//! receives all targets not claimed by another section.

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use file_rotate::{
    compression::Compression,
    suffix::AppendCount,
    ContentLimit, FileRotate,
};
use tracing::level_filters::LevelFilter;
use tracing::Metadata;
use tracing_subscriber::{
    filter::FilterFn, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

use crate::config::{LoggingConfig, Section};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// `None` means the sink is switched off. Unknown names fall back to INFO.
fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        "off" | "none" | "" => None,
        _ => Some(LevelFilter::INFO),
    }
}

/// `target` belongs to `subsystem` when equal or nested under it (`subsystem::...`).
fn matches_subsystem(target: &str, subsystem: &str) -> bool {
    target
        .strip_prefix(subsystem)
        .map(|rest| rest.is_empty() || rest.starts_with("::"))
        .unwrap_or(false)
}

fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

#[derive(Clone)]
struct RotatingWriter(Arc<Mutex<FileRotate<AppendCount>>>);

impl RotatingWriter {
    fn open(path: &Path, section: &Section) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
        let backups = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);
        let rotate = FileRotate::new(
            path,
            AppendCount::new(backups),
            ContentLimit::BytesSurpassed(max_bytes as usize),
            Compression::None,
            #[cfg(unix)]
            None,
        );
        Ok(Self(Arc::new(Mutex::new(rotate))))
    }
}

impl Write for RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.0.lock() {
            Ok(mut f) => f.write(buf),
            // A panicked writer must not take logging down with it.
            Err(poisoned) => poisoned.into_inner().write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.0.lock() {
            Ok(mut f) => f.flush(),
            Err(poisoned) => poisoned.into_inner().flush(),
        }
    }
}

impl<'a> fmt::MakeWriter<'a> for RotatingWriter {
    type Writer = RotatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Which targets a section is responsible for.
#[derive(Clone)]
enum Scope {
    Subsystem(String),
    /// Everything except the listed subsystems.
    Rest(Arc<Vec<String>>),
}

impl Scope {
    fn accepts(&self, meta: &Metadata<'_>) -> bool {
        match self {
            Scope::Subsystem(name) => matches_subsystem(meta.target(), name),
            Scope::Rest(claimed) => !claimed
                .iter()
                .any(|name| matches_subsystem(meta.target(), name)),
        }
    }
}

fn scoped_filter(
    scope: Scope,
    level: LevelFilter,
) -> FilterFn<impl Fn(&Metadata<'_>) -> bool + Send + Sync + 'static> {
    FilterFn::new(move |meta: &Metadata<'_>| *meta.level() <= level && scope.accepts(meta))
}

fn section_layers(
    name: &str,
    section: &Section,
    scope: Scope,
    base_dir: &Path,
    ansi: bool,
) -> Vec<BoxedLayer> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if let Some(level) = parse_level(&section.console_level) {
        layers.push(
            fmt::layer()
                .with_ansi(ansi)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(scoped_filter(scope.clone(), level))
                .boxed(),
        );
    }

    if section.file.trim().is_empty() {
        return layers;
    }
    let Some(level) = parse_level(&section.file_level) else {
        return layers;
    };

    let path = resolve_log_path(&section.file, base_dir);
    match RotatingWriter::open(&path, section) {
        Ok(writer) => layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(writer)
                .with_filter(scoped_filter(scope, level))
                .boxed(),
        ),
        // The subscriber is not installed yet, so stderr is the only channel.
        Err(e) => eprintln!(
            "failed to open log file '{}' for '{}': {}",
            path.display(),
            name,
            e
        ),
    }
    layers
}

fn build_layers(cfg: &LoggingConfig, base_dir: &Path, ansi: bool) -> Vec<BoxedLayer> {
    let subsystems: Vec<String> = cfg
        .keys()
        .filter(|k| k.as_str() != DEFAULT_SECTION)
        .cloned()
        .collect();

    let mut layers = Vec::new();
    for name in &subsystems {
        let section = &cfg[name];
        let scope = Scope::Subsystem(name.clone());
        layers.extend(section_layers(name, section, scope, base_dir, ansi));
    }
    if let Some(section) = cfg.get(DEFAULT_SECTION) {
        let scope = Scope::Rest(Arc::new(subsystems));
        layers.extend(section_layers(DEFAULT_SECTION, section, scope, base_dir, ansi));
    }
    layers
}

/// Install the global subscriber. Relative log paths resolve against `base_dir`
/// (normally `server.home_dir`). Calling it twice is a no-op.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = tracing_subscriber::fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let ansi = std::io::stdout().is_terminal();
    let layers = build_layers(cfg, base_dir, ansi);
    let _ = Registry::default().with(layers).try_init();
}
