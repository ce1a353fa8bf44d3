use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "shikkha-backend.log";

/// Keeps the non-blocking file writer alive; drop flushes it
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLogSettings {
    pub dir: PathBuf,
}

impl FileLogSettings {
    /// `Some` when `ENABLE_FILE_LOGS` is set, with `LOG_DIR` defaulting to `./logs`
    pub fn from_env() -> Option<Self> {
        Self::resolve(
            std::env::var("ENABLE_FILE_LOGS").ok().as_deref(),
            std::env::var("LOG_DIR").ok().as_deref(),
        )
    }

    fn resolve(enabled: Option<&str>, dir: Option<&str>) -> Option<Self> {
        let enabled = matches!(
            enabled.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
            Some("true") | Some("1")
        );
        if !enabled {
            return None;
        }

        let dir = dir
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or("./logs");
        Some(Self {
            dir: PathBuf::from(dir),
        })
    }
}

pub fn init_tracing(log_level: &str) -> Option<FileLogGuard> {
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(true);

    let file_layer = FileLogSettings::from_env().and_then(|settings| {
        if let Err(err) = std::fs::create_dir_all(&settings.dir) {
            eprintln!(
                "failed to create log directory {}: {err}",
                settings.dir.display()
            );
            return None;
        }
        let appender = RollingFileAppender::new(Rotation::DAILY, &settings.dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true);
        Some((layer, guard))
    });

    match file_layer {
        Some((layer, guard)) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout_layer)
                .with(layer)
                .init();
            Some(FileLogGuard { _guard: guard })
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout_layer)
                .init();
            None
        }
    }
}
