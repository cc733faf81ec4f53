use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Open `path` as a non-rotating log file. Fails instead of panicking when
/// the file cannot be created.
pub fn file_appender(path: &Path) -> anyhow::Result<RollingFileAppender> {
    let name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("log path {} has no file name", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy().into_owned())
        .build(dir)?;
    Ok(appender)
}

/// Initialise logging. Without debug logging the level is forced to `info`;
/// with it the default is `debug` and `RUST_LOG` may override it.
/// When `log_file` is given, output goes to that file instead of stderr. A
/// log file that cannot be opened falls back to stderr.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    // `RUST_LOG` is ignored unless debug logging was asked for, so a stray
    // variable in the user's environment cannot make the widget verbose.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let Some(path) = log_file else {
        let _ = builder.try_init();
        return;
    };

    match file_appender(&path) {
        Ok(appender) => {
            let _ = builder.with_ansi(false).with_writer(appender).try_init();
        }
        Err(e) => {
            let _ = builder.try_init();
            tracing::warn!(path = %path.display(), error = %e, "cannot open log file, logging to stderr");
        }
    }
}
