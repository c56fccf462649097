use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Route `tracing` events to `log_path`. The terminal belongs to the UI, so
/// events never go to stdout or stderr; without a writable log file logging is
/// simply off. `RUST_LOG` takes precedence over `level`.
pub fn init_file_logger(level: &str, log_path: Option<&Path>) {
    let Some(file) = log_path.and_then(open_log_file) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("marina_boat_manager={level}")));

    // Ignore the error if a subscriber is already installed (tests).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .try_init();
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_and_parent_directory_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("marina.log");
        assert!(open_log_file(&path).is_some());
        assert!(path.exists());
    }
}
