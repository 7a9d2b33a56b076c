//! Age-based scratch directory cleanup.
//!
//! Scratch files are uniquely named per episode, so the sweeper never needs
//! locks: age eligibility alone keeps it away from files an in-progress
//! episode is still writing.

use crate::config::CleanupSettings;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Delete scratch files older than `max_age`. Returns the number removed.
///
/// Errors are logged and never raised; cleanup must not fail a pipeline.
pub fn sweep_scratch(dir: &Path, max_age: Duration) -> usize {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Scratch sweep skipped, cannot read {}: {}", dir.display(), e);
            return 0;
        }
    };

    let now = SystemTime::now();
    let mut removed = 0;

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let old_enough = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .is_some_and(|age| age > max_age);

        if old_enough {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!("Failed to sweep {}: {}", path.display(), e),
            }
        }
    }

    if removed > 0 {
        info!("Swept {} stale scratch file(s) from {}", removed, dir.display());
    }
    removed
}

/// Background task sweeping the scratch directory on a fixed interval.
///
/// Started once at process init and stopped during graceful shutdown.
pub struct ScratchSweeper {
    handle: JoinHandle<()>,
}

impl ScratchSweeper {
    /// Start the periodic sweep task.
    pub fn start(scratch_dir: PathBuf, settings: &CleanupSettings) -> Self {
        let max_age = Duration::from_secs(settings.max_age_seconds);
        let period = Duration::from_secs(settings.sweep_interval_seconds.max(1));

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; skip it so the first sweep
            // happens one full interval after startup.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                sweep_scratch(&scratch_dir, max_age);
            }
        });

        Self { handle }
    }

    /// Stop the sweeper.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for ScratchSweeper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_removes_only_old_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("episode.mp3");
        std::fs::write(&file, b"data").unwrap();

        // A generous age keeps fresh files.
        assert_eq!(sweep_scratch(dir.path(), Duration::from_secs(3600)), 0);
        assert!(file.exists());

        // Zero age makes everything eligible.
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(sweep_scratch(dir.path(), Duration::ZERO), 1);
        assert!(!file.exists());
    }

    #[test]
    fn test_sweep_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(sweep_scratch(dir.path(), Duration::ZERO), 0);
        assert!(dir.path().join("subdir").exists());
    }

    #[test]
    fn test_sweep_on_missing_dir_is_a_noop() {
        assert_eq!(
            sweep_scratch(Path::new("/nonexistent/scratch"), Duration::ZERO),
            0
        );
    }

    #[tokio::test]
    async fn test_sweeper_start_and_stop() {
        let dir = tempfile::tempdir().unwrap();
        let settings = CleanupSettings {
            max_age_seconds: 0,
            sweep_interval_seconds: 1,
        };

        let sweeper = ScratchSweeper::start(dir.path().to_path_buf(), &settings);
        sweeper.stop();
    }
}
