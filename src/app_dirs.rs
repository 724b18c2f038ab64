use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("oarlog"),
            )
        } else {
            ProjectDirs::from("", "", "oarlog")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    /// Directory holding the snapshot and journey JSON files.
    pub fn snapshot_dir() -> Option<PathBuf> {
        Self::state_dir()
    }

    /// Workout history database.
    pub fn history_db_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("history.db"))
    }
}
