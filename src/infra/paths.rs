// src/infra/paths.rs — XDG-compliant path management
//
// All paths respect the KOTOBA_HOME environment variable for isolation.
// When KOTOBA_HOME is set, all config and data live under that directory.
// When unset, config uses ~/.kotoba/ and data uses XDG_DATA_HOME/kotoba.

use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::OnceLock;

static PROJECT_DIRS: OnceLock<ProjectDirs> = OnceLock::new();

fn project_dirs() -> &'static ProjectDirs {
    PROJECT_DIRS.get_or_init(|| {
        ProjectDirs::from("", "", "kotoba").expect("Could not determine home directory")
    })
}

/// Returns the KOTOBA_HOME override, if set.
fn kotoba_home() -> Option<PathBuf> {
    std::env::var_os("KOTOBA_HOME").map(PathBuf::from)
}

/// Configuration directory: $KOTOBA_HOME/ or ~/.kotoba/
pub fn config_dir() -> PathBuf {
    if let Some(home) = kotoba_home() {
        return home;
    }
    dirs_home().join(".kotoba")
}

/// Data directory: $KOTOBA_HOME/data/ or XDG_DATA_HOME/kotoba
pub fn data_dir() -> PathBuf {
    if let Some(home) = kotoba_home() {
        return home.join("data");
    }
    project_dirs().data_local_dir().to_path_buf()
}

/// Home directory
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .expect("Could not determine home directory")
        .home_dir()
        .to_path_buf()
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Persisted session collection (JSON array of sessions)
pub fn sessions_file() -> PathBuf {
    data_dir().join("sessions.json")
}

/// Persisted active session id (plain string)
pub fn active_session_file() -> PathBuf {
    data_dir().join("active-session")
}
