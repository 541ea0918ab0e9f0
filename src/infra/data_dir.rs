use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const APP_DIR_NAME: &str = "gdn";
pub const DB_FILE_NAME: &str = "db.sqlite";

#[derive(Debug, Error)]
pub enum ResolveDataDirError {
    #[error("no writable data directory found (set XDG_DATA_HOME or HOME)")]
    NotFound,

    #[error("failed to create data dir {path}: {source}")]
    CreateDir { path: String, source: io::Error },
}

pub fn resolve_data_dir() -> Result<PathBuf, ResolveDataDirError> {
    resolve_data_dir_from(std::env::var_os("XDG_DATA_HOME"), dirs::home_dir())
}

/// Picks `$XDG_DATA_HOME/gdn` when that base is writable, otherwise
/// `<home>/.local/share/gdn`. The chosen directory is created if missing.
pub fn resolve_data_dir_from(
    xdg_data_home: Option<OsString>,
    home: Option<PathBuf>,
) -> Result<PathBuf, ResolveDataDirError> {
    if let Some(xdg_data_home) = xdg_data_home.filter(|value| !value.is_empty()) {
        let base = PathBuf::from(xdg_data_home);
        if is_writable(&base) {
            return ensure_app_dir(&base);
        }
    }

    let Some(home) = home else {
        return Err(ResolveDataDirError::NotFound);
    };

    let base = home.join(".local").join("share");
    if fs::create_dir_all(&base).is_err() || !is_writable(&base) {
        return Err(ResolveDataDirError::NotFound);
    }
    ensure_app_dir(&base)
}

pub fn db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DB_FILE_NAME)
}

fn ensure_app_dir(base: &Path) -> Result<PathBuf, ResolveDataDirError> {
    let dir = base.join(APP_DIR_NAME);
    fs::create_dir_all(&dir).map_err(|error| ResolveDataDirError::CreateDir {
        path: dir.display().to_string(),
        source: error,
    })?;
    Ok(dir)
}

#[cfg(unix)]
fn is_writable(path: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

#[cfg(not(unix))]
fn is_writable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_dir() && !meta.permissions().readonly())
        .unwrap_or(false)
}
