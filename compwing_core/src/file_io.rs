//! # Session File I/O
//!
//! Reading and writing `.cws` session files:
//! - **Atomic saves**: write `<name>.cws.tmp`, fsync, rename over the target
//! - **Advisory locking**: an OS lock plus a `<name>.cws.lock` file naming the holder
//! - **Version check**: files from a newer schema are refused
//!
//! ## Example
//!
//! ```rust,no_run
//! use compwing_core::file_io::{load_session, save_session, FileLock};
//! use compwing_core::session::Session;
//! use std::path::Path;
//!
//! let session = Session::new("P-51 baseline");
//! let path = Path::new("p51.cws");
//!
//! let lock = FileLock::acquire(path, "analyst")?;
//! save_session(&session, path)?;
//! drop(lock);
//!
//! let reopened = load_session(path)?;
//! assert_eq!(reopened.meta.id, session.meta.id);
//! # Ok::<(), compwing_core::errors::CalcError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::session::{Session, SCHEMA_VERSION, SESSION_EXTENSION};

/// Hours after which a lock is considered abandoned
const STALE_LOCK_HOURS: i64 = 24;

/// Contents of a `.lock` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    pub user_id: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// Holder process is gone (same machine only) or the lock is too old.
    fn is_stale(&self) -> bool {
        #[cfg(unix)]
        {
            let same_machine = hostname().as_deref() == Some(self.machine.as_str());
            if same_machine && fs::metadata(format!("/proc/{}", self.pid)).is_err() {
                return true;
            }
        }
        (Utc::now() - self.locked_at).num_hours() > STALE_LOCK_HOURS
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

fn io_error(operation: &str, path: &Path) -> impl FnOnce(std::io::Error) -> CalcError {
    let operation = operation.to_string();
    let path = path.display().to_string();
    move |e| CalcError::file_error(operation, path, e.to_string())
}

/// Exclusive lock on a session file, released on drop.
///
/// Holds an fs2 lock on the `.lock` file and writes [`LockInfo`] into it so
/// other users can see who has the session open.
#[derive(Debug)]
pub struct FileLock {
    session_path: PathBuf,
    lock_path: PathBuf,
    _handle: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire the lock for `path`.
    ///
    /// Fails with `FileLocked` when a live lock exists. Stale locks are
    /// taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);

        if let Some(existing) = Self::check(path) {
            return Err(CalcError::file_locked(
                path.display().to_string(),
                format!("{} ({})", existing.user_id, existing.machine),
                existing.locked_at.to_rfc3339(),
            ));
        }

        // Truncate only once the OS lock is ours; a live holder's info stays.
        let mut handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(io_error("create lock", &lock_path))?;

        handle
            .try_lock_exclusive()
            .map_err(|_| CalcError::file_locked(path.display().to_string(), "another process", "unknown"))?;
        handle.set_len(0).map_err(io_error("clear lock", &lock_path))?;

        let info = LockInfo::new(user_id);
        let json = serde_json::to_string_pretty(&info).map_err(|e| CalcError::serialization(e.to_string()))?;
        handle
            .write_all(json.as_bytes())
            .map_err(io_error("write lock", &lock_path))?;
        handle.sync_all().map_err(io_error("sync lock", &lock_path))?;

        tracing::debug!(path = %path.display(), user = %info.user_id, "session lock acquired");

        Ok(FileLock {
            session_path: path.to_path_buf(),
            lock_path,
            _handle: handle,
            info,
        })
    }

    /// Current live lock on `path`, if any.
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&lock_path_for(path))
            .ok()
            .filter(|info| !info.is_stale())
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `session.cws` -> `session.cws.lock`
fn lock_path_for(path: &Path) -> PathBuf {
    with_suffix(path, "lock")
}

/// `session.cws` -> `session.cws.<suffix>`; a bare name gets `<name>.<suffix>`
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let extension = match path.extension() {
        Some(ext) => format!("{}.{}", ext.to_string_lossy(), suffix),
        None => suffix.to_string(),
    };
    path.with_extension(extension)
}

fn read_lock_info(lock_path: &Path) -> CalcResult<LockInfo> {
    let text = fs::read_to_string(lock_path).map_err(io_error("read lock", lock_path))?;
    serde_json::from_str(&text).map_err(|e| CalcError::serialization(e.to_string()))
}

/// Default path for a session named `stem` in `dir`.
pub fn session_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(stem).with_extension(SESSION_EXTENSION)
}

/// Save a session atomically.
///
/// Serializes to `<path>.tmp`, fsyncs it, then renames it over `path`; an
/// interrupted save leaves the previous file intact.
pub fn save_session(session: &Session, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(session).map_err(|e| CalcError::serialization(e.to_string()))?;
    let tmp_path = with_suffix(path, "tmp");

    let mut tmp = File::create(&tmp_path).map_err(io_error("create temp file", &tmp_path))?;
    tmp.write_all(json.as_bytes())
        .map_err(io_error("write temp file", &tmp_path))?;
    tmp.sync_all().map_err(io_error("sync temp file", &tmp_path))?;

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error("rename to final", path)(e));
    }

    tracing::info!(path = %path.display(), name = %session.meta.name, "session saved");
    Ok(())
}

/// Load a session and check its schema version.
pub fn load_session(path: &Path) -> CalcResult<Session> {
    let text = fs::read_to_string(path).map_err(io_error("read", path))?;
    let session: Session = serde_json::from_str(&text)
        .map_err(|e| CalcError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?;
    validate_version(&session.meta.version)?;
    tracing::info!(path = %path.display(), name = %session.meta.name, "session loaded");
    Ok(session)
}

/// Load a session and report whether someone else holds its lock.
pub fn load_session_with_lock_check(path: &Path) -> CalcResult<(Session, Option<LockInfo>)> {
    let session = load_session(path)?;
    Ok((session, FileLock::check(path)))
}

/// Accept files with the same major version; while the major is 0, reject
/// a newer minor.
pub fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let parse = |v: &str| -> Option<(u32, u32)> {
        let mut parts = v.split('.').map(str::parse::<u32>);
        let major = parts.next()?.ok()?;
        let minor = parts.next().unwrap_or(Ok(0)).ok()?;
        Some((major, minor))
    };

    let (file_major, file_minor) = parse(file_version).ok_or_else(mismatch)?;
    let (major, minor) = parse(SCHEMA_VERSION).ok_or_else(mismatch)?;

    if file_major != major || (major == 0 && file_minor > minor) {
        return Err(mismatch());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::WingOverrides;
    use crate::units::Meters;
    use std::env::temp_dir;

    fn temp_session_path(name: &str) -> PathBuf {
        session_path(&temp_dir(), &format!("compwing_test_{}", name))
    }

    #[test]
    fn test_derived_paths() {
        let path = Path::new("/studies/p51.cws");
        assert_eq!(lock_path_for(path), Path::new("/studies/p51.cws.lock"));
        assert_eq!(with_suffix(path, "tmp"), Path::new("/studies/p51.cws.tmp"));
        assert_eq!(session_path(Path::new("/studies"), "glider"), Path::new("/studies/glider.cws"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_session_path("roundtrip");
        let mut session = Session::new("Roundtrip");
        session.inputs.vf = 0.6;
        session.inputs.overrides = WingOverrides {
            tip: Some(Meters(1.5)),
            ..Default::default()
        };

        save_session(&session, &path).unwrap();
        let loaded = load_session(&path).unwrap();
        assert_eq!(loaded, session);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_roundtrip_with_non_finite_inputs() {
        let path = temp_session_path("non_finite");
        let mut session = Session::new("Degenerate");
        session.inputs.vf = f64::INFINITY;
        session.inputs.vvoid = f64::NEG_INFINITY;
        session.inputs.overrides = WingOverrides {
            aft_spar: Some(f64::INFINITY),
            ..Default::default()
        };
        assert!(session.open_builtin().is_ok());

        save_session(&session, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(r#""vf": "inf""#));
        assert!(!text.contains("null"));

        let loaded = load_session(&path).unwrap();
        assert_eq!(loaded, session);
        assert!(loaded.open_builtin().is_ok());

        session.inputs.vf = f64::NAN;
        save_session(&session, &path).unwrap();
        assert!(load_session(&path).unwrap().inputs.vf.is_nan());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let path = temp_session_path("atomic");
        save_session(&Session::new("Atomic"), &path).unwrap();
        assert!(path.exists());
        assert!(!with_suffix(&path, "tmp").exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let path = temp_session_path("newer");
        let mut session = Session::new("Future");
        session.meta.version = "0.9.0".to_string();
        save_session(&session, &path).unwrap();

        let err = load_session(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_invalid_json() {
        let path = temp_session_path("garbage");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_session(&path), Err(CalcError::SerializationError { .. })));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_session(&temp_session_path("does_not_exist")).unwrap_err();
        assert!(matches!(err, CalcError::FileError { .. }));
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let path = temp_session_path("lock");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "analyst").unwrap();
        assert_eq!(lock.info.user_id, "analyst");
        assert_eq!(lock.session_path(), path.as_path());
        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);
        assert!(!lock_path.exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_failed_takeover_keeps_holder_info() {
        let path = temp_session_path("takeover");
        File::create(&path).unwrap();
        let lock_path = lock_path_for(&path);
        let holder = FileLock::acquire(&path, "analyst").unwrap();

        let mut aged = LockInfo::new("analyst");
        aged.machine = "elsewhere".to_string();
        aged.locked_at = Utc::now() - chrono::Duration::hours(STALE_LOCK_HOURS + 1);
        fs::write(&lock_path, serde_json::to_string(&aged).unwrap()).unwrap();

        let err = FileLock::acquire(&path, "intruder").unwrap_err();
        assert!(matches!(err, CalcError::FileLocked { .. }));
        assert_eq!(read_lock_info(&lock_path).unwrap(), aged);

        drop(holder);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_reacquire_overwrites_previous_info() {
        let path = temp_session_path("reacquire");
        File::create(&path).unwrap();
        let lock_path = lock_path_for(&path);

        let mut aged = LockInfo::new("a-much-longer-previous-user-name");
        aged.machine = "elsewhere".to_string();
        aged.locked_at = Utc::now() - chrono::Duration::hours(STALE_LOCK_HOURS + 1);
        fs::write(&lock_path, serde_json::to_string_pretty(&aged).unwrap()).unwrap();

        let lock = FileLock::acquire(&path, "analyst").unwrap();
        assert_eq!(read_lock_info(&lock_path).unwrap(), lock.info);

        drop(lock);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_stale_lock_by_age() {
        let mut info = LockInfo::new("someone");
        info.machine = "elsewhere".to_string();
        assert!(!info.is_stale());
        info.locked_at = Utc::now() - chrono::Duration::hours(STALE_LOCK_HOURS + 1);
        assert!(info.is_stale());
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.0.3").is_ok());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("banana").is_err());
    }

    #[test]
    fn test_load_with_lock_check() {
        let path = temp_session_path("lock_check");
        save_session(&Session::new("Check"), &path).unwrap();

        let (loaded, lock) = load_session_with_lock_check(&path).unwrap();
        assert_eq!(loaded.meta.name, "Check");
        assert!(lock.is_none());
        let _ = fs::remove_file(&path);
    }
}
