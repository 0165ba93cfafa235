//! # File I/O Module
//!
//! Project file operations with safety features:
//! - **Atomic saves**: write to .tmp, fsync, rename to prevent corruption
//! - **File locking**: serialize writers on shared drives
//! - **Version validation**: ensure schema compatibility
//!
//! Projects are saved as `.wcp` (winch calc project) files containing JSON.
//! Lock files use the `.wcp.lock` extension and carry metadata about who
//! holds the lock; writers poll [`LOCK_POLL_INTERVAL`] apart when waiting.
//!
//! ## Example
//!
//! ```rust,no_run
//! use winch_core::file_io::{save_project, load_project, FileLock};
//! use winch_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Engineer", "25-001", "Client");
//! let path = Path::new("myproject.wcp");
//!
//! let lock = FileLock::acquire(path, "engineer@company.com").unwrap();
//! save_project(&project, path).unwrap();
//! drop(lock); // released on drop
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{WinchError, WinchResult};
use crate::project::{Project, SCHEMA_VERSION};

/// How long a waiting writer sleeps between lock attempts.
pub const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A lock older than this is treated as abandoned.
const STALE_LOCK_HOURS: i64 = 24;

/// Lock file metadata stored in .wcp.lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where the lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// Exclusive lock guard for a project file, released when dropped.
///
/// Uses both an OS-level file lock (via fs2) for process safety and a
/// `.lock` sidecar with metadata for user visibility.
#[derive(Debug)]
pub struct FileLock {
    /// Path to the locked project file
    project_path: PathBuf,
    /// Path to the lock sidecar
    lock_path: PathBuf,
    /// The underlying handle (keeps the OS lock alive)
    _lock_file: File,
    /// Lock metadata
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a project file.
    ///
    /// Returns `WinchError::FileLocked` when another live process holds it;
    /// a stale lock (dead pid or older than 24 h) is taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> WinchResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(WinchError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
                // Stale lock, take it over
            }
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| {
                WinchError::file_error("create lock", lock_path.display().to_string(), e.to_string())
            })?;

        lock_file.try_lock_exclusive().map_err(|_| {
            WinchError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        let lock_json =
            serde_json::to_string_pretty(&info).map_err(|e| WinchError::SerializationError {
                reason: e.to_string(),
            })?;

        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            WinchError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;
        lock_file.sync_all().map_err(|e| {
            WinchError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        Ok(FileLock {
            project_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Acquire, polling at [`LOCK_POLL_INTERVAL`] until the lock frees or
    /// `attempts` runs out.
    pub fn acquire_blocking(
        path: &Path,
        user_id: impl Into<String> + Clone,
        attempts: u32,
    ) -> WinchResult<Self> {
        let mut last_err = WinchError::Internal {
            message: "no lock attempts made".to_string(),
        };
        for _ in 0..attempts.max(1) {
            match FileLock::acquire(path, user_id.clone()) {
                Ok(lock) => return Ok(lock),
                Err(err) if err.is_recoverable() => {
                    last_err = err;
                    std::thread::sleep(LOCK_POLL_INTERVAL);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err)
    }

    /// Check if a file is locked without acquiring the lock.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if lock_path.exists() {
            if let Ok(info) = read_lock_info(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }

    /// Path to the locked project file
    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
        // OS lock is released when _lock_file drops
    }
}

/// Lock sidecar path for a project file (`x.wcp` -> `x.wcp.lock`).
fn lock_path_for(project_path: &Path) -> PathBuf {
    let mut lock_path = project_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn read_lock_info(lock_path: &Path) -> WinchResult<LockInfo> {
    let mut file = File::open(lock_path).map_err(|e| {
        WinchError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        WinchError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;
    serde_json::from_str(&contents).map_err(|e| WinchError::SerializationError {
        reason: e.to_string(),
    })
}

/// A lock is stale when its process is gone (same machine) or it is older
/// than [`STALE_LOCK_HOURS`].
fn is_lock_stale(info: &LockInfo) -> bool {
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            #[cfg(windows)]
            {
                use std::process::Command;
                let output = Command::new("tasklist")
                    .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                    .output();
                if let Ok(output) = output {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                        return true;
                    }
                }
            }
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
        }
    }

    let age = Utc::now() - info.locked_at;
    age.num_hours() > STALE_LOCK_HOURS
}

/// Save a project with atomic write semantics.
///
/// Serialize, write to `.tmp`, fsync, then rename over the target so an
/// interrupted write can never leave a half-written `.wcp` behind.
pub fn save_project(project: &Project, path: &Path) -> WinchResult<()> {
    let json =
        serde_json::to_string_pretty(project).map_err(|e| WinchError::SerializationError {
            reason: e.to_string(),
        })?;

    let tmp_path = path.with_extension("wcp.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        WinchError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        WinchError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    tmp_file.sync_all().map_err(|e| {
        WinchError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        WinchError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Load a project from a `.wcp` file, validating its schema version.
pub fn load_project(path: &Path) -> WinchResult<Project> {
    let mut file = File::open(path)
        .map_err(|e| WinchError::file_error("open", path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| WinchError::file_error("read", path.display().to_string(), e.to_string()))?;

    let project: Project =
        serde_json::from_str(&contents).map_err(|e| WinchError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&project.meta.version)?;
    Ok(project)
}

/// Load a project, also reporting whether another user holds its lock.
pub fn load_project_with_lock_check(path: &Path) -> WinchResult<(Project, Option<LockInfo>)> {
    let project = load_project(path)?;
    let lock_info = FileLock::check(path);
    Ok((project, lock_info))
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> WinchResult<()> {
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(WinchError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(WinchError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    // For 0.x versions, a newer minor is a breaking change we can't read
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(WinchError::VersionMismatch {
            file_version: file_version.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    Ok(())
}
