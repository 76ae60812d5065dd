use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use tracing::debug;

/// Serializes access to asset files, one mutex per path.
#[derive(Default)]
pub struct PathLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

/// Held for as long as a request works on an asset.
pub struct PathGuard {
    _guard: ArcMutexGuard<RawMutex, ()>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical directory plus file name, so the key of a file is the same
    /// before and after it is created.
    fn key(path: &Path) -> PathBuf {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        match (dir.canonicalize(), path.file_name()) {
            (Ok(dir), Some(name)) => dir.join(name),
            _ => path.to_owned(),
        }
    }

    fn mutex_for(&self, key: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        // Forget paths nobody is waiting on anymore.
        locks.retain(|_, mutex| Arc::strong_count(mutex) > 1);
        locks.entry(key.to_owned()).or_default().clone()
    }

    /// Blocks until no other holder works on `path`.
    pub fn lock(&self, path: &Path) -> PathGuard {
        let key = Self::key(path);
        let mutex = self.mutex_for(&key);
        debug!(path = %key.display(), "waiting for asset lock");
        PathGuard {
            _guard: mutex.lock_arc(),
        }
    }

    /// Like [`PathLocks::lock`], but gives up if the path is busy.
    pub fn try_lock(&self, path: &Path) -> Option<PathGuard> {
        let mutex = self.mutex_for(&Self::key(path));
        mutex.try_lock_arc().map(|guard| PathGuard { _guard: guard })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_same_path_is_exclusive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sofa.glb");
        std::fs::write(&path, b"x").unwrap();

        let locks = PathLocks::new();
        let guard = locks.lock(&path);
        assert!(locks.try_lock(&path).is_none());
        // Same file through a different spelling.
        assert!(locks.try_lock(&dir.path().join(".").join("sofa.glb")).is_none());
        drop(guard);
        assert!(locks.try_lock(&path).is_some());
    }

    #[test]
    fn test_key_is_stable_across_file_creation() {
        let dir = tempfile::tempdir_in(".").unwrap();
        let relative = Path::new(".").join(dir.path().file_name().unwrap()).join("fresh.glb");

        let locks = PathLocks::new();
        let guard = locks.lock(&relative);
        std::fs::write(&relative, b"x").unwrap();
        assert!(locks.try_lock(&relative).is_none());
        let absolute = std::env::current_dir().unwrap().join(&relative);
        assert!(locks.try_lock(&absolute).is_none());
        drop(guard);
        assert!(locks.try_lock(&relative).is_some());
    }

    #[test]
    fn test_idle_entries_are_pruned() {
        let locks = PathLocks::new();
        for name in ["a.glb", "b.glb", "c.glb"] {
            drop(locks.try_lock(Path::new(name)));
        }
        let _held = locks.lock(Path::new("d.glb"));
        assert_eq!(locks.locks.lock().len(), 1);
    }

    #[test]
    fn test_different_paths_are_independent() {
        let locks = PathLocks::new();
        let _a = locks.lock(Path::new("a.glb"));
        assert!(locks.try_lock(Path::new("b.glb")).is_some());
    }

    #[test]
    fn test_lock_serializes_threads() {
        let locks = Arc::new(PathLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let locks = locks.clone();
                let inside = inside.clone();
                thread::spawn(move || {
                    let _guard = locks.lock(Path::new("shared.glb"));
                    assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                    thread::sleep(Duration::from_millis(5));
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
