use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// A buffer spooled to scratch storage for the duration of one call.
/// The file is removed when the guard drops, whether or not the call
/// using it succeeded.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn write(prefix: &str, extension: &str, bytes: &[u8]) -> io::Result<Self> {
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "heartstar_{prefix}_{}_{seq}.{extension}",
            std::process::id()
        ));
        fs::write(&path, bytes)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %err, "scratch file cleanup failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratch_file_exists_until_dropped() {
        let scratch = ScratchFile::write("test", "bin", b"abc").expect("scratch write");
        let path = scratch.path().to_path_buf();
        assert_eq!(fs::read(&path).expect("readable while held"), b"abc");

        drop(scratch);
        assert!(!path.exists());
    }

    #[test]
    fn scratch_files_do_not_collide() {
        let a = ScratchFile::write("test", "bin", b"a").expect("scratch write");
        let b = ScratchFile::write("test", "bin", b"b").expect("scratch write");
        assert_ne!(a.path(), b.path());
    }
}
