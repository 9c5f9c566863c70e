//! Per-request scratch directories.
//!
//! Every generation gets its own directory under the configured temp root,
//! named after a random session id. The directory and everything in it is
//! removed when the [`SessionWorkspace`] is dropped, on success and on error.

use crate::error::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;
use uuid::Uuid;

/// Isolated scratch directory owned by exactly one request.
#[derive(Debug)]
pub struct SessionWorkspace {
    session_id: Uuid,
    dir: TempDir,
}

impl SessionWorkspace {
    /// Create a fresh workspace under `root`.
    pub fn create(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root)?;

        let session_id = Uuid::new_v4();
        let dir = tempfile::Builder::new()
            .prefix(&format!("session-{}-", session_id))
            .tempdir_in(root)?;

        debug!("Created workspace {}", dir.path().display());
        Ok(Self { session_id, dir })
    }

    /// Random identifier of this session.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Directory holding the intermediate files.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the synthesized narration goes.
    pub fn voiceover_path(&self) -> PathBuf {
        self.dir.path().join("voiceover.mp3")
    }

    /// Where the `index`-th downloaded clip goes.
    pub fn clip_path(&self, index: usize) -> PathBuf {
        self.dir.path().join(format!("stock_{}.mp4", index))
    }

    /// Where the encoded video goes.
    pub fn output_path(&self) -> PathBuf {
        self.dir.path().join("final.mp4")
    }

    /// Remove the directory now, reporting any failure.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        debug!("Removed workspace {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspaces_never_collide() {
        let root = tempfile::tempdir().unwrap();
        let a = SessionWorkspace::create(root.path()).unwrap();
        let b = SessionWorkspace::create(root.path()).unwrap();

        assert_ne!(a.session_id(), b.session_id());
        assert_ne!(a.path(), b.path());
        assert!(a.path().starts_with(root.path()));
    }

    #[tokio::test]
    async fn test_concurrent_workspaces_are_distinct() {
        let root = tempfile::tempdir().unwrap();
        let root_path = root.path().to_path_buf();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let root_path = root_path.clone();
                tokio::task::spawn_blocking(move || SessionWorkspace::create(&root_path).unwrap())
            })
            .collect();

        let mut paths = std::collections::HashSet::new();
        let mut workspaces = Vec::new();
        for handle in handles {
            let ws = handle.await.unwrap();
            assert!(paths.insert(ws.path().to_path_buf()));
            workspaces.push(ws);
        }
        assert_eq!(paths.len(), 8);
    }

    #[test]
    fn test_drop_removes_directory() {
        let root = tempfile::tempdir().unwrap();
        let ws = SessionWorkspace::create(root.path()).unwrap();
        let path = ws.path().to_path_buf();
        std::fs::write(ws.clip_path(0), b"clip").unwrap();
        std::fs::write(ws.voiceover_path(), b"voice").unwrap();

        drop(ws);
        assert!(!path.exists());
    }

    #[test]
    fn test_close_removes_directory() {
        let root = tempfile::tempdir().unwrap();
        let ws = SessionWorkspace::create(root.path()).unwrap();
        let path = ws.path().to_path_buf();
        std::fs::write(ws.output_path(), b"video").unwrap();

        ws.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_file_layout() {
        let root = tempfile::tempdir().unwrap();
        let ws = SessionWorkspace::create(root.path()).unwrap();
        assert!(ws.voiceover_path().ends_with("voiceover.mp3"));
        assert!(ws.clip_path(3).ends_with("stock_3.mp4"));
        assert!(ws.output_path().ends_with("final.mp4"));
    }
}
