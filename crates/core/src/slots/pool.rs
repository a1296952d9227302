//! The fixed-capacity slot pool and its filesystem side effects.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use super::error::PoolError;
use super::naming::{artifact_path, ArtifactKind};
use super::state::SlotState;

/// Fixed-size pool of numbered slots backed by the queue directory.
///
/// The in-memory state vector mirrors the filesystem; [`SlotPool::refresh`]
/// rebuilds it from disk and is the recovery path after any operation whose
/// filesystem effects are not provably atomic.
pub struct SlotPool {
    queue_dir: PathBuf,
    states: Vec<SlotState>,
}

impl SlotPool {
    /// Creates a pool with every slot clear. Call [`SlotPool::refresh`] to
    /// pick up artifacts already on disk.
    pub fn new(queue_dir: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            queue_dir: queue_dir.into(),
            states: vec![SlotState::Clear; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.states.len()
    }

    pub fn queue_dir(&self) -> &Path {
        &self.queue_dir
    }

    /// Current states, ordered by slot index 1..N.
    pub fn states(&self) -> &[SlotState] {
        &self.states
    }

    /// Wire codes for every slot, ordered 1..N.
    pub fn codes(&self) -> Vec<u8> {
        self.states.iter().map(SlotState::code).collect()
    }

    /// State of a single slot (1-based).
    pub fn state(&self, slot: usize) -> Result<SlotState, PoolError> {
        self.check_range(slot)?;
        Ok(self.states[slot - 1])
    }

    /// Path of the given artifact for a slot in this pool's queue directory.
    pub fn artifact(&self, slot: usize, kind: ArtifactKind) -> PathBuf {
        artifact_path(&self.queue_dir, slot, kind)
    }

    /// Slot indices currently in [`SlotState::Cut`], ascending.
    pub fn cut_slots(&self) -> Vec<usize> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == SlotState::Cut)
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// Rebuilds every slot state from artifact presence on disk.
    ///
    /// Idempotent and safe to call at any time. A stat failure is treated
    /// as absence: an unreadable artifact is unusable either way.
    pub async fn refresh(&mut self) {
        for slot in 1..=self.capacity() {
            let has_original = file_present(&self.artifact(slot, ArtifactKind::Original)).await;
            let has_cut = file_present(&self.artifact(slot, ArtifactKind::Cut)).await;
            self.states[slot - 1] = SlotState::derive(has_original, has_cut);
        }
        debug!(states = ?self.states, "slot states refreshed from disk");
    }

    /// Returns the first clear slot, without marking it used.
    ///
    /// The caller completes allocation by placing the original artifact at
    /// the target path, typically via [`SlotPool::adopt`].
    pub fn allocate_free(&self) -> Result<usize, PoolError> {
        self.states
            .iter()
            .position(|s| !s.is_used())
            .map(|i| i + 1)
            .ok_or(PoolError::PoolFull {
                capacity: self.capacity(),
            })
    }

    /// Moves `source` into the slot's original path and marks it uncut.
    pub async fn adopt(&mut self, slot: usize, source: &Path) -> Result<(), PoolError> {
        self.check_range(slot)?;
        let dest = self.artifact(slot, ArtifactKind::Original);
        move_file(source, &dest).await?;
        self.states[slot - 1] = SlotState::Uncut;
        Ok(())
    }

    /// Deletes every existing artifact of the slot and marks it clear.
    pub async fn clear(&mut self, slot: usize) -> Result<(), PoolError> {
        self.check_range(slot)?;
        if !self.states[slot - 1].is_used() {
            return Err(PoolError::AlreadyClear { slot });
        }

        for kind in ArtifactKind::ALL {
            let path = self.artifact(slot, kind);
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!("failed to remove {}: {}", path.display(), e);
                    return Err(PoolError::Io(e));
                }
            }
        }

        self.states[slot - 1] = SlotState::Clear;
        Ok(())
    }

    /// Relocates every existing artifact of `src` to the corresponding path
    /// of `dst`, copies `src`'s state over and clears `src`.
    ///
    /// The caller guarantees `dst` is clear: there is no overwrite
    /// protection at this layer.
    pub async fn move_slot(&mut self, src: usize, dst: usize) -> Result<(), PoolError> {
        self.check_range(src)?;
        self.check_range(dst)?;

        for kind in ArtifactKind::ALL {
            let from = self.artifact(src, kind);
            if file_present(&from).await {
                move_file(&from, &self.artifact(dst, kind)).await?;
            }
        }

        self.states[dst - 1] = self.states[src - 1];
        self.states[src - 1] = SlotState::Clear;
        Ok(())
    }

    /// Restores the density invariant: a stable left-compaction of used
    /// slots preserving their relative order.
    pub async fn compact(&mut self) -> Result<(), PoolError> {
        for slot in 1..=self.capacity() {
            if self.states[slot - 1].is_used() {
                continue;
            }
            let next_used = (slot + 1..=self.capacity()).find(|j| self.states[j - 1].is_used());
            match next_used {
                Some(j) => self.move_slot(j, slot).await?,
                None => break,
            }
        }
        Ok(())
    }

    fn check_range(&self, slot: usize) -> Result<(), PoolError> {
        if slot == 0 || slot > self.capacity() {
            return Err(PoolError::OutOfRange {
                slot,
                capacity: self.capacity(),
            });
        }
        Ok(())
    }
}

async fn file_present(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// Moves a file, falling back to copy + remove across filesystems.
async fn move_file(source: &Path, destination: &Path) -> Result<(), PoolError> {
    match fs::rename(source, destination).await {
        Ok(()) => Ok(()),
        // Cross-filesystem moves fail with EXDEV (18 on Linux)
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices || e.raw_os_error() == Some(18) => {
            fs::copy(source, destination).await?;
            fs::remove_file(source).await?;
            Ok(())
        }
        Err(e) => Err(PoolError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn seed_slot(pool: &SlotPool, slot: usize, cut: bool) {
        fs::write(pool.artifact(slot, ArtifactKind::Original), b"original")
            .await
            .unwrap();
        if cut {
            fs::write(pool.artifact(slot, ArtifactKind::Cut), b"cut")
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_refresh_derives_states_from_disk() {
        let temp = TempDir::new().unwrap();
        let mut pool = SlotPool::new(temp.path(), 4);

        seed_slot(&pool, 1, true).await;
        seed_slot(&pool, 3, false).await;

        pool.refresh().await;
        assert_eq!(
            pool.states(),
            &[
                SlotState::Cut,
                SlotState::Clear,
                SlotState::Uncut,
                SlotState::Clear,
            ]
        );
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let mut pool = SlotPool::new(temp.path(), 3);
        seed_slot(&pool, 1, false).await;

        pool.refresh().await;
        let first = pool.states().to_vec();
        pool.refresh().await;
        assert_eq!(pool.states(), first.as_slice());
    }

    #[tokio::test]
    async fn test_allocate_free_returns_first_clear_slot() {
        let temp = TempDir::new().unwrap();
        let mut pool = SlotPool::new(temp.path(), 3);
        seed_slot(&pool, 1, false).await;
        pool.refresh().await;

        assert_eq!(pool.allocate_free().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_allocate_free_on_full_pool_fails_without_mutation() {
        let temp = TempDir::new().unwrap();
        let mut pool = SlotPool::new(temp.path(), 2);
        seed_slot(&pool, 1, false).await;
        seed_slot(&pool, 2, false).await;
        pool.refresh().await;

        let before = pool.states().to_vec();
        let result = pool.allocate_free();
        assert!(matches!(result, Err(PoolError::PoolFull { capacity: 2 })));
        assert_eq!(pool.states(), before.as_slice());
    }

    #[tokio::test]
    async fn test_adopt_moves_file_and_sets_uncut() {
        let temp = TempDir::new().unwrap();
        let inbox = TempDir::new().unwrap();
        let mut pool = SlotPool::new(temp.path(), 2);

        let source = inbox.path().join("clip.mp4");
        fs::write(&source, b"video").await.unwrap();

        let slot = pool.allocate_free().unwrap();
        pool.adopt(slot, &source).await.unwrap();

        assert!(!source.exists());
        assert!(pool.artifact(slot, ArtifactKind::Original).exists());
        assert_eq!(pool.state(slot).unwrap(), SlotState::Uncut);
    }

    #[tokio::test]
    async fn test_clear_removes_all_artifacts() {
        let temp = TempDir::new().unwrap();
        let mut pool = SlotPool::new(temp.path(), 2);
        seed_slot(&pool, 1, true).await;
        fs::write(pool.artifact(1, ArtifactKind::Project), b"proj")
            .await
            .unwrap();
        pool.refresh().await;

        pool.clear(1).await.unwrap();

        for kind in ArtifactKind::ALL {
            assert!(!pool.artifact(1, kind).exists());
        }
        assert_eq!(pool.state(1).unwrap(), SlotState::Clear);
    }

    #[tokio::test]
    async fn test_clear_on_clear_slot_fails() {
        let temp = TempDir::new().unwrap();
        let mut pool = SlotPool::new(temp.path(), 2);

        let result = pool.clear(1).await;
        assert!(matches!(result, Err(PoolError::AlreadyClear { slot: 1 })));
    }

    #[tokio::test]
    async fn test_move_slot_relocates_every_artifact() {
        let temp = TempDir::new().unwrap();
        let mut pool = SlotPool::new(temp.path(), 3);
        seed_slot(&pool, 2, true).await;
        fs::write(pool.artifact(2, ArtifactKind::Project), b"proj")
            .await
            .unwrap();
        pool.refresh().await;

        pool.move_slot(2, 1).await.unwrap();

        assert!(pool.artifact(1, ArtifactKind::Original).exists());
        assert!(pool.artifact(1, ArtifactKind::Cut).exists());
        assert!(pool.artifact(1, ArtifactKind::Project).exists());
        assert!(!pool.artifact(2, ArtifactKind::Original).exists());
        assert_eq!(pool.state(1).unwrap(), SlotState::Cut);
        assert_eq!(pool.state(2).unwrap(), SlotState::Clear);
    }

    #[tokio::test]
    async fn test_compact_preserves_relative_order() {
        // Pool of 5 with slots 1, 3, 5 occupied compacts to 1, 2, 3.
        let temp = TempDir::new().unwrap();
        let mut pool = SlotPool::new(temp.path(), 5);
        seed_slot(&pool, 1, false).await;
        seed_slot(&pool, 3, true).await;
        seed_slot(&pool, 5, false).await;
        pool.refresh().await;

        pool.compact().await.unwrap();

        assert_eq!(
            pool.states(),
            &[
                SlotState::Uncut,
                SlotState::Cut,
                SlotState::Uncut,
                SlotState::Clear,
                SlotState::Clear,
            ]
        );
        // Former slot 3's artifacts now live under index 2.
        assert!(pool.artifact(2, ArtifactKind::Cut).exists());
        assert!(!pool.artifact(3, ArtifactKind::Original).exists());
        assert!(!pool.artifact(5, ArtifactKind::Original).exists());
    }

    #[tokio::test]
    async fn test_density_invariant_after_clear_compact_sequences() {
        let temp = TempDir::new().unwrap();
        let mut pool = SlotPool::new(temp.path(), 6);
        for slot in 1..=5 {
            seed_slot(&pool, slot, slot % 2 == 0).await;
        }
        pool.refresh().await;

        for victim in [2, 1, 3] {
            pool.clear(victim).await.unwrap();
            pool.compact().await.unwrap();

            let used: Vec<bool> = pool.states().iter().map(|s| s.is_used()).collect();
            let k = used.iter().filter(|u| **u).count();
            assert!(used[..k].iter().all(|u| *u), "used slots must be dense");
            assert!(used[k..].iter().all(|u| !*u), "tail must be clear");
        }
    }

    #[tokio::test]
    async fn test_out_of_range_slot_rejected() {
        let temp = TempDir::new().unwrap();
        let mut pool = SlotPool::new(temp.path(), 2);

        assert!(matches!(
            pool.state(0),
            Err(PoolError::OutOfRange { slot: 0, .. })
        ));
        assert!(matches!(
            pool.clear(3).await,
            Err(PoolError::OutOfRange { slot: 3, .. })
        ));
    }
}
