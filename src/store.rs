//! File-backed task store.
//!
//! Owns the in-memory collection behind a single coarse lock and persists it
//! as a JSON array, rewriting the whole file after every successful mutation.
//! Loading tolerates a missing, empty, or malformed file by starting with an
//! empty collection. A failed save is logged and the in-memory state stays
//! authoritative for the rest of the process.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::task::{Task, TaskError, TaskPatch};

/// In-memory task collection with JSON file backing.
///
/// The lock lives inside the store, so call sites cannot forget to take it;
/// it is held across the full mutate-then-persist sequence and no reader can
/// observe a torn intermediate state.
pub struct TaskStore {
    tasks: RwLock<Vec<Task>>,
    storage_path: PathBuf,
}

/// Shared store handle for concurrent access from the web handlers.
pub type SharedTaskStore = Arc<TaskStore>;

impl TaskStore {
    /// Create a store, loading existing tasks from disk.
    pub fn new(storage_path: PathBuf) -> Self {
        let tasks = match Self::load_from_disk(&storage_path) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(
                    "Failed to load tasks from {}: {}, starting empty",
                    storage_path.display(),
                    e
                );
                Vec::new()
            }
        };
        Self {
            tasks: RwLock::new(tasks),
            storage_path,
        }
    }

    fn load_from_disk(path: &Path) -> Result<Vec<Task>, std::io::Error> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Full-file rewrite, called with the write lock held. A failure is
    /// logged rather than surfaced: the in-memory mutation already happened
    /// and is not rolled back.
    fn save_to_disk(&self, tasks: &[Task]) {
        if let Err(e) = self.try_save(tasks) {
            tracing::error!(
                "Failed to save tasks to {}: {}",
                self.storage_path.display(),
                e
            );
        }
    }

    fn try_save(&self, tasks: &[Task]) -> Result<(), std::io::Error> {
        if let Some(parent) = self.storage_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(tasks)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.storage_path, contents)
    }

    /// Validate raw input, append the new task, and persist.
    pub async fn create(
        &self,
        summary: &str,
        details: &str,
        deadline_text: &str,
        priority_text: &str,
    ) -> Result<Task, TaskError> {
        let task = Task::create(summary, details, deadline_text, priority_text)?;
        let mut tasks = self.tasks.write().await;
        tasks.push(task.clone());
        self.save_to_disk(&tasks);
        Ok(task)
    }

    /// Apply `patch` to every task whose summary equals `match_summary`
    /// exactly, returning the number touched. Zero means "no match", which
    /// is not an error. The whole patch is validated before any record is
    /// modified, so a bad field leaves the collection untouched.
    pub async fn patch(&self, match_summary: &str, patch: &TaskPatch) -> Result<usize, TaskError> {
        patch.validate(Utc::now().date_naive())?;

        let mut tasks = self.tasks.write().await;
        let now = Utc::now();
        let mut updated = 0;
        for task in tasks.iter_mut().filter(|t| t.summary == match_summary) {
            task.apply(patch, now);
            updated += 1;
        }
        if updated > 0 {
            self.save_to_disk(&tasks);
        }
        Ok(updated)
    }

    /// Remove every task with an exactly matching summary, preserving the
    /// relative order of the rest. Returns the number removed; zero is not
    /// an error.
    pub async fn delete(&self, match_summary: &str) -> usize {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| t.summary != match_summary);
        let removed = before - tasks.len();
        if removed > 0 {
            self.save_to_disk(&tasks);
        }
        removed
    }

    /// First task (in insertion order) with a matching summary, used to
    /// prefill the edit view. Does not mutate.
    pub async fn find_first(&self, match_summary: &str) -> Option<Task> {
        let tasks = self.tasks.read().await;
        tasks.iter().find(|t| t.summary == match_summary).cloned()
    }

    /// Snapshot of the collection in insertion order.
    pub async fn list(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::DoneChange;

    fn store_in(dir: &tempfile::TempDir) -> TaskStore {
        TaskStore::new(dir.path().join("tasks.json"))
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let created = store
            .create("buy milk", "two litres", "2099-01-01", "4")
            .await
            .unwrap();
        let found = store.find_first("buy milk").await.unwrap();
        assert_eq!(found, created);

        // A second store over the same file sees the persisted task.
        let reloaded = store_in(&dir);
        let tasks = reloaded.list().await;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0], created);
    }

    #[tokio::test]
    async fn test_create_validation_failure_leaves_store_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(
            store.create("", "x", "2099-01-01", "1").await.unwrap_err(),
            TaskError::EmptySummary
        );
        assert_eq!(
            store
                .create("buy milk", "", "2000-01-01", "1")
                .await
                .unwrap_err(),
            TaskError::DeadlineInPast
        );
        assert!(store.list().await.is_empty());
        assert!(!dir.path().join("tasks.json").exists());
    }

    #[tokio::test]
    async fn test_missing_and_malformed_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).list().await.is_empty());

        std::fs::write(dir.path().join("tasks.json"), "").unwrap();
        assert!(store_in(&dir).list().await.is_empty());

        std::fs::write(dir.path().join("tasks.json"), "not json at all").unwrap();
        assert!(store_in(&dir).list().await.is_empty());
    }

    #[tokio::test]
    async fn test_patch_updates_every_match() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.create("dup", "first", "2099-01-01", "1").await.unwrap();
        store.create("other", "", "2099-01-01", "1").await.unwrap();
        store.create("dup", "second", "2099-01-01", "1").await.unwrap();

        let patch = TaskPatch {
            priority: Some(5),
            ..Default::default()
        };
        assert_eq!(store.patch("dup", &patch).await.unwrap(), 2);

        for task in store.list().await {
            if task.summary == "dup" {
                assert_eq!(task.priority, 5);
            } else {
                assert_eq!(task.priority, 1);
            }
        }
    }

    #[tokio::test]
    async fn test_empty_patch_counts_matches_without_changing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.create("dup", "a", "2099-01-01", "2").await.unwrap();
        store.create("dup", "b", "2099-01-01", "3").await.unwrap();
        let before = store.list().await;

        assert_eq!(store.patch("dup", &TaskPatch::default()).await.unwrap(), 2);
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn test_patch_is_atomic_on_validation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.create("buy milk", "", "2099-01-01", "1").await.unwrap();
        let before = store.list().await;

        let patch = TaskPatch {
            priority: Some(9),
            ..Default::default()
        };
        assert_eq!(
            store.patch("buy milk", &patch).await.unwrap_err(),
            TaskError::PriorityOutOfRange
        );
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn test_patch_toggle_law() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.create("buy milk", "", "2099-01-01", "1").await.unwrap();

        let toggle = TaskPatch {
            done: Some(DoneChange::Toggle),
            ..Default::default()
        };
        assert_eq!(store.patch("buy milk", &toggle).await.unwrap(), 1);
        let task = store.find_first("buy milk").await.unwrap();
        assert!(task.done);
        assert!(task.done_at.is_some());

        assert_eq!(store.patch("buy milk", &toggle).await.unwrap(), 1);
        let task = store.find_first("buy milk").await.unwrap();
        assert!(!task.done);
        assert!(task.done_at.is_none());
    }

    #[tokio::test]
    async fn test_patch_no_match_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.create("buy milk", "", "2099-01-01", "1").await.unwrap();

        let patch = TaskPatch {
            details: Some("x".to_string()),
            ..Default::default()
        };
        assert_eq!(store.patch("nonexistent", &patch).await.unwrap(), 0);
        // Match is case-sensitive and exact.
        assert_eq!(store.patch("Buy milk", &patch).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_all_matches_preserving_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.create("a", "", "2099-01-01", "1").await.unwrap();
        store.create("dup", "", "2099-01-01", "1").await.unwrap();
        store.create("b", "", "2099-01-01", "1").await.unwrap();
        store.create("dup", "", "2099-01-01", "1").await.unwrap();

        assert_eq!(store.delete("dup").await, 2);
        let summaries: Vec<String> = store.list().await.into_iter().map(|t| t.summary).collect();
        assert_eq!(summaries, vec!["a", "b"]);

        assert_eq!(store.delete("nonexistent").await, 0);
        assert_eq!(store.list().await.len(), 2);
    }

    #[tokio::test]
    async fn test_find_first_picks_earliest_insertion() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.create("dup", "first", "2099-01-01", "1").await.unwrap();
        store.create("dup", "second", "2099-01-01", "1").await.unwrap();

        assert_eq!(store.find_first("dup").await.unwrap().details, "first");
        assert!(store.find_first("missing").await.is_none());
    }
}
