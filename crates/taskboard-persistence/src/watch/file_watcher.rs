use crate::traits::{ChangeDetector, ChangeEvent};
use chrono::Utc;
use notify::{EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use taskboard_core::{BoardError, BoardResult};
use tokio::sync::broadcast;
use tokio::sync::Mutex;

/// Watches a store file for writes made by other processes.
///
/// The parent directory is watched rather than the file itself because
/// atomic saves replace the file through a rename.
pub struct FileWatcher {
    tx: broadcast::Sender<ChangeEvent>,
    task_handle: Arc<Mutex<Option<tokio::task::JoinHandle<()>>>>,
    watching: Arc<AtomicBool>,
}

impl FileWatcher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            tx,
            task_handle: Arc::new(Mutex::new(None)),
            watching: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for FileWatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn is_write(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

fn touches(paths: &[PathBuf], target: &Path) -> bool {
    paths.iter().any(|p| p == target)
}

#[async_trait::async_trait]
impl ChangeDetector for FileWatcher {
    async fn start_watching(&self, path: PathBuf) -> BoardResult<()> {
        self.stop_watching().await?;

        let canonical_path = tokio::fs::canonicalize(&path).await?;
        let parent = canonical_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                BoardError::Validation(format!("{} has no parent directory", path.display()))
            })?;

        self.watching.store(true, Ordering::SeqCst);
        let tx = self.tx.clone();
        let watching = self.watching.clone();
        let watch_path = canonical_path;

        let handle = tokio::spawn(async move {
            let handler = move |res: notify::Result<notify::Event>| match res {
                Ok(event) if is_write(&event.kind) && touches(&event.paths, &watch_path) => {
                    let _ = tx.send(ChangeEvent {
                        path: watch_path.clone(),
                        detected_at: Utc::now(),
                    });
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("File watcher error: {}", e),
            };

            match notify::recommended_watcher(handler) {
                Ok(mut watcher) => {
                    if let Err(e) = watcher.watch(&parent, RecursiveMode::NonRecursive) {
                        tracing::error!("Failed to watch directory: {}", e);
                        watching.store(false, Ordering::SeqCst);
                    } else {
                        tracing::info!("Started watching directory: {}", parent.display());
                        std::future::pending::<()>().await;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to create watcher: {}", e);
                    watching.store(false, Ordering::SeqCst);
                }
            }
        });

        *self.task_handle.lock().await = Some(handle);
        Ok(())
    }

    async fn stop_watching(&self) -> BoardResult<()> {
        if let Some(handle) = self.task_handle.lock().await.take() {
            handle.abort();
            tracing::info!("Stopped file watching");
        }
        self.watching.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    fn is_watching(&self) -> bool {
        self.watching.load(Ordering::SeqCst)
    }
}
