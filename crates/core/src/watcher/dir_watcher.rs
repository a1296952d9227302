//! Notify-based input directory watcher.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::fs;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::metrics::INGEST_EVENTS;
use crate::session::{CommandError, SessionHandle};

use super::config::WatcherConfig;
use super::error::WatcherError;
use super::traits::ClipFilter;

/// Watches the input directory and submits stable files to the session.
///
/// Files present at startup are treated like freshly created ones: they
/// become candidates and are submitted once their size holds still. The
/// watcher submits one file at a time and awaits each assignment, so slot
/// numbers follow arrival order.
pub struct DirWatcher {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl DirWatcher {
    /// Starts watching `input_dir`. Fails if the directory cannot be
    /// watched or scanned; startup treats that as fatal.
    pub async fn spawn(
        input_dir: PathBuf,
        filter: Arc<dyn ClipFilter>,
        session: SessionHandle,
        config: WatcherConfig,
    ) -> Result<Self, WatcherError> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    if should_process_event(&event) {
                        for path in event.paths {
                            let _ = tx.send(path);
                        }
                    }
                }
            },
            notify::Config::default(),
        )
        .map_err(|e| WatcherError::WatchFailed {
            path: input_dir.clone(),
            source: e,
        })?;

        watcher
            .watch(&input_dir, RecursiveMode::NonRecursive)
            .map_err(|e| WatcherError::WatchFailed {
                path: input_dir.clone(),
                source: e,
            })?;

        // Files already sitting in the input directory are candidates too.
        let mut candidates: HashMap<PathBuf, Option<u64>> = HashMap::new();
        let mut entries = fs::read_dir(&input_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
                candidates.insert(entry.path(), None);
            }
        }

        info!(
            dir = %input_dir.display(),
            pending = candidates.len(),
            "watching input directory"
        );

        let task = tokio::spawn(run(rx, candidates, filter, session, config));
        Ok(Self {
            _watcher: watcher,
            task,
        })
    }

    /// Stops the watcher task.
    pub fn stop(self) {
        self.task.abort();
    }
}

fn should_process_event(event: &Event) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
}

async fn run(
    mut rx: mpsc::UnboundedReceiver<PathBuf>,
    mut candidates: HashMap<PathBuf, Option<u64>>,
    filter: Arc<dyn ClipFilter>,
    session: SessionHandle,
    config: WatcherConfig,
) {
    let mut interval = tokio::time::interval(Duration::from_millis(config.poll_interval_ms));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            maybe_path = rx.recv() => {
                match maybe_path {
                    Some(path) => {
                        candidates.entry(path).or_insert(None);
                    }
                    None => break,
                }
            }
            _ = interval.tick() => {
                if poll_candidates(&mut candidates, filter.as_ref(), &session).await.is_err() {
                    break;
                }
            }
        }
    }
    debug!("watcher loop stopped");
}

/// Polls every candidate once; stable files are submitted for ingest.
async fn poll_candidates(
    candidates: &mut HashMap<PathBuf, Option<u64>>,
    filter: &dyn ClipFilter,
    session: &SessionHandle,
) -> Result<(), CommandError> {
    let paths: Vec<PathBuf> = candidates.keys().cloned().collect();

    for path in paths {
        let size = match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => meta.len(),
            _ => {
                candidates.remove(&path);
                continue;
            }
        };

        let last = candidates.get_mut(&path).expect("candidate present");
        if *last != Some(size) {
            *last = Some(size);
            continue;
        }

        // Size held still across two polls: the file stopped growing.
        candidates.remove(&path);

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if !filter.matches(&file_name) {
            debug!("ignoring {} (pattern mismatch)", path.display());
            INGEST_EVENTS.with_label_values(&["ignored"]).inc();
            continue;
        }

        match session.ingest(path.clone()).await {
            Ok(slot) => debug!(slot, "submitted {}", path.display()),
            Err(CommandError::SessionClosed) => return Err(CommandError::SessionClosed),
            // Pool-full and adoption failures are logged by the session.
            Err(e) => warn!("ingest of {} failed: {}", path.display(), e),
        }
    }

    Ok(())
}
