//! The session actor and its handle.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{error, info, warn};

use crate::assembler::{Assembler, AssemblyJob, TransitionCycle};
use crate::editor::Editor;
use crate::metrics::{COMMANDS_TOTAL, EXPORTS_TOTAL, EXPORT_DURATION, INGEST_EVENTS};
use crate::slots::{ArtifactKind, SlotPool};

use super::commands::Command;
use super::error::CommandError;
use super::types::PoolView;

/// Callback invoked with a fresh snapshot after every mutation.
pub type UpdateCallback = Arc<dyn Fn(PoolView) + Send + Sync>;

/// Request queue capacity; submitters back-pressure once it fills.
const REQUEST_QUEUE_SIZE: usize = 64;

enum SessionRequest {
    Command {
        cmd: Command,
        reply: oneshot::Sender<Result<(), CommandError>>,
    },
    Ingest {
        path: PathBuf,
        reply: oneshot::Sender<Result<usize, CommandError>>,
    },
}

/// Owns the pool, the transition selection and the progress flag.
///
/// Built once at startup and consumed by [`Session::spawn`], which moves it
/// onto its own task. From then on the only way in is a [`SessionHandle`].
pub struct Session<E: Editor, A: Assembler> {
    pool: SlotPool,
    transitions: TransitionCycle,
    progress: bool,
    editor: E,
    assembler: A,
    output_path: PathBuf,
    on_update: Option<UpdateCallback>,
    view_tx: watch::Sender<PoolView>,
    view_rx: watch::Receiver<PoolView>,
}

impl<E: Editor + 'static, A: Assembler + 'static> Session<E, A> {
    /// Creates a session over an already-refreshed pool.
    pub fn new(
        pool: SlotPool,
        transitions: TransitionCycle,
        editor: E,
        assembler: A,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        let initial = PoolView {
            slots: pool.codes(),
            progress: false,
            transition: transitions.current().id.to_string(),
        };
        let (view_tx, view_rx) = watch::channel(initial);

        Self {
            pool,
            transitions,
            progress: false,
            editor,
            assembler,
            output_path: output_path.into(),
            on_update: None,
            view_tx,
            view_rx,
        }
    }

    /// Sets the callback invoked after every mutation.
    pub fn with_update_callback(mut self, callback: UpdateCallback) -> Self {
        self.on_update = Some(callback);
        self
    }

    /// Moves the session onto its own task and returns the handle.
    pub fn spawn(self) -> SessionHandle {
        let (tx, rx) = mpsc::channel(REQUEST_QUEUE_SIZE);
        let handle = SessionHandle {
            tx,
            view_rx: self.view_rx.clone(),
            capacity: self.pool.capacity(),
        };
        tokio::spawn(self.run(rx));
        handle
    }

    async fn run(mut self, mut rx: mpsc::Receiver<SessionRequest>) {
        info!(capacity = self.pool.capacity(), "session started");
        while let Some(request) = rx.recv().await {
            match request {
                SessionRequest::Command { cmd, reply } => {
                    let result = self.handle_command(cmd).await;
                    let outcome = if result.is_ok() { "ok" } else { "error" };
                    COMMANDS_TOTAL
                        .with_label_values(&[cmd.name(), outcome])
                        .inc();
                    let _ = reply.send(result);
                }
                SessionRequest::Ingest { path, reply } => {
                    let _ = reply.send(self.handle_ingest(&path).await);
                }
            }
        }
        info!("session stopped");
    }

    async fn handle_command(&mut self, cmd: Command) -> Result<(), CommandError> {
        match cmd {
            Command::Edit { slot } => self.edit(slot).await,
            Command::Clear { slot } => self.clear(slot).await,
            Command::CycleTransition => {
                let selected = self.transitions.advance();
                info!(transition = selected.id, "transition selection advanced");
                self.publish();
                Ok(())
            }
            Command::Export => self.export().await,
            Command::Preview => self.preview().await,
        }
    }

    async fn edit(&mut self, slot: usize) -> Result<(), CommandError> {
        if !self.pool.state(slot)?.is_used() {
            return Err(CommandError::SlotEmpty { slot });
        }

        self.progress = true;
        self.publish();

        let target = self.pool.artifact(slot, ArtifactKind::Original);
        if let Err(e) = self.editor.open(&target).await {
            error!("editor invocation failed for slot {}: {}", slot, e);
        }

        self.progress = false;
        // The editor rewrites artifacts out of band; disk is the truth now.
        self.pool.refresh().await;
        self.publish();
        Ok(())
    }

    async fn clear(&mut self, slot: usize) -> Result<(), CommandError> {
        self.pool.clear(slot).await?;
        self.pool.compact().await?;
        info!(slot, "slot cleared and pool compacted");
        self.publish();
        Ok(())
    }

    async fn export(&mut self) -> Result<(), CommandError> {
        self.pool.compact().await?;
        self.pool.refresh().await;

        let cut_slots = self.pool.cut_slots();
        if cut_slots.is_empty() {
            self.publish();
            return Err(CommandError::NoCutReplays);
        }

        self.progress = true;
        self.publish();

        let job = AssemblyJob {
            clips: cut_slots
                .iter()
                .map(|slot| self.pool.artifact(*slot, ArtifactKind::Cut))
                .collect(),
            transition: self.transitions.current(),
            output_path: self.output_path.clone(),
        };

        let start = Instant::now();
        match self.assembler.assemble(job).await {
            Ok(result) => {
                info!(
                    clips = cut_slots.len(),
                    bytes = result.output_size_bytes,
                    "export finished"
                );
                EXPORTS_TOTAL.with_label_values(&["success"]).inc();
            }
            Err(e) => {
                error!("export failed: {}", e);
                EXPORTS_TOTAL.with_label_values(&["failed"]).inc();
            }
        }
        EXPORT_DURATION.observe(start.elapsed().as_secs_f64());

        self.progress = false;
        self.pool.refresh().await;
        self.publish();
        Ok(())
    }

    async fn preview(&mut self) -> Result<(), CommandError> {
        self.progress = true;
        self.publish();

        if let Err(e) = self.editor.open(&self.output_path).await {
            error!("preview invocation failed: {}", e);
        }

        self.progress = false;
        self.publish();
        Ok(())
    }

    async fn handle_ingest(&mut self, path: &Path) -> Result<usize, CommandError> {
        let slot = match self.pool.allocate_free() {
            Ok(slot) => slot,
            Err(e) => {
                // Source file stays in the input directory for manual handling.
                warn!("dropping ingest of {}: {}", path.display(), e);
                INGEST_EVENTS.with_label_values(&["pool_full"]).inc();
                return Err(e.into());
            }
        };

        self.pool.adopt(slot, path).await?;
        INGEST_EVENTS.with_label_values(&["assigned"]).inc();
        info!(slot, "ingested {}", path.display());
        self.publish();
        Ok(slot)
    }

    fn publish(&self) {
        let view = PoolView {
            slots: self.pool.codes(),
            progress: self.progress,
            transition: self.transitions.current().id.to_string(),
        };
        self.view_tx.send_replace(view.clone());
        if let Some(callback) = &self.on_update {
            callback(view);
        }
    }
}

/// Cheap, cloneable submitter side of the session lane.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionRequest>,
    view_rx: watch::Receiver<PoolView>,
    capacity: usize,
}

impl SessionHandle {
    /// Configured pool capacity, for protocol-boundary validation.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current snapshot. Never blocks on the lane.
    pub fn view(&self) -> PoolView {
        self.view_rx.borrow().clone()
    }

    /// Executes a command, returning once it has fully completed.
    pub async fn execute(&self, cmd: Command) -> Result<(), CommandError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(SessionRequest::Command { cmd, reply })
            .await
            .map_err(|_| CommandError::SessionClosed)?;
        rx.await.map_err(|_| CommandError::SessionClosed)?
    }

    /// Submits a detected stable file for slot assignment.
    ///
    /// Returns the assigned slot. Requests are served strictly in arrival
    /// order; on a full pool the event is dropped and the source file is
    /// left untouched.
    pub async fn ingest(&self, path: PathBuf) -> Result<usize, CommandError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(SessionRequest::Ingest { path, reply })
            .await
            .map_err(|_| CommandError::SessionClosed)?;
        rx.await.map_err(|_| CommandError::SessionClosed)?
    }
}
