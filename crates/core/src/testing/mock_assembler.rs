//! Mock assembler for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::assembler::{Assembler, AssemblerError, AssemblyJob, AssemblyResult};

/// Mock implementation of the Assembler trait.
///
/// Records every submitted job. On success it writes a placeholder output
/// file so state refreshes see an export on disk; arm `fail_next` to
/// simulate an assembly failure instead.
#[derive(Debug, Clone)]
pub struct MockAssembler {
    jobs: Arc<RwLock<Vec<AssemblyJob>>>,
    next_error: Arc<RwLock<Option<AssemblerError>>>,
    write_output: Arc<RwLock<bool>>,
    assembly_duration_ms: Arc<RwLock<u64>>,
}

impl Default for MockAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAssembler {
    /// Create a new mock assembler.
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            write_output: Arc::new(RwLock::new(true)),
            assembly_duration_ms: Arc::new(RwLock::new(0)),
        }
    }

    /// Jobs submitted so far, in order.
    pub async fn recorded_jobs(&self) -> Vec<AssemblyJob> {
        self.jobs.read().await.clone()
    }

    /// Number of assembly runs so far.
    pub async fn job_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Make the next run fail with the given error.
    pub async fn fail_next(&self, error: AssemblerError) {
        *self.next_error.write().await = Some(error);
    }

    /// Whether successful runs create the output file.
    pub async fn set_write_output(&self, write: bool) {
        *self.write_output.write().await = write;
    }

    /// Simulated assembly duration.
    pub async fn set_assembly_duration(&self, duration: Duration) {
        *self.assembly_duration_ms.write().await = duration.as_millis() as u64;
    }
}

#[async_trait]
impl Assembler for MockAssembler {
    fn name(&self) -> &str {
        "mock"
    }

    async fn assemble(&self, job: AssemblyJob) -> Result<AssemblyResult, AssemblerError> {
        self.jobs.write().await.push(job.clone());

        let delay = *self.assembly_duration_ms.read().await;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        if *self.write_output.read().await {
            tokio::fs::write(&job.output_path, b"assembled").await?;
        }

        Ok(AssemblyResult {
            output_path: job.output_path,
            output_size_bytes: 9,
            duration_ms: delay.max(1),
        })
    }
}
