//! Trait definitions for the assembler module.

use async_trait::async_trait;

use super::error::AssemblerError;
use super::types::{AssemblyJob, AssemblyResult};

/// An assembler that renders an ordered list of clips into one output file.
#[async_trait]
pub trait Assembler: Send + Sync {
    /// Returns the name of this assembler implementation.
    fn name(&self) -> &str;

    /// Assembles the job's clips into the output file.
    ///
    /// Runs to completion or error; there is no cancellation.
    async fn assemble(&self, job: AssemblyJob) -> Result<AssemblyResult, AssemblerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::TRANSITIONS;
    use std::path::PathBuf;

    struct NoopAssembler;

    #[async_trait]
    impl Assembler for NoopAssembler {
        fn name(&self) -> &str {
            "noop"
        }

        async fn assemble(&self, job: AssemblyJob) -> Result<AssemblyResult, AssemblerError> {
            Ok(AssemblyResult {
                output_path: job.output_path,
                output_size_bytes: 0,
                duration_ms: 1,
            })
        }
    }

    #[tokio::test]
    async fn test_trait_object_usage() {
        let assembler: Box<dyn Assembler> = Box::new(NoopAssembler);
        let job = AssemblyJob {
            clips: vec![PathBuf::from("a.mp4")],
            transition: TRANSITIONS[0],
            output_path: PathBuf::from("out.mp4"),
        };
        let result = assembler.assemble(job).await.unwrap();
        assert_eq!(result.output_path, PathBuf::from("out.mp4"));
    }
}
