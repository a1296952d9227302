//! Mock collaborators for testing.
//!
//! These mocks implement the external-tool traits with controllable
//! behavior so session and server tests run without ffmpeg or an editor
//! installed.

mod mock_assembler;
mod mock_editor;

pub use mock_assembler::MockAssembler;
pub use mock_editor::MockEditor;
