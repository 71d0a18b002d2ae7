//! Errors surfaced by the `inkwell`-backed `ModuleBuilder`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeGenError {
    /// A referenced function handle does not exist in the module.
    #[error("function '{0}' not found")]
    FunctionNotFound(String),

    /// An `inkwell` builder call returned its own internal error.
    #[error("LLVM operation failed: {0}")]
    LlvmOperationFailed(String),

    /// Target triple/target-machine setup failed.
    #[error("compilation error: {0}")]
    CompilationError(String),
}

pub type Result<T> = std::result::Result<T, CodeGenError>;
