//! The one concrete backend in this workspace: an `inkwell`/LLVM
//! [`nvylang_ir::ModuleBuilder`] implementation, plus the type mapping it
//! leans on.

pub mod error;
pub mod llvm;
pub mod types;

pub use error::{CodeGenError, Result};
pub use llvm::LlvmModuleBuilder;
pub use types::TypeMapper;
