//! Driver-level error type (spec §7's four error kinds, plus I/O).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("could not read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Lex(#[from] nvylang_lex::LexError),

    #[error(transparent)]
    Parse(#[from] nvylang_par::ParseError),

    #[error(transparent)]
    Emit(#[from] nvylang_ir::EmitError),

    /// A stage reported diagnostics through the shared `Handler` rather
    /// than returning an error value directly (spec §7: "no partial IR is
    /// emitted on failure").
    #[error("{count} error(s) reported while compiling '{unit}'")]
    Diagnostics { count: usize, unit: String },
}

pub type DriverResult<T> = std::result::Result<T, DriverError>;
