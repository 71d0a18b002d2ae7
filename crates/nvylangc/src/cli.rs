//! Command-line surface (spec §6 external interfaces).

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Source file(s) in, LLVM IR (or an earlier stage, for debugging) out.
#[derive(Parser, Debug)]
#[command(name = "nvylangc", version, about = "nvylang front-end and IR-emission driver")]
pub struct Cli {
    /// Source files to compile, one unit per file.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Where to write the result. Defaults to stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Which pipeline stage to print instead of finishing the run.
    #[arg(long, value_enum, default_value_t = EmitKind::Ir)]
    pub emit: EmitKind,

    /// Log `debug`-level spans for every pipeline stage.
    #[arg(long)]
    pub verbose: bool,

    /// Overrides the module name the mangler uses when it can't be
    /// inferred from the input file's stem.
    #[arg(long)]
    pub module: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmitKind {
    Tokens,
    Ast,
    Ir,
}

impl std::fmt::Display for EmitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmitKind::Tokens => write!(f, "tokens"),
            EmitKind::Ast => write!(f, "ast"),
            EmitKind::Ir => write!(f, "ir"),
        }
    }
}
