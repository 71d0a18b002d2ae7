//! Argument parsing, pipeline orchestration, and diagnostic reporting for
//! the `nvylangc` binary (spec §6 external interfaces, §7 error policy).

pub mod cli;
pub mod driver;
pub mod error;

pub use cli::{Cli, EmitKind};
pub use driver::run;
pub use error::{DriverError, DriverResult};

/// Builds the `tracing` subscriber the binary installs before calling
/// [`run`]. `--verbose` lowers the default filter from `info` to `debug`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}
