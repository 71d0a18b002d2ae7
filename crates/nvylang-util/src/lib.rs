//! Foundation types shared by every stage of the pipeline: the closed
//! [`NodeType`] tag set and [`Value`] union (spec §3), span/diagnostic
//! infrastructure, and string interning.

pub mod diagnostic;
pub mod error;
mod node;
pub mod span;
pub mod symbol;

pub use node::{NodeType, Value};
pub use span::{FileId, Span};
