//! Application ports (traits) for external dependencies.
//!
//! Adapters in `svcgen-adapters` and the CLI implement these.
//!
//! ## Driven (Output) Ports
//!
//! - `Filesystem`: writing the generated project
//! - `BlueprintSource`: loading the template tree
//! - `BlueprintRenderer`: turning selected template files into output files
//! - `AnswerPrompter`: asking the user a question

pub mod output;

pub use output::{AnswerPrompter, BlueprintRenderer, BlueprintSource, Filesystem};

#[cfg(test)]
pub use output::{MockAnswerPrompter, MockFilesystem};
