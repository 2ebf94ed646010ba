//! Application layer for svcgen.
//!
//! - **Services**: `AnswerCollector` and `GenerateService`
//! - **Ports**: traits the adapters and the CLI implement
//! - **Errors**: orchestration failures
//!
//! No business rules live here; those are in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    AnswerCollector, GenerateRequest, GenerateService, GenerationPlan, GenerationReport, Presets,
};

pub use ports::{AnswerPrompter, BlueprintRenderer, BlueprintSource, Filesystem};

pub use error::ApplicationError;
