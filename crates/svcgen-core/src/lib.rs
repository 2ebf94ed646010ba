//! svcgen-core - answers, flag derivation, file selection and rendering for
//! the microservice project generator.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            svcgen-cli (CLI)             │
//! │   clap commands, dialoguer prompter     │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          Application Services           │
//! │   (AnswerCollector, GenerateService)    │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ (Filesystem, BlueprintSource, Renderer, │
//! │            AnswerPrompter)              │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     svcgen-adapters (Infrastructure)    │
//! │ (template loader, renderer, filesystem) │
//! └─────────────────────────────────────────┘
//!
//!  Domain (pure): Answers, Metadata, FILTER_TABLE, RenderContext
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use svcgen_core::prelude::*;
//! # fn wire(source: Box<dyn BlueprintSource>, renderer: Box<dyn BlueprintRenderer>, fs: Box<dyn Filesystem>) -> SvcgenResult<()> {
//! let service = GenerateService::new(source, renderer, fs);
//! let report = service.generate(
//!     &GenerateRequest::new("my-service", "."),
//!     &AnswerCollector::non_interactive(),
//! )?;
//! println!("{}", report.complete_message);
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub mod prelude {
    pub use crate::application::{
        AnswerCollector, GenerateRequest, GenerateService, GenerationPlan, GenerationReport,
        Presets,
        ports::{AnswerPrompter, BlueprintRenderer, BlueprintSource, Filesystem},
    };
    pub use crate::domain::{
        Answers, Blueprint, DerivationMode, Metadata, PlaceholderPolicy, ProjectStructure,
        RenderContext, Value, derive,
    };
    pub use crate::error::{SvcgenError, SvcgenResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
