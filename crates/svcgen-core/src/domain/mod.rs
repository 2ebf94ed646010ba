//! Core domain layer for svcgen.
//!
//! Pure logic with no I/O: the question schema, the typed answers, flag
//! derivation, file selection and placeholder rendering. Filesystem access
//! and prompting are reached through the ports in the application layer.
//!
//! ## Pipeline
//!
//! ```text
//! QUESTIONS ──collect──▶ Answers ──derive──▶ Metadata
//!                                              │
//!                         FILTER_TABLE ──select┤
//!                                              ▼
//!                       Blueprint ──render──▶ ProjectStructure
//! ```

pub mod answers;
pub mod derive;
pub mod entities;
pub mod error;
pub mod filter;
pub mod questions;
pub mod value_objects;

mod validation;

pub use answers::{Answers, keys};
pub use derive::{
    DIST_VARIANTS, DataLayout, DistVariant, GatewayTier, LEGACY_DIST_FLAG, Metadata, derive,
    known_boolean_keys,
};
pub use entities::{
    Blueprint, BlueprintFile, BlueprintId, BlueprintMetadata, DEFAULT_COMPLETE_MESSAGE,
    DEFAULT_SKIP_INTERPOLATION, FileContent, FileToWrite, PROJECT_NAME, Permissions,
    PlaceholderPolicy, ProjectStructure, RelativePath, RenderContext, RenderError, Rendered,
    UnresolvedPlaceholder,
};
pub use error::{DomainError, ErrorCategory};
pub use filter::{Exclusion, FILTER_TABLE, FileSelector, FilterRule, Selection, glob_match};
pub use questions::{QUESTIONS, Question, QuestionKind, Visibility, find_question};
pub use validation::DomainValidator;
pub use value_objects::{
    Cacher, ChannelAdapter, ChoiceDomain, ChoiceOption, DerivationMode, Transporter, Value,
};
