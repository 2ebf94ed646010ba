//! Application services - orchestrate use cases.

pub mod answer_collector;
pub mod generate_service;

pub use answer_collector::{AnswerCollector, Presets};
pub use generate_service::{GenerateRequest, GenerateService, GenerationPlan, GenerationReport};
