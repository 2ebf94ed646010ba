//! Infrastructure adapters for svcgen.
//!
//! This crate implements the ports defined in `svcgen-core::application::ports`.
//! It holds every filesystem access the generator performs.

pub mod blueprint_store;
pub mod discovery;
pub mod filesystem;
pub mod renderer;
pub mod template_loader;

// Re-export commonly used adapters
pub use blueprint_store::InMemoryBlueprintSource;
pub use discovery::TemplateLocator;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::SimpleRenderer;
pub use template_loader::FilesystemBlueprintLoader;
