//! Command handlers. Each translates arguments into core calls and prints
//! the outcome; no generation logic lives here.

pub mod completions;
pub mod config;
pub mod init;
pub mod new;
pub mod plan;
pub mod questions;

use svcgen_adapters::{
    FilesystemBlueprintLoader, LocalFilesystem, SimpleRenderer, TemplateLocator,
};
use svcgen_core::{application::GenerateService, domain::DerivationMode};
use tracing::{debug, warn};

use crate::{
    cli::{AnswerArgs, TemplateArgs},
    config::AppConfig,
    error::CliResult,
};

/// Wire the generate service against the located template directory and
/// the local filesystem.
pub(crate) fn generate_service(
    template: &TemplateArgs,
    config: &AppConfig,
) -> CliResult<GenerateService> {
    let dir = TemplateLocator::from_process()
        .explicit(template.template_dir.clone())
        .configured(config.generation.template_dir.clone())
        .locate()?;
    debug!(template_dir = %dir.display(), "Template directory located");

    Ok(GenerateService::new(
        Box::new(FilesystemBlueprintLoader::new(dir)),
        Box::new(SimpleRenderer::new()),
        Box::new(LocalFilesystem::new()),
    ))
}

pub(crate) fn derivation_mode(answers: &AnswerArgs, config: &AppConfig) -> DerivationMode {
    if answers.legacy_dist || config.generation.legacy_dist {
        warn!("Legacy dist flags are deprecated and only set distChannelsDbGreeter");
        DerivationMode::Legacy
    } else {
        DerivationMode::Canonical
    }
}
