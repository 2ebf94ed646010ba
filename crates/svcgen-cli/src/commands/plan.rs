//! `svcgen plan` - derived flags and file decisions, without writing.
//!
//! Answers come from presets and defaults only; `plan` never prompts.

use tracing::instrument;

use svcgen_core::application::{AnswerCollector, GenerateRequest, GenerationPlan};

use crate::{
    cli::{OutputFormat, PlanArgs, ReportFormat},
    commands::{derivation_mode, generate_service},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    presets,
};

#[instrument(skip_all)]
pub fn execute(args: PlanArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let request = GenerateRequest::new("plan", ".")
        .with_presets(presets::gather(&config.defaults, &args.answers)?)
        .with_mode(derivation_mode(&args.answers, &config));
    let plan = generate_service(&args.template, &config)?
        .plan(&request, &AnswerCollector::non_interactive())?;

    if args.format == ReportFormat::Json || output.format() == OutputFormat::Json {
        let value = serde_json::to_value(&plan).map_err(|e| CliError::IoError {
            message: "cannot serialise plan".into(),
            source: std::io::Error::other(e),
        })?;
        output.json(&value)?;
        return Ok(());
    }
    show_table(&plan, &output)
}

fn show_table(plan: &GenerationPlan, output: &OutputManager) -> CliResult<()> {
    let meta = &plan.metadata;
    output.header(&format!("Blueprint {}", plan.blueprint))?;
    output.print(&format!("  mode        {}", meta.mode()))?;
    output.print(&format!("  imageName   {}", meta.image_name()))?;
    output.print(&format!("  dirName     {}", meta.dir_name()))?;
    output.print(&format!("  redis       {}", meta.redis()))?;
    output.print(&format!("  hasDepends  {}", meta.has_depends()))?;
    output.print(&format!(
        "  variant     {}",
        meta.active_variant().unwrap_or("(none)")
    ))?;

    output.print("")?;
    output.header(&format!("Included ({})", plan.included.len()))?;
    for path in &plan.included {
        output.print(&format!("  + {path}"))?;
    }

    output.print("")?;
    output.header(&format!("Excluded ({})", plan.excluded.len()))?;
    for excluded in &plan.excluded {
        output.dim(&format!("  - {:<48} {} is false", excluded.path, excluded.key))?;
    }
    Ok(())
}
