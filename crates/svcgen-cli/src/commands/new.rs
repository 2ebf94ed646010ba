//! Implementation of `svcgen new`.
//!
//! Gathers presets, picks the collector (prompting or defaults), runs the
//! generate service and prints the report.

use tracing::{info, instrument};

use svcgen_core::{
    application::{AnswerCollector, GenerateRequest, GenerationReport},
    domain::PlaceholderPolicy,
};

use crate::{
    cli::{GlobalArgs, NewArgs, OutputFormat},
    commands::{derivation_mode, generate_service},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    presets,
};

#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let request = build_request(&args, &config)?;
    let collector = collector(args.yes)?;
    let service = generate_service(&args.template, &config)?;

    if collector.is_interactive() {
        output.header(&format!("Creating '{}'", args.name))?;
    }
    let spinner = if collector.is_interactive() {
        indicatif::ProgressBar::hidden()
    } else {
        output.spinner(&format!("Generating '{}'...", args.name))
    };
    let result = service.generate(&request, &collector);
    spinner.finish_and_clear();
    let report = result?;

    info!(
        run_id = %report.run_id,
        files = report.written.len(),
        "Generation finished"
    );
    show_report(&report, &output)
}

fn build_request(args: &NewArgs, config: &AppConfig) -> CliResult<GenerateRequest> {
    let presets = presets::gather(&config.defaults, &args.answers)?;
    let policy = if args.keep_unresolved {
        PlaceholderPolicy::Keep
    } else {
        config.generation.placeholders
    };
    Ok(GenerateRequest::new(&args.name, &args.output)
        .with_presets(presets)
        .with_mode(derivation_mode(&args.answers, config))
        .with_policy(policy)
        .force(args.force)
        .dry_run(args.dry_run))
}

#[cfg(feature = "interactive")]
fn collector(yes: bool) -> CliResult<AnswerCollector> {
    if yes {
        return Ok(AnswerCollector::non_interactive());
    }
    Ok(AnswerCollector::new(Box::new(
        crate::prompt::DialoguerPrompter::new(),
    )))
}

#[cfg(not(feature = "interactive"))]
fn collector(yes: bool) -> CliResult<AnswerCollector> {
    if yes {
        return Ok(AnswerCollector::non_interactive());
    }
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

fn show_report(report: &GenerationReport, output: &OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        let value = serde_json::to_value(report).map_err(|e| CliError::IoError {
            message: "cannot serialise report".into(),
            source: std::io::Error::other(e),
        })?;
        output.json(&value)?;
        return Ok(());
    }

    let root = report.project_root.display();
    if report.dry_run {
        output.info(&format!(
            "Dry run: would create {} files in {root}",
            report.plan.included.len()
        ))?;
        for path in &report.plan.included {
            output.print(&format!("  + {path}"))?;
        }
        for excluded in &report.plan.excluded {
            output.dim(&format!("  - {}  ({} is false)", excluded.path, excluded.key))?;
        }
        return Ok(());
    }

    output.success(&format!(
        "Created {} files in {root}",
        report.written.len()
    ))?;
    if output.is_verbose() {
        for path in &report.written {
            output.print(&format!("  {path}"))?;
        }
    }
    for unresolved in &report.unresolved {
        output.warning(&format!(
            "{}: '{{{{{}}}}}' left unresolved",
            unresolved.path, unresolved.key
        ))?;
    }

    output.print("")?;
    output.print(&report.complete_message)?;
    Ok(())
}
