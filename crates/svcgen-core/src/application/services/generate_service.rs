//! Generate Service - main application orchestrator.
//!
//! 1. Load the blueprint and check the filter table against it
//! 2. Collect answers and derive metadata
//! 3. Select and render the template files
//! 4. Write the project, rolling back on failure

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{Span, field, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{BlueprintRenderer, BlueprintSource, Filesystem},
        services::answer_collector::{AnswerCollector, Presets},
    },
    domain::{
        Answers, Blueprint, DerivationMode, DomainError, DomainValidator as validator, Exclusion,
        FileContent, FileSelector, Metadata, PlaceholderPolicy, ProjectStructure, RenderContext,
        Selection, UnresolvedPlaceholder, derive,
    },
    error::SvcgenResult,
};

/// Everything one `generate` or `plan` call needs.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub project_name: String,
    pub output_dir: PathBuf,
    pub presets: Presets,
    pub mode: DerivationMode,
    pub policy: PlaceholderPolicy,
    /// Write into an existing directory.
    pub force: bool,
    /// Compute the plan, write nothing.
    pub dry_run: bool,
}

impl GenerateRequest {
    pub fn new(project_name: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_name: project_name.into(),
            output_dir: output_dir.into(),
            presets: Presets::new(),
            mode: DerivationMode::default(),
            policy: PlaceholderPolicy::default(),
            force: false,
            dry_run: false,
        }
    }

    pub fn with_presets(mut self, presets: Presets) -> Self {
        self.presets = presets;
        self
    }

    pub fn with_mode(mut self, mode: DerivationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_policy(mut self, policy: PlaceholderPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn project_root(&self) -> PathBuf {
        self.output_dir.join(&self.project_name)
    }

    fn validate(&self) -> Result<(), DomainError> {
        let reason = if self.project_name.trim().is_empty() {
            Some("name is empty")
        } else if self.project_name.contains(['/', '\\']) {
            Some("name must not contain path separators")
        } else if matches!(self.project_name.as_str(), "." | "..") {
            Some("name must be a directory name")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(DomainError::InvalidProjectName {
                name: self.project_name.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// The include/exclude decision for every template file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationPlan {
    pub blueprint: String,
    pub metadata: Metadata,
    pub included: Vec<String>,
    pub excluded: Vec<Exclusion>,
}

/// Outcome of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub run_id: Uuid,
    pub project_root: PathBuf,
    pub plan: GenerationPlan,
    /// Files written, relative to `project_root`. Empty for a dry run.
    pub written: Vec<String>,
    pub unresolved: Vec<UnresolvedPlaceholder>,
    pub complete_message: String,
    pub dry_run: bool,
}

pub struct GenerateService {
    source: Box<dyn BlueprintSource>,
    renderer: Box<dyn BlueprintRenderer>,
    filesystem: Box<dyn Filesystem>,
    selector: FileSelector,
}

impl GenerateService {
    pub fn new(
        source: Box<dyn BlueprintSource>,
        renderer: Box<dyn BlueprintRenderer>,
        filesystem: Box<dyn Filesystem>,
    ) -> Self {
        Self {
            source,
            renderer,
            filesystem,
            selector: FileSelector::default(),
        }
    }

    /// Replace the built-in filter table.
    pub fn with_selector(mut self, selector: FileSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Load the blueprint and check the filter table against it.
    #[instrument(skip_all, fields(source = %self.source.describe()))]
    pub fn load_blueprint(&self) -> SvcgenResult<Blueprint> {
        let blueprint = self.source.load()?;
        validator::validate_blueprint(&blueprint)?;
        validator::validate_filter_table(&self.selector, &blueprint)?;
        info!(blueprint = %blueprint.id, files = blueprint.files.len(), "Blueprint loaded");
        Ok(blueprint)
    }

    /// Decide every template file without rendering or writing.
    #[instrument(skip_all, fields(mode = %request.mode))]
    pub fn plan(
        &self,
        request: &GenerateRequest,
        collector: &AnswerCollector,
    ) -> SvcgenResult<GenerationPlan> {
        let blueprint = self.load_blueprint()?;
        let answers = collector.collect(&request.presets)?;
        Ok(self.plan_for(&blueprint, &answers, request.mode))
    }

    /// Generate a project.
    #[instrument(
        skip_all,
        fields(
            project = %request.project_name,
            output = %request.output_dir.display(),
            run_id = field::Empty,
        )
    )]
    pub fn generate(
        &self,
        request: &GenerateRequest,
        collector: &AnswerCollector,
    ) -> SvcgenResult<GenerationReport> {
        let run_id = Uuid::new_v4();
        Span::current().record("run_id", field::display(run_id));

        request.validate()?;
        let blueprint = self.load_blueprint()?;
        let answers = collector.collect(&request.presets)?;
        let plan = self.plan_for(&blueprint, &answers, request.mode);
        let project_root = request.project_root();

        let context = RenderContext::from_metadata(&request.project_name, &plan.metadata)
            .with_policy(request.policy);
        let complete_message = context
            .clone()
            .with_policy(PlaceholderPolicy::Keep)
            .render(&blueprint.complete_message)
            .map(|r| r.text)
            .unwrap_or_else(|_| blueprint.complete_message.clone());

        if request.dry_run {
            info!(
                included = plan.included.len(),
                excluded = plan.excluded.len(),
                "Dry run, nothing written"
            );
            return Ok(GenerationReport {
                run_id,
                project_root,
                plan,
                written: Vec::new(),
                unresolved: Vec::new(),
                complete_message,
                dry_run: true,
            });
        }

        let selection = Selection {
            included: plan.included.clone(),
            excluded: plan.excluded.clone(),
        };
        let structure = self
            .renderer
            .render(&blueprint, &selection, &context, &project_root)?;
        validator::validate_project_structure(&structure)?;

        let root_existed = self.filesystem.exists(&project_root);
        if root_existed && !request.force {
            return Err(ApplicationError::ProjectExists { path: project_root }.into());
        }

        let mut written = Vec::new();
        if let Err(e) = self.write_all(&structure, &mut written) {
            warn!(error = %e, "Write failed, rolling back");
            self.rollback(&project_root, root_existed, &written);
            return Err(e);
        }
        info!(files = written.len(), "Project generated");

        Ok(GenerationReport {
            run_id,
            project_root,
            plan,
            written,
            unresolved: structure.unresolved().to_vec(),
            complete_message,
            dry_run: false,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn plan_for(&self, blueprint: &Blueprint, answers: &Answers, mode: DerivationMode) -> GenerationPlan {
        let metadata = derive(answers, mode);
        let selection = self.selector.select(blueprint.paths(), &metadata);
        GenerationPlan {
            blueprint: blueprint.id.to_string(),
            metadata,
            included: selection.included,
            excluded: selection.excluded,
        }
    }

    /// Write every file, recording each success in `written`.
    fn write_all(&self, structure: &ProjectStructure, written: &mut Vec<String>) -> SvcgenResult<()> {
        let root = structure.root();
        self.filesystem.create_dir_all(root)?;
        for dir in structure.directories() {
            self.filesystem.create_dir_all(&root.join(dir.as_path()))?;
        }

        for file in structure.files() {
            let path = root.join(file.path.as_path());
            match &file.content {
                FileContent::Text(text) => self.filesystem.write_file(&path, text)?,
                FileContent::Binary(bytes) => self.filesystem.write_bytes(&path, bytes)?,
            }
            written.push(file.path.to_string());
            if file.permissions.executable_flag() {
                self.filesystem.set_permissions(&path, file.permissions)?;
            }
        }
        Ok(())
    }

    /// Best-effort cleanup. A root this run created is removed entirely;
    /// inside a pre-existing root only the files written are removed.
    fn rollback(&self, root: &Path, root_existed: bool, written: &[String]) {
        if !root_existed {
            match self.filesystem.remove_dir_all(root) {
                Ok(()) => info!("Rollback successful"),
                Err(e) => warn!(error = %e, path = %root.display(), "Rollback failed"),
            }
            return;
        }
        for rel in written {
            let path = root.join(rel);
            if let Err(e) = self.filesystem.remove_file(&path) {
                warn!(error = %e, path = %path.display(), "Rollback failed");
            }
        }
    }
}
