//! Renderer that interpolates text files through a [`RenderContext`].

use std::path::Path;

use svcgen_core::{
    application::ports::BlueprintRenderer,
    domain::{
        Blueprint, BlueprintFile, DomainError, FileContent, ProjectStructure, RenderContext,
        Selection,
    },
    error::SvcgenResult,
};
use tracing::{debug, instrument, warn};

/// Renders every selected file; skip-listed and binary files are copied as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRenderer;

impl SimpleRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl BlueprintRenderer for SimpleRenderer {
    #[instrument(skip_all, fields(blueprint = %blueprint.id, files = selection.included.len()))]
    fn render(
        &self,
        blueprint: &Blueprint,
        selection: &Selection,
        context: &RenderContext,
        output_root: &Path,
    ) -> SvcgenResult<ProjectStructure> {
        let mut structure = ProjectStructure::new(output_root);

        for file in &blueprint.files {
            let path = file.path.as_str();
            if !selection.is_included(path) {
                continue;
            }
            if blueprint.is_skipped(path) || file.content.is_binary() {
                debug!(path, "copied verbatim");
                structure.add_file(file.path.clone(), file.content.clone(), file.permissions);
                continue;
            }
            render_file(file, context, &mut structure)?;
        }

        Ok(structure)
    }
}

fn render_file(
    file: &BlueprintFile,
    context: &RenderContext,
    structure: &mut ProjectStructure,
) -> Result<(), DomainError> {
    let FileContent::Text(text) = &file.content else {
        return Ok(());
    };
    let rendered = context.render(text).map_err(|source| DomainError::Render {
        path: file.path.to_string(),
        source,
    })?;
    for key in &rendered.unresolved {
        warn!(path = %file.path, key = %key, "Unresolved placeholder kept");
        structure.add_unresolved(file.path.clone(), key.clone());
    }
    structure.add_file(
        file.path.clone(),
        FileContent::Text(rendered.text),
        file.permissions,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use svcgen_core::domain::{
        BlueprintId, DerivationMode, Exclusion, Permissions, PlaceholderPolicy, RelativePath,
        RenderError, derive, Answers,
    };
    use svcgen_core::error::SvcgenError;

    fn file(path: &str, content: impl Into<FileContent>) -> BlueprintFile {
        BlueprintFile::new(RelativePath::new(path), content)
    }

    fn select_all(bp: &Blueprint) -> Selection {
        Selection {
            included: bp.paths().map(str::to_string).collect(),
            excluded: Vec::new(),
        }
    }

    fn context() -> RenderContext {
        let metadata = derive(&Answers::default(), DerivationMode::Canonical);
        RenderContext::from_metadata("shop", &metadata)
    }

    #[test]
    fn renders_text_and_passes_through_the_rest() {
        let bp = Blueprint::builder()
            .id(BlueprintId::new("t", "1"))
            .file(file("package.json", "{\"name\": \"{{ projectName }}\"}"))
            .file(file("public/index.html", "<p>{{ message }}</p>"))
            .file(BlueprintFile::new(
                RelativePath::new("logo.png"),
                FileContent::from_bytes(vec![0x89, 0x00, b'{', b'{']),
            ))
            .file(
                file("bin/start.sh", "#!/bin/sh\necho {{projectName}}")
                    .with_permissions(Permissions::executable()),
            )
            .build()
            .unwrap();

        let out = SimpleRenderer::new()
            .render(&bp, &select_all(&bp), &context(), Path::new("/out/shop"))
            .unwrap();
        let files: Vec<_> = out.files().collect();

        assert_eq!(out.root(), Path::new("/out/shop"));
        assert_eq!(files.len(), 4);
        assert_eq!(files[0].content, FileContent::from("{\"name\": \"shop\"}"));
        assert_eq!(files[1].content, FileContent::from("<p>{{ message }}</p>"));
        assert!(files[2].content.is_binary());
        assert_eq!(files[3].permissions, Permissions::executable());
        assert_eq!(files[3].content, FileContent::from("#!/bin/sh\necho shop"));
    }

    #[test]
    fn excluded_files_are_never_rendered() {
        let bp = Blueprint::builder()
            .id(BlueprintId::new("t", "1"))
            .file(file("a.js", "ok"))
            .file(file("b.js", "{{undefinedKey}}"))
            .build()
            .unwrap();
        let selection = Selection {
            included: vec!["a.js".into()],
            excluded: vec![Exclusion {
                path: "b.js".into(),
                key: "docker",
            }],
        };

        let out = SimpleRenderer::new()
            .render(&bp, &selection, &context(), Path::new("/out"))
            .unwrap();
        assert_eq!(out.file_count(), 1);
    }

    #[test]
    fn strict_policy_names_the_file() {
        let bp = Blueprint::builder()
            .id(BlueprintId::new("t", "1"))
            .file(file("services/api.service.js", "port: {{ port }}"))
            .build()
            .unwrap();

        let err = SimpleRenderer::new()
            .render(&bp, &select_all(&bp), &context(), Path::new("/out"))
            .unwrap_err();
        match err {
            SvcgenError::Domain(DomainError::Render { path, source }) => {
                assert_eq!(path, "services/api.service.js");
                assert_eq!(source, RenderError::Unresolved { key: "port".into() });
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn keep_policy_records_unresolved() {
        let bp = Blueprint::builder()
            .id(BlueprintId::new("t", "1"))
            .file(file("a.js", "{{ port }} {{port}} {{ projectName }}"))
            .build()
            .unwrap();
        let ctx = context().with_policy(PlaceholderPolicy::Keep);

        let out = SimpleRenderer::new()
            .render(&bp, &select_all(&bp), &ctx, Path::new("/out"))
            .unwrap();
        assert_eq!(out.unresolved().len(), 1);
        assert_eq!(out.unresolved()[0].key, "port");
        let text = out.files().next().unwrap();
        assert_eq!(text.content, FileContent::from("{{ port }} {{ port }} shop"));
    }

    #[test]
    fn conditions_follow_flags() {
        let bp = Blueprint::builder()
            .id(BlueprintId::new("t", "1"))
            .file(file(
                "moleculer.config.js",
                "{% if needCacher %}cacher: \"{{cacher}}\",{% endif %}{% if not needCacher %}cacher: null,{% endif %}",
            ))
            .build()
            .unwrap();

        let out = SimpleRenderer::new()
            .render(&bp, &select_all(&bp), &context(), Path::new("/out"))
            .unwrap();
        let content = &out.files().next().unwrap().content;
        assert_eq!(content, &FileContent::from("cacher: null,"));
    }
}
