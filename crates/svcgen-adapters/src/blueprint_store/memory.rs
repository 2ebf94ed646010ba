//! In-memory blueprint source, for tests and embedding.

use std::sync::{Arc, RwLock};

use svcgen_core::{
    application::{ApplicationError, ports::BlueprintSource},
    domain::{
        Blueprint, BlueprintFile, BlueprintId, DomainValidator as validator, RelativePath,
    },
    error::{SvcgenError, SvcgenResult},
};

/// Thread-safe holder of one blueprint. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlueprintSource {
    inner: Arc<RwLock<Option<Blueprint>>>,
}

impl InMemoryBlueprintSource {
    /// An empty source; `load` fails until a blueprint is stored.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blueprint(blueprint: Blueprint) -> SvcgenResult<Self> {
        let source = Self::new();
        source.replace(blueprint)?;
        Ok(source)
    }

    /// Build a blueprint named `id` from `(path, text)` pairs.
    pub fn from_files<'a>(
        id: BlueprintId,
        files: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> SvcgenResult<Self> {
        let files = files
            .into_iter()
            .map(|(path, text)| {
                Ok::<_, SvcgenError>(BlueprintFile::new(RelativePath::try_new(path)?, text))
            })
            .collect::<SvcgenResult<Vec<_>>>()?;
        Self::with_blueprint(Blueprint::builder().id(id).files(files).build()?)
    }

    /// Store `blueprint`, dropping any previous one.
    pub fn replace(&self, blueprint: Blueprint) -> SvcgenResult<()> {
        validator::validate_blueprint(&blueprint)?;
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        *inner = Some(blueprint);
        Ok(())
    }

    pub fn clear(&self) -> SvcgenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        *inner = None;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().map(|b| b.is_none()).unwrap_or(true)
    }
}

impl BlueprintSource for InMemoryBlueprintSource {
    fn load(&self) -> SvcgenResult<Blueprint> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.clone().ok_or_else(|| {
            ApplicationError::BlueprintNotFound {
                searched: Vec::new(),
            }
            .into()
        })
    }

    fn describe(&self) -> String {
        let id = self
            .inner
            .read()
            .ok()
            .and_then(|b| b.as_ref().map(|b| b.id.to_string()));
        match id {
            Some(id) => format!("memory:{id}"),
            None => "memory".into(),
        }
    }
}
