//! Resolution of a [`ModelReference`] to the path of its weight blob.
//!
//! The cache is laid out as
//!
//! ```text
//! <models>/manifests/<registry path>/<model>/<tag>   JSON manifest
//! <models>/blobs/<algorithm>-<hex>                   layer content
//! ```
//!
//! Only the manifest is read, the blob itself is never opened.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, instrument};

use crate::config::{ConfigError, FinderConfig, ModelsDir, DEFAULT_COMMAND_NAME};
use crate::error::{FindError, Result, TagSuggestion};
use crate::image_reference::ModelReference;
use crate::models::Manifest;
use crate::storage::Storage;

/// Looks up model blobs through a [`Storage`]
#[derive(Debug, Clone)]
pub struct Locator<S> {
    storage: S,
    models_dir: ModelsDir,
    command_name: String,
}

impl<S: Storage> Locator<S> {
    /// Create a locator over the default `~/.ollama/models` cache
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            models_dir: ModelsDir::default(),
            command_name: DEFAULT_COMMAND_NAME.to_string(),
        }
    }

    pub fn from_config(config: &FinderConfig, storage: S) -> std::result::Result<Self, ConfigError> {
        let models_dir = config.models_dir(&storage)?;
        Ok(Self {
            storage,
            models_dir,
            command_name: config.command_name(),
        })
    }

    pub fn with_models_dir(mut self, models_dir: ModelsDir) -> Self {
        self.models_dir = models_dir;
        self
    }

    pub fn with_command_name(mut self, command_name: impl Into<String>) -> Self {
        self.command_name = command_name.into();
        self
    }

    /// Path of the manifest describing `reference`, always inside `manifests`
    pub fn manifest_path(&self, reference: &ModelReference) -> PathBuf {
        let mut path = self.models_dir.expanded.join("manifests");
        for segment in [&reference.registry_path, &reference.name, &reference.tag] {
            push_segment(&mut path, segment);
        }
        path
    }

    /// Resolve `reference` to the path of its model blob.
    ///
    /// The returned path keeps the symbolic cache prefix (`~/.ollama/models`)
    /// except on Windows, where it is expanded to an absolute path.
    #[instrument(skip_all, fields(model = %reference))]
    pub fn resolve(&self, reference: &ModelReference) -> Result<PathBuf> {
        let manifest_path = self.manifest_path(reference);
        debug!("checking manifest {}", manifest_path.display());

        if self.storage.file_missing(&manifest_path) {
            return Err(FindError::ManifestNotFound {
                model: reference.name.clone(),
                suggestion: self.suggest_tag(reference, &manifest_path),
                path: manifest_path,
            });
        }

        let data = self
            .storage
            .read_manifest(&manifest_path)
            .map_err(|source| FindError::ManifestUnreadable {
                path: manifest_path.clone(),
                source,
            })?;

        let manifest: Manifest =
            serde_json::from_slice(&data).map_err(|source| FindError::ManifestUnparsable {
                path: manifest_path.clone(),
                source,
            })?;

        let Some(layer) = manifest.model_layer() else {
            return Err(FindError::DigestNotFound {
                path: manifest_path,
                model: reference.name.clone(),
            });
        };
        debug!("model layer digest {}", layer.digest);

        let blob = self
            .models_dir
            .clean
            .join("blobs")
            .join(layer.digest.blob_name());

        if self.storage.is_windows() {
            return self
                .storage
                .expand_path(&blob)
                .map_err(|source| FindError::PathExpansion { path: blob, source });
        }

        Ok(blob)
    }

    /// First entry next to a missing manifest, offered as a tag to retry with.
    ///
    /// The entry is taken as listed and isn't checked to be a manifest.
    fn suggest_tag(&self, reference: &ModelReference, manifest_path: &Path) -> Option<TagSuggestion> {
        let model_dir = manifest_path.parent()?;
        if !self.storage.dir_exists(model_dir) {
            return None;
        }

        let entries = match self.storage.read_dir(model_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("unable to list {}: {}", model_dir.display(), e);
                return None;
            }
        };

        let tag = entries.into_iter().next()?;
        debug!("suggesting tag {}", tag);
        Some(TagSuggestion {
            command: self.command_name.clone(),
            name: reference.short_name(),
            tag,
        })
    }
}

/// Append the plain names of `segment`; roots, prefixes, `.` and `..` are dropped.
fn push_segment(path: &mut PathBuf, segment: &str) {
    for component in Path::new(segment).components() {
        if let Component::Normal(part) = component {
            path.push(part);
        }
    }
}
