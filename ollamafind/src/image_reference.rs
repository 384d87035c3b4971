use std::fmt;

/// Registry used when the reference does not name one.
pub const DEFAULT_REGISTRY: &str = "registry.ollama.ai";
/// Namespace of the default registry holding the official models.
pub const DEFAULT_NAMESPACE: &str = "library";
/// Tag used when none is supplied.
pub const DEFAULT_TAG: &str = "latest";

/// Represents a model reference as stored in the local cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReference {
    /// Registry path the manifest lives under, e.g. `registry.ollama.ai/library`
    pub registry_path: String,
    /// Model name without registry or tag
    pub name: String,
    /// Tag, never empty
    pub tag: String,
}

impl ModelReference {
    /// Create a new ModelReference
    pub fn new(registry_path: String, name: String, tag: String) -> Self {
        Self {
            registry_path,
            name,
            tag,
        }
    }

    /// Parse a user supplied model name and optional tag.
    ///
    /// Both inputs are trimmed. A tag embedded in the name after the first
    /// `:` wins over `raw_tag`; an empty result falls back to `latest`.
    /// Parsing never fails, unknown names only show up later as a missing
    /// manifest.
    pub fn parse(raw_name: &str, raw_tag: &str) -> Self {
        let raw_name = raw_name.trim();
        let raw_tag = raw_tag.trim();

        let (name, tag) = match raw_name.split_once(':') {
            Some((name, tag)) => (name, tag),
            None => (raw_name, raw_tag),
        };

        let tag = if tag.is_empty() { DEFAULT_TAG } else { tag };
        let (registry_path, name) = split_registry(name);

        Self {
            registry_path,
            name,
            tag: tag.to_string(),
        }
    }

    /// The name as a user would type it, without the tag.
    ///
    /// Models of the default library, or without a registry path, are shown
    /// bare. Subcatalogs of the default registry keep their namespace and
    /// private registries keep the full path.
    pub fn short_name(&self) -> String {
        let library = format!("{}/{}", DEFAULT_REGISTRY, DEFAULT_NAMESPACE);
        if self.registry_path.is_empty() || self.registry_path == library {
            return self.name.clone();
        }

        let prefix = format!("{}/", DEFAULT_REGISTRY);
        match self.registry_path.strip_prefix(&prefix) {
            Some(subcatalog) => format!("{}/{}", subcatalog, self.name),
            None => format!("{}/{}", self.registry_path, self.name),
        }
    }
}

impl fmt::Display for ModelReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.short_name(), self.tag)
    }
}

/// Split a model name into its registry path and model name.
///
/// A dot in the first segment marks a private registry and takes
/// precedence over the subcatalog rule. The registry path is everything
/// before the last segment, so a lone dotted name (`llama3.2`) ends up with
/// an empty registry path.
pub fn split_registry(name: &str) -> (String, String) {
    let first = name.split('/').next().unwrap_or_default();

    if first.contains('.') {
        return match name.rsplit_once('/') {
            Some((registry_path, model)) => (registry_path.to_string(), model.to_string()),
            None => (String::new(), name.to_string()),
        };
    }

    if let Some((subcatalog, model)) = name.split_once('/') {
        return (format!("{}/{}", DEFAULT_REGISTRY, subcatalog), model.to_string());
    }

    (
        format!("{}/{}", DEFAULT_REGISTRY, DEFAULT_NAMESPACE),
        name.to_string(),
    )
}
