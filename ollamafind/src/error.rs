use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Re-running the lookup with a tag that exists on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSuggestion {
    pub command: String,
    pub name: String,
    pub tag: String,
}

impl fmt::Display for TagSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            ".\n\nIf you meant to specify a version, try:\n  $  {} {} {}",
            self.command, self.name, self.tag
        )
    }
}

#[derive(Error, Debug)]
pub enum FindError {
    #[error("Manifest for {model} could not be found. Checked {}{}", .path.display(), .suggestion.as_ref().map(ToString::to_string).unwrap_or_default())]
    ManifestNotFound {
        model: String,
        path: PathBuf,
        suggestion: Option<TagSuggestion>,
    },

    #[error("Unable to read manifest at {}: {source}", .path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to parse manifest at {}: {source}", .path.display())]
    ManifestUnparsable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unable to extract digest from manifest at {} for model {model}. Did the schema change?", .path.display())]
    DigestNotFound { path: PathBuf, model: String },

    #[error("Unable to expand blob path {}: {source}", .path.display())]
    PathExpansion {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, FindError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_without_suggestion() {
        let err = FindError::ManifestNotFound {
            model: "unknown".to_string(),
            path: PathBuf::from("/m/manifests/registry.ollama.ai/library/unknown/latest"),
            suggestion: None,
        };
        assert_eq!(
            err.to_string(),
            "Manifest for unknown could not be found. Checked /m/manifests/registry.ollama.ai/library/unknown/latest"
        );
    }

    #[test]
    fn test_not_found_with_suggestion() {
        let err = FindError::ManifestNotFound {
            model: "mymodel".to_string(),
            path: PathBuf::from("/m/latest"),
            suggestion: Some(TagSuggestion {
                command: "ollama-find".to_string(),
                name: "mymodel".to_string(),
                tag: "v1.0".to_string(),
            }),
        };
        let message = err.to_string();
        assert!(message.contains("could not be found"));
        assert!(message.ends_with("If you meant to specify a version, try:\n  $  ollama-find mymodel v1.0"));
    }
}
