use serde::Deserialize;

use crate::digest::Digest;

/// Media type of the layer holding the model weights
pub const MODEL_MEDIA_TYPE: &str = "application/vnd.ollama.image.model";
pub const PROJECTOR_MEDIA_TYPE: &str = "application/vnd.ollama.image.projector";
pub const ADAPTER_MEDIA_TYPE: &str = "application/vnd.ollama.image.adapter";
pub const TEMPLATE_MEDIA_TYPE: &str = "application/vnd.ollama.image.template";
pub const SYSTEM_MEDIA_TYPE: &str = "application/vnd.ollama.image.system";
pub const PARAMS_MEDIA_TYPE: &str = "application/vnd.ollama.image.params";
pub const LICENSE_MEDIA_TYPE: &str = "application/vnd.ollama.image.license";
pub const MESSAGES_MEDIA_TYPE: &str = "application/vnd.ollama.image.messages";

/// Represents a descriptor for a content blob in the cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    /// Media type of the referenced content
    #[serde(default)]
    pub media_type: String,
    /// Digest of the referenced content
    #[serde(default)]
    pub digest: Digest,
    /// Size of the referenced content in bytes
    #[serde(default)]
    pub size: Option<u64>,
}

impl Layer {
    pub fn is_model(&self) -> bool {
        self.media_type == MODEL_MEDIA_TYPE
    }
}

/// Represents an Ollama model manifest
///
/// Only `layers` is required; everything else is informational.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Schema version of the manifest
    #[serde(default)]
    pub schema_version: Option<i32>,
    /// Media type of the manifest
    #[serde(default)]
    pub media_type: Option<String>,
    /// Descriptor for the config blob
    #[serde(default)]
    pub config: Option<Layer>,
    /// Descriptors for the layer blobs
    pub layers: Vec<Layer>,
}

impl Manifest {
    /// First layer carrying the model weights, in manifest order.
    pub fn model_layer(&self) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.is_model())
    }
}
