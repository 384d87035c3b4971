use std::fmt;

use serde::Deserialize;

/// Represents a content digest as written in a manifest, `algorithm:hex`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Create a new Digest from its manifest form
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// File name of the blob in the cache's `blobs` directory.
    ///
    /// Only the first `:` is replaced; a digest without one is used as is.
    pub fn blob_name(&self) -> String {
        self.0.replacen(':', "-", 1)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Digest {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_name() {
        assert_eq!(Digest::from("sha256:abc123").blob_name(), "sha256-abc123");
        assert_eq!(Digest::from("sha256:a:b").blob_name(), "sha256-a:b");
        assert_eq!(Digest::from("abc123").blob_name(), "abc123");
    }

    #[test]
    fn test_deserializes_from_plain_string() {
        let digest: Digest = serde_json::from_str("\"sha256:abc123\"").unwrap();
        assert_eq!(digest.to_string(), "sha256:abc123");
    }
}
