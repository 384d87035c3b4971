//! Locate the weight blob of a model pulled into the local Ollama cache.
//!
//! A model reference such as `llama3`, `deepseek-r1:7b` or
//! `registry.example.com/team/model:v2` is parsed into a [`ModelReference`],
//! its manifest is read through a [`Storage`] implementation and the model
//! layer's digest is turned into a path under `~/.ollama/models/blobs`.

pub mod config;
pub mod digest;
pub mod error;
pub mod image_reference;
pub mod locator;
pub mod models;
pub mod storage;

pub use config::{FinderConfig, ModelsDir};
pub use digest::Digest;
pub use error::{FindError, Result};
pub use image_reference::ModelReference;
pub use locator::Locator;
pub use models::{Layer, Manifest};
pub use storage::{FsStorage, Storage};
