/*!
 * Mapper Configuration
 * Serializable settings and builders for concrete mappers
 */

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::file::FileMapper;
use super::traits::MapperBuilder;
use super::types::{VfsError, VfsResult};
use crate::core::serde::default_true;

/// Settings for a [`FileMapper`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileMapperConfig {
    /// Host directory the mapper is rooted at
    pub base_path: PathBuf,
    /// Keep `..` segments from climbing above `base_path`
    #[serde(default = "default_true")]
    pub confine_to_base: bool,
}

impl FileMapperConfig {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            base_path: base_path.into(),
            confine_to_base: true,
        }
    }
}

/// Builder validating a [`FileMapperConfig`] before constructing the mapper
#[derive(Debug, Clone)]
pub struct FileMapperBuilder {
    config: FileMapperConfig,
}

impl FileMapperBuilder {
    pub fn new<P: Into<PathBuf>>(base_path: P) -> Self {
        Self {
            config: FileMapperConfig::new(base_path),
        }
    }

    pub fn from_config(config: FileMapperConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn confine_to_base(mut self, confine: bool) -> Self {
        self.config.confine_to_base = confine;
        self
    }
}

impl MapperBuilder for FileMapperBuilder {
    type Output = FileMapper;

    fn build(self) -> VfsResult<FileMapper> {
        if self.config.base_path.as_os_str().is_empty() {
            return Err(VfsError::InvalidPath("base path cannot be empty".into()));
        }
        Ok(FileMapper::from_config(self.config))
    }
}
