use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{BoxModel, ModelError};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
/// Collection of boxen loaded from a model document.
pub struct ModelRoot {
    #[serde(default)]
    pub boxen: Vec<BoxModel>,
}

impl ModelRoot {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let root: Self = serde_json::from_str(&raw).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            model_file = %path.display(),
            boxen = root.boxen.len(),
            "loaded box model document"
        );
        Ok(root)
    }

    /// Takes ownership of the box with the given UUID.
    pub fn into_box(self, uuid: &str) -> Result<BoxModel, ModelError> {
        self.boxen
            .into_iter()
            .find(|model| model.uuid == uuid)
            .ok_or_else(|| ModelError::BoxNotFound {
                uuid: uuid.to_string(),
            })
    }
}
