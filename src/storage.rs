//! Key-value persistence of trained models.
//!
//! A [`SavedModel`] bundles the linear weights with the feature and label
//! [`NormalizationStats`] they were trained under, so a loaded model is never
//! paired with stats from a different dataset.
//!
//! Two stores are provided:
//! - [`FileStore`]: `<dir>/<key>.bin` (bincode) plus `<dir>/<key>.info.json`
//! - [`MemoryStore`]: process-local, used by tests and one-shot runs

use crate::error::{RegressionError, Result};
use crate::model::linear::SerializableLinearParams;
use crate::preprocessing::scaling::minmax::NormalizationStats;
use crate::serialization::SerializableParams;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const MODEL_EXTENSION: &str = "bin";
const INFO_SUFFIX: &str = ".info.json";

/// Everything needed to restore a trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedModel {
    pub params: SerializableLinearParams,
    pub feature_stats: NormalizationStats,
    pub label_stats: NormalizationStats,
}

/// Metadata recorded alongside each saved model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelArtifactsInfo {
    /// Milliseconds since the Unix epoch.
    pub date_saved: u64,
    /// Encoded model size in bytes.
    pub size: usize,
}

impl ModelArtifactsInfo {
    fn now(size: usize) -> Self {
        let date_saved = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self { date_saved, size }
    }
}

/// Storage backend for trained models, addressed by string key.
pub trait ModelStore {
    /// Stores `model` under `key`, replacing any previous entry.
    fn save(&mut self, key: &str, model: &SavedModel) -> Result<ModelArtifactsInfo>;

    /// `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<(SavedModel, ModelArtifactsInfo)>>;

    fn list_models(&self) -> Result<BTreeMap<String, ModelArtifactsInfo>>;
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
        return Err(RegressionError::InvalidParameter(format!(
            "invalid storage key '{}'",
            key
        )));
    }
    Ok(())
}

fn encode(model: &SavedModel) -> Result<Vec<u8>> {
    model
        .to_bytes()
        .map_err(|e| RegressionError::Serialization(e.to_string()))
}

fn decode(bytes: &[u8]) -> Result<SavedModel> {
    SavedModel::from_bytes(bytes).map_err(|e| RegressionError::Serialization(e.to_string()))
}

/// Directory-backed store.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn model_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, MODEL_EXTENSION))
    }

    fn info_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{}", key, INFO_SUFFIX))
    }
}

impl ModelStore for FileStore {
    fn save(&mut self, key: &str, model: &SavedModel) -> Result<ModelArtifactsInfo> {
        check_key(key)?;
        fs::create_dir_all(&self.dir)?;

        let bytes = encode(model)?;
        let info = ModelArtifactsInfo::now(bytes.len());
        fs::write(self.model_path(key), &bytes)?;
        fs::write(self.info_path(key), serde_json::to_vec_pretty(&info)?)?;

        info!("saved model '{}' to {}", key, self.dir.display());
        Ok(info)
    }

    fn load(&self, key: &str) -> Result<Option<(SavedModel, ModelArtifactsInfo)>> {
        check_key(key)?;
        let model_path = self.model_path(key);
        if !model_path.exists() {
            debug!("no model file at {}", model_path.display());
            return Ok(None);
        }

        let bytes = fs::read(&model_path)?;
        let model = decode(&bytes)?;
        let info = match fs::read(self.info_path(key)) {
            Ok(raw) => serde_json::from_slice(&raw)?,
            // A model written without its info file still loads.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ModelArtifactsInfo {
                date_saved: 0,
                size: bytes.len(),
            },
            Err(e) => return Err(e.into()),
        };
        Ok(Some((model, info)))
    }

    fn list_models(&self) -> Result<BTreeMap<String, ModelArtifactsInfo>> {
        let mut models = BTreeMap::new();
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(models),
            Err(e) => return Err(e.into()),
        };

        for entry in entries {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(key) = name.strip_suffix(INFO_SUFFIX) else {
                continue;
            };
            if !self.model_path(key).exists() {
                continue;
            }
            let info: ModelArtifactsInfo = serde_json::from_slice(&fs::read(&path)?)?;
            models.insert(key.to_string(), info);
        }
        Ok(models)
    }
}

/// In-process store. Entries are kept encoded so sizes match [`FileStore`].
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, (Vec<u8>, ModelArtifactsInfo)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelStore for MemoryStore {
    fn save(&mut self, key: &str, model: &SavedModel) -> Result<ModelArtifactsInfo> {
        check_key(key)?;
        let bytes = encode(model)?;
        let info = ModelArtifactsInfo::now(bytes.len());
        self.entries.insert(key.to_string(), (bytes, info));
        Ok(info)
    }

    fn load(&self, key: &str) -> Result<Option<(SavedModel, ModelArtifactsInfo)>> {
        check_key(key)?;
        match self.entries.get(key) {
            Some((bytes, info)) => Ok(Some((decode(bytes)?, *info))),
            None => Ok(None),
        }
    }

    fn list_models(&self) -> Result<BTreeMap<String, ModelArtifactsInfo>> {
        Ok(self
            .entries
            .iter()
            .map(|(key, (_, info))| (key.clone(), *info))
            .collect())
    }
}
