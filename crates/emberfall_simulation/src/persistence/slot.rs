//! Save slots: где лежит сериализованный CharacterSnapshot.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::CharacterSnapshot;

/// Хранилище одного save слота
pub trait SaveSlot {
    fn save(&mut self, snapshot: &CharacterSnapshot) -> Result<()>;

    /// Ok(None) — слот пуст
    fn load(&self) -> Result<Option<CharacterSnapshot>>;
}

/// Слот в памяти (тесты, quick save внутри сессии)
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    json: Option<String>,
}

impl SaveSlot for MemorySlot {
    fn save(&mut self, snapshot: &CharacterSnapshot) -> Result<()> {
        self.json = Some(serde_json::to_string(snapshot).context("serializing snapshot")?);
        Ok(())
    }

    fn load(&self) -> Result<Option<CharacterSnapshot>> {
        match &self.json {
            Some(json) => Ok(Some(serde_json::from_str(json).context("parsing snapshot")?)),
            None => Ok(None),
        }
    }
}

/// JSON файл на диске
#[derive(Debug, Clone)]
pub struct JsonFileSlot {
    path: PathBuf,
}

impl JsonFileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveSlot for JsonFileSlot {
    fn save(&mut self, snapshot: &CharacterSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating save directory '{}'", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(snapshot).context("serializing snapshot")?;
        fs::write(&self.path, json).with_context(|| format!("writing save '{}'", self.path.display()))?;
        Ok(())
    }

    fn load(&self) -> Result<Option<CharacterSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("reading save '{}'", self.path.display()))?;
        let snapshot = serde_json::from_str(&contents)
            .with_context(|| format!("parsing save '{}'", self.path.display()))?;
        Ok(Some(snapshot))
    }
}
