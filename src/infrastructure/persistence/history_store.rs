use crate::domain::history::{HISTORY_CAPACITY, HistoryRecord, retain_recent};
use crate::domain::ports::HistoryRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

/// CRI history kept as one pretty-printed JSON array on disk
pub struct JsonHistoryStore {
    file_path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

#[async_trait]
impl HistoryRepository for JsonHistoryStore {
    async fn load(&self) -> Result<Vec<HistoryRecord>> {
        let exists = fs::try_exists(&self.file_path)
            .await
            .with_context(|| format!("Failed to check history file {:?}", self.file_path))?;
        if !exists {
            debug!("No history at {:?}, starting empty", self.file_path);
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.file_path)
            .await
            .with_context(|| format!("Failed to read history file {:?}", self.file_path))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<HistoryRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse history JSON {:?}", self.file_path))?;

        info!("Loaded {} history records from {:?}", records.len(), self.file_path);
        Ok(records)
    }

    async fn save(&self, records: &[HistoryRecord]) -> Result<()> {
        let kept = retain_recent(records.to_vec(), HISTORY_CAPACITY);
        let content =
            serde_json::to_string_pretty(&kept).context("Failed to serialize history")?;

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create history directory {:?}", parent))?;
            }
        }

        // Atomic write: write to temp file then rename
        let temp_path = self.file_path.with_extension("json.tmp");
        fs::write(&temp_path, content)
            .await
            .context("Failed to write temp history file")?;
        fs::rename(&temp_path, &self.file_path)
            .await
            .context("Failed to rename history file")?;

        info!("Saved {} history records to {:?}", kept.len(), self.file_path);
        Ok(())
    }
}
