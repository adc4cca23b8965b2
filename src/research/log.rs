//! Append-only plain-text log of research output.

use crate::error::Result;
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Appends timestamped research blocks to a text file.
#[derive(Debug, Clone)]
pub struct ResearchLog {
    path: PathBuf,
}

impl ResearchLog {
    /// Create a log writing to the given file. Nothing is touched until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one block and return a confirmation message.
    pub async fn append(&self, data: &str) -> Result<String> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let block = format_block(&timestamp.to_string(), data);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(block.as_bytes()).await?;
        file.flush().await?;

        info!("Appended {} bytes to {}", block.len(), self.path.display());

        Ok(format!("Data successfully saved to {}", self.path.display()))
    }
}

fn format_block(timestamp: &str, data: &str) -> String {
    format!("--- Research Output ---\nTimestamp: {}\n\n{}\n\n", timestamp, data)
}
