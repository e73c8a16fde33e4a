//! Saving generated content to timestamped files.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use trendscribe_core::utils::sanitize_topic;

use super::base::{require_string, Tool, ToolOutput};

/// File extension for a platform's output.
pub fn extension_for(platform: &str) -> &'static str {
    if platform == "article" {
        ".md"
    } else {
        ".txt"
    }
}

/// Writes content to `<root>/<folder>/<YYYYMMDD_HHMMSS>_<topic><ext>`.
pub struct SaveContentTool {
    root: PathBuf,
}

impl SaveContentTool {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<folder>`, refusing anything that would leave the root.
    fn resolve_folder(&self, folder: &str) -> anyhow::Result<PathBuf> {
        let relative = Path::new(folder);
        let confined = relative.components().next().is_some()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !confined {
            anyhow::bail!(
                "Access denied: folder '{}' is outside the output root '{}'",
                folder,
                self.root.display()
            );
        }
        Ok(self.root.join(relative))
    }

    /// Save `content` and return the path written.
    pub async fn save(
        &self,
        content: &str,
        folder: &str,
        topic: &str,
        platform: &str,
    ) -> anyhow::Result<PathBuf> {
        let dir = self.resolve_folder(folder)?;
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let file_name = format!("{stamp}_{}{}", sanitize_topic(topic), extension_for(platform));
        let path = dir.join(file_name);

        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(path = %path.display(), bytes = content.len(), "saved content");
        Ok(path)
    }
}

#[async_trait]
impl Tool for SaveContentTool {
    fn name(&self) -> &str {
        "save_content_to_file"
    }

    fn description(&self) -> &str {
        "Save generated content to a timestamped file in the given folder. Articles are saved as Markdown, everything else as plain text. Returns the saved path."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "content": { "type": "string", "description": "Content to save" },
                "folder": { "type": "string", "description": "Output folder, e.g. articles or x_threads" },
                "topic": { "type": "string", "description": "Topic, used for the file name" },
                "platform": { "type": "string", "description": "Platform the content is for" }
            },
            "required": ["content", "folder", "topic", "platform"]
        })
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<ToolOutput> {
        let content = require_string(&params, "content")?;
        let folder = require_string(&params, "folder")?;
        let topic = require_string(&params, "topic")?;
        let platform = require_string(&params, "platform")?;

        let path = self.save(&content, &folder, &topic, &platform).await?;
        Ok(path.display().to_string().into())
    }
}
