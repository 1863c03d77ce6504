use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::TranscriberConfig;
use crate::error::Result;
use crate::tool::ToolCommand;

/// Process boundary to the external speech-to-text tool.
#[async_trait]
pub trait TranscriberTrait: Send + Sync {
    /// Transcribe a video given by its project-relative POSIX path. The tool
    /// is expected to leave a same-stem `.json` sidecar next to the video.
    async fn transcribe(&self, video_rel_path: &str) -> Result<()>;
}

/// Default implementation shelling out to the project's node transcription
/// script.
pub struct NodeTranscriber {
    config: TranscriberConfig,
    project_root: PathBuf,
}

impl NodeTranscriber {
    pub fn new(config: TranscriberConfig, project_root: PathBuf) -> Self {
        Self { config, project_root }
    }
}

#[async_trait]
impl TranscriberTrait for NodeTranscriber {
    async fn transcribe(&self, video_rel_path: &str) -> Result<()> {
        info!("Transcribing {}", video_rel_path);

        ToolCommand::new(&self.config.command, "Transcription")
            .arg(&self.config.script)
            .arg(video_rel_path)
            .working_dir(&self.project_root)
            .execute()?;

        info!("Transcription completed");
        Ok(())
    }
}

/// Factory for creating transcriber instances
pub struct TranscriberFactory;

impl TranscriberFactory {
    pub fn create_default(
        config: TranscriberConfig,
        project_root: PathBuf,
    ) -> Box<dyn TranscriberTrait> {
        Box::new(NodeTranscriber::new(config, project_root))
    }
}

/// Path relative to the project root, with POSIX separators, as the
/// transcription tool expects it.
pub fn relative_posix_path(path: &Path, root: &Path) -> String {
    let rel = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
