use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::RendererConfig;
use crate::error::Result;
use crate::tool::ToolCommand;

/// Process boundary to the external video renderer.
#[async_trait]
pub trait RendererTrait: Send + Sync {
    /// Render the configured composition into the given output path.
    async fn render(&self, output_path: &Path) -> Result<()>;
}

/// Default implementation shelling out to the Remotion CLI.
pub struct RemotionRenderer {
    config: RendererConfig,
    project_root: PathBuf,
}

impl RemotionRenderer {
    pub fn new(config: RendererConfig, project_root: PathBuf) -> Self {
        Self { config, project_root }
    }
}

#[async_trait]
impl RendererTrait for RemotionRenderer {
    async fn render(&self, output_path: &Path) -> Result<()> {
        info!(
            "Rendering composition {} -> {}",
            self.config.composition_id,
            output_path.display()
        );

        ToolCommand::new(&self.config.command, "Render")
            .args(self.config.args.iter().cloned())
            .arg(&self.config.entry_point)
            .arg(&self.config.composition_id)
            .arg(output_path.to_string_lossy().into_owned())
            .working_dir(&self.project_root)
            .execute()?;

        info!("Render completed");
        Ok(())
    }
}

/// Factory for creating renderer instances
pub struct RendererFactory;

impl RendererFactory {
    pub fn create_default(config: RendererConfig, project_root: PathBuf) -> Box<dyn RendererTrait> {
        Box::new(RemotionRenderer::new(config, project_root))
    }
}
