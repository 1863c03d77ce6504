use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, CaprenderError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub project: ProjectConfig,
    pub transcriber: TranscriberConfig,
    pub renderer: RendererConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Root of the rendering project (working directory for external tools)
    pub root: PathBuf,
    /// Directory holding the input video and its transcript sidecar
    pub public_dir: PathBuf,
    /// Composition source file carrying the video/template references
    pub composition_file: PathBuf,
    /// Directory the renderer writes into
    pub out_dir: PathBuf,
    /// Extensions recognized as input videos (lowercase, no dot)
    pub video_extensions: Vec<String>,
    /// How to resolve multiple candidate videos
    pub selection: SelectionPolicy,
}

/// Policy for picking "the" input video out of the public directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionPolicy {
    /// Exactly one candidate must exist; more than one is an error
    Single,
    /// Pick the most recently modified candidate, ignore the rest
    Newest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// Command used to run the transcription tool (e.g., node)
    pub command: String,
    /// Script passed to the command, resolved against the project root
    pub script: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Command used to run the renderer (e.g., npx)
    pub command: String,
    /// Leading arguments before the entry point (e.g., ["remotion", "render"])
    pub args: Vec<String>,
    /// Renderer entry point, relative to the project root
    pub entry_point: String,
    /// Composition identifier to render
    pub composition_id: String,
    /// Fixed name the renderer writes before finalization
    pub output_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: ProjectConfig {
                root: PathBuf::from("."),
                public_dir: PathBuf::from("public"),
                composition_file: PathBuf::from("src/Root.tsx"),
                out_dir: PathBuf::from("out"),
                video_extensions: vec!["mp4".to_string()],
                selection: SelectionPolicy::Single,
            },
            transcriber: TranscriberConfig {
                command: "node".to_string(),
                script: "sub.mjs".to_string(),
            },
            renderer: RendererConfig {
                command: "npx".to_string(),
                args: vec!["remotion".to_string(), "render".to_string()],
                entry_point: "src/index.ts".to_string(),
                composition_id: "CaptionedVideo".to_string(),
                output_name: "CaptionedVideo.mp4".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CaprenderError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| CaprenderError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CaprenderError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| CaprenderError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Public directory resolved against the project root.
    pub fn public_dir(&self) -> PathBuf {
        self.project.root.join(&self.project.public_dir)
    }

    /// Composition source file resolved against the project root.
    pub fn composition_file(&self) -> PathBuf {
        self.project.root.join(&self.project.composition_file)
    }

    /// Output directory resolved against the project root.
    pub fn out_dir(&self) -> PathBuf {
        self.project.root.join(&self.project.out_dir)
    }
}
