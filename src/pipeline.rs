use indicatif::ProgressBar;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::assets;
use crate::cli::Template;
use crate::composition::CompositionEditor;
use crate::config::Config;
use crate::error::{Result, CaprenderError};
use crate::render::{RendererFactory, RendererTrait};
use crate::review::{self, HostReviewGate, ReviewGate};
use crate::transcribe::{self, TranscriberFactory, TranscriberTrait};

/// The pipeline driver. Sequences the steps strictly linearly; the first
/// failure aborts the run.
pub struct Pipeline {
    config: Config,
    editor: CompositionEditor,
    transcriber: Box<dyn TranscriberTrait>,
    renderer: Box<dyn RendererTrait>,
    gate: Box<dyn ReviewGate>,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        let transcriber = TranscriberFactory::create_default(
            config.transcriber.clone(),
            config.project.root.clone(),
        );
        let renderer = RendererFactory::create_default(
            config.renderer.clone(),
            config.project.root.clone(),
        );

        Self::with_collaborators(config, transcriber, renderer, Box::new(HostReviewGate))
    }

    /// Construct with injected collaborators.
    pub fn with_collaborators(
        config: Config,
        transcriber: Box<dyn TranscriberTrait>,
        renderer: Box<dyn RendererTrait>,
        gate: Box<dyn ReviewGate>,
    ) -> Result<Self> {
        Ok(Self {
            editor: CompositionEditor::new()?,
            config,
            transcriber,
            renderer,
            gate,
        })
    }

    /// Run the whole pipeline and return the final output path.
    pub async fn run(&self, template: Template, skip_transcribe: bool) -> Result<PathBuf> {
        // Step 1: locate the input video
        let public_dir = self.config.public_dir();
        let video = assets::locate_video(
            &public_dir,
            &self.config.project.video_extensions,
            self.config.project.selection,
        )?;

        // Step 2: sanitize its name, keeping the sidecar in sync
        let video = assets::ensure_legal_name(&video)?;
        let final_name = video
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| CaprenderError::Config("Invalid video filename".to_string()))?
            .to_string();

        // Step 3: transcribe, unless a transcript already exists or skipped
        let sidecar = assets::transcript_path(&video);
        if sidecar.exists() {
            info!("Transcript already present: {}", sidecar.display());
        } else if skip_transcribe {
            info!("Transcription skipped by flag");
        } else {
            let rel = transcribe::relative_posix_path(&video, &self.config.project.root);
            let spinner = step_spinner(format!("Transcribing {}", rel));
            let outcome = self.transcriber.transcribe(&rel).await;
            spinner.finish_and_clear();
            outcome?;
            assets::verify_transcript(&video)?;
        }

        // Step 4: human review gate, blocking without timeout
        review::open_directory(&public_dir);
        self.gate
            .acknowledge("Review the transcript, then confirm to start rendering.")?;

        // Step 5: point the composition at the video and template
        self.editor
            .apply(&self.config.composition_file(), &final_name, template.selector())?;

        // Step 6: render into the fixed-name staging output
        let out_dir = self.config.out_dir();
        std::fs::create_dir_all(&out_dir)?;
        let staging = out_dir.join(&self.config.renderer.output_name);
        if staging.exists() {
            std::fs::remove_file(&staging)?;
        }

        let spinner = step_spinner(format!(
            "Rendering {}",
            self.config.renderer.composition_id
        ));
        let outcome = self.renderer.render(&staging).await;
        spinner.finish_and_clear();
        outcome?;

        if !staging.exists() {
            return Err(CaprenderError::NotFound(format!(
                "renderer produced no output at {}",
                staging.display()
            )));
        }

        // Step 7: rename the fixed-name output to the video's filename
        let final_path = out_dir.join(&final_name);
        if final_path.exists() {
            std::fs::remove_file(&final_path)?;
        }
        std::fs::rename(&staging, &final_path)?;

        info!("Final output: {}", final_path.display());
        Ok(final_path)
    }
}

fn step_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const ROOT_SOURCE: &str = r#"export const config = {
  src: staticFile("placeholder.mp4"),
  template: "tiktok",
};
"#;

    struct FakeTranscriber {
        project_root: PathBuf,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TranscriberTrait for FakeTranscriber {
        async fn transcribe(&self, video_rel_path: &str) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let sidecar = self
                .project_root
                .join(video_rel_path)
                .with_extension("json");
            fs::write(sidecar, b"{}")?;
            Ok(())
        }
    }

    struct FakeRenderer {
        calls: Arc<AtomicUsize>,
        write_output: bool,
    }

    #[async_trait]
    impl RendererTrait for FakeRenderer {
        async fn render(&self, output_path: &Path) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.write_output {
                fs::write(output_path, b"rendered")?;
            }
            Ok(())
        }
    }

    struct AutoGate;

    impl ReviewGate for AutoGate {
        fn acknowledge(&self, _message: &str) -> Result<()> {
            Ok(())
        }
    }

    struct Harness {
        transcriber_calls: Arc<AtomicUsize>,
        renderer_calls: Arc<AtomicUsize>,
    }

    fn project(dir: &Path) -> Config {
        fs::create_dir_all(dir.join("public")).unwrap();
        fs::create_dir_all(dir.join("src")).unwrap();
        fs::write(dir.join("src/Root.tsx"), ROOT_SOURCE).unwrap();

        let mut config = Config::default();
        config.project.root = dir.to_path_buf();
        config
    }

    fn pipeline(dir: &Path, renderer_writes_output: bool) -> (Pipeline, Harness) {
        let config = project(dir);
        let transcriber_calls = Arc::new(AtomicUsize::new(0));
        let renderer_calls = Arc::new(AtomicUsize::new(0));

        let pipeline = Pipeline::with_collaborators(
            config,
            Box::new(FakeTranscriber {
                project_root: dir.to_path_buf(),
                calls: transcriber_calls.clone(),
            }),
            Box::new(FakeRenderer {
                calls: renderer_calls.clone(),
                write_output: renderer_writes_output,
            }),
            Box::new(AutoGate),
        )
        .unwrap();

        let harness = Harness {
            transcriber_calls,
            renderer_calls,
        };
        (pipeline, harness)
    }

    #[tokio::test]
    async fn end_to_end_sanitizes_transcribes_and_finalizes() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("public")).unwrap();
        fs::write(dir.path().join("public/My Clip!.mp4"), b"v").unwrap();

        let (pipeline, harness) = pipeline(dir.path(), true);
        let final_path = pipeline.run(Template::BottomKaraoke, false).await.unwrap();

        assert_eq!(final_path, dir.path().join("out/My_Clip_.mp4"));
        assert!(final_path.exists());
        // No leftover fixed-name renderer artifact
        assert!(!dir.path().join("out/CaptionedVideo.mp4").exists());
        assert_eq!(harness.transcriber_calls.load(Ordering::SeqCst), 1);
        assert_eq!(harness.renderer_calls.load(Ordering::SeqCst), 1);

        let root = fs::read_to_string(dir.path().join("src/Root.tsx")).unwrap();
        assert!(root.contains(r#"staticFile("My_Clip_.mp4")"#));
        assert!(root.contains(r#"template: "bottom_karaoke""#));
    }

    #[tokio::test]
    async fn existing_transcript_skips_the_transcription_subprocess() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("public")).unwrap();
        fs::write(dir.path().join("public/clip.mp4"), b"v").unwrap();
        fs::write(dir.path().join("public/clip.json"), b"{}").unwrap();

        let (pipeline, harness) = pipeline(dir.path(), true);
        pipeline.run(Template::Tiktok, false).await.unwrap();

        assert_eq!(harness.transcriber_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn skip_flag_suppresses_transcription() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("public")).unwrap();
        fs::write(dir.path().join("public/clip.mp4"), b"v").unwrap();

        let (pipeline, harness) = pipeline(dir.path(), true);
        pipeline.run(Template::Tiktok, true).await.unwrap();

        assert_eq!(harness.transcriber_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_video_fails_before_any_subprocess() {
        let dir = tempfile::tempdir().unwrap();

        let (pipeline, harness) = pipeline(dir.path(), true);
        let err = pipeline.run(Template::Tiktok, false).await.unwrap_err();

        assert!(matches!(err, CaprenderError::NotFound(_)));
        assert_eq!(harness.transcriber_calls.load(Ordering::SeqCst), 0);
        assert_eq!(harness.renderer_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn two_videos_fail_ambiguous_before_any_subprocess() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("public")).unwrap();
        fs::write(dir.path().join("public/a.mp4"), b"a").unwrap();
        fs::write(dir.path().join("public/b.mp4"), b"b").unwrap();

        let (pipeline, harness) = pipeline(dir.path(), true);
        let err = pipeline.run(Template::Tiktok, false).await.unwrap_err();

        assert!(matches!(err, CaprenderError::Ambiguous(_)));
        assert_eq!(harness.transcriber_calls.load(Ordering::SeqCst), 0);
        assert_eq!(harness.renderer_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_render_output_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("public")).unwrap();
        fs::write(dir.path().join("public/clip.mp4"), b"v").unwrap();
        fs::write(dir.path().join("public/clip.json"), b"{}").unwrap();

        let (pipeline, harness) = pipeline(dir.path(), false);
        let err = pipeline.run(Template::Tiktok, false).await.unwrap_err();

        assert!(matches!(err, CaprenderError::NotFound(_)));
        assert_eq!(harness.renderer_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unacknowledged_review_aborts_before_rewrite_and_render() {
        struct RefusingGate;
        impl ReviewGate for RefusingGate {
            fn acknowledge(&self, _message: &str) -> Result<()> {
                Err(CaprenderError::Tool("dialog dismissed".to_string()))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("public")).unwrap();
        fs::write(dir.path().join("public/clip.mp4"), b"v").unwrap();
        fs::write(dir.path().join("public/clip.json"), b"{}").unwrap();

        let config = project(dir.path());
        let renderer_calls = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::with_collaborators(
            config,
            Box::new(FakeTranscriber {
                project_root: dir.path().to_path_buf(),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            Box::new(FakeRenderer {
                calls: renderer_calls.clone(),
                write_output: true,
            }),
            Box::new(RefusingGate),
        )
        .unwrap();

        let err = pipeline.run(Template::Tiktok, false).await.unwrap_err();
        assert!(matches!(err, CaprenderError::Tool(_)));
        assert_eq!(renderer_calls.load(Ordering::SeqCst), 0);

        // Composition source untouched
        let root = fs::read_to_string(dir.path().join("src/Root.tsx")).unwrap();
        assert_eq!(root, ROOT_SOURCE);
    }

    #[tokio::test]
    async fn finalize_overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("public")).unwrap();
        fs::write(dir.path().join("public/clip.mp4"), b"v").unwrap();
        fs::write(dir.path().join("public/clip.json"), b"{}").unwrap();
        fs::create_dir_all(dir.path().join("out")).unwrap();
        fs::write(dir.path().join("out/clip.mp4"), b"stale").unwrap();

        let (pipeline, _harness) = pipeline(dir.path(), true);
        let final_path = pipeline.run(Template::Tiktok, false).await.unwrap();

        assert_eq!(fs::read(&final_path).unwrap(), b"rendered");
    }
}
