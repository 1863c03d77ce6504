use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Caption template injected into the composition source
    #[arg(short, long, value_enum, default_value = "tiktok")]
    pub template: Template,

    /// Skip the transcription step even when no transcript exists
    #[arg(long)]
    pub skip_transcribe: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Allowed caption templates. The selector strings are the keys the
/// composition source dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Template {
    /// Centered TikTok-style captions
    Tiktok,
    /// TikTok story variant
    TiktokStory,
    /// TikTok captions plus a bottom karaoke line
    BottomKaraoke,
}

impl Template {
    pub fn selector(&self) -> &'static str {
        match self {
            Template::Tiktok => "tiktok",
            Template::TiktokStory => "tiktok_story",
            Template::BottomKaraoke => "bottom_karaoke",
        }
    }
}
