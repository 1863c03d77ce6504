use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::warn;

use crate::error::Result;
use crate::tool::ToolCommand;

/// Human review gate: block the pipeline until a person confirms. There is
/// deliberately no timeout; the run waits as long as the review takes.
pub trait ReviewGate: Send + Sync {
    fn acknowledge(&self, message: &str) -> Result<()>;
}

/// Platform-backed gate: a native dialog on macOS, a console prompt
/// everywhere else (and as the macOS fallback when the dialog cannot be
/// shown).
pub struct HostReviewGate;

impl ReviewGate for HostReviewGate {
    fn acknowledge(&self, message: &str) -> Result<()> {
        #[cfg(target_os = "macos")]
        {
            if dialog_acknowledge(message) {
                return Ok(());
            }
            warn!("Native dialog unavailable, falling back to console prompt");
        }

        console_acknowledge(message)
    }
}

#[cfg(target_os = "macos")]
fn dialog_acknowledge(message: &str) -> bool {
    let script = format!(
        r#"display dialog "{}" buttons {{"Continue"}} default button "Continue" with icon note"#,
        message.replace('"', "\\\"")
    );
    ToolCommand::new("osascript", "Review dialog")
        .arg("-e")
        .arg(script)
        .execute_best_effort()
}

fn console_acknowledge(message: &str) -> Result<()> {
    println!("{}", message);
    print!("Press Enter to continue: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

/// Best-effort launch of the host file browser on a directory. Failure is a
/// warning, never fatal.
pub fn open_directory(path: &Path) {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    };

    let opened = ToolCommand::new(opener, "Open directory")
        .arg(path.to_string_lossy().into_owned())
        .execute_best_effort();

    if !opened {
        warn!("Could not open {} in the file browser", path.display());
    }
}
