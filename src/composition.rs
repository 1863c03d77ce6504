use regex::Regex;
use std::path::Path;
use tracing::info;

use crate::error::{Result, CaprenderError};

/// In-place editor for the composition source file. The file stays free-form
/// text; only the referenced video filename and the template selector are
/// rewritten, everything else is left byte-identical.
pub struct CompositionEditor {
    source_pattern: Regex,
    template_pattern: Regex,
}

impl CompositionEditor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            source_pattern: Regex::new(
                r#"src:\s*staticFile\(\s*["'`]([^"'`]+)["'`]\s*\)"#,
            )?,
            template_pattern: Regex::new(r#"template:\s*["'`]([^"'`]+)["'`]"#)?,
        })
    }

    /// Rewrite the composition file to reference the given video and template.
    pub fn apply(&self, composition_file: &Path, video_name: &str, template: &str) -> Result<()> {
        let text = std::fs::read_to_string(composition_file).map_err(|e| {
            CaprenderError::Config(format!(
                "Failed to read {}: {}",
                composition_file.display(),
                e
            ))
        })?;

        let updated = self.apply_to_text(&text, video_name, template)?;
        std::fs::write(composition_file, updated)?;

        info!("Updated composition source: {}", composition_file.display());
        Ok(())
    }

    /// Pure rewrite of the source text, for callers holding the file contents.
    pub fn apply_to_text(&self, text: &str, video_name: &str, template: &str) -> Result<String> {
        let text = rewrite_capture(text, &self.source_pattern, video_name, "source file reference")?;
        rewrite_capture(&text, &self.template_pattern, template, "template selector")
    }
}

/// Replace capture group 1 of every match with `replacement`, leaving all
/// surrounding bytes untouched. Zero matches means the file is not in the
/// shape this tool expects.
fn rewrite_capture(text: &str, pattern: &Regex, replacement: &str, what: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut count = 0;

    for caps in pattern.captures_iter(text) {
        let Some(group) = caps.get(1) else { continue };
        out.push_str(&text[last..group.start()]);
        out.push_str(replacement);
        last = group.end();
        count += 1;
    }

    if count == 0 {
        return Err(CaprenderError::ConfigShape(format!(
            "{} not found",
            what
        )));
    }

    out.push_str(&text[last..]);
    Ok(out)
}
