use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::info;

use crate::{render::RenderedImage, report::Report};

pub struct WrittenLayout {
    pub report_path: PathBuf,
    pub image_path: PathBuf,
}

/// Persists plans as `<output_dir>/<name>/report.json` and `layout.png`.
pub struct LayoutWriter {
    output_dir: PathBuf,
}

impl LayoutWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Writer for a nested directory; `name` is made path-safe first.
    pub fn scoped(&self, name: &str) -> Self {
        Self::new(self.output_dir.join(sanitize(name)))
    }

    pub fn write(&self, name: &str, report: &Report, image: &RenderedImage) -> Result<WrittenLayout> {
        let dir = self.output_dir.join(sanitize(name));
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        let report_path = dir.join("report.json");
        let json = serde_json::to_string_pretty(&report.view())?;
        fs::write(&report_path, json)
            .with_context(|| format!("Failed to write {}", report_path.display()))?;

        let image_path = dir.join("layout.png");
        fs::write(&image_path, &image.bytes)
            .with_context(|| format!("Failed to write {}", image_path.display()))?;

        info!(
            report = %report_path.display(),
            image = %image_path.display(),
            "wrote layout"
        );
        Ok(WrittenLayout {
            report_path,
            image_path,
        })
    }
}

/// Directory name used for `name`. Distinct names can map to the same directory.
pub(crate) fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "layout".to_string()
    } else {
        cleaned
    }
}
