//! Report writer
//!
//! Writes one CSV per non-empty category plus one HTML document with every
//! category, all stamped with the same generation time.

pub mod csv;
pub mod html;
pub mod summary;

pub use summary::print_summary;

use crate::error::{CostChefError, Result};
use crate::findings::ReportBundle;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{error, info};

const FILE_TIMESTAMP: &str = "%Y%m%d_%H%M%S";
const DISPLAY_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Files produced by one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportArtifacts {
    pub csv_files: Vec<PathBuf>,
    pub html_file: PathBuf,
}

impl ReportArtifacts {
    pub fn all_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.csv_files.iter().chain(std::iter::once(&self.html_file))
    }
}

pub fn html_file_name(generated_at: &DateTime<Local>) -> String {
    format!(
        "OCI_DevTest_Resource_Report_{}.html",
        generated_at.format(FILE_TIMESTAMP)
    )
}

pub fn csv_file_name(file_label: &str, generated_at: &DateTime<Local>) -> String {
    format!("{}_{}.csv", file_label, generated_at.format(FILE_TIMESTAMP))
}

/// Write every report for `bundle` into `output_dir`, creating it if needed.
///
/// Any write failure is fatal; the files written before it are logged so the
/// operator knows what is on disk.
pub fn write_reports(
    bundle: &ReportBundle,
    output_dir: &Path,
    generated_at: DateTime<Local>,
) -> Result<ReportArtifacts> {
    std::fs::create_dir_all(output_dir).map_err(|source| CostChefError::ReportWrite {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written: Vec<PathBuf> = Vec::new();

    for (category, findings) in bundle.sections() {
        let Some(content) = csv::render_csv(findings) else {
            continue;
        };
        let path = output_dir.join(csv_file_name(category.file_label(), &generated_at));
        write_file(&path, &content, &written)?;
        info!("CSV report saved to: {}", path.display());
        written.push(path);
    }

    let html_file = output_dir.join(html_file_name(&generated_at));
    let html = html::render_html(bundle, &generated_at.format(DISPLAY_TIMESTAMP).to_string());
    write_file(&html_file, &html, &written)?;
    info!("HTML report saved to: {}", html_file.display());

    Ok(ReportArtifacts {
        csv_files: written,
        html_file,
    })
}

fn write_file(path: &Path, content: &str, written: &[PathBuf]) -> Result<()> {
    std::fs::write(path, content).map_err(|source| {
        if !written.is_empty() {
            error!(
                "Report generation stopped; already written: {}",
                written
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        CostChefError::ReportWrite {
            path: path.to_path_buf(),
            source,
        }
    })
}
