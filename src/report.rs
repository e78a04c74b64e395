//! Graded-report HTML generation.
//!
//! Items are interpolated as their JSON text, unescaped — the report is a
//! developer-facing artifact mirroring the raw grading output. Storage is
//! single-slot: every export overwrites the same file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

pub const REPORT_FILENAME: &str = "report.html";

/// Render the graded items into a standalone HTML document.
pub fn render_report(graded: &[Value]) -> String {
    let mut html = String::from("<html><body><h1>Graded Report</h1><ul>");
    for item in graded {
        html.push_str("<li>");
        html.push_str(&item.to_string());
        html.push_str("</li>");
    }
    html.push_str("</ul></body></html>");
    html
}

/// Overwrite the report file in `dir` and return its path.
pub fn write_report(dir: &Path, html: &str) -> io::Result<PathBuf> {
    let path = dir.join(REPORT_FILENAME);
    fs::write(&path, html)?;
    Ok(path)
}
