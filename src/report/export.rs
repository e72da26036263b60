use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::model::ScreenReport;

/// Output format chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => Ok(ExportFormat::Csv),
            Some("json") => Ok(ExportFormat::Json),
            _ => bail!(
                "Unsupported output file '{}'. Use a .csv or .json extension.",
                path.display()
            ),
        }
    }
}

/// Write the report to `path`. CSV holds the evaluated rows only, JSON
/// holds rows and failures.
pub fn export(report: &ScreenReport, path: &Path) -> Result<()> {
    match ExportFormat::from_path(path)? {
        ExportFormat::Csv => write_csv(report, path),
        ExportFormat::Json => write_json(report, path),
    }
}

fn write_csv(report: &ScreenReport, path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("writing {}", path.display()))?;
    for row in &report.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(report: &ScreenReport, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("writing {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("serializing report to {}", path.display()))?;
    Ok(())
}
