//! Report writers: spreadsheet (xlsx) and plain CSV.
//!
//! Both writers emit the same five columns. Statistic cells carry the raw
//! value; the xlsx writer only applies a two-decimal display format. Null
//! statistics become blank cells (xlsx) or empty fields (CSV).

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;
use tracing::{debug, info};

use crate::report::{report_file_name, Report};

/// Errors from writing a report to disk.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to create output directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("xlsx write failed: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Serializes a [`Report`] to a single file.
pub trait ReportWriter: Send + Sync {
    /// File extension without the dot.
    fn extension(&self) -> &str;

    fn write(&self, report: &Report, path: &Path) -> Result<(), ReportError>;
}

/// Write `report` into `output_dir` under a timestamped name.
///
/// The directory is created if missing; an existing directory is fine.
/// Returns the full path of the written file.
pub fn save_report(
    writer: &dyn ReportWriter,
    report: &Report,
    output_dir: &Path,
    prefix: &str,
) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(output_dir).map_err(|source| ReportError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let path = output_dir.join(report_file_name(
        prefix,
        report.generated_at,
        writer.extension(),
    ));
    debug!(path = %path.display(), rows = report.len(), "writing report");
    writer.write(report, &path)?;
    info!(path = %path.display(), rows = report.len(), "report written");
    Ok(path)
}

// ─── xlsx ───────────────────────────────────────────────────────────

pub const SHEET_NAME: &str = "Sheet1";
const NUMBER_FORMAT: &str = "0.00";

/// Single-sheet workbook with a bold, frozen header row.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxReportWriter;

impl ReportWriter for XlsxReportWriter {
    fn extension(&self) -> &str {
        "xlsx"
    }

    fn write(&self, report: &Report, path: &Path) -> Result<(), ReportError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let number = Format::new().set_num_format(NUMBER_FORMAT);

        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, title) in report.headers.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, title, &header)?;
        }
        sheet.set_freeze_panes(1, 0)?;
        sheet.set_column_width(1, 40)?;
        for col in 2..report.headers.len() as u16 {
            sheet.set_column_width(col, 22)?;
        }

        for (i, row) in report.rows.iter().enumerate() {
            let r = i as u32 + 1;
            sheet.write_string(r, 0, &row.symbol)?;
            sheet.write_string(r, 1, &row.company_name)?;
            for (offset, value) in row.stats().into_iter().enumerate() {
                if let Some(v) = value.filter(|v| v.is_finite()) {
                    sheet.write_number_with_format(r, 2 + offset as u16, v, &number)?;
                }
            }
        }

        workbook.save(path)?;
        Ok(())
    }
}

// ─── CSV ────────────────────────────────────────────────────────────

/// Comma-separated copy of the report with a header row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReportWriter;

impl ReportWriter for CsvReportWriter {
    fn extension(&self) -> &str {
        "csv"
    }

    fn write(&self, report: &Report, path: &Path) -> Result<(), ReportError> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(&report.headers)?;

        for row in &report.rows {
            let mut record = vec![row.symbol.clone(), row.company_name.clone()];
            record.extend(
                row.stats()
                    .into_iter()
                    .map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
            );
            wtr.write_record(&record)?;
        }

        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}
