//! nsestats runner: configuration, report assembly, writers, and the pipeline.
//!
//! This crate builds on `nsestats-core` to provide:
//! - `ReportConfig` with TOML loading and validation
//! - The metadata → statistics left join and timestamped file naming
//! - xlsx and CSV report writers
//! - The end-to-end `run()` entry point used by the CLI

pub mod config;
pub mod export;
pub mod pipeline;
pub mod report;

pub use config::{ConfigError, ReportConfig};
pub use export::{save_report, CsvReportWriter, ReportError, ReportWriter, XlsxReportWriter};
pub use pipeline::{run, run_at, ErrorKind, Pipeline, PipelineError, ReportResult};
pub use report::{build_report, report_file_name, Report, ReportRow, StatColumns};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_is_send_sync() {
        assert_send::<ReportConfig>();
        assert_sync::<ReportConfig>();
    }

    #[test]
    fn report_types_are_send_sync() {
        assert_send::<Report>();
        assert_sync::<Report>();
        assert_send::<ReportResult>();
        assert_sync::<ReportResult>();
    }

    #[test]
    fn pipeline_error_is_send() {
        assert_send::<PipelineError>();
    }

    #[test]
    fn writers_are_send_sync() {
        assert_send::<XlsxReportWriter>();
        assert_sync::<XlsxReportWriter>();
        assert_send::<CsvReportWriter>();
        assert_sync::<CsvReportWriter>();
    }
}
