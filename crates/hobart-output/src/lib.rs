#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/hobartlabs/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;

pub use export::{ExportError, ExportFormat, Exporter, StatementExport, load_statement};
pub use report::{BatchEntry, BatchSummary, ReportError, render_console};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
