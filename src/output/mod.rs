//! Report assembly, rendering and PDF output

pub mod formatter;
pub mod pdf;
pub mod report;

pub use formatter::{OutputFormatter, ReportGenerator};
pub use report::{OptimizationReport, ReportContext};
